//! Verification policy as versionable data
//!
//! Everything that tunes what the verifier accepts lives here: the greenlist
//! plus the per-rule disallowed opcode and type lists. The policy is data,
//! not code — it loads from a JSON file and must be versioned together with
//! any deployed verifier, since changing it changes what is admitted as
//! deterministic.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::greenlist::Greenlist;

/// Failure to load a policy file.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed policy file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The complete tunable surface of the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Methods and types exempt from reference inspection.
    pub greenlist: Greenlist,
    /// Opcode mnemonics rejected wherever they appear.
    pub disallowed_opcodes: BTreeSet<String>,
    /// Type full names that no reachable method may reference or belong to.
    pub disallowed_types: BTreeSet<String>,
    /// Parameter types contract methods may not accept (user set only).
    pub disallowed_parameter_types: BTreeSet<String>,
    /// Return types contract methods may not expose (user set only).
    pub disallowed_return_types: BTreeSet<String>,
}

impl Default for Policy {
    fn default() -> Self {
        Self::baseline()
    }
}

impl Policy {
    /// The built-in baseline policy.
    pub fn baseline() -> Self {
        // Unmanaged memory, indirect calls, varargs, typed references, and
        // anything that introduces floating point.
        let disallowed_opcodes = [
            "calli", "cpblk", "initblk", "localloc", "jmp", "arglist", "mkrefany", "refanytype",
            "refanyval", "ckfinite", "ldc.r4", "ldc.r8", "conv.r4", "conv.r8", "conv.r.un",
        ];

        // Clocks, randomness, environment, threading, I/O, floats, and
        // hash-order-dependent collections.
        let disallowed_types = [
            "System.DateTime",
            "System.DateTimeOffset",
            "System.Random",
            "System.Guid",
            "System.Environment",
            "System.Single",
            "System.Double",
            "System.Threading.Thread",
            "System.Threading.Tasks.Task",
            "System.IO.File",
            "System.IO.Directory",
            "System.Collections.Hashtable",
            "System.Collections.Generic.Dictionary`2",
            "System.Collections.Generic.HashSet`1",
            "System.AppDomain",
            "System.Reflection.Assembly",
        ];

        // Contract entry points exchange value types only; floats and open
        // object graphs do not cross the boundary.
        let boundary_types = [
            "System.Single",
            "System.Double",
            "System.Object",
            "System.DateTime",
            "System.IntPtr",
            "System.UIntPtr",
        ];

        Self {
            greenlist: Greenlist::baseline(),
            disallowed_opcodes: disallowed_opcodes.iter().map(|s| s.to_string()).collect(),
            disallowed_types: disallowed_types.iter().map(|s| s.to_string()).collect(),
            disallowed_parameter_types: boundary_types.iter().map(|s| s.to_string()).collect(),
            disallowed_return_types: boundary_types.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Load a policy from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
