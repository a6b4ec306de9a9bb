//! Greenlist of trusted-deterministic methods and types
//!
//! Greenlist entries are exact fully-qualified strings — no wildcards. A
//! method is exempt from reference inspection when its own full signature is
//! in the method set, or its declaring type's full name is in the type set.
//! Everything a greenlisted method calls is assumed trusted, so the walk
//! stops at the boundary.
//!
//! Note the filter is applied to the method whose references are being
//! enumerated (the caller), not to the callee. This mirrors the deployed
//! policy and is kept deliberately: changing the side the filter applies to
//! changes what is admitted.

use std::collections::BTreeSet;

use contract_model::Method;
use serde::{Deserialize, Serialize};

/// Allow-list of trusted-deterministic methods and declaring types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Greenlist {
    /// Full method signatures trusted without inspection.
    pub methods: BTreeSet<String>,
    /// Full type names whose methods are all trusted without inspection.
    pub types: BTreeSet<String>,
}

impl Greenlist {
    /// Whether the given method is exempt from reference inspection.
    pub fn is_exempt(&self, method: &Method) -> bool {
        self.methods.contains(&method.full_name) || self.types.contains(&method.declaring_type)
    }

    /// The built-in trusted surface: the contract SDK base types and a small
    /// set of runtime primitives every compiled contract links against.
    pub fn baseline() -> Self {
        let methods = [
            "System.Void System.Object::.ctor()",
            "System.String System.String::Concat(System.String,System.String)",
            "System.Boolean System.String::op_Equality(System.String,System.String)",
            "System.Boolean System.String::op_Inequality(System.String,System.String)",
        ];
        let types = [
            "Ledger.Sdk.SmartContract",
            "Ledger.Sdk.PersistentState",
            "Ledger.Sdk.Message",
            "Ledger.Sdk.Address",
            "Ledger.Sdk.Block",
        ];
        Self {
            methods: methods.iter().map(|s| s.to_string()).collect(),
            types: types.iter().map(|s| s.to_string()).collect(),
        }
    }
}
