//! Module and type definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Method;

/// The decompiled artifact under test.
///
/// Produced by the external introspection layer before verification and
/// discarded after. The verifier only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Full name of the single user-authored contract type whose methods
    /// are the verification entry points.
    pub contract_type: String,
    /// Every type defined in the module, in declaration order.
    pub types: Vec<TypeDef>,
    /// Every method known to the module, keyed by full signature. This is
    /// the resolution table for instruction-level method references.
    pub methods: BTreeMap<String, Method>,
}

impl Module {
    /// Look up a type definition by full name.
    pub fn type_def(&self, full_name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|ty| ty.full_name == full_name)
    }

    /// Resolve a method reference by full signature.
    pub fn method(&self, signature: &str) -> Option<&Method> {
        self.methods.get(signature)
    }
}

/// One type defined in the module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDef {
    /// Full name, e.g. `My.Contract`.
    pub full_name: String,
    /// Signatures of the type's methods, in declaration order. Declaration
    /// order is what makes verification output reproducible across runs.
    pub methods: Vec<String>,
}
