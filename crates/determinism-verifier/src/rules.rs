//! Rule validators and their composition into ordered sets
//!
//! Each rule is one capability: inspect a method, return findings. Rules are
//! pure with respect to their input and hold no mutable state, so the two
//! process-wide sets can be shared freely across verification runs.
//!
//! Two compositions exist:
//!
//! - the **library set**, applied to every transitively reachable non-user
//!   method: flag check, disallowed opcodes, disallowed types, hash-code use
//! - the **user set**, applied to contract methods, which runs the library
//!   rules plus the boundary checks (parameter shapes, return types,
//!   anonymous types)
//!
//! Running a set means invoking every rule in fixed order and concatenating
//! findings. Absence of findings is the success case, not an error.

use std::collections::BTreeSet;

use contract_model::{Method, signature};

use crate::error::{Diagnostic, DiagnosticKind};
use crate::policy::Policy;

/// One pluggable determinism check.
///
/// New rules conforming to this contract can be composed into a set without
/// touching orchestrator or walker logic.
pub trait Rule: Send + Sync {
    /// Inspect one method; zero findings means the rule is satisfied.
    fn validate(&self, method: &Method) -> Vec<Diagnostic>;
}

/// An ordered, immutable collection of rules.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// Compose a set from explicit rules, preserving order.
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// The library set applied to every reachable non-user method.
    pub fn library(policy: &Policy) -> Self {
        Self::new(vec![
            Box::new(FlagRule),
            Box::new(DisallowedOpcodeRule::new(&policy.disallowed_opcodes)),
            Box::new(DisallowedTypeRule::new(&policy.disallowed_types)),
            Box::new(HashCodeRule),
        ])
    }

    /// The stricter user set applied to contract methods.
    pub fn user(policy: &Policy) -> Self {
        let mut set = Self::library(policy);
        set.rules.push(Box::new(ParameterRule::new(
            &policy.disallowed_parameter_types,
        )));
        set.rules
            .push(Box::new(ReturnTypeRule::new(&policy.disallowed_return_types)));
        set.rules.push(Box::new(AnonymousTypeRule));
        set
    }

    /// Run every rule in order and concatenate the findings.
    pub fn validate(&self, method: &Method) -> Vec<Diagnostic> {
        self.rules
            .iter()
            .flat_map(|rule| rule.validate(method))
            .collect()
    }
}

/// Rejects methods flagged native, unmanaged, internal-call, or P/Invoke.
pub struct FlagRule;

impl Rule for FlagRule {
    fn validate(&self, method: &Method) -> Vec<Diagnostic> {
        let flags = method.flags.set_flags();
        if flags.is_empty() {
            return Vec::new();
        }
        vec![Diagnostic::new(
            method,
            DiagnosticKind::NonDeterministicFlags {
                flags: flags.join(", "),
            },
        )]
    }
}

/// Rejects disallowed opcode mnemonics wherever they appear in a body.
pub struct DisallowedOpcodeRule {
    opcodes: BTreeSet<String>,
}

impl DisallowedOpcodeRule {
    pub fn new(opcodes: &BTreeSet<String>) -> Self {
        Self {
            opcodes: opcodes.clone(),
        }
    }
}

impl Rule for DisallowedOpcodeRule {
    fn validate(&self, method: &Method) -> Vec<Diagnostic> {
        method
            .instructions()
            .iter()
            .filter(|instruction| self.opcodes.contains(&instruction.opcode))
            .map(|instruction| {
                Diagnostic::new(
                    method,
                    DiagnosticKind::DisallowedInstruction {
                        opcode: instruction.opcode.clone(),
                    },
                )
            })
            .collect()
    }
}

/// Rejects methods that belong to or reference a disallowed type.
pub struct DisallowedTypeRule {
    types: BTreeSet<String>,
}

impl DisallowedTypeRule {
    pub fn new(types: &BTreeSet<String>) -> Self {
        Self {
            types: types.clone(),
        }
    }
}

impl Rule for DisallowedTypeRule {
    fn validate(&self, method: &Method) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if self.types.contains(&method.declaring_type) {
            diagnostics.push(Diagnostic::new(
                method,
                DiagnosticKind::DisallowedType {
                    type_name: method.declaring_type.clone(),
                },
            ));
        }

        for instruction in method.instructions() {
            let Some(type_name) = instruction.type_operand() else {
                continue;
            };
            if self.types.contains(type_name) {
                diagnostics.push(Diagnostic::new(
                    method,
                    DiagnosticKind::DisallowedType {
                        type_name: type_name.to_string(),
                    },
                ));
            }
        }

        diagnostics
    }
}

/// Rejects call sites targeting `GetHashCode`.
///
/// Hash codes are runtime- and process-dependent, so any observable use
/// diverges across validators.
pub struct HashCodeRule;

impl Rule for HashCodeRule {
    fn validate(&self, method: &Method) -> Vec<Diagnostic> {
        method
            .instructions()
            .iter()
            .filter_map(|instruction| instruction.method_operand())
            .filter(|callee| signature::method_name(callee) == Some("GetHashCode"))
            .map(|callee| {
                Diagnostic::new(
                    method,
                    DiagnosticKind::HashCodeUsage {
                        callee: callee.to_string(),
                    },
                )
            })
            .collect()
    }
}

/// Rejects disallowed parameter types on contract methods.
pub struct ParameterRule {
    types: BTreeSet<String>,
}

impl ParameterRule {
    pub fn new(types: &BTreeSet<String>) -> Self {
        Self {
            types: types.clone(),
        }
    }
}

impl Rule for ParameterRule {
    fn validate(&self, method: &Method) -> Vec<Diagnostic> {
        method
            .parameter_types
            .iter()
            .filter(|ty| self.types.contains(*ty))
            .map(|ty| {
                Diagnostic::new(
                    method,
                    DiagnosticKind::DisallowedParameter {
                        type_name: ty.clone(),
                    },
                )
            })
            .collect()
    }
}

/// Rejects disallowed return types on contract methods.
pub struct ReturnTypeRule {
    types: BTreeSet<String>,
}

impl ReturnTypeRule {
    pub fn new(types: &BTreeSet<String>) -> Self {
        Self {
            types: types.clone(),
        }
    }
}

impl Rule for ReturnTypeRule {
    fn validate(&self, method: &Method) -> Vec<Diagnostic> {
        if self.types.contains(&method.return_type) {
            return vec![Diagnostic::new(
                method,
                DiagnosticKind::DisallowedReturn {
                    type_name: method.return_type.clone(),
                },
            )];
        }
        Vec::new()
    }
}

/// Rejects references to compiler-generated anonymous types.
///
/// Their synthesized members (notably `GetHashCode`) are not under the
/// contract author's control.
pub struct AnonymousTypeRule;

impl AnonymousTypeRule {
    fn is_anonymous(type_name: &str) -> bool {
        type_name.starts_with("<>") || type_name.contains("AnonymousType")
    }
}

impl Rule for AnonymousTypeRule {
    fn validate(&self, method: &Method) -> Vec<Diagnostic> {
        method
            .instructions()
            .iter()
            .filter_map(|instruction| instruction.type_operand())
            .filter(|type_name| Self::is_anonymous(type_name))
            .map(|type_name| {
                Diagnostic::new(
                    method,
                    DiagnosticKind::AnonymousType {
                        type_name: type_name.to_string(),
                    },
                )
            })
            .collect()
    }
}
