//! Verification orchestrator
//!
//! Drives one verification run: applies the user rule set to every contract
//! method, expands each method's referenced-call graph through the
//! [`Walker`](crate::walk::Walker), and aggregates everything into a single
//! ordered [`VerificationReport`].

use contract_model::Module;

use crate::error::{Diagnostic, DiagnosticKind, VerificationReport, VerifyError};
use crate::greenlist::Greenlist;
use crate::policy::Policy;
use crate::rules::RuleSet;
use crate::walk::{WalkState, Walker, referenced_methods};

/// Verifier for a decompiled smart-contract module.
///
/// Holds only immutable configuration; per-run state lives on the stack of
/// [`verify`](Verifier::verify), so one `Verifier` may serve concurrent runs
/// over different modules.
pub struct Verifier<'a> {
    module: &'a Module,
    greenlist: Greenlist,
    user_rules: RuleSet,
    library_rules: RuleSet,
}

impl<'a> Verifier<'a> {
    /// Verifier with the built-in baseline policy.
    pub fn new(module: &'a Module) -> Self {
        Self::with_policy(module, &Policy::baseline())
    }

    /// Verifier configured from an explicit policy.
    pub fn with_policy(module: &'a Module, policy: &Policy) -> Self {
        Self {
            module,
            greenlist: policy.greenlist.clone(),
            user_rules: RuleSet::user(policy),
            library_rules: RuleSet::library(policy),
        }
    }

    /// Verifier with caller-supplied rule sets. This is the extension seam:
    /// new rules compose into sets without touching the walk itself.
    pub fn with_rule_sets(
        module: &'a Module,
        greenlist: Greenlist,
        user_rules: RuleSet,
        library_rules: RuleSet,
    ) -> Self {
        Self {
            module,
            greenlist,
            user_rules,
            library_rules,
        }
    }

    /// Run the full verification.
    ///
    /// Returns `Err` only for a structurally incomplete module. Policy
    /// findings never abort the run; they accumulate into the report in a
    /// stable order (contract methods in declaration order, referenced
    /// methods in first-call order).
    pub fn verify(&self) -> Result<VerificationReport, VerifyError> {
        if self.module.contract_type.is_empty() {
            return Err(VerifyError::MissingContractType);
        }
        let contract = self
            .module
            .type_def(&self.module.contract_type)
            .ok_or_else(|| VerifyError::UnknownContractType(self.module.contract_type.clone()))?;

        let walker = Walker::new(self.module, &self.greenlist, &self.library_rules);
        // One visited set per run: shared dependency sub-graphs are
        // library-validated once no matter how many entry points reach them.
        let mut state = WalkState::default();
        let mut diagnostics = Vec::new();

        for signature in &contract.methods {
            let method =
                self.module
                    .method(signature)
                    .ok_or_else(|| VerifyError::MissingMethod {
                        signature: signature.clone(),
                        type_name: contract.full_name.clone(),
                    })?;
            // Abstract/extern contract methods contribute nothing.
            if !method.has_body() {
                continue;
            }

            diagnostics.extend(self.user_rules.validate(method));

            let mut reference_diagnostics = Vec::new();
            let referenced = referenced_methods(
                self.module,
                &self.greenlist,
                method,
                &mut reference_diagnostics,
            );
            diagnostics.append(&mut reference_diagnostics);

            for callee in referenced {
                let mut sub = Vec::new();
                let dirty = walker.expand_and_validate(callee, &mut state, &mut sub);
                diagnostics.extend(sub);
                if dirty {
                    // Summary marker on the origin method, distinct from the
                    // detailed findings recorded against the callee itself.
                    diagnostics.push(Diagnostic::new(
                        method,
                        DiagnosticKind::NonDeterministicMethodReference {
                            referenced: callee.full_name.clone(),
                        },
                    ));
                }
            }
        }

        Ok(VerificationReport::new(diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use contract_model::{MethodBuilder, ModuleBuilder};

    use super::Verifier;
    use crate::error::{DiagnosticKind, VerifyError};

    #[test]
    fn test_pass_case() {
        let module = ModuleBuilder::new("My.Contract")
            .method(
                MethodBuilder::new("System.Void My.Contract::Run()")
                    .instruction(contract_model::Instruction::new("nop"))
                    .instruction(contract_model::Instruction::new("ret"))
                    .build(),
            )
            .build();

        let report = Verifier::new(&module).verify().unwrap();
        assert!(report.is_deterministic(), "{:?}", report.diagnostics());
    }

    #[test]
    fn test_fail_case_native_reference() {
        let module = ModuleBuilder::new("My.Contract")
            .method(
                MethodBuilder::new("System.Void My.Contract::Run()")
                    .calls("System.Void Lib::Native()")
                    .build(),
            )
            .method(MethodBuilder::new("System.Void Lib::Native()").native().build())
            .build();

        let report = Verifier::new(&module).verify().unwrap();

        // Detailed finding against the callee...
        assert!(report.diagnostics().iter().any(|d| {
            d.method_full_name() == "System.Void Lib::Native()"
                && matches!(d.kind(), DiagnosticKind::NonDeterministicFlags { .. })
        }));
        // ...plus the summary marker on the origin method.
        assert!(report.diagnostics().iter().any(|d| {
            d.method_full_name() == "System.Void My.Contract::Run()"
                && matches!(
                    d.kind(),
                    DiagnosticKind::NonDeterministicMethodReference { referenced }
                        if referenced == "System.Void Lib::Native()"
                )
        }));
    }

    #[test]
    fn test_bodyless_contract_methods_skipped() {
        let module = ModuleBuilder::new("My.Contract")
            .method(
                MethodBuilder::new("System.Void My.Contract::Extern()")
                    .bodyless()
                    .build(),
            )
            .build();

        let report = Verifier::new(&module).verify().unwrap();
        assert!(report.is_deterministic());
    }

    #[test]
    fn test_missing_contract_type_fails_fast() {
        let module = ModuleBuilder::new("").build();
        let error = Verifier::new(&module).verify().unwrap_err();
        assert!(matches!(error, VerifyError::MissingContractType));
    }

    #[test]
    fn test_unknown_contract_type_fails_fast() {
        let mut module = ModuleBuilder::new("My.Contract").build();
        module.types.clear();
        let error = Verifier::new(&module).verify().unwrap_err();
        assert!(matches!(error, VerifyError::UnknownContractType(name) if name == "My.Contract"));
    }

    #[test]
    fn test_missing_method_fails_fast() {
        let mut module = ModuleBuilder::new("My.Contract")
            .method(MethodBuilder::new("System.Void My.Contract::Run()").build())
            .build();
        module.methods.clear();
        let error = Verifier::new(&module).verify().unwrap_err();
        assert!(matches!(error, VerifyError::MissingMethod { .. }));
    }

    #[test]
    fn test_user_methods_iterate_in_declaration_order() {
        // Both methods violate; findings must come out in declaration order.
        let module = ModuleBuilder::new("My.Contract")
            .method(
                MethodBuilder::new("System.Void My.Contract::Zeta()")
                    .instruction(contract_model::Instruction::new("calli"))
                    .build(),
            )
            .method(
                MethodBuilder::new("System.Void My.Contract::Alpha()")
                    .instruction(contract_model::Instruction::new("calli"))
                    .build(),
            )
            .build();

        let report = Verifier::new(&module).verify().unwrap();
        let methods: Vec<_> = report
            .diagnostics()
            .iter()
            .map(|d| d.method_name())
            .collect();
        assert_eq!(methods, vec!["Zeta", "Alpha"]);
    }
}
