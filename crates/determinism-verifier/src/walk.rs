//! Reachability walk over the referenced-method graph
//!
//! Expands the call graph depth-first from a method, applying the library
//! rule set to every method it reaches. The graph may contain cycles, so the
//! walk keeps two pieces of state:
//!
//! - `visited`: methods whose expansion has completed, with whether their
//!   subtree produced any finding. A completed method is never re-validated,
//!   so shared dependency sub-graphs are scanned once per run.
//! - `in_progress`: methods currently on the call chain. Re-encountering one
//!   stops expansion instead of recursing forever — this is what makes the
//!   walk terminate on mutually recursive library calls.

use std::collections::{BTreeMap, BTreeSet};

use contract_model::{Method, Module};

use crate::error::{Diagnostic, DiagnosticKind};
use crate::greenlist::Greenlist;
use crate::rules::RuleSet;

/// Immediate referenced methods of `method`, resolved against the module's
/// method table and deduplicated by signature (first occurrence wins).
///
/// Returns nothing when the method has no body or is greenlisted — for a
/// greenlisted method, inspection stops at the boundary and everything it
/// calls is assumed trusted.
///
/// References that fail to resolve are surfaced as `UnresolvableReference`
/// findings against `method`; they are never silently dropped.
pub(crate) fn referenced_methods<'m>(
    module: &'m Module,
    greenlist: &Greenlist,
    method: &Method,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<&'m Method> {
    if greenlist.is_exempt(method) {
        return Vec::new();
    }

    let mut seen = BTreeSet::new();
    let mut referenced = Vec::new();
    for instruction in method.instructions() {
        let Some(reference) = instruction.method_operand() else {
            continue;
        };
        if !seen.insert(reference) {
            continue;
        }
        match module.method(reference) {
            Some(callee) => referenced.push(callee),
            None => diagnostics.push(Diagnostic::new(
                method,
                DiagnosticKind::UnresolvableReference {
                    reference: reference.to_string(),
                },
            )),
        }
    }
    referenced
}

/// Mutable state threaded through one verification run.
#[derive(Default)]
pub(crate) struct WalkState {
    /// Fully expanded methods: signature → subtree produced a finding.
    visited: BTreeMap<String, bool>,
    /// Methods on the current call chain.
    in_progress: BTreeSet<String>,
}

impl WalkState {
    #[cfg(test)]
    pub(crate) fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

/// Expands referenced-call graphs and applies the library rule set.
pub(crate) struct Walker<'a> {
    module: &'a Module,
    greenlist: &'a Greenlist,
    library_rules: &'a RuleSet,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        module: &'a Module,
        greenlist: &'a Greenlist,
        library_rules: &'a RuleSet,
    ) -> Self {
        Self {
            module,
            greenlist,
            library_rules,
        }
    }

    /// Depth-first expansion: recurse into every referenced method first,
    /// then validate the current method and record it as visited.
    ///
    /// Appends findings to `out` and returns whether this method's subtree
    /// produced any — including on earlier visits, so a caller referencing an
    /// already-scanned dirty dependency still learns about it.
    pub(crate) fn expand_and_validate(
        &self,
        method: &Method,
        state: &mut WalkState,
        out: &mut Vec<Diagnostic>,
    ) -> bool {
        if let Some(&dirty) = state.visited.get(&method.full_name) {
            return dirty;
        }
        if state.in_progress.contains(&method.full_name) {
            // Cycle back to an ancestor on the current chain; it finishes
            // its own expansion higher up.
            return false;
        }

        state.in_progress.insert(method.full_name.clone());

        let mut local = Vec::new();
        let mut dirty = false;
        for callee in referenced_methods(self.module, self.greenlist, method, &mut local) {
            dirty |= self.expand_and_validate(callee, state, &mut local);
        }

        state.in_progress.remove(&method.full_name);

        local.extend(self.library_rules.validate(method));
        dirty |= !local.is_empty();
        state.visited.insert(method.full_name.clone(), dirty);

        out.extend(local);
        dirty
    }
}

#[cfg(test)]
mod tests {
    use contract_model::{MethodBuilder, Module, ModuleBuilder};

    use super::{WalkState, Walker, referenced_methods};
    use crate::error::DiagnosticKind;
    use crate::greenlist::Greenlist;
    use crate::policy::Policy;
    use crate::rules::RuleSet;

    fn module_with_cycle() -> Module {
        // A calls B, B calls A
        ModuleBuilder::new("My.Contract")
            .method(
                MethodBuilder::new("System.Void Lib.A::M()")
                    .calls("System.Void Lib.B::M()")
                    .build(),
            )
            .method(
                MethodBuilder::new("System.Void Lib.B::M()")
                    .calls("System.Void Lib.A::M()")
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_referenced_methods_resolve_in_order() {
        let module = ModuleBuilder::new("My.Contract")
            .method(
                MethodBuilder::new("System.Void My.Contract::Run()")
                    .calls("System.Void Lib.B::M()")
                    .calls("System.Void Lib.A::M()")
                    .calls("System.Void Lib.B::M()") // duplicate call site
                    .build(),
            )
            .method(MethodBuilder::new("System.Void Lib.A::M()").build())
            .method(MethodBuilder::new("System.Void Lib.B::M()").build())
            .build();

        let mut diagnostics = Vec::new();
        let method = module.method("System.Void My.Contract::Run()").unwrap();
        let referenced =
            referenced_methods(&module, &Greenlist::default(), method, &mut diagnostics);

        let names: Vec<_> = referenced.iter().map(|m| m.full_name.as_str()).collect();
        assert_eq!(names, vec!["System.Void Lib.B::M()", "System.Void Lib.A::M()"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_greenlisted_type_yields_no_references() {
        let mut greenlist = Greenlist::default();
        greenlist.types.insert("Lib.Trusted".into());

        let module = ModuleBuilder::new("My.Contract")
            .method(
                MethodBuilder::new("System.Void Lib.Trusted::M()")
                    .calls("System.Void Lib.Untrusted::Danger()")
                    .build(),
            )
            .build();

        let mut diagnostics = Vec::new();
        let method = module.method("System.Void Lib.Trusted::M()").unwrap();
        let referenced = referenced_methods(&module, &greenlist, method, &mut diagnostics);
        assert!(referenced.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unresolvable_reference_is_surfaced() {
        let module = ModuleBuilder::new("My.Contract")
            .method(
                MethodBuilder::new("System.Void My.Contract::Run()")
                    .calls("System.Void Lib.Gone::M()")
                    .build(),
            )
            .build();

        let mut diagnostics = Vec::new();
        let method = module.method("System.Void My.Contract::Run()").unwrap();
        let referenced =
            referenced_methods(&module, &Greenlist::default(), method, &mut diagnostics);
        assert!(referenced.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0].kind(),
            DiagnosticKind::UnresolvableReference { .. }
        ));
    }

    #[test]
    fn test_cycle_terminates_and_validates_each_once() {
        let module = module_with_cycle();
        let policy = Policy::baseline();
        let greenlist = Greenlist::default();
        let rules = RuleSet::library(&policy);
        let walker = Walker::new(&module, &greenlist, &rules);

        let mut state = WalkState::default();
        let mut out = Vec::new();
        let entry = module.method("System.Void Lib.A::M()").unwrap();
        walker.expand_and_validate(entry, &mut state, &mut out);

        assert_eq!(state.visited_count(), 2, "A and B each visited once");
        assert!(out.is_empty(), "cycle alone is not a violation");
    }

    #[test]
    fn test_dirty_flag_sticks_across_revisits() {
        let module = ModuleBuilder::new("My.Contract")
            .method(MethodBuilder::new("System.Void Lib::Native()").native().build())
            .build();
        let policy = Policy::baseline();
        let greenlist = Greenlist::default();
        let rules = RuleSet::library(&policy);
        let walker = Walker::new(&module, &greenlist, &rules);

        let mut state = WalkState::default();
        let entry = module.method("System.Void Lib::Native()").unwrap();

        let mut first = Vec::new();
        assert!(walker.expand_and_validate(entry, &mut state, &mut first));
        assert_eq!(first.len(), 1);

        // Second visit: no re-validation, but the subtree is still dirty.
        let mut second = Vec::new();
        assert!(walker.expand_and_validate(entry, &mut state, &mut second));
        assert!(second.is_empty());
    }
}
