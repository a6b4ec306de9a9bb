//! Determinism verifier for compiled smart-contract modules
//!
//! Decides, ahead of execution, whether a contract's bytecode is safe for
//! consensus: every validator executing the same code with the same inputs
//! must reach the same result. Non-deterministic constructs would let nodes
//! diverge, so this verifier runs once as an admission gate.
//!
//! # Verification Checklist
//!
//! | Check | Description |
//! |-------|-------------|
//! | **Method flags** | Reject native, unmanaged, internal-call, P/Invoke methods anywhere in reach |
//! | **Disallowed instructions** | Reject unmanaged-memory and float-introducing opcodes (`calli`, `localloc`, `ldc.r8`, ...) |
//! | **Disallowed types** | Reject references to clocks, RNG, threading, I/O, hash-order-dependent collections |
//! | **Hash-code usage** | Reject call sites targeting `GetHashCode` |
//! | **Boundary shapes** | Contract methods may not accept/return floats, `System.Object`, pointers |
//! | **Anonymous types** | Reject compiler-generated anonymous types in contract methods |
//! | **Reachability** | Every method transitively reachable from contract code is inspected |
//!
//! The contract type's own methods get the stricter user rule set; every
//! method they transitively reference gets the library rule set, exactly
//! once per run. Greenlisted methods and types are trusted without
//! inspection and stop the walk at their boundary.
//!
//! # Input and output
//!
//! The input is a [`Module`](contract_model::Module) built by an external
//! bytecode-introspection layer; this crate never parses binaries. The
//! output is a [`VerificationReport`]: an ordered list of [`Diagnostic`]s,
//! empty when the contract is admitted. A structurally incomplete module is
//! the only `Err` case — it is never reported as a pass.
//!
//! ```
//! use contract_model::{MethodBuilder, ModuleBuilder};
//! use determinism_verifier::Verifier;
//!
//! let module = ModuleBuilder::new("My.Contract")
//!     .method(MethodBuilder::new("System.Void My.Contract::Run()").build())
//!     .build();
//!
//! let report = Verifier::new(&module).verify().unwrap();
//! assert!(report.is_deterministic());
//! ```

mod error;
mod greenlist;
mod policy;
mod rules;
mod verify;
mod walk;

pub use error::{Diagnostic, DiagnosticKind, VerificationReport, VerifyError};
pub use greenlist::Greenlist;
pub use policy::{Policy, PolicyError};
pub use rules::{Rule, RuleSet};
pub use verify::Verifier;
