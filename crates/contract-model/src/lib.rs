//! Read-only model of a decompiled smart-contract module
//!
//! This crate defines the in-memory representation that the bytecode
//! introspection layer produces and the determinism verifier consumes:
//!
//! - [`Module`]: the decompiled artifact under test, holding the contract
//!   type and the table of every known method keyed by full signature
//! - [`Method`]: one method — signature, declaring type, flags, and an
//!   optional body (absent for abstract/extern methods)
//! - [`Instruction`] / [`Operand`]: one bytecode operation and its optional
//!   method or type reference
//!
//! All types are plain data: the verifier never mutates them, and they
//! deserialize directly from the introspection layer's JSON output.
//!
//! # Signatures
//!
//! Methods are identified by globally unique full signature strings of the
//! form `ReturnType Declaring.Type::Name(Param1,Param2)`. The [`signature`]
//! module provides the string helpers used for greenlist matching and for
//! classifying references that do not resolve to a method in the module.
//!
//! # Construction
//!
//! [`ModuleBuilder`] and [`MethodBuilder`] assemble modules programmatically.
//! They are used by the introspection layer and throughout the verifier's
//! tests to build synthetic call graphs.

mod build;
mod method;
mod module;
pub mod signature;

pub use build::{MethodBuilder, ModuleBuilder};
pub use method::{Instruction, Method, MethodFlags, Operand};
pub use module::{Module, TypeDef};
