//! Builders for assembling modules programmatically
//!
//! The introspection layer uses these to materialize a [`Module`] from a
//! parsed binary; the verifier's tests use them to build synthetic call
//! graphs without touching real bytecode.

use std::collections::BTreeMap;

use crate::{Instruction, Method, MethodFlags, Module, TypeDef, signature};

/// Builder for a [`Module`].
///
/// Methods are registered in order; each is attached to its declaring type's
/// definition, preserving declaration order.
pub struct ModuleBuilder {
    contract_type: String,
    type_order: Vec<String>,
    type_methods: BTreeMap<String, Vec<String>>,
    methods: BTreeMap<String, Method>,
}

impl ModuleBuilder {
    /// Start a module whose contract type has the given full name.
    pub fn new(contract_type: impl Into<String>) -> Self {
        let contract_type = contract_type.into();
        let mut builder = Self {
            contract_type: contract_type.clone(),
            type_order: Vec::new(),
            type_methods: BTreeMap::new(),
            methods: BTreeMap::new(),
        };
        builder.register_type(contract_type);
        builder
    }

    /// Register a method, creating its declaring type's definition on first
    /// sight.
    pub fn method(mut self, method: Method) -> Self {
        self.register_type(method.declaring_type.clone());
        self.type_methods
            .get_mut(&method.declaring_type)
            .expect("type registered above")
            .push(method.full_name.clone());
        self.methods.insert(method.full_name.clone(), method);
        self
    }

    /// Finish the module.
    pub fn build(self) -> Module {
        let Self {
            contract_type,
            type_order,
            type_methods,
            methods,
        } = self;
        let types = type_order
            .into_iter()
            .map(|full_name| {
                let methods = type_methods[&full_name].clone();
                TypeDef { full_name, methods }
            })
            .collect();
        Module {
            contract_type,
            types,
            methods,
        }
    }

    fn register_type(&mut self, full_name: String) {
        if !self.type_methods.contains_key(&full_name) {
            self.type_order.push(full_name.clone());
            self.type_methods.insert(full_name, Vec::new());
        }
    }
}

/// Builder for a [`Method`].
///
/// The short name, declaring type, and return type are parsed from the full
/// signature. A fresh builder has an empty body; use [`bodyless`] for
/// abstract/extern methods.
///
/// [`bodyless`]: MethodBuilder::bodyless
pub struct MethodBuilder {
    method: Method,
}

impl MethodBuilder {
    /// Start a method from its full signature, e.g.
    /// `System.Void My.Contract::Receive(System.Int32)`.
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let name = signature::method_name(&full_name)
            .unwrap_or(full_name.as_str())
            .to_string();
        let declaring_type = signature::declaring_type(&full_name)
            .unwrap_or_default()
            .to_string();
        let return_type = signature::return_type(&full_name)
            .unwrap_or("System.Void")
            .to_string();
        Self {
            method: Method {
                full_name,
                name,
                declaring_type,
                return_type,
                parameter_types: Vec::new(),
                flags: MethodFlags::default(),
                body: Some(Vec::new()),
            },
        }
    }

    /// Set the parameter type full names.
    pub fn parameters(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.method.parameter_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the implementation flags.
    pub fn flags(mut self, flags: MethodFlags) -> Self {
        self.method.flags = flags;
        self
    }

    /// Mark the method as implemented in native code.
    pub fn native(mut self) -> Self {
        self.method.flags.native = true;
        self
    }

    /// Mark the method as a P/Invoke.
    pub fn pinvoke(mut self) -> Self {
        self.method.flags.pinvoke = true;
        self
    }

    /// Drop the body (abstract/extern method).
    pub fn bodyless(mut self) -> Self {
        self.method.body = None;
        self
    }

    /// Append one instruction to the body.
    pub fn instruction(mut self, instruction: Instruction) -> Self {
        self.method
            .body
            .get_or_insert_with(Vec::new)
            .push(instruction);
        self
    }

    /// Append a `call` to the given method signature.
    pub fn calls(self, signature: impl Into<String>) -> Self {
        self.instruction(Instruction::call(signature))
    }

    /// Finish the method.
    pub fn build(self) -> Method {
        self.method
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_builder_parses_signature() {
        let method = MethodBuilder::new("System.Int32 My.Contract::Count(System.String)").build();
        assert_eq!(method.name, "Count");
        assert_eq!(method.declaring_type, "My.Contract");
        assert_eq!(method.return_type, "System.Int32");
        assert!(method.has_body());
    }

    #[test]
    fn test_bodyless_method() {
        let method = MethodBuilder::new("System.Void A::M()").bodyless().build();
        assert!(!method.has_body());
    }

    #[test]
    fn test_calls_appends_call_instruction() {
        let method = MethodBuilder::new("System.Void A::M()")
            .calls("System.Void B::N()")
            .build();
        assert_eq!(
            method.instructions()[0].method_operand(),
            Some("System.Void B::N()")
        );
    }

    #[test]
    fn test_module_builder_groups_methods_by_type() {
        let module = ModuleBuilder::new("My.Contract")
            .method(MethodBuilder::new("System.Void My.Contract::M()").build())
            .method(MethodBuilder::new("System.Void Lib.Helper::H()").build())
            .build();

        assert_eq!(module.types.len(), 2);
        assert_eq!(module.type_def("Lib.Helper").unwrap().methods.len(), 1);
    }
}
