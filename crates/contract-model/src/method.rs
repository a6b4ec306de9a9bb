//! Method, instruction, and operand representations

use serde::{Deserialize, Serialize};

/// One method exposed by the introspection layer.
///
/// Methods are immutable from the verifier's perspective. `body` is `None`
/// for abstract and extern methods, which carry no instructions to inspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    /// Globally unique full signature, e.g.
    /// `System.Void My.Contract::Receive(System.Int32)`.
    pub full_name: String,
    /// Short method name, e.g. `Receive`.
    pub name: String,
    /// Full name of the declaring type, e.g. `My.Contract`.
    pub declaring_type: String,
    /// Full name of the return type.
    pub return_type: String,
    /// Full names of the parameter types, in declaration order.
    #[serde(default)]
    pub parameter_types: Vec<String>,
    /// Implementation flags exposed by the introspection layer.
    #[serde(default)]
    pub flags: MethodFlags,
    /// Ordered instruction sequence, absent for abstract/extern methods.
    #[serde(default)]
    pub body: Option<Vec<Instruction>>,
}

impl Method {
    /// Whether this method has an inspectable body.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// The method's instructions, empty if it has no body.
    pub fn instructions(&self) -> &[Instruction] {
        self.body.as_deref().unwrap_or(&[])
    }
}

/// Implementation flags that mark a method as escaping managed,
/// deterministic execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodFlags {
    /// Method is implemented in native code.
    pub native: bool,
    /// Method body is unmanaged.
    pub unmanaged: bool,
    /// Method is an internal runtime call.
    pub internal_call: bool,
    /// Method is a P/Invoke into an external library.
    pub pinvoke: bool,
}

impl MethodFlags {
    /// Names of the flags that are set, in a fixed order.
    pub fn set_flags(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.native {
            set.push("native");
        }
        if self.unmanaged {
            set.push("unmanaged");
        }
        if self.internal_call {
            set.push("internal call");
        }
        if self.pinvoke {
            set.push("P/Invoke");
        }
        set
    }
}

/// One bytecode operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Opcode mnemonic, e.g. `call`, `ldstr`, `localloc`.
    pub opcode: String,
    /// Optional operand. The verifier only inspects method and type
    /// references; other operands are carried for completeness.
    #[serde(default)]
    pub operand: Option<Operand>,
}

impl Instruction {
    /// An instruction with no operand.
    pub fn new(opcode: impl Into<String>) -> Self {
        Self {
            opcode: opcode.into(),
            operand: None,
        }
    }

    /// A `call` instruction referencing the given method signature.
    pub fn call(signature: impl Into<String>) -> Self {
        Self::with_operand("call", Operand::Method(signature.into()))
    }

    /// An instruction with an explicit operand.
    pub fn with_operand(opcode: impl Into<String>, operand: Operand) -> Self {
        Self {
            opcode: opcode.into(),
            operand: Some(operand),
        }
    }

    /// The referenced method signature, if this instruction is a call site.
    pub fn method_operand(&self) -> Option<&str> {
        match &self.operand {
            Some(Operand::Method(signature)) => Some(signature),
            _ => None,
        }
    }

    /// The referenced type full name, if any.
    ///
    /// Method references also name a type (the callee's declaring type), so
    /// both operand kinds participate in type-level checks.
    pub fn type_operand(&self) -> Option<&str> {
        match &self.operand {
            Some(Operand::Type(name)) => Some(name),
            Some(Operand::Method(signature)) => crate::signature::declaring_type(signature),
            _ => None,
        }
    }
}

/// An instruction operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// Reference to another method, by full signature.
    Method(String),
    /// Reference to a type, by full name.
    Type(String),
    /// Inline string constant.
    Str(String),
    /// Inline integer constant.
    Int(i64),
}
