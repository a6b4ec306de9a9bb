//! Diagnostics, the report aggregate, and fatal verification errors
//!
//! Policy findings are data ([`Diagnostic`]), never `Err`: verification
//! continues past them and collects everything into a
//! [`VerificationReport`]. The only `Err` path is [`VerifyError`], raised
//! when the input module is structurally incomplete — that case must never
//! look like a clean pass.

use contract_model::Method;
use thiserror::Error;

/// One finding against a specific method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error("method carries non-deterministic flags: {flags}")]
    NonDeterministicFlags { flags: String },

    #[error("disallowed instruction `{opcode}`")]
    DisallowedInstruction { opcode: String },

    #[error("reference to disallowed type `{type_name}`")]
    DisallowedType { type_name: String },

    #[error("hash-code usage via `{callee}`")]
    HashCodeUsage { callee: String },

    #[error("disallowed parameter type `{type_name}`")]
    DisallowedParameter { type_name: String },

    #[error("disallowed return type `{type_name}`")]
    DisallowedReturn { type_name: String },

    #[error("anonymous type usage: `{type_name}`")]
    AnonymousType { type_name: String },

    #[error("reference to non-deterministic method `{referenced}`")]
    NonDeterministicMethodReference { referenced: String },

    #[error("method reference `{reference}` cannot be resolved")]
    UnresolvableReference { reference: String },
}

impl DiagnosticKind {
    /// Short category tag for this finding.
    pub fn category(&self) -> &'static str {
        match self {
            DiagnosticKind::NonDeterministicFlags { .. } => "Non-deterministic flag",
            DiagnosticKind::DisallowedInstruction { .. } => "Disallowed instruction",
            DiagnosticKind::DisallowedType { .. } => "Disallowed type",
            DiagnosticKind::HashCodeUsage { .. } => "Hash code usage",
            DiagnosticKind::DisallowedParameter { .. } => "Disallowed parameter",
            DiagnosticKind::DisallowedReturn { .. } => "Disallowed return type",
            DiagnosticKind::AnonymousType { .. } => "Anonymous type",
            DiagnosticKind::NonDeterministicMethodReference { .. } => {
                "Non-deterministic method reference"
            }
            DiagnosticKind::UnresolvableReference { .. } => "Unresolvable reference",
        }
    }
}

/// A finding attributed to the method it was recorded against.
///
/// Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    method_name: String,
    method_full_name: String,
    kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(method: &Method, kind: DiagnosticKind) -> Self {
        Self {
            method_name: method.name.clone(),
            method_full_name: method.full_name.clone(),
            kind,
        }
    }

    /// Short name of the method the finding is recorded against.
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Full signature of the method the finding is recorded against.
    pub fn method_full_name(&self) -> &str {
        &self.method_full_name
    }

    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    /// Short category tag.
    pub fn category(&self) -> &'static str {
        self.kind.category()
    }

    /// Human-readable detail.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.category(),
            self.method_full_name,
            self.kind
        )
    }
}

/// Result of one verification run: the ordered list of findings.
///
/// An empty report means the contract is considered deterministic.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VerificationReport {
    diagnostics: Vec<Diagnostic>,
}

impl VerificationReport {
    pub(crate) fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Returns true if no finding was recorded.
    pub fn is_deterministic(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The findings, in the order they were recorded.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the report and returns the findings.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Fatal error: the module under test is structurally incomplete.
///
/// The caller must repair the input before re-invoking; there is no partial
/// success.
#[derive(Debug, Clone, Error)]
pub enum VerifyError {
    #[error("module does not declare a contract type")]
    MissingContractType,

    #[error("contract type `{0}` is not defined in the module")]
    UnknownContractType(String),

    #[error("method `{signature}` declared on `{type_name}` is missing from the method table")]
    MissingMethod {
        signature: String,
        type_name: String,
    },
}
