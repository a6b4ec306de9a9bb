//! Helpers for working with full method signature strings
//!
//! A full signature has the form `ReturnType Declaring.Type::Name(Params)`,
//! e.g. `System.Void System.Threading.Thread::Sleep(System.Int32)`. These
//! helpers let the verifier classify a reference even when it does not
//! resolve to a method defined in the module under test.

/// Extract the declaring type's full name from a signature.
///
/// Returns `None` if the string does not have the expected shape.
pub fn declaring_type(signature: &str) -> Option<&str> {
    let rest = signature.split_once(' ').map_or(signature, |(_, r)| r);
    rest.split_once("::").map(|(ty, _)| ty)
}

/// Extract the short method name from a signature.
pub fn method_name(signature: &str) -> Option<&str> {
    let (_, after) = signature.split_once("::")?;
    Some(after.split_once('(').map_or(after, |(name, _)| name))
}

/// Extract the return type from a signature.
pub fn return_type(signature: &str) -> Option<&str> {
    signature.split_once(' ').map(|(ret, _)| ret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaring_type() {
        assert_eq!(
            declaring_type("System.Void System.Threading.Thread::Sleep(System.Int32)"),
            Some("System.Threading.Thread")
        );
    }

    #[test]
    fn test_declaring_type_without_return() {
        // Tolerate signatures that omit the return type
        assert_eq!(declaring_type("My.Contract::Receive()"), Some("My.Contract"));
    }

    #[test]
    fn test_method_name() {
        assert_eq!(
            method_name("System.Int32 System.Object::GetHashCode()"),
            Some("GetHashCode")
        );
    }

    #[test]
    fn test_return_type() {
        assert_eq!(
            return_type("System.Int32 System.Object::GetHashCode()"),
            Some("System.Int32")
        );
    }

    #[test]
    fn test_malformed_signature() {
        assert_eq!(declaring_type("not a signature"), None);
        assert_eq!(method_name("not a signature"), None);
    }
}
