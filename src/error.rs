/*!
 * Error Handling for the RSASSA-PKCS1-v1_5 signing layer
 *
 * Provides structured error types with numeric error codes, user-friendly messages,
 * and suggested remediation strategies.
 */

use std::collections::HashMap;
use thiserror::Error;

/// Error type for all key adaptation, caching and signing operations
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Unsupported algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String, error_code: u32 },

    #[error("Unsupported modulus length: {bits} bits - expected {expected}")]
    UnsupportedModulusLength {
        bits: u32,
        expected: String,
        error_code: u32,
    },

    #[error("Invalid key material: {field} - {cause}")]
    KeyMaterialInvalid {
        field: String,
        cause: String,
        error_code: u32,
    },

    #[error("Key type mismatch: expected {expected}, got {actual}")]
    KeyTypeMismatch {
        expected: String,
        actual: String,
        error_code: u32,
    },

    #[error("Export denied: {handle} is not extractable")]
    ExportDenied { handle: String, error_code: u32 },

    #[error("Key generation failed: {cause}")]
    GenerationFailed {
        cause: String,
        error_code: u32,
        context: HashMap<String, String>,
    },

    #[error("Signing failed: {cause}")]
    SigningFailed {
        cause: String,
        error_code: u32,
        context: HashMap<String, String>,
    },

    #[error("Provider operation failed: {operation} - {cause}")]
    ProviderError {
        operation: String,
        cause: String,
        error_code: u32,
    },

    #[error("Invalid parameter: {parameter} - {expected} - got {actual}")]
    InvalidParameter {
        parameter: String,
        expected: String,
        actual: String,
        error_code: u32,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Error code constants for different error categories
pub mod error_codes {
    // Algorithm errors: 1000-1999
    pub const UNSUPPORTED_HASH: u32 = 1001;
    pub const UNSUPPORTED_KEY_ALGORITHM: u32 = 1002;

    // Key material errors: 2000-2999
    pub const MISSING_KEY_FIELD: u32 = 2001;
    pub const MALFORMED_KEY_FIELD: u32 = 2002;
    pub const INCONSISTENT_KEY_MATERIAL: u32 = 2003;
    pub const KEY_TYPE_MISMATCH: u32 = 2004;
    pub const EXPORT_DENIED: u32 = 2005;

    // Key generation errors: 3000-3999
    pub const UNSUPPORTED_MODULUS_LENGTH: u32 = 3001;
    pub const INVALID_PUBLIC_EXPONENT: u32 = 3002;
    pub const KEY_GENERATION_FAILED: u32 = 3003;

    // Signing errors: 4000-4999
    pub const SIGNING_FAILED: u32 = 4001;
    pub const HANDLE_ROLE_MISMATCH: u32 = 4002;
    pub const HANDLE_USAGE_DENIED: u32 = 4003;

    // Provider errors: 5000-5999
    pub const PROVIDER_IMPORT_FAILED: u32 = 5001;
    pub const PROVIDER_EXPORT_FAILED: u32 = 5002;
    pub const PROVIDER_VERIFY_FAILED: u32 = 5003;
    pub const PROVIDER_CONTRACT_VIOLATION: u32 = 5004;

    // Configuration errors: 6000-6999
    pub const INVALID_CONFIGURATION: u32 = 6001;
}

impl CryptoError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            CryptoError::UnsupportedAlgorithm { error_code, .. } => *error_code,
            CryptoError::UnsupportedModulusLength { error_code, .. } => *error_code,
            CryptoError::KeyMaterialInvalid { error_code, .. } => *error_code,
            CryptoError::KeyTypeMismatch { error_code, .. } => *error_code,
            CryptoError::ExportDenied { error_code, .. } => *error_code,
            CryptoError::GenerationFailed { error_code, .. } => *error_code,
            CryptoError::SigningFailed { error_code, .. } => *error_code,
            CryptoError::ProviderError { error_code, .. } => *error_code,
            CryptoError::InvalidParameter { error_code, .. } => *error_code,
            CryptoError::SerializationError(_) => 9001,
        }
    }

    /// Get a user-friendly error message
    pub fn user_friendly_message(&self) -> String {
        match self {
            CryptoError::UnsupportedAlgorithm { algorithm, .. } => {
                format!(
                    "Hash algorithm '{}' is not supported. Use SHA-1, SHA-256, SHA-384 or SHA-512.",
                    algorithm
                )
            }
            CryptoError::UnsupportedModulusLength { bits, .. } => {
                format!("An RSA modulus of {} bits cannot be generated.", bits)
            }
            CryptoError::KeyMaterialInvalid { field, .. } => {
                format!(
                    "The RSA key is incomplete or malformed (field '{}'). It cannot be used.",
                    field
                )
            }
            CryptoError::KeyTypeMismatch { expected, .. } => {
                format!("This operation requires a {} key.", expected)
            }
            CryptoError::ExportDenied { .. } => {
                "The private key was created as non-extractable and cannot be exported.".to_string()
            }
            CryptoError::GenerationFailed { .. } => {
                "Key pair generation failed. No key was created.".to_string()
            }
            CryptoError::SigningFailed { .. } => {
                "The message could not be signed. Message authenticity cannot be asserted."
                    .to_string()
            }
            CryptoError::ProviderError { operation, .. } => {
                format!("The cryptographic provider failed during '{}'.", operation)
            }
            CryptoError::InvalidParameter {
                parameter,
                expected,
                ..
            } => {
                format!(
                    "Invalid parameter '{}'. Expected '{}' format.",
                    parameter, expected
                )
            }
            CryptoError::SerializationError(_) => {
                "Data serialization failed. Data format may be corrupted.".to_string()
            }
        }
    }

    /// Get technical details for debugging
    pub fn technical_details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();

        details.insert("error_code".to_string(), self.error_code().to_string());
        details.insert("error_type".to_string(), self.error_type().to_string());
        details.insert("timestamp".to_string(), chrono::Utc::now().to_rfc3339());

        match self {
            CryptoError::UnsupportedAlgorithm { algorithm, .. } => {
                details.insert("algorithm".to_string(), algorithm.clone());
            }
            CryptoError::UnsupportedModulusLength { bits, expected, .. } => {
                details.insert("modulus_length".to_string(), bits.to_string());
                details.insert("expected".to_string(), expected.clone());
            }
            CryptoError::KeyMaterialInvalid { field, cause, .. } => {
                details.insert("field".to_string(), field.clone());
                details.insert("cause".to_string(), cause.clone());
            }
            CryptoError::KeyTypeMismatch {
                expected, actual, ..
            } => {
                details.insert("expected".to_string(), expected.clone());
                details.insert("actual".to_string(), actual.clone());
            }
            CryptoError::GenerationFailed { cause, context, .. }
            | CryptoError::SigningFailed { cause, context, .. } => {
                details.insert("cause".to_string(), cause.clone());
                details.extend(context.clone());
            }
            CryptoError::ProviderError {
                operation, cause, ..
            } => {
                details.insert("operation".to_string(), operation.clone());
                details.insert("cause".to_string(), cause.clone());
            }
            CryptoError::InvalidParameter {
                parameter,
                expected,
                actual,
                ..
            } => {
                details.insert("parameter".to_string(), parameter.clone());
                details.insert("expected".to_string(), expected.clone());
                details.insert("actual".to_string(), actual.clone());
            }
            _ => {
                details.insert("details".to_string(), format!("{:?}", self));
            }
        }

        details
    }

    /// Get suggested remediation steps
    pub fn suggested_remediation(&self) -> Option<String> {
        match self {
            CryptoError::UnsupportedAlgorithm { .. } => Some(
                "Choose one of the supported hash bindings: SHA-1, SHA-256, SHA-384, SHA-512."
                    .to_string(),
            ),
            CryptoError::UnsupportedModulusLength { expected, .. } => {
                Some(format!("Use a modulus length that is {}.", expected))
            }
            CryptoError::KeyMaterialInvalid { error_code, .. } => match *error_code {
                error_codes::MISSING_KEY_FIELD => Some(
                    "Supply n, e, d, p and q. The CRT parameters dp, dq and qi are optional."
                        .to_string(),
                ),
                _ => Some("Check that every key field is a valid unsigned integer.".to_string()),
            },
            CryptoError::KeyTypeMismatch { .. } => {
                Some("Pass an RSA public key for verification.".to_string())
            }
            CryptoError::ExportDenied { .. } => Some(
                "Regenerate the key pair with extractable private material.".to_string(),
            ),
            CryptoError::GenerationFailed { error_code, .. } => match *error_code {
                error_codes::INVALID_PUBLIC_EXPONENT => Some(
                    "Use an odd public exponent such as 65537 (0x01 0x00 0x01).".to_string(),
                ),
                _ => None,
            },
            CryptoError::InvalidParameter { .. } => {
                Some("Review the configuration values.".to_string())
            }
            _ => None,
        }
    }

    /// Get the error category/type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            CryptoError::UnsupportedAlgorithm { .. } => "UnsupportedAlgorithm",
            CryptoError::UnsupportedModulusLength { .. } => "UnsupportedModulusLength",
            CryptoError::KeyMaterialInvalid { .. } => "KeyMaterialInvalid",
            CryptoError::KeyTypeMismatch { .. } => "KeyTypeMismatch",
            CryptoError::ExportDenied { .. } => "ExportDenied",
            CryptoError::GenerationFailed { .. } => "GenerationFailed",
            CryptoError::SigningFailed { .. } => "SigningFailed",
            CryptoError::ProviderError { .. } => "ProviderError",
            CryptoError::InvalidParameter { .. } => "InvalidParameter",
            CryptoError::SerializationError(_) => "SerializationError",
        }
    }
}

/// Convenience constructors for common error types
impl CryptoError {
    pub fn unsupported_algorithm(algorithm: &str) -> Self {
        CryptoError::UnsupportedAlgorithm {
            algorithm: algorithm.to_string(),
            error_code: error_codes::UNSUPPORTED_HASH,
        }
    }

    pub fn unsupported_modulus_length(bits: u32, expected: &str) -> Self {
        CryptoError::UnsupportedModulusLength {
            bits,
            expected: expected.to_string(),
            error_code: error_codes::UNSUPPORTED_MODULUS_LENGTH,
        }
    }

    pub fn missing_key_field(field: &str) -> Self {
        CryptoError::KeyMaterialInvalid {
            field: field.to_string(),
            cause: "required field is absent".to_string(),
            error_code: error_codes::MISSING_KEY_FIELD,
        }
    }

    pub fn key_material_invalid(field: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::KeyMaterialInvalid {
            field: field.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn key_type_mismatch(expected: &str, actual: &str) -> Self {
        CryptoError::KeyTypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
            error_code: error_codes::KEY_TYPE_MISMATCH,
        }
    }

    pub fn export_denied(handle: &str) -> Self {
        CryptoError::ExportDenied {
            handle: handle.to_string(),
            error_code: error_codes::EXPORT_DENIED,
        }
    }

    pub fn generation_failed(cause: &str, error_code: u32) -> Self {
        CryptoError::GenerationFailed {
            cause: cause.to_string(),
            error_code,
            context: HashMap::new(),
        }
    }

    pub fn signing_failed(cause: &str, error_code: u32, algorithm: &str) -> Self {
        let mut context = HashMap::new();
        context.insert("algorithm".to_string(), algorithm.to_string());

        CryptoError::SigningFailed {
            cause: cause.to_string(),
            error_code,
            context,
        }
    }

    pub fn provider_error(operation: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::ProviderError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn invalid_parameter(parameter: &str, expected: &str, actual: &str) -> Self {
        CryptoError::InvalidParameter {
            parameter: parameter.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            error_code: error_codes::INVALID_CONFIGURATION,
        }
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::SerializationError(format!("JSON: {}", err))
    }
}

impl From<bincode::Error> for CryptoError {
    fn from(err: bincode::Error) -> Self {
        CryptoError::SerializationError(format!("bincode: {}", err))
    }
}

/// Result type alias for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_generation() {
        let error = CryptoError::unsupported_algorithm("MD5");
        assert_eq!(error.error_code(), error_codes::UNSUPPORTED_HASH);
        assert_eq!(error.error_type(), "UnsupportedAlgorithm");
    }

    #[test]
    fn test_unsupported_algorithm_carries_offending_value() {
        let error = CryptoError::unsupported_algorithm("SHA3-256");
        assert!(error.to_string().contains("SHA3-256"));
        assert!(error.user_friendly_message().contains("SHA3-256"));
    }

    #[test]
    fn test_technical_details() {
        let error = CryptoError::signing_failed(
            "handle lacks sign usage",
            error_codes::HANDLE_USAGE_DENIED,
            "RSASSA-PKCS1-v1_5",
        );
        let details = error.technical_details();
        assert!(details.contains_key("error_code"));
        assert!(details.contains_key("timestamp"));
        assert_eq!(details.get("cause").map(String::as_str), Some("handle lacks sign usage"));
        assert_eq!(details.get("algorithm").map(String::as_str), Some("RSASSA-PKCS1-v1_5"));
    }

    #[test]
    fn test_remediation_suggestions() {
        let error = CryptoError::missing_key_field("d");
        let suggestion = error.suggested_remediation();
        assert!(suggestion.is_some());
        assert!(suggestion.unwrap().contains("dp, dq and qi are optional"));

        let error = CryptoError::export_denied("private handle");
        assert!(error.suggested_remediation().unwrap().contains("extractable"));

        let error = CryptoError::SerializationError("truncated".to_string());
        assert!(error.suggested_remediation().is_none());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_failure = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: CryptoError = parse_failure.into();
        assert_eq!(error.error_type(), "SerializationError");
        assert_eq!(error.error_code(), 9001);
    }
}
