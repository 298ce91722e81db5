use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

/// Provider algorithm identifier for RSASSA-PKCS1-v1_5
pub const RSASSA_PKCS1_V1_5: &str = "RSASSA-PKCS1-v1_5";

/// Hash provider name for SHA-1
pub const ALG_SHA1: &str = "SHA-1";
/// Hash provider name for SHA-256
pub const ALG_SHA256: &str = "SHA-256";
/// Hash provider name for SHA-384
pub const ALG_SHA384: &str = "SHA-384";
/// Hash provider name for SHA-512
pub const ALG_SHA512: &str = "SHA-512";

/// Hash functions a PKCS#1 v1.5 key can be bound to
///
/// The set is closed: anything else is rejected when a binding is parsed, so an unsupported
/// hash never reaches a provider call.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashBinding {
    /// SHA-1 (legacy, verification of old signatures)
    Sha1,
    /// SHA-256 (recommended)
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashBinding {
    /// All supported bindings, weakest first
    pub const ALL: [HashBinding; 4] = [
        HashBinding::Sha1,
        HashBinding::Sha256,
        HashBinding::Sha384,
        HashBinding::Sha512,
    ];

    /// Get the provider's identifier for this hash
    pub fn provider_name(&self) -> &'static str {
        match self {
            HashBinding::Sha1 => ALG_SHA1,
            HashBinding::Sha256 => ALG_SHA256,
            HashBinding::Sha384 => ALG_SHA384,
            HashBinding::Sha512 => ALG_SHA512,
        }
    }

    /// Get the JWK `alg` value of an RSASSA-PKCS1-v1_5 key bound to this hash
    pub fn jwk_alg(&self) -> &'static str {
        match self {
            HashBinding::Sha1 => "RS1",
            HashBinding::Sha256 => "RS256",
            HashBinding::Sha384 => "RS384",
            HashBinding::Sha512 => "RS512",
        }
    }

    /// Resolve a hash name such as `"SHA-256"` into a binding
    ///
    /// Names are matched case-insensitively. Any other name fails with
    /// [`CryptoError::UnsupportedAlgorithm`] carrying the offending text.
    pub fn from_name(name: &str) -> CryptoResult<Self> {
        HashBinding::ALL
            .iter()
            .copied()
            .find(|binding| binding.provider_name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CryptoError::unsupported_algorithm(name))
    }

    /// Resolve a JWK `alg` value (RS1, RS256, RS384, RS512) into a binding
    pub fn from_jwk_alg(alg: &str) -> CryptoResult<Self> {
        HashBinding::ALL
            .iter()
            .copied()
            .find(|binding| binding.jwk_alg() == alg)
            .ok_or_else(|| CryptoError::unsupported_algorithm(alg))
    }
}

impl fmt::Display for HashBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.provider_name())
    }
}

impl FromStr for HashBinding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashBinding::from_name(s)
    }
}

impl TryFrom<&str> for HashBinding {
    type Error = CryptoError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        HashBinding::from_name(value)
    }
}

/// Resolve the provider identifiers `(algorithm, hash)` for a binding
pub fn resolve(binding: HashBinding) -> (&'static str, &'static str) {
    (RSASSA_PKCS1_V1_5, binding.provider_name())
}
