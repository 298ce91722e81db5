/*!
 * Configuration for signers and the software provider
 *
 * Both structures have sensible defaults and can be loaded from JSON. Validation happens at
 * load time, so an unsupported hash name is rejected before any key is touched.
 */

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};
use crate::hash::HashBinding;

/// Public exponent 65537, big-endian
pub const DEFAULT_PUBLIC_EXPONENT: [u8; 3] = [0x01, 0x00, 0x01];

/// Public handles an orchestrator keeps before evicting the least recently used
pub const DEFAULT_PUBLIC_CACHE_CAPACITY: usize = 256;

/// Largest modulus the `rsa` crate validates
pub const MAX_SOFTWARE_MODULUS_LENGTH: u32 = 4096;

/// Signer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Hash name, e.g. "SHA-256"
    pub hash: String,

    /// Whether generated private keys may be exported
    pub extractable: bool,

    /// Modulus length used by `generate_default`
    pub default_modulus_length: u32,

    /// Public exponent used by `generate_default`, big-endian
    pub default_public_exponent: Vec<u8>,

    /// Maximum number of public handles cached for verification
    pub public_cache_capacity: usize,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            hash: HashBinding::Sha256.provider_name().to_string(),
            extractable: true,
            default_modulus_length: 2048,
            default_public_exponent: DEFAULT_PUBLIC_EXPONENT.to_vec(),
            public_cache_capacity: DEFAULT_PUBLIC_CACHE_CAPACITY,
        }
    }
}

impl SignerConfig {
    /// Default configuration bound to `hash`
    pub fn for_hash(hash: HashBinding) -> Self {
        Self {
            hash: hash.provider_name().to_string(),
            ..Self::default()
        }
    }

    /// Validate the configuration and resolve its hash binding
    pub fn validate(&self) -> CryptoResult<HashBinding> {
        let binding = HashBinding::from_name(&self.hash)?;

        if self.default_modulus_length == 0 || self.default_modulus_length % 8 != 0 {
            return Err(CryptoError::invalid_parameter(
                "default_modulus_length",
                "a positive multiple of 8",
                &self.default_modulus_length.to_string(),
            ));
        }

        if self.default_public_exponent.iter().all(|b| *b == 0) {
            return Err(CryptoError::invalid_parameter(
                "default_public_exponent",
                "a non-zero big-endian integer",
                &hex::encode(&self.default_public_exponent),
            ));
        }

        if self.public_cache_capacity == 0 {
            return Err(CryptoError::invalid_parameter(
                "public_cache_capacity",
                "at least 1",
                "0",
            ));
        }

        Ok(binding)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> CryptoResult<Self> {
        let config: SignerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Limits enforced by the software provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareProviderConfig {
    /// Smallest modulus length accepted for generation, in bits
    pub min_modulus_length: u32,

    /// Largest modulus length accepted for generation, in bits
    pub max_modulus_length: u32,
}

impl Default for SoftwareProviderConfig {
    fn default() -> Self {
        Self {
            min_modulus_length: 1024,
            max_modulus_length: MAX_SOFTWARE_MODULUS_LENGTH,
        }
    }
}

impl SoftwareProviderConfig {
    pub fn validate(&self) -> CryptoResult<()> {
        if self.min_modulus_length < 512 || self.min_modulus_length % 8 != 0 {
            return Err(CryptoError::invalid_parameter(
                "min_modulus_length",
                "a multiple of 8 of at least 512",
                &self.min_modulus_length.to_string(),
            ));
        }

        if self.max_modulus_length > MAX_SOFTWARE_MODULUS_LENGTH {
            return Err(CryptoError::invalid_parameter(
                "max_modulus_length",
                &format!("at most {}", MAX_SOFTWARE_MODULUS_LENGTH),
                &self.max_modulus_length.to_string(),
            ));
        }

        if self.max_modulus_length < self.min_modulus_length {
            return Err(CryptoError::invalid_parameter(
                "max_modulus_length",
                &format!("at least min_modulus_length ({})", self.min_modulus_length),
                &self.max_modulus_length.to_string(),
            ));
        }

        Ok(())
    }

    /// Check a requested modulus length against the limits
    pub fn check_modulus_length(&self, bits: u32) -> CryptoResult<()> {
        if bits % 8 != 0 || bits < self.min_modulus_length || bits > self.max_modulus_length {
            return Err(CryptoError::unsupported_modulus_length(
                bits,
                &format!(
                    "a multiple of 8 between {} and {}",
                    self.min_modulus_length, self.max_modulus_length
                ),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> CryptoResult<Self> {
        let config: SoftwareProviderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
