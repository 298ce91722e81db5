/*!
 * Cryptographic provider interface
 *
 * A provider is the external engine that owns RSA key material and performs the actual
 * signature arithmetic. It only accepts and returns opaque handles, and moves key material in
 * and out through the JWK exchange format. Everything above this boundary is provider
 * independent.
 */

mod handle;
mod instrumented;
mod software;

pub use handle::{HandleTag, KeyPairHandle, KeyRole, KeyUsage, ProviderHandle};
pub use instrumented::{InstrumentedProvider, ProviderCallCounts};
pub use software::{SoftwareKey, SoftwareProvider};

use async_trait::async_trait;

use crate::error::CryptoResult;
use crate::hash::{HashBinding, RSASSA_PKCS1_V1_5};
use crate::keys::RsaJwk;


/// Formats in which key material crosses the provider boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeFormat {
    /// JSON Web Key
    Jwk,
}

/// Parameters for key pair generation
#[derive(Debug, Clone, PartialEq)]
pub struct KeyGenParams {
    /// Provider algorithm identifier
    pub algorithm: &'static str,
    /// Modulus size in bits
    pub modulus_length: u32,
    /// Public exponent, unsigned big-endian
    pub public_exponent: Vec<u8>,
    /// Hash binding of the generated pair
    pub hash: HashBinding,
    /// Whether the private material may be exported
    pub extractable: bool,
    /// Requested usages; the provider splits them between the two handles
    pub usages: Vec<KeyUsage>,
}

impl KeyGenParams {
    /// RSASSA-PKCS1-v1_5 generation parameters with sign and verify usages
    pub fn rsassa(
        modulus_length: u32,
        public_exponent: &[u8],
        hash: HashBinding,
        extractable: bool,
    ) -> Self {
        Self {
            algorithm: RSASSA_PKCS1_V1_5,
            modulus_length,
            public_exponent: public_exponent.to_vec(),
            hash,
            extractable,
            usages: vec![KeyUsage::Sign, KeyUsage::Verify],
        }
    }

    pub fn tag(&self) -> HandleTag {
        HandleTag {
            algorithm: self.algorithm,
            hash: self.hash,
        }
    }
}

/// Parameters for key import
#[derive(Debug, Clone, PartialEq)]
pub struct KeyImportParams {
    /// Provider algorithm identifier
    pub algorithm: &'static str,
    /// Hash binding the imported handle is tagged with
    pub hash: HashBinding,
    /// Whether the imported material may be exported again
    pub extractable: bool,
    /// Usages of the imported handle
    pub usages: Vec<KeyUsage>,
}

impl KeyImportParams {
    /// RSASSA-PKCS1-v1_5 import parameters
    pub fn rsassa(hash: HashBinding, extractable: bool, usages: Vec<KeyUsage>) -> Self {
        Self {
            algorithm: RSASSA_PKCS1_V1_5,
            hash,
            extractable,
            usages,
        }
    }

    pub fn tag(&self) -> HandleTag {
        HandleTag {
            algorithm: self.algorithm,
            hash: self.hash,
        }
    }
}

/// The capability surface of an external cryptographic engine
///
/// All operations are asynchronous; the provider is the only resource shared between key
/// objects and must tolerate interleaved calls.
#[async_trait]
pub trait CryptoProvider: Send + Sync {
    /// Provider-side key material referenced by handles
    type Key: Send + Sync + 'static;

    /// Generate a key pair whose handles are tagged with `params.tag()`
    async fn generate_key_pair(&self, params: &KeyGenParams)
        -> CryptoResult<KeyPairHandle<Self::Key>>;

    /// Import key material; private JWKs produce private handles, public JWKs public ones
    async fn import_key(
        &self,
        format: ExchangeFormat,
        key_data: &RsaJwk,
        params: &KeyImportParams,
    ) -> CryptoResult<ProviderHandle<Self::Key>>;

    /// Export a handle's key material in the exchange format
    async fn export_key(&self, handle: &ProviderHandle<Self::Key>) -> CryptoResult<RsaJwk>;

    /// Sign `message` with a private handle
    async fn sign(
        &self,
        algorithm: &str,
        handle: &ProviderHandle<Self::Key>,
        message: &[u8],
    ) -> CryptoResult<Vec<u8>>;

    /// Verify `signature` over `message` with a public handle
    ///
    /// An invalid signature is `Ok(false)`; errors are reserved for unusable inputs.
    async fn verify(
        &self,
        algorithm: &str,
        handle: &ProviderHandle<Self::Key>,
        signature: &[u8],
        message: &[u8],
    ) -> CryptoResult<bool>;
}
