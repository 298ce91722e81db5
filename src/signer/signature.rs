use serde::{Deserialize, Serialize};

use crate::error::CryptoResult;
use crate::keys::{PortableKey, PortableRsaPublicKey};

/// Signature bytes together with the public key that should verify them
///
/// The hash binding is not part of the signature; signer and verifier agree on it out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    bytes: Vec<u8>,
    public_key: PortableKey,
}

impl Signature {
    pub fn new(bytes: Vec<u8>, public_key: PortableRsaPublicKey) -> Self {
        Self {
            bytes,
            public_key: PortableKey::RsaPublic(public_key),
        }
    }

    /// Pair signature bytes with an arbitrary key; verification rejects non-RSA-public keys
    pub fn from_parts(bytes: Vec<u8>, public_key: PortableKey) -> Self {
        Self { bytes, public_key }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn public_key(&self) -> &PortableKey {
        &self.public_key
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> CryptoResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
