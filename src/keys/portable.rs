use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::error::{CryptoError, CryptoResult};

/// RSA private key material in provider-independent form
///
/// Every field is an unsigned big-endian integer. `n`, `e`, `d`, `p` and `q` are mandatory;
/// the CRT parameters `dp`, `dq` and `qi` are optional. The value is immutable: the only way
/// to add CRT parameters is [`PortableRsaPrivateKey::with_crt_params`], which returns a new key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "PrivateKeyFields", into = "PrivateKeyFields")]
pub struct PortableRsaPrivateKey {
    n: Vec<u8>,
    e: Vec<u8>,
    d: Vec<u8>,
    p: Vec<u8>,
    q: Vec<u8>,
    dp: Option<Vec<u8>>,
    dq: Option<Vec<u8>>,
    qi: Option<Vec<u8>>,
}

/// RSA public key material in provider-independent form
///
/// Equality and hashing are structural over the bytes of `n` and `e`, which is what the
/// verification handle cache keys on.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PublicKeyFields", into = "PublicKeyFields")]
pub struct PortableRsaPublicKey {
    n: Vec<u8>,
    e: Vec<u8>,
}

/// A key of any kind that may accompany a signature
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortableKey {
    /// RSA private key
    RsaPrivate(PortableRsaPrivateKey),
    /// RSA public key
    RsaPublic(PortableRsaPublicKey),
    /// Key material of an algorithm this crate does not handle
    Foreign {
        /// Algorithm name reported by whoever produced the key
        algorithm: String,
        /// Opaque key encoding
        key_data: Vec<u8>,
    },
}

fn require(field: &str, value: Vec<u8>) -> CryptoResult<Vec<u8>> {
    if value.is_empty() {
        return Err(CryptoError::missing_key_field(field));
    }
    Ok(value)
}

fn require_optional(field: &str, value: Option<Vec<u8>>) -> CryptoResult<Option<Vec<u8>>> {
    match value {
        Some(bytes) => require(field, bytes).map(Some),
        None => Ok(None),
    }
}

impl PortableRsaPrivateKey {
    /// Create a private key from its mandatory components
    ///
    /// # Returns
    ///
    /// The key, or `KeyMaterialInvalid` naming the first empty field
    pub fn new(
        n: Vec<u8>,
        e: Vec<u8>,
        d: Vec<u8>,
        p: Vec<u8>,
        q: Vec<u8>,
    ) -> CryptoResult<Self> {
        Ok(Self {
            n: require("n", n)?,
            e: require("e", e)?,
            d: require("d", d)?,
            p: require("p", p)?,
            q: require("q", q)?,
            dp: None,
            dq: None,
            qi: None,
        })
    }

    /// Return a copy of this key carrying the CRT parameters
    pub fn with_crt_params(&self, dp: Vec<u8>, dq: Vec<u8>, qi: Vec<u8>) -> CryptoResult<Self> {
        let mut key = self.clone();
        key.dp = Some(require("dp", dp)?);
        key.dq = Some(require("dq", dq)?);
        key.qi = Some(require("qi", qi)?);
        Ok(key)
    }

    pub fn n(&self) -> &[u8] {
        &self.n
    }

    pub fn e(&self) -> &[u8] {
        &self.e
    }

    pub fn d(&self) -> &[u8] {
        &self.d
    }

    pub fn p(&self) -> &[u8] {
        &self.p
    }

    pub fn q(&self) -> &[u8] {
        &self.q
    }

    pub fn dp(&self) -> Option<&[u8]> {
        self.dp.as_deref()
    }

    pub fn dq(&self) -> Option<&[u8]> {
        self.dq.as_deref()
    }

    pub fn qi(&self) -> Option<&[u8]> {
        self.qi.as_deref()
    }

    /// Whether all three CRT parameters are present
    pub fn has_crt_params(&self) -> bool {
        self.dp.is_some() && self.dq.is_some() && self.qi.is_some()
    }

    /// Derive the matching public key
    pub fn public_key(&self) -> PortableRsaPublicKey {
        PortableRsaPublicKey {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }

    /// Modulus size in bits, ignoring leading zero bytes
    pub fn modulus_bits(&self) -> usize {
        modulus_bits(&self.n)
    }
}

impl PartialEq for PortableRsaPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        let optional_eq = |a: &Option<Vec<u8>>, b: &Option<Vec<u8>>| -> Choice {
            match (a, b) {
                (Some(a), Some(b)) => a.as_slice().ct_eq(b.as_slice()),
                (None, None) => Choice::from(1),
                _ => Choice::from(0),
            }
        };

        let equal = self.n.as_slice().ct_eq(other.n.as_slice())
            & self.e.as_slice().ct_eq(other.e.as_slice())
            & self.d.as_slice().ct_eq(other.d.as_slice())
            & self.p.as_slice().ct_eq(other.p.as_slice())
            & self.q.as_slice().ct_eq(other.q.as_slice())
            & optional_eq(&self.dp, &other.dp)
            & optional_eq(&self.dq, &other.dq)
            & optional_eq(&self.qi, &other.qi);
        equal.into()
    }
}

impl Eq for PortableRsaPrivateKey {}

impl fmt::Debug for PortableRsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortableRsaPrivateKey")
            .field("modulus_bits", &self.modulus_bits())
            .field("fingerprint", &fingerprint(&self.n, &self.e))
            .field("crt_params", &self.has_crt_params())
            .field("d", &"[REDACTED]")
            .finish()
    }
}

impl Drop for PortableRsaPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Zeroize for PortableRsaPrivateKey {
    fn zeroize(&mut self) {
        self.d.zeroize();
        self.p.zeroize();
        self.q.zeroize();
        self.dp.zeroize();
        self.dq.zeroize();
        self.qi.zeroize();
        // n and e are public
    }
}

impl PortableRsaPublicKey {
    /// Create a public key from modulus and exponent
    pub fn new(n: Vec<u8>, e: Vec<u8>) -> CryptoResult<Self> {
        Ok(Self {
            n: require("n", n)?,
            e: require("e", e)?,
        })
    }

    pub fn n(&self) -> &[u8] {
        &self.n
    }

    pub fn e(&self) -> &[u8] {
        &self.e
    }

    /// Modulus size in bits, ignoring leading zero bytes
    pub fn modulus_bits(&self) -> usize {
        modulus_bits(&self.n)
    }

    /// Short hex identifier for logs; not a security property
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.n, &self.e)
    }
}

impl fmt::Debug for PortableRsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortableRsaPublicKey")
            .field("modulus_bits", &self.modulus_bits())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl PortableKey {
    /// Human-readable name of the variant, used in error reports
    pub fn kind(&self) -> String {
        match self {
            PortableKey::RsaPrivate(_) => "RSA private key".to_string(),
            PortableKey::RsaPublic(_) => "RSA public key".to_string(),
            PortableKey::Foreign { algorithm, .. } => format!("{} key", algorithm),
        }
    }

    /// Borrow the RSA public key, or fail with `KeyTypeMismatch`
    pub fn as_rsa_public(&self) -> CryptoResult<&PortableRsaPublicKey> {
        match self {
            PortableKey::RsaPublic(key) => Ok(key),
            other => Err(CryptoError::key_type_mismatch("RSA public key", &other.kind())),
        }
    }

    /// Borrow the RSA private key, or fail with `KeyTypeMismatch`
    pub fn as_rsa_private(&self) -> CryptoResult<&PortableRsaPrivateKey> {
        match self {
            PortableKey::RsaPrivate(key) => Ok(key),
            other => Err(CryptoError::key_type_mismatch("RSA private key", &other.kind())),
        }
    }
}

impl From<PortableRsaPublicKey> for PortableKey {
    fn from(key: PortableRsaPublicKey) -> Self {
        PortableKey::RsaPublic(key)
    }
}

impl From<PortableRsaPrivateKey> for PortableKey {
    fn from(key: PortableRsaPrivateKey) -> Self {
        PortableKey::RsaPrivate(key)
    }
}

fn modulus_bits(n: &[u8]) -> usize {
    match n.iter().position(|byte| *byte != 0) {
        Some(first) => (n.len() - first - 1) * 8 + (8 - n[first].leading_zeros() as usize),
        None => 0,
    }
}

fn fingerprint(n: &[u8], e: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(n);
    hasher.update(e);
    hex::encode(&hasher.finalize()[..8])
}

// Serde goes through these so deserialized keys are validated like constructed ones.

#[derive(Serialize, Deserialize)]
struct PrivateKeyFields {
    n: Vec<u8>,
    e: Vec<u8>,
    d: Vec<u8>,
    p: Vec<u8>,
    q: Vec<u8>,
    #[serde(default)]
    dp: Option<Vec<u8>>,
    #[serde(default)]
    dq: Option<Vec<u8>>,
    #[serde(default)]
    qi: Option<Vec<u8>>,
}

impl TryFrom<PrivateKeyFields> for PortableRsaPrivateKey {
    type Error = CryptoError;

    fn try_from(mut fields: PrivateKeyFields) -> Result<Self, Self::Error> {
        Ok(Self {
            n: require("n", std::mem::take(&mut fields.n))?,
            e: require("e", std::mem::take(&mut fields.e))?,
            d: require("d", std::mem::take(&mut fields.d))?,
            p: require("p", std::mem::take(&mut fields.p))?,
            q: require("q", std::mem::take(&mut fields.q))?,
            dp: require_optional("dp", fields.dp.take())?,
            dq: require_optional("dq", fields.dq.take())?,
            qi: require_optional("qi", fields.qi.take())?,
        })
    }
}

impl From<PortableRsaPrivateKey> for PrivateKeyFields {
    fn from(mut key: PortableRsaPrivateKey) -> Self {
        PrivateKeyFields {
            n: std::mem::take(&mut key.n),
            e: std::mem::take(&mut key.e),
            d: std::mem::take(&mut key.d),
            p: std::mem::take(&mut key.p),
            q: std::mem::take(&mut key.q),
            dp: key.dp.take(),
            dq: key.dq.take(),
            qi: key.qi.take(),
        }
    }
}

impl Drop for PrivateKeyFields {
    fn drop(&mut self) {
        self.d.zeroize();
        self.p.zeroize();
        self.q.zeroize();
        self.dp.zeroize();
        self.dq.zeroize();
        self.qi.zeroize();
    }
}

#[derive(Serialize, Deserialize)]
struct PublicKeyFields {
    n: Vec<u8>,
    e: Vec<u8>,
}

impl TryFrom<PublicKeyFields> for PortableRsaPublicKey {
    type Error = CryptoError;

    fn try_from(fields: PublicKeyFields) -> Result<Self, Self::Error> {
        PortableRsaPublicKey::new(fields.n, fields.e)
    }
}

impl From<PortableRsaPublicKey> for PublicKeyFields {
    fn from(key: PortableRsaPublicKey) -> Self {
        PublicKeyFields { n: key.n, e: key.e }
    }
}
