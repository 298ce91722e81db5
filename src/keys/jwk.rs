//! JSON Web Key exchange format for RSA keys (RFC 7517, RFC 7518 section 6.3)
//!
//! This is the format in which key material crosses the provider boundary. Integers are
//! Base64urlUInt-encoded: unsigned big-endian bytes, base64url without padding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::hash::HashBinding;
use crate::keys::{PortableRsaPrivateKey, PortableRsaPublicKey};

/// JWK `kty` value for RSA keys
pub const KTY_RSA: &str = "RSA";

/// An RSA JSON Web Key
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaJwk {
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_ops: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<bool>,
}

/// Encode unsigned big-endian bytes as a Base64urlUInt
pub fn encode_base64url_uint(bytes: &[u8]) -> String {
    base64::encode_config(bytes, base64::URL_SAFE_NO_PAD)
}

/// Decode a Base64urlUInt. A value that is not valid base64url is `KeyMaterialInvalid`.
pub fn decode_base64url_uint(field: &str, input: &str) -> CryptoResult<Vec<u8>> {
    base64::decode_config(input, base64::URL_SAFE_NO_PAD).map_err(|e| {
        CryptoError::key_material_invalid(
            field,
            &format!("not a Base64urlUInt: {}", e),
            error_codes::MALFORMED_KEY_FIELD,
        )
    })
}

impl RsaJwk {
    /// Build the JWK of a private key
    pub fn from_private_key(key: &PortableRsaPrivateKey, binding: Option<HashBinding>) -> Self {
        RsaJwk {
            kty: KTY_RSA.to_string(),
            alg: binding.map(|b| b.jwk_alg().to_string()),
            n: Some(encode_base64url_uint(key.n())),
            e: Some(encode_base64url_uint(key.e())),
            d: Some(encode_base64url_uint(key.d())),
            p: Some(encode_base64url_uint(key.p())),
            q: Some(encode_base64url_uint(key.q())),
            dp: key.dp().map(encode_base64url_uint),
            dq: key.dq().map(encode_base64url_uint),
            qi: key.qi().map(encode_base64url_uint),
            key_ops: None,
            ext: None,
        }
    }

    /// Build the JWK of a public key
    pub fn from_public_key(key: &PortableRsaPublicKey, binding: Option<HashBinding>) -> Self {
        RsaJwk {
            kty: KTY_RSA.to_string(),
            alg: binding.map(|b| b.jwk_alg().to_string()),
            n: Some(encode_base64url_uint(key.n())),
            e: Some(encode_base64url_uint(key.e())),
            ..Default::default()
        }
    }

    pub fn with_key_ops(mut self, key_ops: Vec<String>) -> Self {
        self.key_ops = Some(key_ops);
        self
    }

    pub fn with_extractable(mut self, extractable: bool) -> Self {
        self.ext = Some(extractable);
        self
    }

    /// A JWK carrying `d` describes a private key
    pub fn is_private(&self) -> bool {
        self.d.is_some()
    }

    /// Reject a JWK that is not an RSA key or whose `alg` names a different hash
    pub fn check_binding(&self, binding: HashBinding) -> CryptoResult<()> {
        if self.kty != KTY_RSA {
            return Err(CryptoError::key_material_invalid(
                "kty",
                &format!("expected \"{}\", got \"{}\"", KTY_RSA, self.kty),
                error_codes::INCONSISTENT_KEY_MATERIAL,
            ));
        }

        if let Some(alg) = &self.alg {
            let bound = HashBinding::from_jwk_alg(alg).map_err(|_| {
                CryptoError::key_material_invalid(
                    "alg",
                    &format!("\"{}\" is not an RSASSA-PKCS1-v1_5 algorithm", alg),
                    error_codes::INCONSISTENT_KEY_MATERIAL,
                )
            })?;
            if bound != binding {
                return Err(CryptoError::key_material_invalid(
                    "alg",
                    &format!(
                        "key is bound to \"{}\" but {} was requested",
                        alg,
                        binding.jwk_alg()
                    ),
                    error_codes::INCONSISTENT_KEY_MATERIAL,
                ));
            }
        }

        Ok(())
    }

    /// Decode the private key fields
    pub fn to_private_key(&self) -> CryptoResult<PortableRsaPrivateKey> {
        let key = PortableRsaPrivateKey::new(
            required_field("n", &self.n)?,
            required_field("e", &self.e)?,
            required_field("d", &self.d)?,
            required_field("p", &self.p)?,
            required_field("q", &self.q)?,
        )?;

        match (&self.dp, &self.dq, &self.qi) {
            (Some(dp), Some(dq), Some(qi)) => key.with_crt_params(
                decode_base64url_uint("dp", dp)?,
                decode_base64url_uint("dq", dq)?,
                decode_base64url_uint("qi", qi)?,
            ),
            (None, None, None) => Ok(key),
            _ => Err(CryptoError::key_material_invalid(
                "dp",
                "dp, dq and qi must be given together",
                error_codes::INCONSISTENT_KEY_MATERIAL,
            )),
        }
    }

    /// Decode the public key fields
    pub fn to_public_key(&self) -> CryptoResult<PortableRsaPublicKey> {
        PortableRsaPublicKey::new(required_field("n", &self.n)?, required_field("e", &self.e)?)
    }

    pub fn to_json(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> CryptoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn required_field(field: &str, value: &Option<String>) -> CryptoResult<Vec<u8>> {
    match value {
        Some(encoded) => decode_base64url_uint(field, encoded),
        None => Err(CryptoError::missing_key_field(field)),
    }
}

impl fmt::Debug for RsaJwk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaJwk")
            .field("kty", &self.kty)
            .field("alg", &self.alg)
            .field("n", &self.n)
            .field("e", &self.e)
            .field("private", &self.is_private())
            .field("key_ops", &self.key_ops)
            .field("ext", &self.ext)
            .finish()
    }
}
