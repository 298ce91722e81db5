//! In-process provider backed by the RustCrypto `rsa` crate
//!
//! Handles wrap `rsa` key objects directly. Operations complete without yielding, so on a
//! multi-threaded runtime callers generating large keys may prefer `spawn_blocking`.

use async_trait::async_trait;
use rand::rngs::OsRng;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::config::SoftwareProviderConfig;
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::hash::{HashBinding, RSASSA_PKCS1_V1_5};
use crate::keys::{PortableRsaPrivateKey, PortableRsaPublicKey, RsaJwk};
use crate::provider::{
    CryptoProvider, ExchangeFormat, HandleTag, KeyGenParams, KeyImportParams, KeyPairHandle,
    KeyRole, KeyUsage, ProviderHandle,
};

/// Largest public exponent accepted for generation
const MAX_PUBLIC_EXPONENT: u64 = u32::MAX as u64;

/// Key material held by [`SoftwareProvider`] handles
pub enum SoftwareKey {
    Private(RsaPrivateKey),
    Public(RsaPublicKey),
}

/// Provider performing RSA arithmetic in-process
#[derive(Debug, Clone, Default)]
pub struct SoftwareProvider {
    config: SoftwareProviderConfig,
}

impl SoftwareProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with explicit limits
    pub fn with_config(config: SoftwareProviderConfig) -> CryptoResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SoftwareProviderConfig {
        &self.config
    }
}

fn ensure_algorithm(algorithm: &str) -> CryptoResult<()> {
    if algorithm != RSASSA_PKCS1_V1_5 {
        return Err(CryptoError::UnsupportedAlgorithm {
            algorithm: algorithm.to_string(),
            error_code: error_codes::UNSUPPORTED_KEY_ALGORITHM,
        });
    }
    Ok(())
}

/// Parse and range-check a big-endian public exponent
fn parse_public_exponent(bytes: &[u8]) -> CryptoResult<BigUint> {
    let significant: Vec<u8> = bytes.iter().copied().skip_while(|b| *b == 0).collect();
    if significant.len() > 8 {
        return Err(CryptoError::generation_failed(
            "public exponent is too large",
            error_codes::INVALID_PUBLIC_EXPONENT,
        ));
    }

    let value = significant
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
    if value < 3 || value % 2 == 0 || value > MAX_PUBLIC_EXPONENT {
        return Err(CryptoError::generation_failed(
            &format!(
                "public exponent {} must be odd and between 3 and {}",
                value, MAX_PUBLIC_EXPONENT
            ),
            error_codes::INVALID_PUBLIC_EXPONENT,
        ));
    }

    Ok(BigUint::from_bytes_be(&significant))
}

/// PKCS#1 v1.5 padding scheme and message digest for a binding
fn pkcs1v15_digest(hash: HashBinding, message: &[u8]) -> (Pkcs1v15Sign, Vec<u8>) {
    match hash {
        HashBinding::Sha1 => (Pkcs1v15Sign::new::<Sha1>(), Sha1::digest(message).to_vec()),
        HashBinding::Sha256 => (
            Pkcs1v15Sign::new::<Sha256>(),
            Sha256::digest(message).to_vec(),
        ),
        HashBinding::Sha384 => (
            Pkcs1v15Sign::new::<Sha384>(),
            Sha384::digest(message).to_vec(),
        ),
        HashBinding::Sha512 => (
            Pkcs1v15Sign::new::<Sha512>(),
            Sha512::digest(message).to_vec(),
        ),
    }
}

fn uint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Cross-check caller-supplied CRT parameters against the ones derived from p and q
fn check_crt_param(
    field: &str,
    supplied: Option<&[u8]>,
    derived: Option<BigUint>,
) -> CryptoResult<()> {
    match (supplied, derived) {
        (Some(supplied), Some(derived)) if uint(supplied) != derived => {
            Err(CryptoError::key_material_invalid(
                field,
                "does not match the value derived from p and q",
                error_codes::INCONSISTENT_KEY_MATERIAL,
            ))
        }
        _ => Ok(()),
    }
}

fn import_private(key: &PortableRsaPrivateKey) -> CryptoResult<RsaPrivateKey> {
    let inconsistent = |e: rsa::Error| {
        CryptoError::key_material_invalid(
            "n",
            &format!("RSA components are inconsistent: {}", e),
            error_codes::INCONSISTENT_KEY_MATERIAL,
        )
    };

    let mut private_key = RsaPrivateKey::from_components(
        uint(key.n()),
        uint(key.e()),
        uint(key.d()),
        vec![uint(key.p()), uint(key.q())],
    )
    .map_err(inconsistent)?;
    private_key.validate().map_err(inconsistent)?;
    private_key.precompute().map_err(inconsistent)?;

    check_crt_param("dp", key.dp(), private_key.dp().cloned())?;
    check_crt_param("dq", key.dq(), private_key.dq().cloned())?;
    check_crt_param("qi", key.qi(), private_key.crt_coefficient())?;

    Ok(private_key)
}

fn export_private(key: &RsaPrivateKey) -> CryptoResult<PortableRsaPrivateKey> {
    let primes = key.primes();
    let (p, q) = match (primes.first(), primes.get(1)) {
        (Some(p), Some(q)) if primes.len() == 2 => (p, q),
        _ => {
            return Err(CryptoError::provider_error(
                "export_key",
                &format!("expected a two-prime key, found {} primes", primes.len()),
                error_codes::PROVIDER_EXPORT_FAILED,
            ))
        }
    };

    let portable = PortableRsaPrivateKey::new(
        key.n().to_bytes_be(),
        key.e().to_bytes_be(),
        key.d().to_bytes_be(),
        p.to_bytes_be(),
        q.to_bytes_be(),
    )?;

    match (key.dp(), key.dq(), key.crt_coefficient()) {
        (Some(dp), Some(dq), Some(qi)) => {
            portable.with_crt_params(dp.to_bytes_be(), dq.to_bytes_be(), qi.to_bytes_be())
        }
        _ => Ok(portable),
    }
}

fn key_ops(usages: &[KeyUsage]) -> Vec<String> {
    usages.iter().map(|u| u.as_str().to_string()).collect()
}

fn check_usages(role: KeyRole, usages: &[KeyUsage]) -> CryptoResult<()> {
    if let Some(bad) = usages.iter().find(|u| **u != role.usage()) {
        return Err(CryptoError::invalid_parameter(
            "usages",
            &format!("only '{}' for a {:?} key", role.usage().as_str(), role),
            bad.as_str(),
        ));
    }
    Ok(())
}

#[async_trait]
impl CryptoProvider for SoftwareProvider {
    type Key = SoftwareKey;

    async fn generate_key_pair(
        &self,
        params: &KeyGenParams,
    ) -> CryptoResult<KeyPairHandle<SoftwareKey>> {
        ensure_algorithm(params.algorithm)?;
        self.config.check_modulus_length(params.modulus_length)?;
        let exponent = parse_public_exponent(&params.public_exponent)?;

        let private_key =
            RsaPrivateKey::new_with_exp(&mut OsRng, params.modulus_length as usize, &exponent)
                .map_err(|e| {
                    CryptoError::generation_failed(
                        &format!("RSA key generation failed: {}", e),
                        error_codes::KEY_GENERATION_FAILED,
                    )
                })?;
        let public_key = RsaPublicKey::from(&private_key);

        let tag = params.tag();
        let private_usages: Vec<KeyUsage> = params
            .usages
            .iter()
            .copied()
            .filter(|u| *u == KeyUsage::Sign)
            .collect();
        let public_usages: Vec<KeyUsage> = params
            .usages
            .iter()
            .copied()
            .filter(|u| *u == KeyUsage::Verify)
            .collect();

        log::debug!(
            "Generated {}-bit RSA key pair for {}",
            params.modulus_length,
            tag
        );

        KeyPairHandle::new(
            ProviderHandle::new(
                SoftwareKey::Private(private_key),
                tag,
                KeyRole::Private,
                params.extractable,
                private_usages,
            ),
            ProviderHandle::new(
                SoftwareKey::Public(public_key),
                tag,
                KeyRole::Public,
                true,
                public_usages,
            ),
        )
    }

    async fn import_key(
        &self,
        format: ExchangeFormat,
        key_data: &RsaJwk,
        params: &KeyImportParams,
    ) -> CryptoResult<ProviderHandle<SoftwareKey>> {
        ensure_algorithm(params.algorithm)?;
        match format {
            ExchangeFormat::Jwk => key_data.check_binding(params.hash)?,
        }

        let tag = HandleTag {
            algorithm: params.algorithm,
            hash: params.hash,
        };

        if key_data.is_private() {
            check_usages(KeyRole::Private, &params.usages)?;
            let portable = key_data.to_private_key()?;
            let private_key = import_private(&portable)?;
            Ok(ProviderHandle::new(
                SoftwareKey::Private(private_key),
                tag,
                KeyRole::Private,
                params.extractable,
                params.usages.clone(),
            ))
        } else {
            check_usages(KeyRole::Public, &params.usages)?;
            let portable = key_data.to_public_key()?;
            let public_key =
                RsaPublicKey::new(uint(portable.n()), uint(portable.e())).map_err(
                    |e| {
                        CryptoError::key_material_invalid(
                            "n",
                            &format!("not a usable RSA public key: {}", e),
                            error_codes::INCONSISTENT_KEY_MATERIAL,
                        )
                    },
                )?;
            Ok(ProviderHandle::new(
                SoftwareKey::Public(public_key),
                tag,
                KeyRole::Public,
                true,
                params.usages.clone(),
            ))
        }
    }

    async fn export_key(&self, handle: &ProviderHandle<SoftwareKey>) -> CryptoResult<RsaJwk> {
        let tag = handle.tag();
        let jwk = match handle.key() {
            SoftwareKey::Private(private_key) => {
                if !handle.is_extractable() {
                    return Err(CryptoError::export_denied(&format!(
                        "private {} handle",
                        tag
                    )));
                }
                RsaJwk::from_private_key(&export_private(private_key)?, Some(tag.hash))
            }
            SoftwareKey::Public(public_key) => {
                let portable = PortableRsaPublicKey::new(
                    public_key.n().to_bytes_be(),
                    public_key.e().to_bytes_be(),
                )?;
                RsaJwk::from_public_key(&portable, Some(tag.hash))
            }
        };

        Ok(jwk
            .with_key_ops(key_ops(handle.usages()))
            .with_extractable(handle.is_extractable()))
    }

    async fn sign(
        &self,
        algorithm: &str,
        handle: &ProviderHandle<SoftwareKey>,
        message: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        if algorithm != handle.tag().algorithm {
            return Err(CryptoError::signing_failed(
                &format!("handle was created for {}", handle.tag().algorithm),
                error_codes::SIGNING_FAILED,
                algorithm,
            ));
        }
        if !handle.allows(KeyUsage::Sign) {
            return Err(CryptoError::signing_failed(
                "handle does not permit signing",
                error_codes::HANDLE_USAGE_DENIED,
                algorithm,
            ));
        }
        let SoftwareKey::Private(private_key) = handle.key() else {
            return Err(CryptoError::signing_failed(
                "handle does not hold a private key",
                error_codes::HANDLE_ROLE_MISMATCH,
                algorithm,
            ));
        };

        let (scheme, digest) = pkcs1v15_digest(handle.tag().hash, message);
        private_key
            .sign_with_rng(&mut OsRng, scheme, &digest)
            .map_err(|e| {
                CryptoError::signing_failed(
                    &format!("RSASSA-PKCS1-v1_5 failed to sign message: {}", e),
                    error_codes::SIGNING_FAILED,
                    algorithm,
                )
            })
    }

    async fn verify(
        &self,
        algorithm: &str,
        handle: &ProviderHandle<SoftwareKey>,
        signature: &[u8],
        message: &[u8],
    ) -> CryptoResult<bool> {
        if algorithm != handle.tag().algorithm || !handle.allows(KeyUsage::Verify) {
            return Err(CryptoError::provider_error(
                "verify",
                &format!(
                    "handle {} ({:?}) cannot verify {} signatures",
                    handle.tag(),
                    handle.role(),
                    algorithm
                ),
                error_codes::PROVIDER_VERIFY_FAILED,
            ));
        }
        let SoftwareKey::Public(public_key) = handle.key() else {
            return Err(CryptoError::provider_error(
                "verify",
                "handle does not hold a public key",
                error_codes::PROVIDER_VERIFY_FAILED,
            ));
        };

        let (scheme, digest) = pkcs1v15_digest(handle.tag().hash, message);
        Ok(public_key.verify(scheme, &digest, signature).is_ok())
    }
}
