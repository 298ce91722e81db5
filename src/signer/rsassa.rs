use std::fmt;
use std::sync::Arc;

use crate::cache::{self, PublicHandleCache};
use crate::config::SignerConfig;
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::hash::{self, HashBinding};
use crate::keys::{PortableRsaPrivateKey, PortableRsaPublicKey, RsaJwk};
use crate::provider::{CryptoProvider, KeyGenParams};
use crate::signer::{lifecycle, RsaKeyPair, Signature};

/// RSASSA-PKCS1-v1_5 signer and verifier bound to one hash
///
/// The hash is fixed when the orchestrator is built and is used for every generate, sign and
/// verify call. A signature must be verified by an orchestrator bound to the same hash that
/// produced it. Public handles imported during verification are cached per orchestrator.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use rsassa::{HashBinding, RsaSsaPkcs1v15, SoftwareProvider};
///
/// # async fn demo() -> rsassa::CryptoResult<()> {
/// let signer = RsaSsaPkcs1v15::new(Arc::new(SoftwareProvider::new()), HashBinding::Sha256);
/// let key_pair = signer.generate(2048, &[0x01, 0x00, 0x01]).await?;
///
/// let signature = signer.sign(b"message", &key_pair).await?;
/// assert!(signer.verify(b"message", &signature).await?);
/// # Ok(())
/// # }
/// ```
pub struct RsaSsaPkcs1v15<P: CryptoProvider> {
    provider: Arc<P>,
    config: SignerConfig,
    hash: HashBinding,
    public_handles: PublicHandleCache<P::Key>,
}

impl<P: CryptoProvider> RsaSsaPkcs1v15<P> {
    /// Create an orchestrator bound to `hash` with the default configuration
    pub fn new(provider: Arc<P>, hash: HashBinding) -> Self {
        let config = SignerConfig::for_hash(hash);
        Self {
            provider,
            public_handles: PublicHandleCache::with_capacity(config.public_cache_capacity),
            config,
            hash,
        }
    }

    /// Create an orchestrator from a configuration, validating it first
    pub fn with_config(provider: Arc<P>, config: SignerConfig) -> CryptoResult<Self> {
        let hash = config.validate()?;
        Ok(Self {
            provider,
            public_handles: PublicHandleCache::with_capacity(config.public_cache_capacity),
            config,
            hash,
        })
    }

    /// Create an orchestrator from a hash name such as "SHA-384"
    ///
    /// Unsupported names fail with `UnsupportedAlgorithm` before the provider is touched.
    pub fn with_hash_name(provider: Arc<P>, hash: &str) -> CryptoResult<Self> {
        Ok(Self::new(provider, HashBinding::from_name(hash)?))
    }

    /// An orchestrator for another hash sharing this one's provider and configuration
    ///
    /// Public handle caches are not shared.
    pub fn with_hash(&self, hash: HashBinding) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            config: SignerConfig {
                hash: hash.provider_name().to_string(),
                ..self.config.clone()
            },
            hash,
            public_handles: PublicHandleCache::with_capacity(self.config.public_cache_capacity),
        }
    }

    pub fn hash(&self) -> HashBinding {
        self.hash
    }

    /// Provider algorithm identifier
    pub fn algorithm(&self) -> &'static str {
        let (algorithm, _) = hash::resolve(self.hash);
        algorithm
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Generate a key pair bound to this orchestrator's hash
    ///
    /// # Arguments
    ///
    /// * `modulus_length` - Modulus size in bits
    /// * `public_exponent` - Public exponent, unsigned big-endian
    ///
    /// # Returns
    ///
    /// The key pair, or `UnsupportedModulusLength` / `GenerationFailed` if the provider rejects
    /// the parameters
    pub async fn generate(
        &self,
        modulus_length: u32,
        public_exponent: &[u8],
    ) -> CryptoResult<RsaKeyPair<P::Key>> {
        let params = KeyGenParams::rsassa(
            modulus_length,
            public_exponent,
            self.hash,
            self.config.extractable,
        );

        lifecycle::generate(self.provider.as_ref(), &params)
            .await
            .map_err(|error| match error {
                CryptoError::UnsupportedModulusLength { .. }
                | CryptoError::GenerationFailed { .. } => error,
                other => CryptoError::generation_failed(
                    &other.to_string(),
                    error_codes::KEY_GENERATION_FAILED,
                ),
            })
    }

    /// Generate a key pair with the configured modulus length and exponent
    pub async fn generate_default(&self) -> CryptoResult<RsaKeyPair<P::Key>> {
        self.generate(
            self.config.default_modulus_length,
            &self.config.default_public_exponent,
        )
        .await
    }

    /// Wrap caller-supplied private material; the provider import happens on first sign
    pub fn import_private_key(&self, private_key: PortableRsaPrivateKey) -> RsaKeyPair<P::Key> {
        let key_pair = RsaKeyPair::from_private_key(private_key);
        log::debug!("Imported private key as key pair {}", key_pair.id());
        key_pair
    }

    /// Wrap a private JWK, rejecting one bound to a different hash
    pub fn import_jwk(&self, jwk: &RsaJwk) -> CryptoResult<RsaKeyPair<P::Key>> {
        jwk.check_binding(self.hash)?;
        if !jwk.is_private() {
            return Err(CryptoError::key_type_mismatch(
                "RSA private key",
                "RSA public key",
            ));
        }
        Ok(self.import_private_key(jwk.to_private_key()?))
    }

    /// Portable private key of `key_pair`
    ///
    /// Fails with `ExportDenied` for a pair generated non-extractable.
    pub async fn extract_private(
        &self,
        key_pair: &RsaKeyPair<P::Key>,
    ) -> CryptoResult<PortableRsaPrivateKey> {
        lifecycle::extract_private(self.provider.as_ref(), key_pair).await
    }

    /// Portable public key of `key_pair`; always permitted
    pub async fn extract_public(
        &self,
        key_pair: &RsaKeyPair<P::Key>,
    ) -> CryptoResult<PortableRsaPublicKey> {
        lifecycle::extract_public(self.provider.as_ref(), key_pair).await
    }

    /// Sign `message` with `key_pair`
    ///
    /// The public key for the returned signature is extracted while the private handle is
    /// resolved. Faults of the provider's sign primitive surface as `SigningFailed`.
    pub async fn sign(
        &self,
        message: &[u8],
        key_pair: &RsaKeyPair<P::Key>,
    ) -> CryptoResult<Signature> {
        let (algorithm, hash_name) = hash::resolve(self.hash);
        let provider = self.provider.as_ref();
        log::debug!(
            "Signing {} bytes with key pair {} ({} / {})",
            message.len(),
            key_pair.id(),
            algorithm,
            hash_name
        );

        let (public_key, handle) = futures::try_join!(
            lifecycle::extract_public(provider, key_pair),
            cache::private_handle(provider, key_pair, self.hash),
        )?;

        let bytes = provider
            .sign(algorithm, &handle, message)
            .await
            .map_err(|error| match error {
                CryptoError::SigningFailed { .. } => error,
                other => CryptoError::signing_failed(
                    &other.to_string(),
                    error_codes::SIGNING_FAILED,
                    algorithm,
                ),
            })?;

        Ok(Signature::new(bytes, public_key))
    }

    /// Verify `signature` over `message` under this orchestrator's hash
    ///
    /// A signature that does not match is `Ok(false)`. A signature carrying anything other than
    /// an RSA public key fails with `KeyTypeMismatch`.
    pub async fn verify(&self, message: &[u8], signature: &Signature) -> CryptoResult<bool> {
        let public_key = signature.public_key().as_rsa_public()?;
        self.verify_with_public_key(message, signature.bytes(), public_key)
            .await
    }

    /// Verify raw signature bytes against the public key of `key_pair`
    pub async fn verify_with_key_pair(
        &self,
        message: &[u8],
        signature: &[u8],
        key_pair: &RsaKeyPair<P::Key>,
    ) -> CryptoResult<bool> {
        let public_key = self.extract_public(key_pair).await?;
        self.verify_with_public_key(message, signature, &public_key)
            .await
    }

    async fn verify_with_public_key(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &PortableRsaPublicKey,
    ) -> CryptoResult<bool> {
        let (algorithm, hash_name) = hash::resolve(self.hash);
        let provider = self.provider.as_ref();
        let handle =
            cache::public_handle(provider, &self.public_handles, public_key, self.hash).await?;

        let valid = provider
            .verify(algorithm, &handle, signature, message)
            .await?;
        log::debug!(
            "{} / {} signature over {} bytes verified: {}",
            algorithm,
            hash_name,
            message.len(),
            valid
        );
        Ok(valid)
    }

    /// Number of public handles cached by this orchestrator
    pub fn cached_public_handles(&self) -> usize {
        self.public_handles.len()
    }
}

impl<P: CryptoProvider> fmt::Debug for RsaSsaPkcs1v15<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSsaPkcs1v15")
            .field("hash", &self.hash)
            .field("config", &self.config)
            .field("public_handles", &self.public_handles)
            .finish()
    }
}
