//! Get-or-import resolution of provider handles

use crate::cache::PublicHandleCache;
use crate::error::CryptoResult;
use crate::hash::HashBinding;
use crate::keys::{PortableRsaPublicKey, RsaJwk};
use crate::provider::{CryptoProvider, ExchangeFormat, KeyImportParams, KeyUsage, ProviderHandle};
use crate::signer::{lifecycle, RsaKeyPair};

/// Return the key pair's private handle for `binding`, importing it on a miss
///
/// A generated pair already holds the handle for its generation binding. Any other binding
/// needs the portable private key, which for a generated pair means an export through the
/// provider; `ExportDenied` is returned if the pair was generated non-extractable.
pub async fn private_handle<P: CryptoProvider>(
    provider: &P,
    key_pair: &RsaKeyPair<P::Key>,
    binding: HashBinding,
) -> CryptoResult<ProviderHandle<P::Key>> {
    if let Some(handle) = key_pair.handles().get(binding) {
        log::debug!("private handle cache hit for key pair {} ({})", key_pair.id(), binding);
        return Ok(handle);
    }

    log::debug!("private handle cache miss for key pair {} ({})", key_pair.id(), binding);
    let private_key = lifecycle::extract_private(provider, key_pair).await?;
    let jwk = RsaJwk::from_private_key(&private_key, Some(binding));
    let params = KeyImportParams::rsassa(binding, false, vec![KeyUsage::Sign]);

    let handle = provider.import_key(ExchangeFormat::Jwk, &jwk, &params).await?;
    key_pair.handles().insert(binding, handle.clone())?;

    log::debug!("cached private handle for key pair {} ({})", key_pair.id(), binding);
    Ok(handle)
}

/// Return a public handle for `public_key` under `binding`, importing it on a miss
pub async fn public_handle<P: CryptoProvider>(
    provider: &P,
    cache: &PublicHandleCache<P::Key>,
    public_key: &PortableRsaPublicKey,
    binding: HashBinding,
) -> CryptoResult<ProviderHandle<P::Key>> {
    if let Some(handle) = cache.get(public_key, binding) {
        log::debug!(
            "public handle cache hit for {} ({})",
            public_key.fingerprint(),
            binding
        );
        return Ok(handle);
    }

    log::debug!(
        "public handle cache miss for {} ({})",
        public_key.fingerprint(),
        binding
    );
    let jwk = RsaJwk::from_public_key(public_key, Some(binding));
    let params = KeyImportParams::rsassa(binding, true, vec![KeyUsage::Verify]);

    let handle = provider.import_key(ExchangeFormat::Jwk, &jwk, &params).await?;
    cache.insert(public_key, binding, handle.clone())?;
    Ok(handle)
}
