//! Key pair generation and extraction of portable key material

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::keys::{PortableRsaPrivateKey, PortableRsaPublicKey};
use crate::provider::{CryptoProvider, KeyGenParams};
use crate::signer::RsaKeyPair;

/// Generate a key pair through the provider
pub(crate) async fn generate<P: CryptoProvider>(
    provider: &P,
    params: &KeyGenParams,
) -> CryptoResult<RsaKeyPair<P::Key>> {
    let handles = provider.generate_key_pair(params).await?;
    if handles.tag() != params.tag() {
        return Err(CryptoError::provider_error(
            "generate_key_pair",
            &format!(
                "requested a key pair tagged {}, provider returned {}",
                params.tag(),
                handles.tag()
            ),
            error_codes::PROVIDER_CONTRACT_VIOLATION,
        ));
    }

    let key_pair = RsaKeyPair::from_generated(handles)?;
    log::info!(
        "Generated {}-bit RSA key pair {} for {}",
        params.modulus_length,
        key_pair.id(),
        params.tag()
    );
    Ok(key_pair)
}

/// Portable private key of a pair, exporting it from the provider on first use
///
/// The result is cached on the pair, so repeated calls return equal values and make at most
/// one export.
pub(crate) async fn extract_private<P: CryptoProvider>(
    provider: &P,
    key_pair: &RsaKeyPair<P::Key>,
) -> CryptoResult<PortableRsaPrivateKey> {
    if let Some(private_key) = key_pair.cached_private_key() {
        return Ok(private_key);
    }

    let generated = key_pair
        .generated()
        .ok_or_else(|| CryptoError::missing_key_field("d"))?;

    log::debug!("exporting private key of key pair {}", key_pair.id());
    let jwk = provider.export_key(generated.private()).await?;
    if !jwk.is_private() {
        return Err(CryptoError::provider_error(
            "export_key",
            "private handle exported without private fields",
            error_codes::PROVIDER_CONTRACT_VIOLATION,
        ));
    }

    let private_key = jwk.to_private_key()?;
    key_pair.store_private_key(private_key.clone());
    Ok(private_key)
}

/// Portable public key of a pair
///
/// Served from the pair when known, derived from the private key when that is known, and
/// otherwise exported from the provider's public handle.
pub(crate) async fn extract_public<P: CryptoProvider>(
    provider: &P,
    key_pair: &RsaKeyPair<P::Key>,
) -> CryptoResult<PortableRsaPublicKey> {
    if let Some(public_key) = key_pair.cached_public_key() {
        return Ok(public_key);
    }

    if let Some(private_key) = key_pair.cached_private_key() {
        let public_key = private_key.public_key();
        key_pair.store_public_key(public_key.clone());
        return Ok(public_key);
    }

    let generated = key_pair
        .generated()
        .ok_or_else(|| CryptoError::missing_key_field("n"))?;

    log::debug!("exporting public key of key pair {}", key_pair.id());
    let public_key = provider
        .export_key(generated.public())
        .await?
        .to_public_key()?;
    key_pair.store_public_key(public_key.clone());
    Ok(public_key)
}
