//! Shared fixtures and provider doubles for the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rsassa::error::{error_codes, CryptoError, CryptoResult};
use rsassa::hash::HashBinding;
use rsassa::keys::RsaJwk;
use rsassa::provider::{
    CryptoProvider, ExchangeFormat, InstrumentedProvider, KeyGenParams, KeyImportParams,
    KeyPairHandle, ProviderCallCounts, ProviderHandle, SoftwareKey, SoftwareProvider,
};
use rsassa::PortableRsaPrivateKey;

// 1024-bit key, CRT parameters included
pub const N: &str = "bc0d3fd49d00c42c6d8905585d86c1b9fde4b136863fdb64f13b0dc04ae4238cf5df6fd66aa89c2bb52df58188eeb5dfe3e98383506d449cf9efbec14604b178366872b2259ab2274e12bb237f950aadb59af22ad44b52a0dfae327567b40e9ebf731b55f15cc3f7acb512a6189c6bdd1dc2b273a453bf9f955c2f059885b507";
pub const E: &str = "010001";
pub const D: &str = "93198621c982acf1d7e9040e6072a61dd876490d4eacaaf0e6267c963bbf03f422ecda2e0e96c03b0c69dc0eaccf95e38203cb053027993175ed4cf920cd510851b5f5359b43c3b355a66f80edd90a79a22444e4fe57b0f519e95c9a25c2c8295bed7b615d8847b24df71f67a7ddd8f757bd1bf285ac70adabe39d0ba5bf85b1";
pub const P: &str = "ddd33f7041ed5a37809798e33dc73b99cb230e1c9bb877709bfd173571c93cd14152c06e5db50f80e3b5a9c095ff8c6a4d5c1383852ab6c440415332199e696f";
pub const Q: &str = "d905fb815dccdbd19d3e4e24b9a97414779464fc4d742757c7a82f69656d11cf8cb4241478606263e92a2b2a7f0b77e107d695d4d550715bc959d585d9aeb1e9";
pub const DP: &str = "31d1e31a9443f992239868a708d5f945d640be47a095b285a1131ba64e32f32cd02e04b804e5c8609b43cea7494906c14d3493d163142fce2ddc3e122f7ccb93";
pub const DQ: &str = "32042ef2a1ab94fdba3fa1c2d50738b97ed5b470716953a7e75bdb916eceb44c2121632f548ee21e249e935437f36cad7021046708c2815da60a0e2bcaff7801";
pub const QI: &str = "1f74fe0d21a799631599af96e7de048997521e449cd5cb9cdc59442bd18195c5a4168339f36eca9efb8c635c4bf05e776b953c0c043aa76ef590782e8caf6610";

fn bytes(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).expect("fixture is valid hex")
}

pub fn private_key() -> PortableRsaPrivateKey {
    PortableRsaPrivateKey::new(bytes(N), bytes(E), bytes(D), bytes(P), bytes(Q))
        .and_then(|key| key.with_crt_params(bytes(DP), bytes(DQ), bytes(QI)))
        .expect("fixture key is complete")
}

/// Software provider whose import, sign and tagging behavior can be switched per test
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    inner: InstrumentedProvider<SoftwareProvider>,
    /// Imports never complete
    pub stall_imports: AtomicBool,
    /// Imports yield to the executor once before running
    pub yield_on_import: AtomicBool,
    /// Imports fail with a provider error
    pub fail_imports: AtomicBool,
    /// Imports return handles tagged with the wrong hash
    pub mistag_imports: AtomicBool,
    /// Sign fails with a provider error
    pub fail_signing: AtomicBool,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> ProviderCallCounts {
        self.inner.counts()
    }

    pub fn set(flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }
}

fn other_binding(hash: HashBinding) -> HashBinding {
    match hash {
        HashBinding::Sha1 => HashBinding::Sha256,
        _ => HashBinding::Sha1,
    }
}

#[async_trait]
impl CryptoProvider for ScriptedProvider {
    type Key = SoftwareKey;

    async fn generate_key_pair(
        &self,
        params: &KeyGenParams,
    ) -> CryptoResult<KeyPairHandle<SoftwareKey>> {
        self.inner.generate_key_pair(params).await
    }

    async fn import_key(
        &self,
        format: ExchangeFormat,
        key_data: &RsaJwk,
        params: &KeyImportParams,
    ) -> CryptoResult<ProviderHandle<SoftwareKey>> {
        if self.stall_imports.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        if self.yield_on_import.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        if self.fail_imports.load(Ordering::SeqCst) {
            return Err(CryptoError::provider_error(
                "import_key",
                "engine unavailable",
                error_codes::PROVIDER_IMPORT_FAILED,
            ));
        }
        if self.mistag_imports.load(Ordering::SeqCst) {
            let mut params = params.clone();
            params.hash = other_binding(params.hash);
            let mut key_data = key_data.clone();
            key_data.alg = None;
            return self.inner.import_key(format, &key_data, &params).await;
        }
        self.inner.import_key(format, key_data, params).await
    }

    async fn export_key(&self, handle: &ProviderHandle<SoftwareKey>) -> CryptoResult<RsaJwk> {
        self.inner.export_key(handle).await
    }

    async fn sign(
        &self,
        algorithm: &str,
        handle: &ProviderHandle<SoftwareKey>,
        message: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        if self.fail_signing.load(Ordering::SeqCst) {
            return Err(CryptoError::provider_error(
                "sign",
                "engine reset during operation",
                error_codes::PROVIDER_CONTRACT_VIOLATION,
            ));
        }
        self.inner.sign(algorithm, handle, message).await
    }

    async fn verify(
        &self,
        algorithm: &str,
        handle: &ProviderHandle<SoftwareKey>,
        signature: &[u8],
        message: &[u8],
    ) -> CryptoResult<bool> {
        self.inner.verify(algorithm, handle, signature, message).await
    }
}
