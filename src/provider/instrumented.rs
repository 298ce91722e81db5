//! Provider decorator counting calls per operation

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::CryptoResult;
use crate::keys::RsaJwk;
use crate::provider::{
    CryptoProvider, ExchangeFormat, KeyGenParams, KeyImportParams, KeyPairHandle, ProviderHandle,
};

/// Snapshot of the calls made through an [`InstrumentedProvider`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCallCounts {
    pub generate: usize,
    pub import: usize,
    pub export: usize,
    pub sign: usize,
    pub verify: usize,
}

impl ProviderCallCounts {
    pub fn total(&self) -> usize {
        self.generate + self.import + self.export + self.sign + self.verify
    }
}

#[derive(Debug, Default)]
struct Counters {
    generate: AtomicUsize,
    import: AtomicUsize,
    export: AtomicUsize,
    sign: AtomicUsize,
    verify: AtomicUsize,
}

/// Wraps a provider and counts every call, including calls that fail
#[derive(Debug, Default)]
pub struct InstrumentedProvider<P> {
    inner: P,
    counters: Counters,
}

impl<P> InstrumentedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            counters: Counters::default(),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn counts(&self) -> ProviderCallCounts {
        ProviderCallCounts {
            generate: self.counters.generate.load(Ordering::SeqCst),
            import: self.counters.import.load(Ordering::SeqCst),
            export: self.counters.export.load(Ordering::SeqCst),
            sign: self.counters.sign.load(Ordering::SeqCst),
            verify: self.counters.verify.load(Ordering::SeqCst),
        }
    }

    pub fn reset(&self) {
        self.counters.generate.store(0, Ordering::SeqCst);
        self.counters.import.store(0, Ordering::SeqCst);
        self.counters.export.store(0, Ordering::SeqCst);
        self.counters.sign.store(0, Ordering::SeqCst);
        self.counters.verify.store(0, Ordering::SeqCst);
    }
}

fn record(counter: &AtomicUsize, operation: &str) {
    let calls = counter.fetch_add(1, Ordering::SeqCst) + 1;
    log::trace!("provider {} call #{}", operation, calls);
}

#[async_trait]
impl<P: CryptoProvider> CryptoProvider for InstrumentedProvider<P> {
    type Key = P::Key;

    async fn generate_key_pair(
        &self,
        params: &KeyGenParams,
    ) -> CryptoResult<KeyPairHandle<Self::Key>> {
        record(&self.counters.generate, "generate_key_pair");
        self.inner.generate_key_pair(params).await
    }

    async fn import_key(
        &self,
        format: ExchangeFormat,
        key_data: &RsaJwk,
        params: &KeyImportParams,
    ) -> CryptoResult<ProviderHandle<Self::Key>> {
        record(&self.counters.import, "import_key");
        self.inner.import_key(format, key_data, params).await
    }

    async fn export_key(&self, handle: &ProviderHandle<Self::Key>) -> CryptoResult<RsaJwk> {
        record(&self.counters.export, "export_key");
        self.inner.export_key(handle).await
    }

    async fn sign(
        &self,
        algorithm: &str,
        handle: &ProviderHandle<Self::Key>,
        message: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        record(&self.counters.sign, "sign");
        self.inner.sign(algorithm, handle, message).await
    }

    async fn verify(
        &self,
        algorithm: &str,
        handle: &ProviderHandle<Self::Key>,
        signature: &[u8],
        message: &[u8],
    ) -> CryptoResult<bool> {
        record(&self.counters.verify, "verify");
        self.inner.verify(algorithm, handle, signature, message).await
    }
}
