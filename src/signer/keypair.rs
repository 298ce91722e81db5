use std::fmt;
use std::sync::Mutex;

use uuid::Uuid;

use crate::cache::{lock, PrivateHandleCache};
use crate::error::CryptoResult;
use crate::hash::HashBinding;
use crate::keys::{PortableRsaPrivateKey, PortableRsaPublicKey};
use crate::provider::KeyPairHandle;

/// An RSA key pair owned by the caller
///
/// A pair is either backed by provider handles (generated) or by caller-supplied portable
/// material (imported). Portable forms are filled in lazily and provider handles are cached per
/// hash binding; both live exactly as long as the pair.
pub struct RsaKeyPair<K> {
    id: Uuid,
    generated: Option<KeyPairHandle<K>>,
    private_key: Mutex<Option<PortableRsaPrivateKey>>,
    public_key: Mutex<Option<PortableRsaPublicKey>>,
    handles: PrivateHandleCache<K>,
}

impl<K> RsaKeyPair<K> {
    /// Wrap a freshly generated provider pair; its private handle is cached under its own tag
    pub(crate) fn from_generated(generated: KeyPairHandle<K>) -> CryptoResult<Self> {
        let handles = PrivateHandleCache::new();
        handles.insert(generated.tag().hash, generated.private().clone())?;

        Ok(Self {
            id: Uuid::new_v4(),
            generated: Some(generated),
            private_key: Mutex::new(None),
            public_key: Mutex::new(None),
            handles,
        })
    }

    /// Wrap caller-supplied private material. No provider is involved until first use.
    pub fn from_private_key(private_key: PortableRsaPrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            id: Uuid::new_v4(),
            generated: None,
            private_key: Mutex::new(Some(private_key)),
            public_key: Mutex::new(Some(public_key)),
            handles: PrivateHandleCache::new(),
        }
    }

    /// Identifier used in logs
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Binding the pair was generated under, `None` for imported pairs
    pub fn generated_binding(&self) -> Option<HashBinding> {
        self.generated.as_ref().map(|pair| pair.tag().hash)
    }

    pub fn is_generated(&self) -> bool {
        self.generated.is_some()
    }

    /// Bindings with a cached private handle
    pub fn cached_bindings(&self) -> Vec<HashBinding> {
        self.handles.bindings()
    }

    pub fn has_cached_handle(&self, binding: HashBinding) -> bool {
        self.handles.contains(binding)
    }

    pub(crate) fn generated(&self) -> Option<&KeyPairHandle<K>> {
        self.generated.as_ref()
    }

    pub(crate) fn handles(&self) -> &PrivateHandleCache<K> {
        &self.handles
    }

    pub(crate) fn cached_private_key(&self) -> Option<PortableRsaPrivateKey> {
        lock(&self.private_key).clone()
    }

    pub(crate) fn store_private_key(&self, private_key: PortableRsaPrivateKey) {
        *lock(&self.private_key) = Some(private_key);
    }

    pub(crate) fn cached_public_key(&self) -> Option<PortableRsaPublicKey> {
        lock(&self.public_key).clone()
    }

    pub(crate) fn store_public_key(&self, public_key: PortableRsaPublicKey) {
        *lock(&self.public_key) = Some(public_key);
    }
}

impl<K> fmt::Debug for RsaKeyPair<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("id", &self.id)
            .field("generated_binding", &self.generated_binding())
            .field("cached_bindings", &self.cached_bindings())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
