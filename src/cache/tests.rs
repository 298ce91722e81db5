//! Tests for the handle caches and the get-or-import adapter

use super::*;
use crate::error::CryptoError;
use crate::hash::{HashBinding, RSASSA_PKCS1_V1_5};
use crate::keys::{fixtures, PortableRsaPublicKey};
use crate::provider::{
    HandleTag, InstrumentedProvider, KeyRole, KeyUsage, ProviderHandle, SoftwareProvider,
};
use crate::signer::RsaKeyPair;

fn tag(hash: HashBinding) -> HandleTag {
    HandleTag {
        algorithm: RSASSA_PKCS1_V1_5,
        hash,
    }
}

fn private_handle_for(hash: HashBinding) -> ProviderHandle<()> {
    ProviderHandle::new((), tag(hash), KeyRole::Private, false, vec![KeyUsage::Sign])
}

fn public_handle_for(hash: HashBinding) -> ProviderHandle<()> {
    ProviderHandle::new((), tag(hash), KeyRole::Public, true, vec![KeyUsage::Verify])
}

fn public_key() -> PortableRsaPublicKey {
    fixtures::private_key().public_key()
}

#[test]
fn test_private_cache_is_keyed_by_binding() {
    let cache = PrivateHandleCache::new();
    assert!(cache.is_empty());

    cache
        .insert(HashBinding::Sha256, private_handle_for(HashBinding::Sha256))
        .unwrap();

    assert!(cache.get(HashBinding::Sha256).is_some());
    assert!(cache.get(HashBinding::Sha384).is_none());
    assert!(cache.contains(HashBinding::Sha256));
    assert_eq!(cache.bindings(), vec![HashBinding::Sha256]);
}

#[test]
fn test_private_cache_rejects_mismatched_handles() {
    let cache = PrivateHandleCache::new();

    let wrong_binding = cache.insert(HashBinding::Sha384, private_handle_for(HashBinding::Sha256));
    assert!(matches!(wrong_binding, Err(CryptoError::ProviderError { .. })));

    let wrong_role = cache.insert(HashBinding::Sha256, public_handle_for(HashBinding::Sha256));
    assert!(matches!(wrong_role, Err(CryptoError::ProviderError { .. })));

    assert!(cache.is_empty());
}

#[test]
fn test_private_cache_last_write_wins() {
    let cache = PrivateHandleCache::new();
    let first = private_handle_for(HashBinding::Sha1);
    let second = private_handle_for(HashBinding::Sha1);

    cache.insert(HashBinding::Sha1, first.clone()).unwrap();
    cache.insert(HashBinding::Sha1, second.clone()).unwrap();

    let cached = cache.get(HashBinding::Sha1).unwrap();
    assert!(cached.same_material(&second));
    assert!(!cached.same_material(&first));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_bindings_are_sorted() {
    let cache = PrivateHandleCache::new();
    for hash in [HashBinding::Sha512, HashBinding::Sha1, HashBinding::Sha384] {
        cache.insert(hash, private_handle_for(hash)).unwrap();
    }
    assert_eq!(
        cache.bindings(),
        vec![HashBinding::Sha1, HashBinding::Sha384, HashBinding::Sha512]
    );
}

#[test]
fn test_public_cache_uses_structural_equality() {
    let cache = PublicHandleCache::new();
    let handle = public_handle_for(HashBinding::Sha256);

    cache
        .insert(&public_key(), HashBinding::Sha256, handle.clone())
        .unwrap();

    // A separately decoded but byte-equal key finds the same entry
    let cached = cache.get(&public_key(), HashBinding::Sha256).unwrap();
    assert!(cached.same_material(&handle));
    assert!(cache.get(&public_key(), HashBinding::Sha512).is_none());

    let other = PortableRsaPublicKey::new(vec![0xc5, 0x01], vec![0x03]).unwrap();
    assert!(cache.get(&other, HashBinding::Sha256).is_none());

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_public_cache_rejects_private_handles() {
    let cache = PublicHandleCache::new();
    let result = cache.insert(
        &public_key(),
        HashBinding::Sha256,
        private_handle_for(HashBinding::Sha256),
    );
    assert!(matches!(result, Err(CryptoError::ProviderError { .. })));
    assert_eq!(cache.len(), 0);
}

fn public_key_with_exponent(exponent: u8) -> PortableRsaPublicKey {
    PortableRsaPublicKey::new(public_key().n().to_vec(), vec![exponent]).unwrap()
}

#[test]
fn test_public_cache_evicts_least_recently_used() {
    let cache = PublicHandleCache::with_capacity(2);
    let (first, second, third) = (
        public_key_with_exponent(3),
        public_key_with_exponent(5),
        public_key_with_exponent(7),
    );

    cache
        .insert(&first, HashBinding::Sha256, public_handle_for(HashBinding::Sha256))
        .unwrap();
    cache
        .insert(&second, HashBinding::Sha256, public_handle_for(HashBinding::Sha256))
        .unwrap();

    // Touching the older entry leaves the other one to be evicted
    assert!(cache.get(&first, HashBinding::Sha256).is_some());
    cache
        .insert(&third, HashBinding::Sha256, public_handle_for(HashBinding::Sha256))
        .unwrap();

    assert_eq!(cache.len(), 2);
    assert!(cache.get(&first, HashBinding::Sha256).is_some());
    assert!(cache.get(&second, HashBinding::Sha256).is_none());
    assert!(cache.get(&third, HashBinding::Sha256).is_some());
}

#[test]
fn test_public_cache_capacity_spans_bindings() {
    let cache = PublicHandleCache::with_capacity(2);
    for binding in HashBinding::ALL {
        cache
            .insert(&public_key(), binding, public_handle_for(binding))
            .unwrap();
    }

    assert_eq!(cache.len(), 2);
    assert!(cache.get(&public_key(), HashBinding::Sha384).is_some());
    assert!(cache.get(&public_key(), HashBinding::Sha512).is_some());
    assert!(cache.get(&public_key(), HashBinding::Sha1).is_none());
}

#[test]
fn test_public_cache_replacement_does_not_evict() {
    let cache = PublicHandleCache::with_capacity(2);
    let other = public_key_with_exponent(3);

    cache
        .insert(&public_key(), HashBinding::Sha256, public_handle_for(HashBinding::Sha256))
        .unwrap();
    cache
        .insert(&other, HashBinding::Sha256, public_handle_for(HashBinding::Sha256))
        .unwrap();
    cache
        .insert(&other, HashBinding::Sha256, public_handle_for(HashBinding::Sha256))
        .unwrap();

    assert_eq!(cache.len(), 2);
    assert!(cache.get(&public_key(), HashBinding::Sha256).is_some());
    assert_eq!(PublicHandleCache::<()>::with_capacity(0).capacity(), 1);
}

#[tokio::test]
async fn test_private_handle_imports_once_per_binding() {
    let provider = InstrumentedProvider::new(SoftwareProvider::new());
    let key_pair = RsaKeyPair::from_private_key(fixtures::private_key_with_crt());

    let first = private_handle(&provider, &key_pair, HashBinding::Sha256)
        .await
        .unwrap();
    let second = private_handle(&provider, &key_pair, HashBinding::Sha256)
        .await
        .unwrap();
    assert!(first.same_material(&second));
    assert_eq!(provider.counts().import, 1);

    let other = private_handle(&provider, &key_pair, HashBinding::Sha384)
        .await
        .unwrap();
    assert_eq!(other.tag().hash, HashBinding::Sha384);
    assert_eq!(provider.counts().import, 2);
    assert_eq!(
        key_pair.cached_bindings(),
        vec![HashBinding::Sha256, HashBinding::Sha384]
    );
}

#[tokio::test]
async fn test_public_handle_imports_once_per_key_and_binding() {
    let provider = InstrumentedProvider::new(SoftwareProvider::new());
    let cache = PublicHandleCache::new();

    public_handle(&provider, &cache, &public_key(), HashBinding::Sha256)
        .await
        .unwrap();
    public_handle(&provider, &cache, &public_key(), HashBinding::Sha256)
        .await
        .unwrap();
    assert_eq!(provider.counts().import, 1);

    let handle = public_handle(&provider, &cache, &public_key(), HashBinding::Sha1)
        .await
        .unwrap();
    assert_eq!(handle.role(), KeyRole::Public);
    assert_eq!(provider.counts().import, 2);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_failed_import_caches_nothing() {
    let provider = InstrumentedProvider::new(SoftwareProvider::new());
    let cache = PublicHandleCache::new();
    let bogus = PortableRsaPublicKey::new(public_key().n().to_vec(), vec![0x01]).unwrap();

    let result = public_handle(&provider, &cache, &bogus, HashBinding::Sha256).await;
    assert!(result.is_err());
    assert!(cache.is_empty());
    assert_eq!(provider.counts().import, 1);
}
