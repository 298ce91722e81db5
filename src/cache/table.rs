use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::DEFAULT_PUBLIC_CACHE_CAPACITY;
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::hash::{HashBinding, RSASSA_PKCS1_V1_5};
use crate::keys::PortableRsaPublicKey;
use crate::provider::{HandleTag, KeyRole, ProviderHandle};

/// Lock a cache table, recovering the data if a previous holder panicked
///
/// Every critical section is a single map read or write, so a poisoned table is still
/// consistent.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn expected_tag(binding: HashBinding) -> HandleTag {
    HandleTag {
        algorithm: RSASSA_PKCS1_V1_5,
        hash: binding,
    }
}

fn check_handle<K>(
    handle: &ProviderHandle<K>,
    role: KeyRole,
    binding: HashBinding,
) -> CryptoResult<()> {
    let expected = expected_tag(binding);
    if handle.role() != role || handle.tag() != expected {
        return Err(CryptoError::provider_error(
            "import_key",
            &format!(
                "requested a {:?} handle tagged {}, provider returned a {:?} handle tagged {}",
                role,
                expected,
                handle.role(),
                handle.tag()
            ),
            error_codes::PROVIDER_CONTRACT_VIOLATION,
        ));
    }
    Ok(())
}

/// Private handles of one key pair, one per hash binding
pub struct PrivateHandleCache<K> {
    entries: Mutex<HashMap<HashBinding, ProviderHandle<K>>>,
}

impl<K> PrivateHandleCache<K> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The cached private handle for `binding`, if any
    pub fn get(&self, binding: HashBinding) -> Option<ProviderHandle<K>> {
        lock(&self.entries)
            .get(&binding)
            .filter(|handle| {
                handle.role() == KeyRole::Private && handle.tag() == expected_tag(binding)
            })
            .cloned()
    }

    /// Cache `handle` under `binding`, replacing any previous entry
    ///
    /// # Returns
    ///
    /// `ProviderError` if the handle is not a private handle tagged with `binding`
    pub fn insert(&self, binding: HashBinding, handle: ProviderHandle<K>) -> CryptoResult<()> {
        check_handle(&handle, KeyRole::Private, binding)?;
        lock(&self.entries).insert(binding, handle);
        Ok(())
    }

    pub fn contains(&self, binding: HashBinding) -> bool {
        self.get(binding).is_some()
    }

    /// Bindings with a cached handle, in `HashBinding` order
    pub fn bindings(&self) -> Vec<HashBinding> {
        let mut bindings: Vec<HashBinding> = lock(&self.entries).keys().copied().collect();
        bindings.sort();
        bindings
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K> Default for PrivateHandleCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for PrivateHandleCache<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateHandleCache")
            .field("bindings", &self.bindings())
            .finish()
    }
}

struct PublicEntry<K> {
    handle: ProviderHandle<K>,
    last_used: u64,
}

struct PublicEntries<K> {
    by_binding: HashMap<HashBinding, HashMap<PortableRsaPublicKey, PublicEntry<K>>>,
    len: usize,
    clock: u64,
}

impl<K> PublicEntries<K> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .by_binding
            .iter()
            .flat_map(|(binding, by_key)| {
                by_key
                    .iter()
                    .map(move |(key, entry)| (entry.last_used, *binding, key))
            })
            .min_by_key(|(last_used, _, _)| *last_used)
            .map(|(_, binding, key)| (binding, key.clone()));

        if let Some((binding, key)) = oldest {
            if let Some(by_key) = self.by_binding.get_mut(&binding) {
                if by_key.remove(&key).is_some() {
                    self.len -= 1;
                    log::debug!("Evicted least recently used {} public handle", binding);
                }
                if by_key.is_empty() {
                    self.by_binding.remove(&binding);
                }
            }
        }
    }
}

/// Public handles keyed by the `(n, e)` bytes of the key and the hash binding
///
/// Public keys arrive with inbound signatures, so the table holds at most `capacity`
/// handles and evicts the least recently used one to make room.
pub struct PublicHandleCache<K> {
    entries: Mutex<PublicEntries<K>>,
    capacity: usize,
}

impl<K> PublicHandleCache<K> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_PUBLIC_CACHE_CAPACITY)
    }

    /// A cache holding at most `capacity` handles; a capacity of zero is treated as one
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(PublicEntries {
                by_binding: HashMap::new(),
                len: 0,
                clock: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The cached public handle for a structurally equal key under `binding`
    pub fn get(
        &self,
        public_key: &PortableRsaPublicKey,
        binding: HashBinding,
    ) -> Option<ProviderHandle<K>> {
        let mut entries = lock(&self.entries);
        let now = entries.tick();
        entries
            .by_binding
            .get_mut(&binding)
            .and_then(|by_key| by_key.get_mut(public_key))
            .filter(|entry| {
                entry.handle.role() == KeyRole::Public
                    && entry.handle.tag() == expected_tag(binding)
            })
            .map(|entry| {
                entry.last_used = now;
                entry.handle.clone()
            })
    }

    /// Cache `handle` for `public_key` under `binding`, replacing any previous entry
    ///
    /// A new entry past capacity evicts the least recently used handle.
    pub fn insert(
        &self,
        public_key: &PortableRsaPublicKey,
        binding: HashBinding,
        handle: ProviderHandle<K>,
    ) -> CryptoResult<()> {
        check_handle(&handle, KeyRole::Public, binding)?;

        let mut entries = lock(&self.entries);
        let present = entries
            .by_binding
            .get(&binding)
            .map_or(false, |by_key| by_key.contains_key(public_key));
        if !present && entries.len >= self.capacity {
            entries.evict_lru();
        }

        let last_used = entries.tick();
        let replaced = entries
            .by_binding
            .entry(binding)
            .or_default()
            .insert(public_key.clone(), PublicEntry { handle, last_used });
        if replaced.is_none() {
            entries.len += 1;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = lock(&self.entries);
        entries.by_binding.clear();
        entries.len = 0;
    }
}

impl<K> Default for PublicHandleCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for PublicHandleCache<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicHandleCache")
            .field("entries", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
