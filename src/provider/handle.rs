use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::hash::HashBinding;

/// Operations a provider handle may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyUsage {
    /// Sign data
    Sign,

    /// Verify signatures
    Verify,
}

impl KeyUsage {
    /// JWK `key_ops` name
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyUsage::Sign => "sign",
            KeyUsage::Verify => "verify",
        }
    }
}

/// Whether a handle refers to private or public material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// Private material, sign-capable
    Private,

    /// Public material, verify-capable
    Public,
}

impl KeyRole {
    /// The only usage this role supports
    pub fn usage(&self) -> KeyUsage {
        match self {
            KeyRole::Private => KeyUsage::Sign,
            KeyRole::Public => KeyUsage::Verify,
        }
    }
}

/// The `(algorithm, hash)` binding a handle was created under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleTag {
    pub algorithm: &'static str,
    pub hash: HashBinding,
}

impl fmt::Display for HandleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.algorithm, self.hash)
    }
}

/// Opaque reference to key material owned by a provider
///
/// The material itself is the provider's associated key type and is shared, so cloning a
/// handle is cheap and never copies key material. The material is released when the last
/// clone is dropped.
pub struct ProviderHandle<K> {
    key: Arc<K>,
    tag: HandleTag,
    role: KeyRole,
    extractable: bool,
    usages: Vec<KeyUsage>,
}

impl<K> ProviderHandle<K> {
    pub fn new(
        key: K,
        tag: HandleTag,
        role: KeyRole,
        extractable: bool,
        usages: Vec<KeyUsage>,
    ) -> Self {
        Self {
            key: Arc::new(key),
            tag,
            role,
            extractable,
            usages,
        }
    }

    /// Provider-side key material. Only the provider that created the handle should look.
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn tag(&self) -> HandleTag {
        self.tag
    }

    pub fn role(&self) -> KeyRole {
        self.role
    }

    pub fn is_extractable(&self) -> bool {
        self.extractable
    }

    pub fn usages(&self) -> &[KeyUsage] {
        &self.usages
    }

    /// Whether the handle may be used for `usage`
    pub fn allows(&self, usage: KeyUsage) -> bool {
        self.role.usage() == usage && self.usages.contains(&usage)
    }

    /// Whether both handles refer to the same provider-side material
    pub fn same_material(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.key, &other.key)
    }
}

impl<K> Clone for ProviderHandle<K> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            tag: self.tag,
            role: self.role,
            extractable: self.extractable,
            usages: self.usages.clone(),
        }
    }
}

impl<K> fmt::Debug for ProviderHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("tag", &self.tag)
            .field("role", &self.role)
            .field("extractable", &self.extractable)
            .field("usages", &self.usages)
            .finish()
    }
}

/// Private and public handles of one key pair, always sharing one tag
pub struct KeyPairHandle<K> {
    private: ProviderHandle<K>,
    public: ProviderHandle<K>,
}

impl<K> KeyPairHandle<K> {
    /// Pair two handles
    ///
    /// # Returns
    ///
    /// The pair, or `ProviderError` if the roles are wrong or the tags differ
    pub fn new(private: ProviderHandle<K>, public: ProviderHandle<K>) -> CryptoResult<Self> {
        if private.role() != KeyRole::Private || public.role() != KeyRole::Public {
            return Err(CryptoError::provider_error(
                "generate_key_pair",
                &format!(
                    "expected private/public handles, got {:?}/{:?}",
                    private.role(),
                    public.role()
                ),
                error_codes::PROVIDER_CONTRACT_VIOLATION,
            ));
        }

        if private.tag() != public.tag() {
            return Err(CryptoError::provider_error(
                "generate_key_pair",
                &format!(
                    "private handle tagged {} but public handle tagged {}",
                    private.tag(),
                    public.tag()
                ),
                error_codes::PROVIDER_CONTRACT_VIOLATION,
            ));
        }

        Ok(Self { private, public })
    }

    pub fn private(&self) -> &ProviderHandle<K> {
        &self.private
    }

    pub fn public(&self) -> &ProviderHandle<K> {
        &self.public
    }

    pub fn tag(&self) -> HandleTag {
        self.private.tag()
    }
}

impl<K> Clone for KeyPairHandle<K> {
    fn clone(&self) -> Self {
        Self {
            private: self.private.clone(),
            public: self.public.clone(),
        }
    }
}

impl<K> fmt::Debug for KeyPairHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairHandle")
            .field("tag", &self.tag())
            .field("private_extractable", &self.private.is_extractable())
            .finish()
    }
}
