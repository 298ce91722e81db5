/*!
 * RSASSA-PKCS1-v1_5 key adaptation and signing
 *
 * This crate sits between a portable, provider-independent model of RSA key material and an
 * external cryptographic provider that only works with opaque key handles. It:
 *
 * - represents RSA keys as plain big-endian byte sequences
 * - converts them into provider handles through the JWK exchange format
 * - caches those handles so repeated signing and verification skip redundant imports
 * - drives the provider's sign and verify primitives under a fixed hash binding
 *
 * The supported hashes are SHA-1, SHA-256, SHA-384 and SHA-512. A handle created under one hash
 * is never used under another.
 *
 * `SoftwareProvider` performs the RSA mathematics in-process with the RustCrypto `rsa` crate;
 * any other engine can be plugged in by implementing `CryptoProvider`.
 */

/// Common error types
pub mod error;

/// Signer and provider configuration
pub mod config;

/// Hash bindings and provider algorithm identifiers
pub mod hash;

/// Portable key model and the JWK exchange format
pub mod keys;

/// Provider interface, handles and the software provider
pub mod provider;

/// Provider handle caches
pub mod cache;

/// Key pairs, signatures and the sign/verify orchestrator
pub mod signer;

pub use config::{SignerConfig, SoftwareProviderConfig};
pub use error::{CryptoError, CryptoResult};
pub use hash::HashBinding;
pub use keys::{PortableKey, PortableRsaPrivateKey, PortableRsaPublicKey, RsaJwk};
pub use provider::{CryptoProvider, InstrumentedProvider, SoftwareProvider};
pub use signer::{RsaKeyPair, RsaSsaPkcs1v15, Signature};

/// The types most callers need
pub mod prelude {
    pub use crate::provider::{
        CryptoProvider, ExchangeFormat, InstrumentedProvider, KeyUsage, ProviderCallCounts,
        SoftwareProvider,
    };
    pub use crate::CryptoError;
    pub use crate::CryptoResult;
    pub use crate::HashBinding;
    pub use crate::PortableKey;
    pub use crate::PortableRsaPrivateKey;
    pub use crate::PortableRsaPublicKey;
    pub use crate::RsaJwk;
    pub use crate::RsaKeyPair;
    pub use crate::RsaSsaPkcs1v15;
    pub use crate::Signature;
    pub use crate::SignerConfig;
    pub use crate::SoftwareProviderConfig;
}
