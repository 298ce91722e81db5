/*!
 * Portable RSA key model
 *
 * Provider-independent RSA key material and its JWK exchange encoding.
 */

mod portable;
pub mod jwk;

pub use jwk::RsaJwk;
pub use portable::{PortableKey, PortableRsaPrivateKey, PortableRsaPublicKey};

#[cfg(test)]
pub(crate) mod fixtures;
