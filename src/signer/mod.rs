/*!
 * RSASSA-PKCS1-v1_5 key pairs, signatures and the sign/verify orchestrator
 *
 * `RsaSsaPkcs1v15` is bound to one hash at construction. It generates and imports key pairs,
 * resolves provider handles through the cache module, and drives the provider's sign and verify
 * primitives.
 */

mod keypair;
pub(crate) mod lifecycle;
mod rsassa;
mod signature;

pub use keypair::RsaKeyPair;
pub use rsassa::RsaSsaPkcs1v15;
pub use signature::Signature;
