/*!
 * Provider handle caching
 *
 * Importing key material into a provider is expensive, so handles are cached per hash binding.
 * Private handles are cached inside the key pair that owns the material and are released with
 * it. Public handles are cached by value, keyed on the `(n, e)` bytes, because public keys
 * usually arrive freshly decoded alongside a signature. That table is bounded and evicts its
 * least recently used handle when full.
 *
 * A handle only enters a cache after the provider call that produced it has completed and the
 * handle's tag and role have been checked against the request.
 */

mod adapter;
mod table;

pub use adapter::{private_handle, public_handle};
pub use table::{PrivateHandleCache, PublicHandleCache};

pub(crate) use table::lock;

#[cfg(test)]
mod tests;
