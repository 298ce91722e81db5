/*!
 * Hash binding resolution for RSASSA-PKCS1-v1_5
 *
 * PKCS#1 v1.5 embeds the digest algorithm identifier into every signature, so a key is
 * always used together with exactly one of a closed set of hash functions.
 */

mod binding;

pub use binding::*;
