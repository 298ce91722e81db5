#![no_main]

use arbitrary::Arbitrary;
use futures::executor::block_on;
use libfuzzer_sys::fuzz_target;
use rsassa::keys::RsaJwk;
use rsassa::provider::{CryptoProvider, ExchangeFormat, KeyImportParams, KeyUsage};
use rsassa::{HashBinding, SoftwareProvider};

#[derive(Arbitrary, Debug)]
struct JwkFuzzInput {
    hash: u8,
    json: String,
}

fuzz_target!(|input: JwkFuzzInput| {
    let hash = HashBinding::ALL[input.hash as usize % HashBinding::ALL.len()];

    // Malformed documents must fail cleanly, never panic
    let Ok(jwk) = RsaJwk::from_json(&input.json) else {
        return;
    };
    let _ = jwk.to_public_key();
    let _ = jwk.to_private_key();

    let usages = if jwk.is_private() {
        vec![KeyUsage::Sign]
    } else {
        vec![KeyUsage::Verify]
    };
    let params = KeyImportParams::rsassa(hash, false, usages);
    let provider = SoftwareProvider::new();
    let _ = block_on(provider.import_key(ExchangeFormat::Jwk, &jwk, &params));
});
