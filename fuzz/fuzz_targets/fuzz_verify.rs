#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use futures::executor::block_on;
use libfuzzer_sys::fuzz_target;
use rsassa::{HashBinding, PortableRsaPublicKey, RsaSsaPkcs1v15, Signature, SoftwareProvider};

#[derive(Arbitrary, Debug)]
struct VerifyFuzzInput {
    hash: u8,
    modulus: Vec<u8>,
    exponent: Vec<u8>,
    signature: Vec<u8>,
    message: Vec<u8>,
}

fuzz_target!(|input: VerifyFuzzInput| {
    let hash = HashBinding::ALL[input.hash as usize % HashBinding::ALL.len()];
    let Ok(public_key) = PortableRsaPublicKey::new(input.modulus, input.exponent) else {
        return;
    };

    // Arbitrary keys and signatures may be rejected or verify false, but never panic
    let verifier = RsaSsaPkcs1v15::new(Arc::new(SoftwareProvider::new()), hash);
    let signature = Signature::new(input.signature, public_key);
    let _ = block_on(verifier.verify(&input.message, &signature));
});
