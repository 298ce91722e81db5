// Known-answer vectors for RSASSA-PKCS1-v1_5
// Generated with an independent implementation (pyca/cryptography) from the fixture key in
// tests/common, so they check interoperability rather than self-consistency.

pub mod rsassa;
