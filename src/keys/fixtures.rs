//! A fixed 1024-bit RSA key so unit tests do not pay for key generation

use super::PortableRsaPrivateKey;

pub(crate) const N: &str = "bc0d3fd49d00c42c6d8905585d86c1b9fde4b136863fdb64f13b0dc04ae4238cf5df6fd66aa89c2bb52df58188eeb5dfe3e98383506d449cf9efbec14604b178366872b2259ab2274e12bb237f950aadb59af22ad44b52a0dfae327567b40e9ebf731b55f15cc3f7acb512a6189c6bdd1dc2b273a453bf9f955c2f059885b507";
pub(crate) const E: &str = "010001";
pub(crate) const D: &str = "93198621c982acf1d7e9040e6072a61dd876490d4eacaaf0e6267c963bbf03f422ecda2e0e96c03b0c69dc0eaccf95e38203cb053027993175ed4cf920cd510851b5f5359b43c3b355a66f80edd90a79a22444e4fe57b0f519e95c9a25c2c8295bed7b615d8847b24df71f67a7ddd8f757bd1bf285ac70adabe39d0ba5bf85b1";
pub(crate) const P: &str = "ddd33f7041ed5a37809798e33dc73b99cb230e1c9bb877709bfd173571c93cd14152c06e5db50f80e3b5a9c095ff8c6a4d5c1383852ab6c440415332199e696f";
pub(crate) const Q: &str = "d905fb815dccdbd19d3e4e24b9a97414779464fc4d742757c7a82f69656d11cf8cb4241478606263e92a2b2a7f0b77e107d695d4d550715bc959d585d9aeb1e9";
pub(crate) const DP: &str = "31d1e31a9443f992239868a708d5f945d640be47a095b285a1131ba64e32f32cd02e04b804e5c8609b43cea7494906c14d3493d163142fce2ddc3e122f7ccb93";
pub(crate) const DQ: &str = "32042ef2a1ab94fdba3fa1c2d50738b97ed5b470716953a7e75bdb916eceb44c2121632f548ee21e249e935437f36cad7021046708c2815da60a0e2bcaff7801";
pub(crate) const QI: &str = "1f74fe0d21a799631599af96e7de048997521e449cd5cb9cdc59442bd18195c5a4168339f36eca9efb8c635c4bf05e776b953c0c043aa76ef590782e8caf6610";

fn bytes(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).expect("fixture is valid hex")
}

/// The fixture key without CRT parameters
pub(crate) fn private_key() -> PortableRsaPrivateKey {
    PortableRsaPrivateKey::new(bytes(N), bytes(E), bytes(D), bytes(P), bytes(Q))
        .expect("fixture key is complete")
}

/// The fixture key with CRT parameters
pub(crate) fn private_key_with_crt() -> PortableRsaPrivateKey {
    private_key()
        .with_crt_params(bytes(DP), bytes(DQ), bytes(QI))
        .expect("fixture CRT parameters are present")
}
