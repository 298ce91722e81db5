use rsassa::HashBinding;
use serde::{Deserialize, Serialize};

/// One signature over `message` by the common fixture key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsassaTestVector {
    pub hash: HashBinding,
    pub message: Vec<u8>,
    pub signature: Vec<u8>,
}

fn vector(hash: HashBinding, signature_hex: &str) -> RsassaTestVector {
    RsassaTestVector {
        hash,
        message: b"abc".to_vec(),
        signature: hex::decode(signature_hex).expect("vector is valid hex"),
    }
}

/// Signatures over "abc" under every supported hash
pub fn standard_test_vectors() -> Vec<RsassaTestVector> {
    vec![
        vector(
            HashBinding::Sha1,
            "6b51455fc0f84149e8c60285a647d9c4f7c6d3e0ff5f851442131b47a3aa2ae1adfd6c61fb7f6f13240f37af25f5f82dc5f6113d5d516c5bbfb03b7724804bbc8784165de8e61409960c2f34bab9353c9ff12a105ec8e7740d5696e06e6d1530e0b7afdbac38cc124e611dc5f65dbfb93a9ab875239abe70ca911d86c5af4dd0",
        ),
        vector(
            HashBinding::Sha256,
            "455053a06a17c668ae706324bb5a6b528a6959e9c409034f85195b45d4bbef7fa95665130f8531efe525ebad7e5da8b39b34c0a910a57f255073b993091d550964cb07b5481507b9902491791aa959ea29f5845c5fc202c75c4be5c8d7c515000fa3284e8cd0198a2be62094050733685cd096188bcf9671571f9db803005d3a",
        ),
        vector(
            HashBinding::Sha384,
            "791184584733bd98a9264a9fbfec98997dcb0a9b81b1bd5957291a56368f1b33c682a38c1b0d68cf3388ca15962333b6d6b172090707984f3ef311d0f16f532cb03fb00184bc563b04cd70c77b51c16e9493d693f66cccffc8dfbd010222a50e57cd8ba9a9bc57eb06b13e92f7306a9e7b4a0056e5fbf2508823d1cee993f81a",
        ),
        vector(
            HashBinding::Sha512,
            "608df2f7bc5aaeeb38faff3a4028dece4760ef7cd7395775c48c3c2e3785717bff3e6a04fffe73a01dea096bcbdef14409648fb626c38f497d073410234f96181293f92a2171e2aebe03fc407b92bc49aa10e41439a20eb4886b547a608c06e0d289b369629a9d005a50898638731b5399bc97a08a1e6e6cc9a12769c023b3ae",
        ),
    ]
}
