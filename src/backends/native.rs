//! OpenSSL-based scrypt backend.

use super::{backend_error, BackendKind, ScryptBackend};
use crate::error::{BackendLoadError, Result};
use crate::params::ScryptParams;

/// RFC 7914 test vector 1: empty password and salt, N=16, r=1, p=1, dkLen=64.
const SELF_TEST_KEY: [u8; 64] = [
    0x77, 0xd6, 0x57, 0x62, 0x38, 0x65, 0x7b, 0x20, 0x3b, 0x19, 0xca, 0x42, 0xc1, 0x8a, 0x04,
    0x97, 0xf1, 0x6b, 0x48, 0x44, 0xe3, 0x07, 0x4a, 0xe8, 0xdf, 0xdf, 0xfa, 0x3f, 0xed, 0xe2,
    0x14, 0x42, 0xfc, 0xd0, 0x06, 0x9d, 0xed, 0x09, 0x48, 0xf8, 0x32, 0x6a, 0x75, 0x3a, 0x0f,
    0xc8, 0x1f, 0x17, 0xe8, 0xd3, 0xe0, 0xfb, 0x2e, 0x0d, 0x36, 0x28, 0xcf, 0x35, 0xe2, 0x0c,
    0x38, 0xd1, 0x89, 0x06,
];

/// scrypt through OpenSSL's `EVP_PBE_scrypt`.
///
/// Construct with [`NativeBackend::load`], which initialises OpenSSL and
/// runs a known-answer self test.
#[derive(Debug)]
pub struct NativeBackend {
    _private: (),
}

impl NativeBackend {
    /// Initialises OpenSSL and checks it against RFC 7914 test vector 1.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendLoadError`] if OpenSSL reports an error or derives
    /// the wrong key.
    pub fn load() -> std::result::Result<Self, BackendLoadError> {
        openssl::init();
        let mut key = [0u8; 64];
        openssl::pkcs5::scrypt(b"", b"", 16, 1, 1, 0, &mut key).map_err(|e| BackendLoadError {
            backend: BackendKind::Native,
            reason: e.to_string(),
        })?;
        if key != SELF_TEST_KEY {
            return Err(BackendLoadError {
                backend: BackendKind::Native,
                reason: "self test produced an unexpected key".to_string(),
            });
        }
        Ok(NativeBackend { _private: () })
    }
}

impl ScryptBackend for NativeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ScryptParams,
        output: &mut [u8],
    ) -> Result<()> {
        params.check_memory()?;
        openssl::pkcs5::scrypt(
            password,
            salt,
            params.cost(),
            params.block_size(),
            params.parallelization(),
            params.max_memory(),
            output,
        )
        .map_err(|e| backend_error(BackendKind::Native, e))
    }
}
