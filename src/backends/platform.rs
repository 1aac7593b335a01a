//! scrypt backend on the pure Rust `scrypt` crate.

use super::{backend_error, BackendKind, ScryptBackend};
use crate::error::Result;
use crate::params::ScryptParams;

/// scrypt through the RustCrypto `scrypt` crate.
///
/// The crate takes `log2(N)` and 32-bit `r` and `p`, and runs its own range
/// checks. Parameters it cannot represent (N not a power of two, `r` or `p`
/// above `u32::MAX`) fail with [`ScryptError::Backend`](crate::ScryptError::Backend).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformBackend;

impl ScryptBackend for PlatformBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Platform
    }

    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ScryptParams,
        output: &mut [u8],
    ) -> Result<()> {
        params.check_memory()?;

        let n = params.cost();
        if !n.is_power_of_two() {
            return Err(backend_error(
                BackendKind::Platform,
                format!("N must be a power of 2, got {n}"),
            ));
        }
        let log_n = n.trailing_zeros() as u8;
        let r = u32::try_from(params.block_size())
            .map_err(|_| backend_error(BackendKind::Platform, "r does not fit in 32 bits"))?;
        let p = u32::try_from(params.parallelization())
            .map_err(|_| backend_error(BackendKind::Platform, "p does not fit in 32 bits"))?;

        // `len` only matters for PHC string output, not for raw derivation
        let scrypt_params = scrypt::Params::new(log_n, r, p, scrypt::Params::RECOMMENDED_LEN)
            .map_err(|e| {
                backend_error(BackendKind::Platform, format!("Invalid scrypt params: {e}"))
            })?;

        scrypt::scrypt(password, salt, &scrypt_params, output)
            .map_err(|e| {
                backend_error(BackendKind::Platform, format!("Scrypt derivation failed: {e}"))
            })
    }
}
