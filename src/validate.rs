//! RFC 7914 section 2 parameter checks.
//!
//! Every derive path runs [`validate`] before a backend is touched, and again
//! after a backend failure, so callers see the same error whichever backend
//! is active.

use crate::error::{Param, RangeViolation, Result, ScryptError};
use crate::params::ScryptParams;
use crate::scrypt_config::{BLOCK_UNIT, MAX_KEYLEN, MAX_PARALLELIZATION_NUMERATOR};

/// Checks `params` and `keylen` against the scrypt constraints.
///
/// Checks run in a fixed order and the first failure is returned:
///
/// 1. N, r, p and keylen are positive
/// 2. N is even and `N < 2^(128 * r / 8)`
/// 3. `p <= ((2^32 - 1) * 32) / (128 * r)`
/// 4. `keylen <= (2^32 - 1) * 32`
///
/// The parity check only rejects odd N; even values that are not powers of
/// two pass. `max_memory` is not checked here.
///
/// # Examples
///
/// ```
/// use scrypt_shim::{validate, ScryptError, ScryptParams};
///
/// assert!(validate(64, &ScryptParams::DEFAULT).is_ok());
///
/// let odd = ScryptParams::new(1023, 8, 1, 32 << 20);
/// assert!(matches!(validate(64, &odd), Err(ScryptError::RangeConstraint(_))));
/// ```
pub fn validate(keylen: usize, params: &ScryptParams) -> Result<ScryptParams> {
    let positive = [
        (params.cost, Param::Cost),
        (params.block_size, Param::BlockSize),
        (params.parallelization, Param::Parallelization),
        (keylen as u64, Param::Keylen),
    ];
    if let Some((_, param)) = positive.iter().find(|(value, _)| *value == 0) {
        return Err(ScryptError::InvalidParameter { param: *param });
    }

    if params.cost % 2 != 0 || cost_exceeds_block_bound(params.cost, params.block_size) {
        return Err(ScryptError::RangeConstraint(RangeViolation::Cost));
    }

    if parallelization_exceeds_bound(params.parallelization, params.block_size) {
        return Err(ScryptError::RangeConstraint(RangeViolation::Parallelization));
    }

    if u64::try_from(keylen).map_or(true, |keylen| keylen > MAX_KEYLEN) {
        return Err(ScryptError::RangeConstraint(RangeViolation::Keylen));
    }

    Ok(*params)
}

/// `N >= 2^(128 * r / 8)`. For `r >= 4` the bound is at least `2^64` and no
/// `u64` reaches it.
fn cost_exceeds_block_bound(cost: u64, block_size: u64) -> bool {
    match block_size.checked_mul(16) {
        Some(exponent) if exponent < u64::from(u64::BITS) => cost >= 1u64 << exponent,
        _ => false,
    }
}

/// `p > ((2^32 - 1) * 32) / (128 * r)`, compared exactly as `p * 128 * r > (2^32 - 1) * 32`.
fn parallelization_exceeds_bound(parallelization: u64, block_size: u64) -> bool {
    let divisor = u128::from(BLOCK_UNIT) * u128::from(block_size);
    u128::from(parallelization)
        .checked_mul(divisor)
        .map_or(true, |product| product > MAX_PARALLELIZATION_NUMERATOR)
}
