//! scrypt configuration constants
//!
//! This module centralizes the default parameters and the RFC 7914 bounds
//! used by normalization and validation.

/// Default CPU/memory cost (N)
pub(crate) const DEFAULT_COST: u64 = 16_384;

/// Default block size (r)
pub(crate) const DEFAULT_BLOCK_SIZE: u64 = 8;

/// Default parallelization (p)
pub(crate) const DEFAULT_PARALLELIZATION: u64 = 1;

/// Default working-set ceiling in bytes (32 MiB)
pub(crate) const DEFAULT_MAX_MEMORY: u64 = 32 << 20;

/// Upper bound for the derived key length: (2^32 - 1) * 32
pub(crate) const MAX_KEYLEN: u64 = ((1u64 << 32) - 1) * 32;

/// Numerator of the parallelization bound: p <= ((2^32 - 1) * 32) / (128 * r)
pub(crate) const MAX_PARALLELIZATION_NUMERATOR: u128 = MAX_KEYLEN as u128;

/// Bytes per scrypt block unit (128 * r)
pub(crate) const BLOCK_UNIT: u64 = 128;

/// Environment variable naming the preferred first backend
pub const BACKEND_ENV_VAR: &str = "SCRYPT_SHIM_BACKEND";
