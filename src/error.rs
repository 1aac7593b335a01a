use crate::backends::BackendKind;
use std::fmt;
use thiserror::Error;

/// A scrypt parameter that is checked for being a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Cost,
    BlockSize,
    Parallelization,
    Keylen,
    MaxMemory,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Param::Cost => "N (cost)",
            Param::BlockSize => "r (blockSize)",
            Param::Parallelization => "p (parallelization)",
            Param::Keylen => "keylen",
            Param::MaxMemory => "maxmem",
        };
        f.write_str(name)
    }
}

/// The RFC 7914 section 2 bound that a parameter set violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeViolation {
    Cost,
    Parallelization,
    Keylen,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            RangeViolation::Cost => {
                "N (cost) must be larger than 1, a power of 2, and less than 2^(128 * r / 8)"
            }
            RangeViolation::Parallelization => {
                "p (parallelization) must be less than or equal to ((2^32-1) * 32) / (128 * r)"
            }
            RangeViolation::Keylen => "keylen must be less than or equal to (2^32 - 1) * 32",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Error)]
pub enum ScryptError {
    #[error("cannot specify both {long} and {short}")]
    ConflictingAlias {
        long: &'static str,
        short: &'static str,
    },

    #[error("{param} must be a positive integer. See https://tools.ietf.org/html/rfc7914#section-2")]
    InvalidParameter { param: Param },

    #[error("{0}. See https://tools.ietf.org/html/rfc7914#section-2")]
    RangeConstraint(RangeViolation),

    #[error("scrypt needs {required} bytes of memory but maxmem is {max_memory}")]
    ResourceExhausted { required: u128, max_memory: u64 },

    #[error("{backend} scrypt backend failed: {reason}")]
    Backend { backend: BackendKind, reason: String },

    #[error("Invalid scrypt options: {0}")]
    InvalidOptions(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Derivation task failed: {0}")]
    TaskFailed(String),
}

impl ScryptError {
    /// Returns `true` for errors caused by the caller's configuration
    /// rather than by a backend or the runtime.
    #[inline]
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            ScryptError::ConflictingAlias { .. }
                | ScryptError::InvalidParameter { .. }
                | ScryptError::RangeConstraint(_)
                | ScryptError::InvalidOptions(_)
                | ScryptError::SerializationError(_)
        )
    }
}

/// A backend was compiled in but could not be initialised.
///
/// Load errors are recovered by the dispatcher, which falls through to the
/// next backend in priority order; they never reach callers of the derive API.
#[derive(Debug, Error)]
#[error("failed to load {backend} scrypt backend: {reason}")]
pub struct BackendLoadError {
    pub backend: BackendKind,
    pub reason: String,
}

pub type Result<T> = std::result::Result<T, ScryptError>;
