//! # scrypt-shim
//!
//! A uniform scrypt key derivation API over whichever backend is available:
//! OpenSSL (feature `native`), the RustCrypto `scrypt` crate (feature
//! `platform`, on by default) or the built-in portable implementation.
//!
//! Options are normalized from either long-form (`cost`, `blockSize`,
//! `parallelization`) or short-form (`N`, `r`, `p`) names and validated
//! against RFC 7914 before any backend runs, so every backend reports
//! parameter errors the same way.
//!
//! ## Example
//!
//! ```
//! use scrypt_shim::{scrypt_sync, UserOptions};
//!
//! let options = UserOptions::new().with_n(16).with_r(1).with_p(1);
//! let key = scrypt_sync("my_password", "my_salt", 32, Some(&options)).unwrap();
//! assert_eq!(key.len(), 32);
//!
//! let err = scrypt_sync("pwd", "salt", 32, Some(&UserOptions::new().with_cost(0))).unwrap_err();
//! assert!(err.is_usage_error());
//! ```

pub mod backends;
mod dispatch;
pub mod error;
pub mod params;
mod scrypt_config;
mod shim;
mod validate;

pub use backends::{BackendKind, ScryptBackend};
pub use dispatch::{DerivationRequest, Dispatcher};
pub use error::{BackendLoadError, Param, RangeViolation, Result, ScryptError};
pub use params::{ScryptParams, UserOptions};
pub use scrypt_config::BACKEND_ENV_VAR;
pub use shim::{scrypt, scrypt_sync, scrypt_with_callback};
pub use validate::validate;
