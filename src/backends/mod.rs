use crate::error::{BackendLoadError, Result, ScryptError};
use crate::params::ScryptParams;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "native")]
pub mod native;
#[cfg(feature = "platform")]
pub mod platform;
pub mod portable;

#[cfg(feature = "native")]
pub use native::NativeBackend;
#[cfg(feature = "platform")]
pub use platform::PlatformBackend;
pub use portable::PortableBackend;

/// A scrypt implementation the dispatcher can delegate to.
///
/// Implementations receive parameters that already passed
/// [`validate`](crate::validate), but may still reject them with their own
/// checks. Every implementation must fail with
/// [`ScryptError::ResourceExhausted`] before allocating when the working set
/// exceeds [`ScryptParams::max_memory`].
///
/// # Examples
///
/// ```
/// use scrypt_shim::backends::{PortableBackend, ScryptBackend};
/// use scrypt_shim::ScryptParams;
///
/// let params = ScryptParams::new(16, 1, 1, 32 << 20);
/// let mut key = [0u8; 32];
/// PortableBackend.derive(b"password", b"salt", &params, &mut key).unwrap();
/// ```
pub trait ScryptBackend: Send + Sync + fmt::Debug {
    /// Which backend this is
    fn kind(&self) -> BackendKind;

    /// Fills `output` with the scrypt derivation of `password` and `salt`.
    ///
    /// # Errors
    ///
    /// Returns [`ScryptError::ResourceExhausted`] when the memory ceiling is
    /// too low, or [`ScryptError::Backend`] when the underlying library fails.
    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ScryptParams,
        output: &mut [u8],
    ) -> Result<()>;
}

/// The backends known to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// OpenSSL `EVP_PBE_scrypt` (feature `native`)
    Native,
    /// RustCrypto `scrypt` crate (feature `platform`)
    Platform,
    /// Built-in implementation, always available
    Portable,
}

impl BackendKind {
    /// Selection order, highest priority first.
    pub const PRIORITY: [BackendKind; 3] = [
        BackendKind::Native,
        BackendKind::Platform,
        BackendKind::Portable,
    ];

    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BackendKind::Native => "native",
            BackendKind::Platform => "platform",
            BackendKind::Portable => "portable",
        }
    }

    /// Returns `true` if the backend is compiled into this build.
    #[inline]
    #[must_use]
    pub const fn is_available(self) -> bool {
        match self {
            BackendKind::Native => cfg!(feature = "native"),
            BackendKind::Platform => cfg!(feature = "platform"),
            BackendKind::Portable => true,
        }
    }

    /// Initialises the backend.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendLoadError`] if the backend is not compiled in or
    /// fails its initialisation. Loading [`BackendKind::Portable`] never fails.
    pub fn load(self) -> std::result::Result<Arc<dyn ScryptBackend>, BackendLoadError> {
        match self {
            BackendKind::Native => load_native(),
            BackendKind::Platform => load_platform(),
            BackendKind::Portable => Ok(Arc::new(PortableBackend)),
        }
    }
}

#[cfg(feature = "native")]
fn load_native() -> std::result::Result<Arc<dyn ScryptBackend>, BackendLoadError> {
    Ok(Arc::new(NativeBackend::load()?))
}

#[cfg(not(feature = "native"))]
fn load_native() -> std::result::Result<Arc<dyn ScryptBackend>, BackendLoadError> {
    Err(not_compiled(BackendKind::Native))
}

#[cfg(feature = "platform")]
fn load_platform() -> std::result::Result<Arc<dyn ScryptBackend>, BackendLoadError> {
    Ok(Arc::new(PlatformBackend))
}

#[cfg(not(feature = "platform"))]
fn load_platform() -> std::result::Result<Arc<dyn ScryptBackend>, BackendLoadError> {
    Err(not_compiled(BackendKind::Platform))
}

#[cfg(not(all(feature = "native", feature = "platform")))]
fn not_compiled(backend: BackendKind) -> BackendLoadError {
    BackendLoadError {
        backend,
        reason: format!("not compiled in (enable the `{backend}` feature)"),
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = ScryptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(BackendKind::Native),
            "platform" => Ok(BackendKind::Platform),
            "portable" => Ok(BackendKind::Portable),
            other => Err(ScryptError::InvalidOptions(format!(
                "unknown scrypt backend: {other}"
            ))),
        }
    }
}

/// Builds a [`ScryptError::Backend`] for `backend`.
pub(crate) fn backend_error(backend: BackendKind, reason: impl fmt::Display) -> ScryptError {
    ScryptError::Backend {
        backend,
        reason: reason.to_string(),
    }
}
