use crate::backends::{BackendKind, PortableBackend, ScryptBackend};
use crate::error::{BackendLoadError, Result, ScryptError};
use crate::params::ScryptParams;
use crate::scrypt_config::BACKEND_ENV_VAR;
use crate::validate::validate;
use std::fmt;
use std::sync::{Arc, OnceLock};
use zeroize::{Zeroize, Zeroizing};

static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();

/// One scrypt derivation: password, salt, output length and parameters.
///
/// The password buffer is zeroized on drop.
#[derive(Clone)]
pub struct DerivationRequest {
    password: Zeroizing<Vec<u8>>,
    salt: Vec<u8>,
    keylen: usize,
    params: ScryptParams,
}

impl DerivationRequest {
    #[must_use]
    pub fn new<P: AsRef<[u8]>, S: AsRef<[u8]>>(
        password: P,
        salt: S,
        keylen: usize,
        params: ScryptParams,
    ) -> Self {
        DerivationRequest {
            password: Zeroizing::new(password.as_ref().to_vec()),
            salt: salt.as_ref().to_vec(),
            keylen,
            params,
        }
    }

    #[inline]
    #[must_use]
    pub fn password(&self) -> &[u8] {
        &self.password
    }

    #[inline]
    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    #[inline]
    #[must_use]
    pub fn keylen(&self) -> usize {
        self.keylen
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &ScryptParams {
        &self.params
    }
}

impl fmt::Debug for DerivationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationRequest")
            .field("salt_len", &self.salt.len())
            .field("keylen", &self.keylen)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Validates derivation requests and runs them on one backend.
///
/// Most callers use [`Dispatcher::global`], which picks the best available
/// backend once per process. [`Dispatcher::with_backend`] pins a specific one.
///
/// # Examples
///
/// ```
/// use scrypt_shim::{BackendKind, DerivationRequest, Dispatcher, ScryptParams};
///
/// let dispatcher = Dispatcher::with_backend(BackendKind::Portable).unwrap();
/// let request = DerivationRequest::new("pwd", "salt", 32, ScryptParams::new(16, 1, 1, 32 << 20));
/// let key = dispatcher.derive(&request).unwrap();
/// assert_eq!(key.len(), 32);
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    backend: Arc<dyn ScryptBackend>,
}

impl Dispatcher {
    /// The process-wide dispatcher.
    ///
    /// The backend is resolved on first use and reused afterwards; concurrent
    /// first calls resolve it once.
    pub fn global() -> &'static Dispatcher {
        GLOBAL.get_or_init(Dispatcher::detect)
    }

    /// Resolves a backend without touching the process-wide cache.
    ///
    /// Honours the `SCRYPT_SHIM_BACKEND` preference, then walks
    /// [`BackendKind::PRIORITY`]. Load failures are logged and skipped.
    pub fn detect() -> Self {
        Self::from_backend(resolve_backend(preferred_backend()))
    }

    /// Uses exactly the given backend kind.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`BackendLoadError`] if it cannot be loaded.
    pub fn with_backend(kind: BackendKind) -> std::result::Result<Self, BackendLoadError> {
        Ok(Self::from_backend(kind.load()?))
    }

    #[must_use]
    pub fn from_backend(backend: Arc<dyn ScryptBackend>) -> Self {
        Dispatcher { backend }
    }

    #[inline]
    #[must_use]
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Validates the request and derives the key on the calling thread.
    ///
    /// # Errors
    ///
    /// Parameter errors from [`validate`]; [`ScryptError::ResourceExhausted`]
    /// when the key buffer or working set cannot be allocated within
    /// `max_memory`; [`ScryptError::Backend`] for any other backend failure.
    pub fn derive(&self, request: &DerivationRequest) -> Result<Vec<u8>> {
        let params = validate(request.keylen, &request.params)?;

        let mut key = Vec::new();
        key.try_reserve_exact(request.keylen)
            .map_err(|_| ScryptError::ResourceExhausted {
                required: request.keylen as u128,
                max_memory: params.max_memory(),
            })?;
        key.resize(request.keylen, 0);

        match self
            .backend
            .derive(&request.password, &request.salt, &params, &mut key)
        {
            Ok(()) => Ok(key),
            Err(err) => {
                key.zeroize();
                Err(reconcile(err, request.keylen, &request.params))
            }
        }
    }

    /// Derives on Tokio's blocking pool so the calling task is not blocked.
    ///
    /// Parameter errors are returned before anything is scheduled. Dropping
    /// the returned future does not cancel a derivation already running.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn derive_async(&self, request: DerivationRequest) -> Result<Vec<u8>> {
        validate(request.keylen, &request.params)?;
        let dispatcher = self.clone();
        tokio::task::spawn_blocking(move || dispatcher.derive(&request))
            .await
            .map_err(|e| ScryptError::TaskFailed(e.to_string()))?
    }
}

/// Maps a backend failure to the error reported to the caller.
///
/// Backends may run their own bounds checks with their own messages; if the
/// parameters are invalid the canonical validation error wins. Resource
/// exhaustion is passed through untouched.
fn reconcile(err: ScryptError, keylen: usize, params: &ScryptParams) -> ScryptError {
    if matches!(err, ScryptError::ResourceExhausted { .. }) {
        return err;
    }
    match validate(keylen, params) {
        Err(canonical) => canonical,
        Ok(_) => err,
    }
}

fn preferred_backend() -> Option<BackendKind> {
    let value = std::env::var(BACKEND_ENV_VAR).ok()?;
    match value.parse() {
        Ok(kind) => Some(kind),
        Err(err) => {
            log::warn!("ignoring {BACKEND_ENV_VAR}: {err}");
            None
        }
    }
}

/// Loads the first usable backend, starting with `preferred` if given.
fn resolve_backend(preferred: Option<BackendKind>) -> Arc<dyn ScryptBackend> {
    resolve_backend_with(preferred, BackendKind::is_available, BackendKind::load)
}

/// Walks the candidates in order, skipping kinds for which `available` is
/// false and logging each failed `load`. Falls back to the portable backend.
fn resolve_backend_with<A, L>(
    preferred: Option<BackendKind>,
    available: A,
    load: L,
) -> Arc<dyn ScryptBackend>
where
    A: Fn(BackendKind) -> bool,
    L: Fn(BackendKind) -> std::result::Result<Arc<dyn ScryptBackend>, BackendLoadError>,
{
    let candidates: Vec<BackendKind> = preferred
        .into_iter()
        .chain(
            BackendKind::PRIORITY
                .into_iter()
                .filter(|kind| Some(*kind) != preferred),
        )
        .filter(|kind| available(*kind))
        .collect();

    for (i, kind) in candidates.iter().enumerate() {
        match load(*kind) {
            Ok(backend) => {
                log::debug!("using {kind} scrypt backend");
                return backend;
            }
            Err(err) => {
                let next = candidates.get(i + 1).copied().unwrap_or(BackendKind::Portable);
                log::warn!("{err}");
                log::warn!("{next} scrypt backend will be used instead");
            }
        }
    }

    Arc::new(PortableBackend)
}
