//! Public derive entry points.
//!
//! All three shapes normalize the options, then hand one
//! [`DerivationRequest`] to the process-wide [`Dispatcher`].

use crate::dispatch::{DerivationRequest, Dispatcher};
use crate::error::{Result, ScryptError};
use crate::params::{normalize, UserOptions};
use crate::validate::validate;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

/// Derives `keylen` bytes from `password` and `salt`, blocking the caller.
///
/// `None` options use the defaults (`N = 16384, r = 8, p = 1, maxmem = 32 MiB`).
///
/// # Errors
///
/// Returns an error if the options name a field twice, the parameters fail
/// RFC 7914 validation, the working set exceeds `maxmem`, or the backend fails.
///
/// # Examples
///
/// ```
/// use scrypt_shim::{scrypt_sync, UserOptions};
///
/// let options = UserOptions::new().with_cost(1024).with_block_size(8).with_parallelization(16);
/// let key = scrypt_sync("password", "NaCl", 64, Some(&options)).unwrap();
/// assert_eq!(&key[..4], &[0xfd, 0xba, 0xbe, 0x1c]);
/// ```
pub fn scrypt_sync<P: AsRef<[u8]>, S: AsRef<[u8]>>(
    password: P,
    salt: S,
    keylen: usize,
    options: Option<&UserOptions>,
) -> Result<Vec<u8>> {
    let params = normalize(options)?;
    Dispatcher::global().derive(&DerivationRequest::new(password, salt, keylen, params))
}

/// Derives `keylen` bytes without blocking the calling task.
///
/// Configuration errors resolve the future with `Err` before any work is
/// scheduled. Must be awaited inside a Tokio runtime.
///
/// # Examples
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let key = scrypt_shim::scrypt("pwd", "salt", 32, None).await.unwrap();
/// assert_eq!(key.len(), 32);
/// # }
/// ```
pub async fn scrypt<P: AsRef<[u8]>, S: AsRef<[u8]>>(
    password: P,
    salt: S,
    keylen: usize,
    options: Option<&UserOptions>,
) -> Result<Vec<u8>> {
    let params = normalize(options)?;
    let request = DerivationRequest::new(password, salt, keylen, params);
    Dispatcher::global().derive_async(request).await
}

/// Derives `keylen` bytes on a background thread and hands the result to
/// `callback`.
///
/// The callback runs exactly once: on the caller's thread if the options are
/// rejected or no thread can be spawned, otherwise on the background thread
/// when the derivation finishes.
pub fn scrypt_with_callback<P, S, F>(
    password: P,
    salt: S,
    keylen: usize,
    options: Option<&UserOptions>,
    callback: F,
) where
    P: AsRef<[u8]>,
    S: AsRef<[u8]>,
    F: FnOnce(Result<Vec<u8>>) + Send + 'static,
{
    let params = match normalize(options) {
        Ok(params) => params,
        Err(err) => return callback(Err(err)),
    };
    let dispatcher = Dispatcher::global();
    if let Err(err) = validate(keylen, &params) {
        return callback(Err(err));
    }
    let request = DerivationRequest::new(password, salt, keylen, params);
    run_detached(
        |task| {
            thread::Builder::new()
                .name("scrypt-derive".to_string())
                .spawn(task)
                .map(drop)
        },
        move || dispatcher.derive(&request),
        callback,
    );
}

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs `job` through `spawn` and hands its result to `callback`.
///
/// If `spawn` fails the callback still runs, on the caller's thread, with
/// [`ScryptError::TaskFailed`].
fn run_detached<S, J, F>(spawn: S, job: J, callback: F)
where
    S: FnOnce(Task) -> io::Result<()>,
    J: FnOnce() -> Result<Vec<u8>> + Send + 'static,
    F: FnOnce(Result<Vec<u8>>) + Send + 'static,
{
    let slot = Arc::new(Mutex::new(Some(callback)));
    let worker_slot = Arc::clone(&slot);

    let spawned = spawn(Box::new(move || {
        let result = job();
        if let Some(callback) = take(&worker_slot) {
            callback(result);
        }
    }));

    if let Err(err) = spawned {
        if let Some(callback) = take(&slot) {
            callback(Err(ScryptError::TaskFailed(format!(
                "failed to spawn derivation thread: {err}"
            ))));
        }
    }
}

fn take<F>(slot: &Mutex<Option<F>>) -> Option<F> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}
