//! Run the encrypt/decrypt paths off the caller's thread.
//!
//! PBKDF2 at 100 000 iterations and a whole-file AEAD pass are both
//! CPU-bound.  An interactive caller hands owned inputs to a worker
//! thread and either waits on the returned [`Pending`] or drops it to
//! discard the result.  The primitives are not interruptible, so the
//! worker always runs to completion.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use zeroize::Zeroizing;

use crate::crypto::kdf::KdfParams;
use crate::errors::{DriveSealError, Result};

use super::seal::{self, SealedFile};

/// Handle to a crypto operation running on a worker thread.
pub struct Pending<T> {
    rx: Receiver<Result<T>>,
}

impl<T> Pending<T> {
    /// Block until the worker finishes.
    pub fn wait(self) -> Result<T> {
        self.rx.recv().unwrap_or_else(|_| Err(worker_lost()))
    }

    /// Return the result if the worker has finished, without blocking.
    pub fn try_result(&self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(worker_lost())),
        }
    }
}

/// Encrypt on a worker thread, optionally binding `file_id` as AAD.
pub fn spawn_encrypt(
    plaintext: Vec<u8>,
    password: Zeroizing<String>,
    params: KdfParams,
    file_id: Option<Vec<u8>>,
) -> Result<Pending<SealedFile>> {
    spawn("driveseal-encrypt", move || match file_id {
        Some(id) => seal::encrypt_bound(&plaintext, password.as_bytes(), &params, &id),
        None => seal::encrypt(&plaintext, password.as_bytes(), &params),
    })
}

/// Decrypt on a worker thread, optionally checking `file_id` as AAD.
pub fn spawn_decrypt(
    ciphertext: Vec<u8>,
    metadata_text: String,
    password: Zeroizing<String>,
    file_id: Option<Vec<u8>>,
) -> Result<Pending<Zeroizing<Vec<u8>>>> {
    spawn("driveseal-decrypt", move || match file_id {
        Some(id) => seal::decrypt_bound(&ciphertext, &metadata_text, password.as_bytes(), &id),
        None => seal::decrypt(&ciphertext, &metadata_text, password.as_bytes()),
    })
}

fn spawn<T, F>(name: &str, job: F) -> Result<Pending<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            // Receiver may already be gone; the result is then discarded.
            let _ = tx.send(job());
        })
        .map_err(|e| DriveSealError::WorkerFailed(format!("cannot spawn worker: {e}")))?;
    Ok(Pending { rx })
}

fn worker_lost() -> DriveSealError {
    DriveSealError::WorkerFailed("worker exited without a result".into())
}
