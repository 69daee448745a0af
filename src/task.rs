//! Running field construction off the caller's thread.
//!
//! Searching for a modulus is the only step that can take noticeable time,
//! so front ends can hand it to a worker thread (or, with the `async`
//! feature, to tokio's blocking pool) and keep a [`CancelToken`] to abandon
//! it when the user picks a different field.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::warn;

use crate::error::{FieldError, Result};
use crate::gf::GaloisField;

/// Shared cancellation flag checked by the irreducible search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; every clone observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Handle to a field construction running on a worker thread.
#[derive(Debug)]
pub struct ConstructionTask {
    token: CancelToken,
    handle: JoinHandle<()>,
}

impl ConstructionTask {
    /// Asks the search to stop; the callback then receives
    /// [`FieldError::Cancelled`] unless the field was already built.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns the token shared with the worker.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Returns `true` once the worker has finished, callback included.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the worker to finish.
    ///
    /// Returns [`FieldError::InternalInvariantViolation`] if the worker
    /// panicked.
    pub fn join(self) -> Result<()> {
        self.handle.join().map_err(|_| {
            FieldError::InternalInvariantViolation("field construction worker panicked".into())
        })
    }
}

/// Constructs GF(p^n) on a worker thread and passes the outcome to
/// `on_complete` exactly once.
pub fn spawn_construct<F>(p: u64, n: usize, on_complete: F) -> ConstructionTask
where
    F: FnOnce(Result<GaloisField>) + Send + 'static,
{
    let token = CancelToken::new();
    let worker_token = token.clone();
    let handle = thread::spawn(move || {
        let outcome = GaloisField::construct_cancellable(p, n, &worker_token);
        if let Err(FieldError::Cancelled) = outcome {
            warn!(p, n, "field construction cancelled");
        }
        on_complete(outcome);
    });
    ConstructionTask { token, handle }
}

/// Constructs GF(p^n) on tokio's blocking pool.
///
/// Setting `token` stops the search with [`FieldError::Cancelled`]; a worker
/// that is aborted or panics is reported the same way.
#[cfg(feature = "async")]
pub async fn construct_field_async(p: u64, n: usize, token: CancelToken) -> Result<GaloisField> {
    let worker_token = token.clone();
    let outcome =
        tokio::task::spawn_blocking(move || GaloisField::construct_cancellable(p, n, &worker_token))
            .await;
    match outcome {
        Ok(result) => result,
        Err(err) => {
            warn!(p, n, error = %err, "field construction task did not complete");
            Err(FieldError::Cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_spawned_construction_reports_field() {
        let (tx, rx) = mpsc::channel();
        let task = spawn_construct(7, 4, move |outcome| {
            tx.send(outcome).unwrap();
        });
        let field = rx.recv().unwrap().unwrap();
        task.join().unwrap();
        assert_eq!(field.prime(), 7);
        assert_eq!(field.degree(), 4);
        assert_eq!(field.modulus().degree(), Some(4));
    }

    #[test]
    fn test_spawned_construction_reports_errors() {
        let (tx, rx) = mpsc::channel();
        let task = spawn_construct(8, 2, move |outcome| {
            tx.send(outcome).unwrap();
        });
        assert_eq!(rx.recv().unwrap().unwrap_err(), FieldError::InvalidPrime(8));
        task.join().unwrap();
    }

    #[test]
    fn test_cancelled_construction() {
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(
            GaloisField::construct_cancellable(101, 12, &token).unwrap_err(),
            FieldError::Cancelled
        );
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_construction() {
        let field = construct_field_async(11, 6, CancelToken::new()).await.unwrap();
        assert_eq!(field.modulus().degree(), Some(6));

        let token = CancelToken::new();
        token.cancel();
        assert_eq!(
            construct_field_async(11, 6, token).await.unwrap_err(),
            FieldError::Cancelled
        );
    }
}
