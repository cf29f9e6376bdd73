//! Cooperative cancellation.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{Error, Result};

/// Shared flag that aborts a running analysis.
///
/// Clones share the same flag. The analyzer polls it at every recursion step and aborts the
/// current node with [`crate::Error::Cancelled`] once it is set.
///
/// ```rust
/// use copyscope::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
/// assert!(observer.check().is_ok());
///
/// token.cancel();
/// assert!(observer.is_cancelled());
/// assert!(observer.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every analysis observing this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fails with [`crate::Error::Cancelled`] once cancellation was requested.
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if the token is cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}
