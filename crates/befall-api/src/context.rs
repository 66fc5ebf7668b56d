//! Execution context handed to every API call

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ApiError;
use crate::Result;

/// Shared flag a caller flips to abandon an in-progress command.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag so the token can guard the next command.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    /// Upper bound for a single call, `None` means no deadline
    pub timeout: Option<Duration>,
    pub cancel: CancelToken,
}

impl ExecContext {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(timeout: Option<Duration>, cancel: CancelToken) -> Self {
        Self { timeout, cancel }
    }

    /// Fails with `Cancelled` once the token has been tripped.
    pub fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        Ok(())
    }
}
