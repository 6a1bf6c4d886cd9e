//! Cooperative stop signal for the wall-clock [`Program`](crate::Program).
//!
//! The source side lives with whoever owns the session (a signal handler, a
//! CLI command, a test); the token side is handed to the run loop, which
//! checks it between messages.
//!
//! ```
//! use scalelab_runtime::CancellationSource;
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//!
//! let worker = std::thread::spawn(move || {
//!     while !token.is_cancelled() {
//!         std::thread::yield_now();
//!     }
//! });
//! source.cancel();
//! assert!(worker.join().is_ok());
//! ```

#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Observer half. Cheap to clone, safe to send across threads.
#[derive(Clone)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

/// Control half.
///
/// Dropping the source leaves its tokens uncancelled; only
/// [`cancel`](Self::cancel) flips them.
pub struct CancellationSource {
    shared: Arc<Shared>,
}

struct Shared {
    cancelled: AtomicBool,
}

impl CancellationSource {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Flip every derived token. Calling it twice is harmless.
    pub fn cancel(&self) {
        if !self.shared.cancelled.swap(true, Ordering::AcqRel) {
            tracing::debug!(target: "scalelab.runtime", "cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationSource")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancellationToken {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }
}
