//! Cooperative cancellation, checked between search iterations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something a search can poll to find out it should stop.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

impl<F> Cancellation for F
where
    F: Fn() -> bool,
{
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// A shareable cancellation flag.
///
/// Clones observe the same flag, so one clone can be handed to a worker
/// thread running a search while another stays with the requester.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl Cancellation for CancelToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
