//! Dispatch queue collaborator interface.
//!
//! The deadline timer only needs to tell an external queue that "the deadline
//! has been reached". What the queue does with that (wake a task, post an
//! event) is its own business.

use core::sync::atomic::{AtomicU32, Ordering};

/// Receiver of deadline notifications.
///
/// `deadline_ready` is called from interrupt context with a critical section
/// held. Implementations must not block; they should only record or signal
/// work to be processed later in task context.
pub trait DispatchQueue: Sync {
    /// Notifies the queue that the armed deadline has been reached.
    fn deadline_ready(&self);
}

/// Dispatch queue that only counts notifications, for host testing.
#[derive(Debug, Default)]
pub struct MockDispatchQueue {
    notifications: AtomicU32,
}

impl MockDispatchQueue {
    /// Creates a queue with no recorded notifications.
    pub const fn new() -> Self {
        Self {
            notifications: AtomicU32::new(0),
        }
    }

    /// Number of `deadline_ready` calls received so far.
    pub fn notifications(&self) -> u32 {
        self.notifications.load(Ordering::SeqCst)
    }
}

impl DispatchQueue for MockDispatchQueue {
    fn deadline_ready(&self) {
        self.notifications.fetch_add(1, Ordering::SeqCst);
    }
}
