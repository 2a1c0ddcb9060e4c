use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::framework::{global, CreationError, SlotId};

/// Process-wide log of operations performed through the shared instance.
///
/// There is no public constructor: the only way to get one is [`OperationLog::instance`].
#[derive(Debug)]
pub struct OperationLog {
    operations: AtomicU64,
}

impl OperationLog {
    fn new() -> Self {
        info!("Operation log created");
        Self {
            operations: AtomicU64::new(0),
        }
    }

    /// The shared instance, created on first call.
    pub fn instance() -> Result<Arc<Self>, CreationError> {
        global().get_or_init(SlotId::of::<OperationLog>(), OperationLog::new)
    }

    /// Records one operation and returns its sequence number (starting at 1).
    pub fn do_singleton_operation(&self) -> u64 {
        let seq = self.operations.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, "Singleton operation");
        seq
    }

    pub fn operations(&self) -> u64 {
        self.operations.load(Ordering::SeqCst)
    }
}
