use std::fmt::Debug;
use std::io;
use std::num::NonZero;

use crate::{FifoPriority, ProcessorId};

/// Bindings for calls into the operating system scheduler.
///
/// All platform calls must go through this trait, enabling them to be mocked.
/// Every operation targets the calling thread: workers apply their own binding and
/// priority after their thread exists, then verify by reading the state back.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Bindings: Debug + Send + Sync + 'static {
    /// The number of logical processors available, read once at startup.
    fn active_processor_count(&self) -> NonZero<usize>;

    /// Restricts the calling thread to run only on the given processor.
    fn bind_current_thread(&self, processor: ProcessorId) -> Result<(), io::Error>;

    /// The processors the calling thread is currently allowed to run on.
    fn current_thread_binding(&self) -> Result<Vec<ProcessorId>, io::Error>;

    /// Places the calling thread under fixed-priority FIFO scheduling at the given level.
    fn set_current_thread_fifo(&self, priority: FifoPriority) -> Result<(), io::Error>;

    /// The calling thread's FIFO priority, or `None` when it is not under FIFO scheduling.
    fn current_thread_fifo(&self) -> Result<Option<FifoPriority>, io::Error>;
}
