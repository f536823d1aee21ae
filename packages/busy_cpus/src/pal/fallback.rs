use std::io;
use std::num::NonZero;
use std::thread;

use crate::pal::Bindings;
use crate::{FifoPriority, ProcessorId};

/// Bindings for operating systems without native scheduler support.
///
/// The processor count is still real, so positional resolution works everywhere. Binding
/// and priority requests are reported as unsupported rather than silently ignored - an
/// unpinned worker pretending to be pinned would invalidate the tool's purpose.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

impl Bindings for BuildTargetBindings {
    fn active_processor_count(&self) -> NonZero<usize> {
        thread::available_parallelism().unwrap_or(NonZero::<usize>::MIN)
    }

    fn bind_current_thread(&self, _processor: ProcessorId) -> Result<(), io::Error> {
        Err(unsupported())
    }

    fn current_thread_binding(&self) -> Result<Vec<ProcessorId>, io::Error> {
        Err(unsupported())
    }

    fn set_current_thread_fifo(&self, _priority: FifoPriority) -> Result<(), io::Error> {
        Err(unsupported())
    }

    fn current_thread_fifo(&self) -> Result<Option<FifoPriority>, io::Error> {
        Err(unsupported())
    }
}

fn unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "processor binding and priority control require Linux",
    )
}
