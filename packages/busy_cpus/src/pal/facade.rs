use std::fmt::Debug;
use std::io;
use std::num::NonZero;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::pal::MockBindings;
use crate::pal::{Bindings, BuildTargetBindings};
use crate::{FifoPriority, ProcessorId};

/// Enum to hide the real/mock choice behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum BindingsFacade {
    Target(&'static BuildTargetBindings),

    #[cfg(test)]
    Mock(Arc<MockBindings>),
}

impl BindingsFacade {
    pub(crate) const fn target() -> Self {
        Self::Target(&BuildTargetBindings)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockBindings) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Bindings for BindingsFacade {
    fn active_processor_count(&self) -> NonZero<usize> {
        match self {
            Self::Target(bindings) => bindings.active_processor_count(),
            #[cfg(test)]
            Self::Mock(mock) => mock.active_processor_count(),
        }
    }

    fn bind_current_thread(&self, processor: ProcessorId) -> Result<(), io::Error> {
        match self {
            Self::Target(bindings) => bindings.bind_current_thread(processor),
            #[cfg(test)]
            Self::Mock(mock) => mock.bind_current_thread(processor),
        }
    }

    fn current_thread_binding(&self) -> Result<Vec<ProcessorId>, io::Error> {
        match self {
            Self::Target(bindings) => bindings.current_thread_binding(),
            #[cfg(test)]
            Self::Mock(mock) => mock.current_thread_binding(),
        }
    }

    fn set_current_thread_fifo(&self, priority: FifoPriority) -> Result<(), io::Error> {
        match self {
            Self::Target(bindings) => bindings.set_current_thread_fifo(priority),
            #[cfg(test)]
            Self::Mock(mock) => mock.set_current_thread_fifo(priority),
        }
    }

    fn current_thread_fifo(&self) -> Result<Option<FifoPriority>, io::Error> {
        match self {
            Self::Target(bindings) => bindings.current_thread_fifo(),
            #[cfg(test)]
            Self::Mock(mock) => mock.current_thread_fifo(),
        }
    }
}

impl Debug for BindingsFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
