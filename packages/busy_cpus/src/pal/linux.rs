use std::num::NonZero;
use std::{io, mem};

use libc::{cpu_set_t, sched_param};

use crate::pal::Bindings;
use crate::{FifoPriority, ProcessorId};

/// FFI bindings that target the real operating system that the build is targeting.
///
/// You would only use different bindings in unit tests that need to use mock bindings.
/// Even then, whenever possible, unit tests should use real bindings for maximum realism.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

impl Bindings for BuildTargetBindings {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the count is clamped to at least 1 and processor counts fit usize"
    )]
    fn active_processor_count(&self) -> NonZero<usize> {
        // SAFETY: No safety requirements.
        let count = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };

        NonZero::new(count.max(1) as usize).unwrap_or(NonZero::<usize>::MIN)
    }

    fn bind_current_thread(&self, processor: ProcessorId) -> Result<(), io::Error> {
        // SAFETY: All zeroes is a valid cpu_set_t.
        let mut cpuset: cpu_set_t = unsafe { mem::zeroed() };

        // SAFETY: Validated processor ids are far below the fixed capacity of cpu_set_t.
        unsafe { libc::CPU_SET(processor as usize, &mut cpuset) };

        // 0 means current thread.
        // SAFETY: No safety requirements beyond passing valid arguments.
        let result = unsafe { libc::sched_setaffinity(0, size_of::<cpu_set_t>(), &cpuset) };

        if result == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "cpu_set_t indexes are small positive values that fit a processor id"
    )]
    fn current_thread_binding(&self) -> Result<Vec<ProcessorId>, io::Error> {
        // SAFETY: All zeroes is a valid cpu_set_t.
        let mut cpuset: cpu_set_t = unsafe { mem::zeroed() };

        // 0 means current thread.
        // SAFETY: No safety requirements beyond passing valid arguments.
        let result = unsafe { libc::sched_getaffinity(0, size_of::<cpu_set_t>(), &raw mut cpuset) };

        if result != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut processors = Vec::new();

        for index in 0..libc::CPU_SETSIZE as usize {
            // SAFETY: The index is within the fixed capacity of cpu_set_t.
            if unsafe { libc::CPU_ISSET(index, &cpuset) } {
                processors.push(index as ProcessorId);
            }
        }

        Ok(processors)
    }

    fn set_current_thread_fifo(&self, priority: FifoPriority) -> Result<(), io::Error> {
        let param = sched_param {
            sched_priority: i32::from(priority),
        };

        // 0 means current thread.
        // SAFETY: No safety requirements beyond passing valid arguments.
        let result = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };

        if result == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    fn current_thread_fifo(&self) -> Result<Option<FifoPriority>, io::Error> {
        // 0 means current thread.
        // SAFETY: No safety requirements.
        let policy = unsafe { libc::sched_getscheduler(0) };

        if policy == -1 {
            return Err(io::Error::last_os_error());
        }

        if policy != libc::SCHED_FIFO {
            return Ok(None);
        }

        let mut param = sched_param { sched_priority: 0 };

        // SAFETY: No safety requirements beyond passing valid arguments.
        let result = unsafe { libc::sched_getparam(0, &raw mut param) };

        if result != 0 {
            return Err(io::Error::last_os_error());
        }

        // FIFO priorities are 1..=99 on Linux, so the conversion only fails if the OS
        // reports something nonsensical - which verification then treats as a mismatch.
        Ok(Some(
            FifoPriority::try_from(param.sched_priority).unwrap_or(FifoPriority::MAX),
        ))
    }
}
