use std::io;

use thiserror::Error;

use crate::{FifoPriority, ProcessorId};

/// Errors that can occur when resolving occupancy targets or starting workers.
///
/// Every failure is fatal for the whole run. The tool deliberately has no partial or
/// best-effort mode because a misconfigured load pattern is worse than a visible abort.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The token matched none of the recognized grammar variants.
    #[error("unrecognized occupancy token '{token}'")]
    UnrecognizedToken {
        /// The token as provided on the command line.
        token: String,
    },

    /// A processor id field was parsed but falls outside the valid range.
    #[error("processor id {value} is out of range; expected -1 (unbound) or 0..={max}")]
    ProcessorIdOutOfRange {
        /// The offending value.
        value: i64,

        /// The highest processor id available on this system.
        max: usize,
    },

    /// A priority field was parsed but falls outside the valid range.
    #[error("priority {value} is out of range; expected 0..=99")]
    PriorityOutOfRange {
        /// The offending value.
        value: i64,
    },

    /// A rate field was parsed but falls outside the valid range.
    #[error("rate {value} is out of range; expected 0.0..=1.0")]
    RateOutOfRange {
        /// The offending value.
        value: f64,
    },

    /// A broadcast token used a command letter that is not one of the four group policies.
    #[error("unknown broadcast command '{letter}'; expected one of f, F, r, R")]
    UnknownCommand {
        /// The offending command letter.
        letter: char,
    },

    /// More tokens were provided than there are worker slots on this system.
    #[error("{count} tokens provided but only {limit} logical processors are available")]
    TooManyTokens {
        /// How many tokens were provided.
        count: usize,

        /// The number of worker slots on this system.
        limit: usize,
    },

    /// The operating system refused to create a worker thread.
    #[error("failed to spawn worker thread for slot {slot}: {source}")]
    SpawnFailed {
        /// The slot whose worker could not be created.
        slot: usize,

        /// The underlying operating system error.
        source: io::Error,
    },

    /// A worker thread terminated before reporting its startup outcome.
    #[error("worker thread for slot {slot} terminated during startup")]
    WorkerLost {
        /// The slot whose worker disappeared.
        slot: usize,
    },

    /// The operating system rejected a request to bind a worker to a processor.
    #[error("failed to bind worker to processor {processor}: {source}")]
    BindRejected {
        /// The processor the worker was to be bound to.
        processor: ProcessorId,

        /// The underlying operating system error.
        source: io::Error,
    },

    /// A processor binding request was accepted but reading the affinity mask back showed
    /// it was not applied.
    #[error(
        "processor binding did not take effect; requested processor {processor} but the \
         operating system reports {observed:?}"
    )]
    BindNotEffective {
        /// The processor the worker was to be bound to.
        processor: ProcessorId,

        /// The processors the worker is actually allowed to run on.
        observed: Vec<ProcessorId>,
    },

    /// The operating system rejected a request for fixed-priority scheduling.
    #[error("failed to set FIFO priority {priority}: {source}")]
    PriorityRejected {
        /// The requested priority level.
        priority: FifoPriority,

        /// The underlying operating system error.
        source: io::Error,
    },

    /// A priority request was accepted but reading the scheduling parameters back showed
    /// it was not applied.
    #[error(
        "FIFO priority did not take effect; requested {priority} but the operating system \
         reports {observed:?}"
    )]
    PriorityNotEffective {
        /// The requested priority level.
        priority: FifoPriority,

        /// The FIFO priority actually in effect, if the worker is under FIFO scheduling at all.
        observed: Option<FifoPriority>,
    },
}

/// A specialized `Result` type for occupancy operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn diagnostics_name_the_offending_value() {
        let error = Error::ProcessorIdOutOfRange { value: 17, max: 7 };
        assert!(error.to_string().contains("17"));
        assert!(error.to_string().contains("0..=7"));

        let error = Error::RateOutOfRange { value: 1.5 };
        assert!(error.to_string().contains("1.5"));

        let error = Error::UnknownCommand { letter: 'x' };
        assert!(error.to_string().contains('x'));

        let error = Error::TooManyTokens { count: 9, limit: 8 };
        assert!(error.to_string().contains('9'));
        assert!(error.to_string().contains('8'));
    }
}
