use std::fmt::Display;

use crate::{DutyRate, FifoPriority, ProcessorId};

/// The resolved occupancy request for one worker slot.
///
/// A target is created from one command token, possibly rewritten by a later broadcast
/// token, and frozen once the whole slot table is resolved. Workers receive a copy of
/// their target at spawn time and never observe later changes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SlotTarget {
    pub(crate) processor: Option<ProcessorId>,
    pub(crate) priority: Option<FifoPriority>,
    pub(crate) rate: DutyRate,
    pub(crate) individually_targeted: bool,
    pub(crate) active: bool,
}

impl SlotTarget {
    /// A slot that was never mentioned on the command line and spawns no worker.
    pub(crate) const INACTIVE: Self = Self {
        processor: None,
        priority: None,
        rate: DutyRate::ZERO,
        individually_targeted: false,
        active: false,
    };

    /// Creates the target described by one individual (non-broadcast) token.
    pub(crate) fn individual(
        processor: Option<ProcessorId>,
        priority: Option<FifoPriority>,
        rate: DutyRate,
    ) -> Self {
        Self {
            processor,
            priority,
            rate,
            individually_targeted: true,
            active: true,
        }
    }

    /// Creates the target written into a slot by a broadcast token.
    pub(crate) fn broadcast(
        processor: Option<ProcessorId>,
        priority: Option<FifoPriority>,
        rate: DutyRate,
    ) -> Self {
        Self {
            processor,
            priority,
            rate,
            individually_targeted: false,
            active: true,
        }
    }

    /// The processor this slot's worker is bound to, or `None` when unbound.
    #[must_use]
    pub fn processor(&self) -> Option<ProcessorId> {
        self.processor
    }

    /// The FIFO scheduling priority requested for this slot's worker, or `None` when the
    /// worker runs under the default scheduling policy.
    #[must_use]
    pub fn priority(&self) -> Option<FifoPriority> {
        self.priority
    }

    /// The occupancy fraction this slot's worker approximates.
    #[must_use]
    pub fn rate(&self) -> DutyRate {
        self.rate
    }

    /// Whether this slot was last written by an individual token, as opposed to a
    /// broadcast token or never written at all.
    ///
    /// The relaxed broadcast commands skip slots for which this is true.
    #[must_use]
    pub fn is_individually_targeted(&self) -> bool {
        self.individually_targeted
    }

    /// Whether this slot spawns a worker at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Display for SlotTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cpu_id: {:2}, priority: {:2}, rate: {:5.2}%",
            self.processor.map_or(-1, i64::from),
            self.priority.map_or(-1, i64::from),
            self.rate.as_percent(),
        )
    }
}
