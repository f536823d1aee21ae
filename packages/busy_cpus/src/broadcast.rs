use crate::{DutyRate, Error, FifoPriority, ProcessorId, Result, SlotTarget};

/// One of the four group policies a broadcast token can request.
///
/// A broadcast token applies one rate/priority pair to many slots at once instead of
/// targeting a single slot. The command letters mirror the CLI surface: `f`, `F`, `r`, `R`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "mirroring the closed set of command letters accepted on the command line"
)]
pub enum BroadcastCommand {
    /// `f` - overwrite every slot; the written slots are left unbound.
    AllForce,

    /// `F` - overwrite every slot and bind each to the processor matching its slot index.
    AllForceBind,

    /// `r` - overwrite only slots not individually targeted so far; written slots are
    /// left unbound.
    AllRelaxed,

    /// `R` - as `r`, and bind each written slot to the processor matching its slot index.
    AllRelaxedBind,
}

impl BroadcastCommand {
    /// Decodes a command letter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCommand`] if the letter is not one of `f`, `F`, `r`, `R`.
    pub(crate) fn from_letter(letter: char) -> Result<Self> {
        match letter {
            'f' => Ok(Self::AllForce),
            'F' => Ok(Self::AllForceBind),
            'r' => Ok(Self::AllRelaxed),
            'R' => Ok(Self::AllRelaxedBind),
            _ => Err(Error::UnknownCommand { letter }),
        }
    }

    /// Applies this policy to the slot table as accumulated so far.
    ///
    /// Broadcast writes replace the whole slot, so a forced broadcast also clears any
    /// earlier binding and the individually-targeted mark of the slots it touches.
    pub(crate) fn apply(
        self,
        slots: &mut [SlotTarget],
        priority: Option<FifoPriority>,
        rate: DutyRate,
    ) {
        match self {
            Self::AllForce => all_force(slots, priority, rate),
            Self::AllForceBind => all_force_bind(slots, priority, rate),
            Self::AllRelaxed => all_relaxed(slots, priority, rate),
            Self::AllRelaxedBind => all_relaxed_bind(slots, priority, rate),
        }
    }
}

fn all_force(slots: &mut [SlotTarget], priority: Option<FifoPriority>, rate: DutyRate) {
    for slot in slots {
        *slot = SlotTarget::broadcast(None, priority, rate);
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "slot indexes never exceed the processor id range"
)]
fn all_force_bind(slots: &mut [SlotTarget], priority: Option<FifoPriority>, rate: DutyRate) {
    for (index, slot) in slots.iter_mut().enumerate() {
        *slot = SlotTarget::broadcast(Some(index as ProcessorId), priority, rate);
    }
}

fn all_relaxed(slots: &mut [SlotTarget], priority: Option<FifoPriority>, rate: DutyRate) {
    for slot in slots {
        if !slot.individually_targeted {
            *slot = SlotTarget::broadcast(None, priority, rate);
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "slot indexes never exceed the processor id range"
)]
fn all_relaxed_bind(slots: &mut [SlotTarget], priority: Option<FifoPriority>, rate: DutyRate) {
    for (index, slot) in slots.iter_mut().enumerate() {
        if !slot.individually_targeted {
            *slot = SlotTarget::broadcast(Some(index as ProcessorId), priority, rate);
        }
    }
}
