use std::num::NonZero;

use crate::token::{self, TokenAction};
use crate::{Error, Result, SlotTarget};

/// The resolved occupancy configuration: one [`SlotTarget`] per logical processor.
///
/// The table is built once from the command tokens and is immutable afterwards; worker
/// startup only reads it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotTable {
    slots: Box<[SlotTarget]>,
}

impl SlotTable {
    /// Resolves a list of command tokens into a full slot table.
    ///
    /// Tokens are processed strictly left to right. An individual token lands on the slot
    /// named by its processor id, or on the slot matching its ordinal position among the
    /// tokens when unbound; later tokens overwrite earlier ones on the same slot. A
    /// broadcast token rewrites the table as accumulated so far.
    ///
    /// # Errors
    ///
    /// Fails fast on the first offending token, or with [`Error::TooManyTokens`] before
    /// any token is parsed if the list is longer than the table. Nothing is partially
    /// applied: an error means no valid configuration exists and no worker may start.
    pub fn resolve<S>(tokens: &[S], slot_count: NonZero<usize>) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let limit = slot_count.get();

        if tokens.len() > limit {
            return Err(Error::TooManyTokens {
                count: tokens.len(),
                limit,
            });
        }

        let mut slots = vec![SlotTarget::INACTIVE; limit].into_boxed_slice();

        for (position, token) in tokens.iter().enumerate() {
            match token::parse_token(token.as_ref(), slot_count)? {
                TokenAction::Assign(target) => {
                    // Both branches are in range: explicit processor ids are validated
                    // against the slot count and the token position is bounded by the
                    // capacity check above.
                    let index = target
                        .processor()
                        .map_or(position, |processor| processor as usize);
                    slots[index] = target;
                }
                TokenAction::Broadcast {
                    command,
                    priority,
                    rate,
                } => command.apply(&mut slots, priority, rate),
            }
        }

        Ok(Self { slots })
    }

    /// The number of slots, equal to the number of logical processors detected at startup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no slots. Never true for a resolved table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in slot order, including inactive ones.
    #[must_use]
    pub fn slots(&self) -> &[SlotTarget] {
        &self.slots
    }

    /// The slots that spawn a worker, in slot order, paired with their slot index.
    pub fn active_targets(&self) -> impl Iterator<Item = (usize, SlotTarget)> + '_ {
        self.slots
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, target)| target.is_active())
    }
}
