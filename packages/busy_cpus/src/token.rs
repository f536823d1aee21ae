use std::num::NonZero;

use crate::{
    BroadcastCommand, DutyRate, Error, FifoPriority, MAX_FIFO_PRIORITY, ProcessorId, Result,
    SlotTarget,
};

/// The decoded meaning of one command token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum TokenAction {
    /// An individual token targeting a single slot.
    Assign(SlotTarget),

    /// A broadcast token applying one rate/priority pair to many slots at once.
    Broadcast {
        command: BroadcastCommand,
        priority: Option<FifoPriority>,
        rate: DutyRate,
    },
}

/// Parses one command token, trying the grammar variants in strict priority order:
///
/// 1. `processor,priority,rate`
/// 2. `processor,rate`
/// 3. `rate`
/// 4. `command,priority,rate`
/// 5. `command,rate`
///
/// The first variant that structurally matches (field count and field types) is used and
/// no later variant is tried; a structural match with an out-of-range value is a
/// validation error, never a silent fallback.
pub(crate) fn parse_token(token: &str, slot_count: NonZero<usize>) -> Result<TokenAction> {
    let fields: Vec<&str> = token.split(',').collect();

    // Structural checks (do the fields parse at all?) happen per variant before any
    // validation, so a malformed field falls through to the parse error while a
    // well-formed but out-of-range one is validated in field order: processor or
    // command first, then priority, then rate.
    match fields.as_slice() {
        [rate_field] => {
            let rate_value = parse_float(rate_field).ok_or_else(|| unrecognized(token))?;
            let rate = DutyRate::from_fraction(rate_value)?;
            Ok(TokenAction::Assign(SlotTarget::individual(
                None, None, rate,
            )))
        }
        [first, rate_field] => {
            if let Some(id) = parse_int(first) {
                let rate_value = parse_float(rate_field).ok_or_else(|| unrecognized(token))?;
                let processor = validate_processor(id, slot_count)?;
                let rate = DutyRate::from_fraction(rate_value)?;
                Ok(TokenAction::Assign(SlotTarget::individual(
                    processor, None, rate,
                )))
            } else if let Some(letter) = single_letter(first) {
                let rate_value = parse_float(rate_field).ok_or_else(|| unrecognized(token))?;
                let command = BroadcastCommand::from_letter(letter)?;
                let rate = DutyRate::from_fraction(rate_value)?;
                Ok(TokenAction::Broadcast {
                    command,
                    priority: None,
                    rate,
                })
            } else {
                Err(unrecognized(token))
            }
        }
        [first, priority_field, rate_field] => {
            if let Some(id) = parse_int(first) {
                let priority_value =
                    parse_int(priority_field).ok_or_else(|| unrecognized(token))?;
                let rate_value = parse_float(rate_field).ok_or_else(|| unrecognized(token))?;
                let processor = validate_processor(id, slot_count)?;
                let priority = validate_priority(priority_value)?;
                let rate = DutyRate::from_fraction(rate_value)?;
                Ok(TokenAction::Assign(SlotTarget::individual(
                    processor,
                    Some(priority),
                    rate,
                )))
            } else if let Some(letter) = single_letter(first) {
                let priority_value =
                    parse_int(priority_field).ok_or_else(|| unrecognized(token))?;
                let rate_value = parse_float(rate_field).ok_or_else(|| unrecognized(token))?;
                let command = BroadcastCommand::from_letter(letter)?;
                let priority = validate_priority(priority_value)?;
                let rate = DutyRate::from_fraction(rate_value)?;
                Ok(TokenAction::Broadcast {
                    command,
                    priority: Some(priority),
                    rate,
                })
            } else {
                Err(unrecognized(token))
            }
        }
        _ => Err(unrecognized(token)),
    }
}

fn unrecognized(token: &str) -> Error {
    Error::UnrecognizedToken {
        token: token.to_string(),
    }
}

fn parse_int(field: &str) -> Option<i64> {
    field.parse().ok()
}

fn parse_float(field: &str) -> Option<f64> {
    field.parse().ok()
}

/// A structural check: a command field is exactly one alphabetic character.
///
/// Whether the letter names a known command is a validation concern, decided only after
/// the variant has structurally matched.
fn single_letter(field: &str) -> Option<char> {
    let mut chars = field.chars();
    let letter = chars.next()?;

    if chars.next().is_none() && letter.is_ascii_alphabetic() {
        Some(letter)
    } else {
        None
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "accepted values are validated to 0..slot_count, which fits a processor id"
)]
fn validate_processor(id: i64, slot_count: NonZero<usize>) -> Result<Option<ProcessorId>> {
    let max = slot_count.get().saturating_sub(1);

    if id == -1 {
        Ok(None)
    } else if id >= 0 && id <= max as i64 {
        Ok(Some(id as ProcessorId))
    } else {
        Err(Error::ProcessorIdOutOfRange { value: id, max })
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "accepted values are validated to 0..=99, which fits a priority level"
)]
fn validate_priority(value: i64) -> Result<FifoPriority> {
    if (0..=i64::from(MAX_FIFO_PRIORITY)).contains(&value) {
        Ok(value as FifoPriority)
    } else {
        Err(Error::PriorityOutOfRange { value })
    }
}
