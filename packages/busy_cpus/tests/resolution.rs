//! End-to-end resolution scenarios exercising the public API the way the command-line
//! tool does, from raw tokens to a frozen slot table.

use std::num::NonZero;

use busy_cpus::{DutyRate, Error, SlotTable};
use new_zealand::nz;

const SLOTS: NonZero<usize> = nz!(8);

fn rate(value: f64) -> DutyRate {
    DutyRate::from_fraction(value).unwrap()
}

#[test]
fn bare_rates_fill_slots_in_order() {
    let table = SlotTable::resolve(&["0.5", "0.9"], SLOTS).unwrap();

    let active: Vec<_> = table.active_targets().collect();
    assert_eq!(active.len(), 2);

    let (slot, target) = active[0];
    assert_eq!(slot, 0);
    assert_eq!(target.processor(), None);
    assert_eq!(target.rate(), rate(0.5));

    let (slot, target) = active[1];
    assert_eq!(slot, 1);
    assert_eq!(target.rate(), rate(0.9));
}

#[test]
fn force_broadcast_resets_explicit_slots_to_unbound() {
    // Pure `f` never pins: slot 0 loses its binding and special treatment entirely.
    let table = SlotTable::resolve(&["0,20,0.5", "f,0.9"], SLOTS).unwrap();

    assert_eq!(table.active_targets().count(), 8);
    for (_, target) in table.active_targets() {
        assert_eq!(target.rate(), rate(0.9));
        assert_eq!(target.processor(), None);
        assert_eq!(target.priority(), None);
        assert!(!target.is_individually_targeted());
    }
}

#[test]
fn relaxed_broadcast_leaves_explicit_slots_untouched() {
    let table = SlotTable::resolve(&["0,20,0.5", "r,40,0.9"], SLOTS).unwrap();

    let slot_zero = table.slots()[0];
    assert_eq!(slot_zero.rate(), rate(0.5));
    assert_eq!(slot_zero.priority(), Some(20));
    assert_eq!(slot_zero.processor(), Some(0));

    for target in &table.slots()[1..] {
        assert_eq!(target.rate(), rate(0.9));
        assert_eq!(target.priority(), Some(40));
        assert_eq!(target.processor(), None);
    }
}

#[test]
fn binding_broadcasts_pin_every_touched_slot_to_its_index() {
    let all = SlotTable::resolve(&["F,0.9"], SLOTS).unwrap();
    for (slot, target) in all.active_targets() {
        assert_eq!(target.processor(), Some(u32::try_from(slot).unwrap()));
    }

    let relaxed = SlotTable::resolve(&["2,0.5", "R,0.9"], SLOTS).unwrap();
    assert_eq!(relaxed.slots()[2].processor(), Some(2));
    assert_eq!(relaxed.slots()[2].rate(), rate(0.5));
    for (slot, target) in relaxed.active_targets().filter(|&(slot, _)| slot != 2) {
        assert_eq!(target.processor(), Some(u32::try_from(slot).unwrap()));
        assert_eq!(target.rate(), rate(0.9));
    }
}

#[test]
fn resolving_the_same_tokens_twice_is_identical() {
    let tokens = ["0.5", "3,20,0.7", "R,40,0.9"];

    assert_eq!(
        SlotTable::resolve(&tokens, SLOTS).unwrap(),
        SlotTable::resolve(&tokens, SLOTS).unwrap()
    );
}

#[test]
fn out_of_range_rate_never_produces_a_table() {
    for token in ["1.5", "0,1.5", "0,20,1.5", "f,1.5", "f,20,1.5"] {
        assert!(
            matches!(
                SlotTable::resolve(&[token], SLOTS),
                Err(Error::RateOutOfRange { .. })
            ),
            "token {token} should have failed rate validation"
        );
    }
}

#[test]
fn over_capacity_token_lists_are_rejected() {
    let tokens: Vec<String> = (0..9).map(|_| "0.5".to_string()).collect();

    assert!(matches!(
        SlotTable::resolve(&tokens, SLOTS),
        Err(Error::TooManyTokens { count: 9, limit: 8 })
    ));
}
