//! Resolves a sample token list against a fixed slot count and prints the report lines
//! the tool would emit, without starting any workers.

use std::num::NonZero;

use busy_cpus::SlotTable;

fn main() -> Result<(), busy_cpus::Error> {
    // A fixed slot count keeps the output identical on every machine.
    let slot_count = NonZero::new(8).expect("8 is not zero");

    let tokens = ["1,20,0.5", "r,40,0.9"];
    let table = SlotTable::resolve(&tokens, slot_count)?;

    println!("Tokens: {tokens:?}");

    for (slot, target) in table.active_targets() {
        println!("slot {slot}: {target}");
    }

    Ok(())
}
