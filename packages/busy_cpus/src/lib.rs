//! Occupy logical processors at configurable duty cycles, with optional pinning and
//! real-time priority.
//!
//! This package powers the `busy_cpus` command-line tool, used for load generation,
//! thermal-throttling tests and reserving CPU headroom. A run is described by a list of
//! command tokens, each either targeting one worker slot (`rate`, `cpu_id,rate`,
//! `cpu_id,priority,rate`) or broadcasting one setting over many slots at once (`f,rate`,
//! `R,priority,rate` and friends). There is one slot per logical processor; each active
//! slot hosts one worker thread that approximates the requested occupancy by alternating
//! a spin phase and a sleep phase within a fixed 10 ms control period.
//!
//! # Resolving targets
//!
//! Resolution is pure and deterministic, so it can be exercised without touching the
//! operating system:
//!
//! ```
//! use std::num::NonZero;
//!
//! use busy_cpus::SlotTable;
//!
//! // Slot 0 is individually targeted; the relaxed broadcast covers the remaining slots.
//! let table = SlotTable::resolve(&["0,20,0.5", "r,40,0.9"], NonZero::new(4).unwrap())?;
//!
//! for (slot, target) in table.active_targets() {
//!     println!("slot {slot}: {target}");
//! }
//! # Ok::<(), busy_cpus::Error>(())
//! ```
//!
//! # Running workers
//!
//! Workers bind and prioritize themselves on their own thread and verify the result
//! against the OS before the duty cycle starts; a request that did not take effect fails
//! the spawn instead of silently producing a different load pattern than requested.
//! [`Worker::spawn()`] never returns a worker that is not running exactly as resolved.
//!
//! The duty cycle itself is exposed as [`run_until()`] for callers that want to drive a
//! bounded burst of load, for example in tests:
//!
//! ```
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::thread;
//!
//! use busy_cpus::{CYCLE, DutyRate, run_until};
//!
//! let stop = AtomicBool::new(false);
//!
//! thread::scope(|s| {
//!     s.spawn(|| {
//!         thread::sleep(CYCLE * 10);
//!         stop.store(true, Ordering::Relaxed);
//!     });
//!
//!     // Occupies the current thread at roughly 30% for ten control periods.
//!     run_until(DutyRate::from_fraction(0.3).unwrap(), &stop);
//! });
//! ```
//!
//! # Operating system compatibility
//!
//! Duty cycle workers run everywhere. Processor binding and FIFO priority enforcement
//! use the Linux scheduler interfaces; on other operating systems such requests fail
//! cleanly at startup instead of degrading silently.

mod broadcast;
mod enforce;
mod error;
mod pal;
mod primitive_types;
mod rate;
mod slot_table;
mod target;
mod token;
mod worker;

pub use broadcast::*;
pub use error::*;
pub use primitive_types::*;
pub use rate::*;
pub use slot_table::*;
pub use target::*;
pub use worker::*;

use std::num::NonZero;

use crate::pal::Bindings;

/// The number of logical processors available to this process, which is also the number
/// of worker slots.
///
/// Read from the operating system on every call; the tool reads it once at startup.
#[must_use]
#[cfg_attr(test, mutants::skip)] // Thin forwarder over the platform layer.
pub fn active_processor_count() -> NonZero<usize> {
    pal::BindingsFacade::target().active_processor_count()
}
