//! Drives the duty cycle loop directly for a short burst of load on the current thread,
//! using the cooperative stop flag instead of running forever.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use busy_cpus::{CYCLE, DutyRate, run_until};

fn main() {
    let rate = DutyRate::from_fraction(0.3).expect("0.3 is a valid rate");
    let stop = AtomicBool::new(false);

    println!("Occupying the current thread at {rate} for 30 control periods...");

    let started = Instant::now();

    thread::scope(|s| {
        s.spawn(|| {
            thread::sleep(CYCLE * 30);
            stop.store(true, Ordering::Relaxed);
        });

        run_until(rate, &stop);
    });

    println!("Done after {:?}.", started.elapsed());
}
