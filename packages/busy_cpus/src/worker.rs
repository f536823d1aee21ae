use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::pal::BindingsFacade;
use crate::{DutyRate, Error, Result, SlotTarget, enforce};

/// The duty cycle control period.
///
/// Each worker splits this period into a busy phase of `CYCLE * rate` and an idle phase
/// covering the remainder. Shorter periods track the target rate more smoothly but pay
/// more wakeup overhead; 10 ms keeps the approximation well inside scheduler-jitter
/// territory for the rates this tool is used at.
pub const CYCLE: Duration = Duration::from_millis(10);

/// The stop flag handed to production workers. It is never set; workers run until the
/// process is terminated from outside.
static NEVER_STOP: AtomicBool = AtomicBool::new(false);

/// Runs the duty cycle loop until `stop` is observed as set.
///
/// Each iteration spins on a monotonic high-resolution clock for the busy phase, then
/// sleeps away the idle phase. The busy phase is measured from a fresh start instant
/// every cycle, so oversleep jitter from the idle phase does not accumulate into drift.
///
/// A rate of 0.0 degenerates into an all-sleep loop and a rate of 1.0 into an all-spin
/// loop that saturates one logical processor. The stop flag is only checked once per
/// period boundary; production workers pass a flag that is never set, making this an
/// unbounded loop that only external process termination ends.
pub fn run_until(rate: DutyRate, stop: &AtomicBool) {
    let busy = rate.portion_of(CYCLE);
    let idle = CYCLE.saturating_sub(busy);

    while !stop.load(Ordering::Relaxed) {
        let cycle_start = Instant::now();

        while cycle_start.elapsed() < busy {
            std::hint::spin_loop();
        }

        if !idle.is_zero() {
            thread::sleep(idle);
        }
    }
}

/// One running occupancy worker, pinned and prioritized as its target demands.
#[derive(Debug)]
pub struct Worker {
    slot: usize,
    handle: thread::JoinHandle<()>,
}

impl Worker {
    /// Spawns the worker for one active slot and blocks until its binding and priority
    /// have been applied and verified on the worker's own thread.
    ///
    /// # Errors
    ///
    /// Returns an error when the thread cannot be created, when the OS rejects the
    /// binding or priority request, or when verification shows a request did not take
    /// effect. Workers spawned earlier keep running; the caller is expected to treat any
    /// error as fatal for the whole process.
    pub fn spawn(slot: usize, target: SlotTarget) -> Result<Self> {
        Self::spawn_with_bindings(slot, target, BindingsFacade::target(), &NEVER_STOP)
    }

    pub(crate) fn spawn_with_bindings(
        slot: usize,
        target: SlotTarget,
        bindings: BindingsFacade,
        stop: &'static AtomicBool,
    ) -> Result<Self> {
        let (ready_tx, ready_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name(format!("slot-{slot}"))
            .spawn(move || {
                let outcome = enforce::apply(&bindings, &target);
                let enforced = outcome.is_ok();

                if ready_tx.send(outcome).is_err() {
                    // The spawning side is gone; nothing is waiting on this worker.
                    return;
                }

                if enforced {
                    tracing::debug!(slot, rate = %target.rate(), "duty cycle starting");
                    run_until(target.rate(), stop);
                }
            })
            .map_err(|source| Error::SpawnFailed { slot, source })?;

        let startup = match ready_rx.recv() {
            Ok(outcome) => outcome,
            Err(mpsc::RecvError) => Err(Error::WorkerLost { slot }),
        };
        startup?;

        Ok(Self { slot, handle })
    }

    /// The slot this worker occupies.
    #[must_use]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Blocks until the worker ends, which under normal operation is never.
    pub fn join(self) {
        if self.handle.join().is_err() {
            tracing::error!(slot = self.slot, "worker thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::pal::MockBindings;

    use super::*;

    #[test]
    fn stop_flag_ends_the_loop() {
        let stop = AtomicBool::new(false);
        let started = Instant::now();

        thread::scope(|s| {
            s.spawn(|| {
                thread::sleep(CYCLE * 4);
                stop.store(true, Ordering::Relaxed);
            });

            run_until(DutyRate::from_fraction(0.5).unwrap(), &stop);
        });

        // Generous bound: the loop must notice the flag within a few periods.
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn already_set_stop_flag_returns_immediately() {
        let stop = AtomicBool::new(true);
        let started = Instant::now();

        run_until(DutyRate::FULL, &stop);

        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn occupancy_approximates_the_requested_rate() {
        let rate = DutyRate::from_fraction(0.2).unwrap();
        let stop = AtomicBool::new(false);

        let cpu_before = thread_cpu_time();
        let started = Instant::now();

        thread::scope(|s| {
            s.spawn(|| {
                thread::sleep(CYCLE * 50);
                stop.store(true, Ordering::Relaxed);
            });

            run_until(rate, &stop);
        });

        let wall = started.elapsed();
        let cpu = thread_cpu_time().saturating_sub(cpu_before);
        let occupancy = cpu.as_secs_f64() / wall.as_secs_f64();

        // Scheduler jitter and shared test machines make tight bounds flaky, so only the
        // rough shape is asserted: far more than idle, far less than saturated.
        assert!(
            occupancy > 0.05 && occupancy < 0.5,
            "occupancy {occupancy} diverged from requested {}",
            rate.as_fraction()
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn zero_rate_barely_consumes_cpu() {
        let stop = AtomicBool::new(false);
        let cpu_before = thread_cpu_time();
        let started = Instant::now();

        thread::scope(|s| {
            s.spawn(|| {
                thread::sleep(CYCLE * 20);
                stop.store(true, Ordering::Relaxed);
            });

            run_until(DutyRate::ZERO, &stop);
        });

        let wall = started.elapsed();
        let cpu = thread_cpu_time().saturating_sub(cpu_before);

        assert!(cpu.as_secs_f64() / wall.as_secs_f64() < 0.2);
    }

    #[cfg(target_os = "linux")]
    fn thread_cpu_time() -> Duration {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };

        // SAFETY: No safety requirements beyond passing valid arguments.
        let result = unsafe { libc::clock_gettime(libc::CLOCK_THREAD_CPUTIME_ID, &raw mut ts) };
        assert_eq!(result, 0);

        Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32)
    }

    #[test]
    fn enforcement_failure_fails_the_spawn() {
        static STOP: AtomicBool = AtomicBool::new(false);

        let mut mock = MockBindings::new();
        mock.expect_bind_current_thread()
            .returning(|_| Err(io::Error::from(io::ErrorKind::PermissionDenied)));

        let target = SlotTarget::individual(Some(2), None, DutyRate::ZERO);

        let spawned = Worker::spawn_with_bindings(
            2,
            target,
            BindingsFacade::from_mock(mock),
            &STOP,
        );

        assert!(matches!(spawned, Err(Error::BindRejected { processor: 2, .. })));
    }

    #[test]
    fn unconstrained_worker_starts_and_stops() {
        static STOP: AtomicBool = AtomicBool::new(false);

        // No binding or priority requests, so the mock expects no calls at all.
        let target = SlotTarget::individual(None, None, DutyRate::ZERO);

        let worker = Worker::spawn_with_bindings(
            0,
            target,
            BindingsFacade::from_mock(MockBindings::new()),
            &STOP,
        )
        .unwrap();

        assert_eq!(worker.slot(), 0);

        STOP.store(true, Ordering::Relaxed);
        worker.join();
    }
}
