//! Binary entry point for the `busy_cpus` tool.
//!
//! The binary stays thin: token resolution and the worker model live in the library so
//! they can be tested without spinning up real load.

use std::num::NonZero;
use std::process::ExitCode;

use busy_cpus::{SlotTable, Worker, active_processor_count};
use clap::{CommandFactory, FromArgMatches, Parser};
use tracing_subscriber::EnvFilter;

/// Occupy logical processors at configurable duty cycles, with optional pinning and
/// real-time priority.
#[derive(Parser)]
#[command(name = "busy_cpus", version)]
struct Cli {
    /// Occupancy tokens: `rate`, `cpu_id,rate`, `cpu_id,priority,rate`, `cmd,rate` or
    /// `cmd,priority,rate`; see the token grammar below
    #[arg(value_name = "TOKEN", allow_hyphen_values = true)]
    tokens: Vec<String>,
}

fn main() -> ExitCode {
    init_logging();

    let slot_count = active_processor_count();

    let mut command = Cli::command().after_help(grammar_help(slot_count));

    let matches = match command.try_get_matches_from_mut(std::env::args_os()) {
        Ok(matches) => matches,
        Err(error) => error.exit(),
    };
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };

    match run(&cli.tokens, slot_count) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            eprintln!();

            if let Err(print_error) = command.print_long_help() {
                tracing::debug!(error = %print_error, "failed to print usage text");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(tokens: &[String], slot_count: NonZero<usize>) -> busy_cpus::Result<()> {
    let table = SlotTable::resolve(tokens, slot_count)?;

    tracing::info!(
        slots = table.len(),
        active = table.active_targets().count(),
        "occupancy targets resolved"
    );

    let mut workers = Vec::new();

    // Spawning reports each slot only after its binding and priority have been verified,
    // so an enforcement failure aborts the run mid-report rather than printing a
    // configuration that is not actually in effect.
    for (slot, target) in table.active_targets() {
        let worker = Worker::spawn(slot, target)?;
        println!("{target}");
        workers.push(worker);
    }

    // Workers never return under normal operation; the process runs until killed.
    for worker in workers {
        worker.join();
    }

    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

fn grammar_help(slot_count: NonZero<usize>) -> String {
    format!(
        "TOKEN GRAMMAR:
    rate                   occupy the slot matching the token's position at `rate`
                           (0.0..=1.0), unbound
    cpu_id,rate            occupy slot `cpu_id` (-1..={max_processor}), bound to that processor;
                           -1 leaves the worker unbound
    cpu_id,priority,rate   as above, scheduled SCHED_FIFO at `priority` (0..=99)
    cmd,rate               broadcast `rate` over many slots at once
    cmd,priority,rate      broadcast `rate` and `priority` over many slots at once

BROADCAST COMMANDS:
    f    set every slot
    F    set every slot and bind each to its matching processor
    r    set only slots not individually targeted so far
    R    as r, and bind each touched slot to its matching processor

EXAMPLES:
    busy_cpus 0.5 0.9              slot 0 at 50%, slot 1 at 90%
    busy_cpus 1,0.5                slot 1 at 50%, bound to processor 1
    busy_cpus 1,20,0.5             as above, at FIFO priority 20
    busy_cpus f,0.5                every slot at 50%
    busy_cpus 1,20,0.5 R,40,0.9    slot 1 pinned at 50%; every other slot at 90%,
                                   priority 40, bound to its matching processor

This system has {count} logical processors, so up to {count} tokens are accepted.",
        max_processor = slot_count.get().saturating_sub(1),
        count = slot_count.get(),
    )
}
