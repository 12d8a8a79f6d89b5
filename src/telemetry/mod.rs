//! Tracing setup for the simulator's library consumers.
//!
//! The scheduler emits `tracing` spans and events at its seams (ticks,
//! promotions, planning failures); this module just wires a subscriber so a
//! binary or test harness can see them. Consumers that already run their own
//! subscriber can skip this and install their own.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Install a global `tracing` subscriber honouring `RUST_LOG`, defaulting to
/// `info` when unset. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .try_init();
}
