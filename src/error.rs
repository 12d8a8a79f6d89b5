//! Error types shared across the simulator's subsystems.
//!
//! Each subsystem gets its own `thiserror`-derived enum so callers can match
//! on the failure class spec.md §7 names (configuration, planning,
//! scheduling-invariant, user-input) without string-matching a single
//! catch-all error.

use miette::Diagnostic;
use thiserror::Error;

use crate::design::ValidationMessage;

/// The design failed validation; `start()` refuses to run.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
#[error("design is not valid: {} message(s)", .messages.len())]
#[diagnostic(
    code(meshsim::design::invalid),
    help("Call Design::validate() to see the individual messages before calling Scheduler::start().")
)]
pub struct DesignError {
    pub messages: Vec<ValidationMessage>,
}

/// Fatal at planning time: an invalid chain, a missing provider, or an
/// unreachable zone pair. Planning never partially enqueues a request.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error("workflow chain {chain} is invalid: missing service provider(s) for {missing:?}")]
    #[diagnostic(code(meshsim::planner::invalid_chain))]
    InvalidChain { chain: String, missing: Vec<String> },

    #[error("service provider {provider} produced no handler node")]
    #[diagnostic(
        code(meshsim::planner::no_handler),
        help("A provider with zero nodes, or a removed node list, cannot be resolved. Check ServiceProvider::validate().")
    )]
    NoHandlerNode { provider: String },

    #[error("no route from zone {from} to zone {to}")]
    #[diagnostic(
        code(meshsim::planner::no_route),
        help("Zones must be connected by a chain of links with no local self-loops in between.")
    )]
    NoRoute { from: String, to: String },
}

/// A scheduling invariant was violated: indicates a bug in the planner or
/// the design, not a recoverable runtime condition.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("no queue registered for calculator {calculator}")]
    #[diagnostic(
        code(meshsim::scheduler::missing_queue),
        help("Every solution step's calculator must have a corresponding queue built by Design::provide_queues().")
    )]
    QueueNotFound { calculator: String },

    #[error("do_next_task invoked with no pending workflow firing or queue completion")]
    #[diagnostic(code(meshsim::scheduler::no_pending_work))]
    NoPendingWork,

    #[error("unknown workflow name {name}")]
    #[diagnostic(code(meshsim::scheduler::unknown_workflow))]
    UnknownWorkflow { name: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Design(#[from] DesignError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Planning(#[from] PlanningError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    TimeAdvance(#[from] TimeAdvanceError),
}

/// A caller asked to advance time by a non-positive amount, or to a target
/// that is not after the current clock. Simulator state is unchanged.
#[derive(Debug, Error, Diagnostic, Clone, Copy, PartialEq, Eq)]
pub enum TimeAdvanceError {
    #[error("cannot advance time by {0}ms; must be a positive amount")]
    #[diagnostic(code(meshsim::scheduler::non_positive_delta))]
    NonPositiveDelta(i64),

    #[error("cannot advance time to {target}; current clock is already at {current}")]
    #[diagnostic(code(meshsim::scheduler::non_monotonic_target))]
    TargetNotAfterCurrent { target: i64, current: i64 },
}
