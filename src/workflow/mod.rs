//! Workflow steps, chains, definitions and firing configurations.

pub mod chain;
pub mod definition;
pub mod step;
pub mod workflow;

pub use chain::WorkflowChain;
pub use definition::WorkflowDef;
pub use step::WorkflowStepDef;
pub use workflow::{Transaction, Workflow};
