//! Workflows: a configuration of a [`WorkflowDef`] with a firing rate.

use crate::design::ValidationMessage;
use crate::random::RandomSource;
use crate::types::WorkflowKind;

use super::definition::WorkflowDef;

/// One firing of a [`Workflow`], identifying the group of requests it
/// produces (one per chain in its definition).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub id: u64,
    pub request_clock: i64,
}

/// A configured workflow: a definition plus the rate at which it fires,
/// sourced either from a user population or a direct transactions/hour
/// figure.
#[derive(Debug, Clone)]
pub struct Workflow {
    pub name: String,
    pub description: String,
    pub definition: WorkflowDef,
    pub kind: WorkflowKind,
    pub user_count: u32,
    pub productivity_per_minute: u32,
    pub transactions_per_hour: u32,
}

impl Workflow {
    pub fn new_user(
        name: impl Into<String>,
        description: impl Into<String>,
        definition: WorkflowDef,
        user_count: u32,
        productivity_per_minute: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            definition,
            kind: WorkflowKind::User,
            user_count,
            productivity_per_minute,
            transactions_per_hour: 0,
        }
    }

    pub fn new_transactional(
        name: impl Into<String>,
        description: impl Into<String>,
        definition: WorkflowDef,
        transactions_per_hour: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            definition,
            kind: WorkflowKind::Transactional,
            user_count: 0,
            productivity_per_minute: 0,
            transactions_per_hour,
        }
    }

    /// Transactions per hour this workflow fires at: `user_count *
    /// productivity * 60` for USER workflows, the configured figure directly
    /// for TRANSACTIONAL ones.
    pub fn transaction_rate(&self) -> i64 {
        match self.kind {
            WorkflowKind::User => self.user_count as i64 * self.productivity_per_minute as i64 * 60,
            WorkflowKind::Transactional => self.transactions_per_hour as i64,
        }
    }

    /// Draws the next firing clock from `clock`: `3_600_000 / rate`
    /// milliseconds on average, jittered by a `Normal(mean, 0.25*mean)`
    /// sample, clamped to a minimum step of 1ms so firing times stay
    /// strictly increasing (Design Notes, Open Question 3).
    pub fn calculate_next_event_time(&self, clock: i64, rng: &mut dyn RandomSource) -> i64 {
        let rate = self.transaction_rate().max(1);
        let ms_per_event = 3_600_000.0 / rate as f64;
        let sample = rng.normal(ms_per_event, ms_per_event * 0.25);
        let delta = (sample as i64).max(1);
        clock + delta
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    pub fn validate(&self) -> Vec<ValidationMessage> {
        let mut result = Vec::new();
        if self.definition.chains.is_empty() {
            result.push(ValidationMessage::new(
                "Need at least one configured Workflow Chain",
                &self.name,
            ));
        }
        result.extend(self.definition.validate());
        if self.transaction_rate() < 0 {
            result.push(ValidationMessage::new(
                "Transaction rate must be greater than or equal to zero",
                &self.name,
            ));
        }
        result
    }
}
