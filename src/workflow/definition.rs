//! Workflow definitions: a named collection of parallel chains.

use crate::compute::ServiceProvider;
use crate::design::ValidationMessage;

use super::chain::WorkflowChain;

/// A set of chains that fire together as one transaction, plus the expected
/// think time between a user's transactions.
#[derive(Debug, Clone)]
pub struct WorkflowDef {
    pub name: String,
    pub description: String,
    pub think_time_s: u32,
    pub chains: Vec<WorkflowChain>,
}

impl WorkflowDef {
    pub fn new(name: impl Into<String>, description: impl Into<String>, think_time_s: u32, chains: Vec<WorkflowChain>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            think_time_s,
            chains,
        }
    }

    pub fn all_required_service_types(&self) -> std::collections::BTreeSet<String> {
        self.chains
            .iter()
            .flat_map(|c| c.all_required_service_types())
            .collect()
    }

    /// Assigns `provider` to every chain for its service type.
    pub fn assign_service_provider(&mut self, provider: ServiceProvider) {
        let service_type = provider.service.service_type.clone();
        for chain in &mut self.chains {
            chain.service_providers.insert(service_type.clone(), provider.clone());
        }
    }

    pub fn missing_service_providers(&self) -> Vec<String> {
        let mut result = std::collections::BTreeSet::new();
        for chain in &self.chains {
            result.extend(chain.missing_service_providers());
        }
        result.into_iter().collect()
    }

    pub fn clear_service_providers(&mut self) {
        for chain in &mut self.chains {
            chain.service_providers.clear();
        }
    }

    pub fn get_chain(&self, name: &str) -> Option<&WorkflowChain> {
        self.chains.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn get_chain_mut(&mut self, name: &str) -> Option<&mut WorkflowChain> {
        self.chains.iter_mut().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn validate(&self) -> Vec<ValidationMessage> {
        self.chains
            .iter()
            .filter(|c| !c.is_valid())
            .map(|c| ValidationMessage::new(format!("Workflow Chain {} is invalid", c.name), &self.name))
            .collect()
    }
}
