//! Workflow chains: an ordered sequence of steps plus the service providers
//! resolved for each step's service type.

use rustc_hash::FxHashMap;

use crate::compute::ServiceProvider;
use crate::design::ValidationMessage;

use super::step::WorkflowStepDef;

/// An ordered sequence of steps, with a `service_type -> ServiceProvider`
/// mapping that the planner consults to resolve each step to a node.
#[derive(Debug, Clone)]
pub struct WorkflowChain {
    pub name: String,
    pub description: String,
    pub steps: Vec<WorkflowStepDef>,
    pub service_providers: FxHashMap<String, ServiceProvider>,
}

impl WorkflowChain {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        steps: Vec<WorkflowStepDef>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            steps,
            service_providers: FxHashMap::default(),
        }
    }

    /// Replaces the first step in the chain, useful when several chains
    /// differ only in their client-facing step.
    pub fn update_client_step(&mut self, client_step: WorkflowStepDef) {
        if !self.steps.is_empty() {
            self.steps.remove(0);
        }
        self.steps.insert(0, client_step);
    }

    pub fn all_required_service_types(&self) -> std::collections::BTreeSet<String> {
        self.steps.iter().map(|s| s.service_type.clone()).collect()
    }

    pub fn configured_service_types(&self) -> std::collections::BTreeSet<String> {
        self.service_providers.keys().cloned().collect()
    }

    pub fn missing_service_providers(&self) -> Vec<String> {
        self.all_required_service_types()
            .difference(&self.configured_service_types())
            .cloned()
            .collect()
    }

    pub fn service_provider_for_step(&self, step: &WorkflowStepDef) -> Option<&ServiceProvider> {
        self.service_providers.get(&step.service_type)
    }

    pub fn service_provider_for_step_mut(&mut self, step: &WorkflowStepDef) -> Option<&mut ServiceProvider> {
        self.service_providers.get_mut(&step.service_type)
    }

    pub fn service_provider_for_step_at_index(&self, index: usize) -> Option<&ServiceProvider> {
        self.steps.get(index).and_then(|step| self.service_provider_for_step(step))
    }

    pub fn service_provider_for_step_at_index_mut(&mut self, index: usize) -> Option<&mut ServiceProvider> {
        let service_type = self.steps.get(index)?.service_type.clone();
        self.service_providers.get_mut(&service_type)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    pub fn validate(&self) -> Vec<ValidationMessage> {
        self.missing_service_providers()
            .into_iter()
            .map(|missing| ValidationMessage::new(format!("Missing service provider for {missing}"), &self.name))
            .collect()
    }
}
