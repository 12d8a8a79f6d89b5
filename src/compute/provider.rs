//! Service definitions and providers: named pools of nodes serving one
//! service type under a balancing policy.

use serde::{Deserialize, Serialize};

use crate::design::ValidationMessage;
use crate::types::BalancingPolicy;

use super::node::ComputeNode;

/// A tag identifying the service type a [`ServiceProvider`] handles, and how
/// it balances requests across its nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDef {
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub balancing_policy: BalancingPolicy,
}

impl ServiceDef {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        service_type: impl Into<String>,
        balancing_policy: BalancingPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            service_type: service_type.into(),
            balancing_policy,
        }
    }
}

/// A named pool of compute nodes handling one service type.
#[derive(Debug, Clone)]
pub struct ServiceProvider {
    pub name: String,
    pub description: String,
    pub service: ServiceDef,
    pub nodes: Vec<ComputeNode>,
    pub tags: std::collections::BTreeSet<String>,
    primary: usize,
}

impl ServiceProvider {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        service: ServiceDef,
        nodes: Vec<ComputeNode>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            service,
            nodes,
            tags: std::collections::BTreeSet::new(),
            primary: 0,
        }
    }

    pub fn primary(&self) -> usize {
        match self.service.balancing_policy {
            BalancingPolicy::Single => 0,
            _ => self.primary,
        }
    }

    pub fn set_primary(&mut self, value: usize) {
        if value < self.nodes.len() {
            self.primary = value;
        }
    }

    fn rotate_primary(&mut self) -> usize {
        self.primary = (self.primary + 1) % self.nodes.len();
        self.primary
    }

    /// Returns the current primary node. `ROUND_ROBIN` rotates the primary
    /// as a side effect of the call; the other policies leave it in place.
    pub fn handler_node(&mut self) -> Option<&ComputeNode> {
        if self.nodes.is_empty() {
            return None;
        }
        let index = self.primary();
        if self.service.balancing_policy == BalancingPolicy::RoundRobin {
            self.rotate_primary();
        }
        self.nodes.get(index)
    }

    /// Rejects the node when the balancing policy has no room for it:
    /// `SINGLE` already has one node, `FAILOVER` already has two.
    pub fn add_node(&mut self, node: ComputeNode) {
        match self.service.balancing_policy {
            BalancingPolicy::Single if !self.nodes.is_empty() => return,
            BalancingPolicy::Failover if self.nodes.len() > 1 => return,
            _ => {}
        }
        self.nodes.push(node);
    }

    pub fn remove_node(&mut self, node_id: uuid::Uuid) {
        self.nodes.retain(|n| n.id() != node_id);
        self.primary = 0;
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    pub fn validate(&self) -> Vec<ValidationMessage> {
        let mut messages = Vec::new();
        if self.nodes.is_empty() {
            messages.push(ValidationMessage::new(
                "Service Provider must have at least one node",
                &self.name,
            ));
        }
        if self.nodes.is_empty() || self.primary() >= self.nodes.len() {
            messages.push(ValidationMessage::new(
                "Service Provider handler node is None",
                &self.name,
            ));
        }
        messages
    }
}

impl PartialEq for ServiceProvider {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.service == other.service
    }
}

impl Eq for ServiceProvider {}
