//! The design: the CRUD surface and validation that produce the network,
//! compute fleet, service providers and workflows a [`crate::scheduler::Scheduler`]
//! runs against.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compute::{ComputeNode, ServiceDef, ServiceProvider};
use crate::queue::{Calculator, MultiQueue};
use crate::topology::{Link, Zone};
use crate::types::ComputeKind;
use crate::workflow::{Workflow, WorkflowDef};

/// One reason a [`Design`], a [`ServiceProvider`], or a workflow chain is
/// invalid, returned by the various `validate()` methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub message: String,
    pub source: String,
}

impl ValidationMessage {
    pub fn new(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: source.into(),
        }
    }
}

impl std::fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: \"{}\"", self.source, self.message)
    }
}

/// The full description of a simulated system: its zones and links, its
/// compute fleet, the services it knows about, the providers assigned to
/// them, and the workflows driving traffic through it.
#[derive(Debug, Clone, Default)]
pub struct Design {
    pub name: String,
    pub description: String,
    pub zones: Vec<Zone>,
    pub network: Vec<Link>,
    pub services: std::collections::BTreeMap<String, ServiceDef>,
    pub service_providers: Vec<ServiceProvider>,
    pub workflow_definitions: Vec<WorkflowDef>,
    workflows: Vec<Workflow>,
    compute_nodes: Vec<ComputeNode>,
}

impl Design {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// CLIENT and PHYSICAL nodes, plus each PHYSICAL node's hosted VIRTUAL
    /// nodes flattened in. Virtual nodes never live in the design's own
    /// top-level list — `add_compute_node` rejects them.
    pub fn compute_nodes(&self) -> Vec<&ComputeNode> {
        let mut result = Vec::new();
        for node in &self.compute_nodes {
            result.push(node);
            if matches!(node.kind, ComputeKind::Physical) {
                result.extend(node.virtual_hosts().iter());
            }
        }
        result
    }

    pub fn all_workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    pub fn all_workflows_mut(&mut self) -> &mut [Workflow] {
        &mut self.workflows
    }

    pub fn get_workflow(&self, name: &str) -> Option<&Workflow> {
        self.workflows.iter().find(|w| w.name == name)
    }

    pub fn get_workflow_mut(&mut self, name: &str) -> Option<&mut Workflow> {
        self.workflows.iter_mut().find(|w| w.name == name)
    }

    pub fn get_zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    pub fn get_compute_node(&self, name: &str) -> Option<&ComputeNode> {
        self.compute_nodes().into_iter().find(|n| n.name == name)
    }

    pub fn get_workflow_def(&self, name: &str) -> Option<&WorkflowDef> {
        self.workflow_definitions.iter().find(|w| w.name == name)
    }

    /// Appends `zone` (no-op if a zone with the same id is already present)
    /// and synthesizes its self-loop link.
    pub fn add_zone(&mut self, zone: Zone, local_bandwidth_mbps: u32, local_latency_ms: u32) {
        if self.zones.iter().any(|z| z.id() == zone.id()) {
            return;
        }
        let local_link = zone.self_connect(local_bandwidth_mbps, local_latency_ms);
        self.zones.push(zone);
        self.network.push(local_link);
    }

    /// Drops `zone`, every link touching it, every compute node in it, then
    /// cascades the service-provider and workflow-definition prunes.
    pub fn remove_zone(&mut self, zone_id: Uuid) {
        self.zones.retain(|z| z.id() != zone_id);
        self.network.retain(|link| link.source.id() != zone_id && link.destination.id() != zone_id);
        self.compute_nodes.retain(|n| n.zone.id() != zone_id);
        self.prune_service_providers();
        self.prune_workflow_definitions();
    }

    pub fn add_link(&mut self, link: Link) {
        self.network.push(link);
    }

    pub fn remove_link(&mut self, link: &Link) {
        self.network.retain(|l| l != link);
    }

    /// Rejects `VIRTUAL` nodes — attach those via the owning physical node's
    /// `add_virtual_host` instead.
    pub fn add_compute_node(&mut self, node: ComputeNode) {
        if matches!(node.kind, ComputeKind::Virtual) {
            return;
        }
        self.compute_nodes.push(node);
    }

    pub fn remove_compute_node(&mut self, node_id: Uuid) {
        self.compute_nodes.retain(|n| n.id() != node_id);
        self.prune_service_providers();
        self.prune_workflow_definitions();
    }

    pub fn compute_node_mut(&mut self, node_id: Uuid) -> Option<&mut ComputeNode> {
        self.compute_nodes.iter_mut().find(|n| n.id() == node_id)
    }

    pub fn add_service_def(&mut self, def: ServiceDef) {
        self.services.insert(def.service_type.clone(), def);
    }

    pub fn remove_service_def(&mut self, service_type: &str) {
        self.services.remove(service_type);
        self.prune_service_providers();
        self.prune_workflow_definitions();
    }

    pub fn add_service_provider(&mut self, provider: ServiceProvider) {
        if !self.service_providers.contains(&provider) {
            self.service_providers.push(provider);
        }
    }

    pub fn remove_service_provider(&mut self, provider: &ServiceProvider) {
        self.service_providers.retain(|p| p != provider);
        self.prune_workflow_definitions();
    }

    pub fn add_workflow_def(&mut self, def: WorkflowDef) {
        self.workflow_definitions.push(def);
    }

    pub fn remove_workflow_def(&mut self, name: &str) {
        self.workflow_definitions.retain(|d| d.name != name);
        self.prune_configured_workflows();
    }

    pub fn add_user_workflow(&mut self, name: impl Into<String>, def: WorkflowDef, user_count: u32, productivity_per_minute: u32) {
        self.workflows.push(Workflow::new_user(name, "", def, user_count, productivity_per_minute));
    }

    pub fn add_transactional_workflow(&mut self, name: impl Into<String>, def: WorkflowDef, transactions_per_hour: u32) {
        self.workflows.push(Workflow::new_transactional(name, "", def, transactions_per_hour));
    }

    pub fn remove_workflow(&mut self, name: &str) {
        self.workflows.retain(|w| w.name != name);
    }

    /// Drops providers whose service def no longer exists; for survivors,
    /// drops nodes no longer present in the design's compute node set.
    fn prune_service_providers(&mut self) {
        let known_types: std::collections::BTreeSet<&str> = self.services.keys().map(String::as_str).collect();
        self.service_providers.retain(|sp| known_types.contains(sp.service.service_type.as_str()));

        let known_ids: std::collections::BTreeSet<Uuid> = self.compute_nodes().into_iter().map(ComputeNode::id).collect();
        for sp in &mut self.service_providers {
            sp.nodes.retain(|n| known_ids.contains(&n.id()));
        }
    }

    /// For every chain in every workflow definition, drops `(service_type ->
    /// provider)` entries whose provider is no longer in the design's
    /// provider list.
    fn prune_workflow_definitions(&mut self) {
        for wdef in &mut self.workflow_definitions {
            for chain in &mut wdef.chains {
                chain.service_providers.retain(|_, sp| self.service_providers.contains(sp));
            }
        }
    }

    /// Drops workflows whose definition is no longer in the design's
    /// definition list.
    fn prune_configured_workflows(&mut self) {
        let known_defs: Vec<&str> = self.workflow_definitions.iter().map(|d| d.name.as_str()).collect();
        self.workflows.retain(|w| known_defs.contains(&w.definition.name.as_str()));
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    pub fn validate(&self) -> Vec<ValidationMessage> {
        let mut messages = Vec::new();

        let all_sps_valid = self.service_providers.iter().all(ServiceProvider::is_valid);
        let all_zones_connected = self.zones.iter().all(|z| z.is_fully_connected(&self.network));
        let all_workflows_valid = self.workflows.iter().all(Workflow::is_valid);

        let known_zone_ids: std::collections::BTreeSet<Uuid> = self
            .network
            .iter()
            .flat_map(|l| [l.source.id(), l.destination.id()])
            .collect();

        for workflow in &self.workflows {
            for chain in &workflow.definition.chains {
                for sp in chain.service_providers.values() {
                    for node in &sp.nodes {
                        if !known_zone_ids.contains(&node.zone.id()) {
                            messages.push(ValidationMessage::new(
                                format!("Node {} is in zone {} which is not in network", node.name, node.zone.name),
                                &sp.name,
                            ));
                        }
                    }
                }
            }
        }

        if !all_sps_valid {
            messages.push(ValidationMessage::new("Not all service providers are valid.", &self.name));
        }
        if !all_zones_connected {
            messages.push(ValidationMessage::new("Not all zones are fully connected.", &self.name));
        }
        if !all_workflows_valid {
            messages.push(ValidationMessage::new("One or more invalid workflows.", &self.name));
        }
        if self.zones.is_empty() {
            messages.push(ValidationMessage::new("No zones defined.", &self.name));
        }
        if self.network.is_empty() {
            messages.push(ValidationMessage::new("No network defined.", &self.name));
        }
        if self.compute_nodes().is_empty() {
            messages.push(ValidationMessage::new("No compute nodes configured.", &self.name));
        }
        if self.workflow_definitions.is_empty() {
            messages.push(ValidationMessage::new("No workflows defined.", &self.name));
        }
        if self.workflows.is_empty() {
            messages.push(ValidationMessage::new("No workflows configured.", &self.name));
        }
        if self.services.is_empty() {
            messages.push(ValidationMessage::new("No service types defined.", &self.name));
        }

        messages
    }

    /// One queue per link, one per compute node (including virtuals),
    /// paired with the calculator that drives it.
    pub fn provide_queues(&self) -> Vec<(Calculator, MultiQueue)> {
        let mut result: Vec<(Calculator, MultiQueue)> = self
            .network
            .iter()
            .map(|link| {
                let calculator = Calculator::Link(link.clone());
                let queue = calculator.provide_queue();
                (calculator, queue)
            })
            .collect();

        for node in self.compute_nodes() {
            let calculator = Calculator::Node(node.clone());
            let queue = calculator.provide_queue();
            result.push((calculator, queue));
        }

        result
    }
}
