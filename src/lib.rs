//! # meshsim: discrete-event performance simulator for distributed compute topologies
//!
//! meshsim models a system of zones connected by links, compute nodes
//! hosting service providers, and workflows that fire requests through
//! chains of those providers. A [`scheduler::Scheduler`] drives the whole
//! thing through logical time one event at a time — a workflow firing or a
//! queue completion — and reports per-request and per-queue metrics as it
//! goes.
//!
//! ## Core Concepts
//!
//! - **Topology**: [`topology::Zone`]s joined by one-way [`topology::Link`]s;
//!   [`topology::find_route`] resolves the shortest hop-count path between two
//!   zones.
//! - **Compute**: [`compute::ComputeNode`]s (clients, physical hosts, the
//!   virtual hosts a physical host carries) pooled by
//!   [`compute::ServiceProvider`] under a balancing policy.
//! - **Workflow**: a [`workflow::WorkflowDef`] is a named set of
//!   [`workflow::WorkflowChain`]s; a [`workflow::Workflow`] configures one to
//!   fire at a user- or transaction-driven rate.
//! - **Planner**: [`planner::create_solution`] expands a chain into the
//!   ordered list of queue hops — [`planner::RequestSolution`] — a request
//!   must traverse, forward then back.
//! - **Queueing**: [`queue::MultiQueue`] is the fixed-channel-plus-backlog
//!   server every [`queue::Calculator`] (node or link) drives.
//! - **Design**: [`design::Design`] is the full CRUD surface over zones,
//!   links, compute, services and workflows, plus validation.
//! - **Scheduler**: [`scheduler::Scheduler`] ties it together into a runnable
//!   simulation.
//!
//! ## Quick Start
//!
//! ```
//! use meshsim::compute::{ComputeNode, HardwareDef, ServiceDef, ServiceProvider};
//! use meshsim::design::Design;
//! use meshsim::random::StdRandomSource;
//! use meshsim::scheduler::Scheduler;
//! use meshsim::topology::Zone;
//! use meshsim::types::{BalancingPolicy, ComputeKind, MeteringMode};
//! use meshsim::workflow::{WorkflowChain, WorkflowDef, WorkflowStepDef};
//!
//! let mut design = Design::new("two-zone", "a client zone and a server zone");
//! let client_zone = Zone::new("field", "");
//! let server_zone = Zone::new("dc1", "");
//! design.add_zone(client_zone.clone(), 10_000, 0);
//! design.add_zone(server_zone.clone(), 10_000, 0);
//! let (out, back) = client_zone.connect_both_ways(&server_zone, 1_000, 20);
//! design.add_link(out);
//! design.add_link(back);
//!
//! let hardware = HardwareDef::new("generic", 4, 40.0);
//! let client = ComputeNode::new("client", "", hardware.clone(), 8, client_zone, ComputeKind::Client);
//! let server = ComputeNode::new("server", "", hardware, 16, server_zone, ComputeKind::Physical);
//! design.add_compute_node(client.clone());
//! design.add_compute_node(server.clone());
//!
//! let service = ServiceDef::new("api", "", "api", BalancingPolicy::Single);
//! design.add_service_def(service.clone());
//! let mut provider = ServiceProvider::new("api-provider", "", service, vec![server]);
//! provider.set_primary(0);
//! design.add_service_provider(provider.clone());
//!
//! let step = WorkflowStepDef::new("call-api", "", "api", 10, 1, 4, 4, meshsim::types::DataSourceKind::Relational, 0);
//! let mut chain = WorkflowChain::new("main", "", vec![step]);
//! chain.service_providers.insert("api".to_string(), provider);
//! let def = WorkflowDef::new("roundtrip", "", 1, vec![chain]);
//! design.add_workflow_def(def.clone());
//! design.add_transactional_workflow("roundtrip", def, 3_600);
//!
//! let rng = Box::new(StdRandomSource::new(42));
//! let mut scheduler = Scheduler::new(design, MeteringMode::Summary, rng);
//! scheduler.start().expect("valid design");
//! scheduler.advance_time_by(60_000).expect("positive delta");
//! assert!(scheduler.clock() >= 60_000);
//! ```
//!
//! ## Module Guide
//!
//! - [`topology`] — zones, links, route finding
//! - [`compute`] — hardware profiles, compute nodes, service providers
//! - [`workflow`] — step/chain/definition/workflow configuration
//! - [`planner`] — chain-to-solution expansion
//! - [`queue`] — the multi-channel queue and its calculators
//! - [`metrics`] — queue and request metric records
//! - [`design`] — the CRUD and validation surface
//! - [`scheduler`] — the discrete-event tick loop
//! - [`random`] — the injected randomness seam
//! - [`error`] — the error types each subsystem returns
//! - [`telemetry`] — tracing subscriber setup

pub mod compute;
pub mod design;
pub mod error;
pub mod metrics;
pub mod planner;
pub mod queue;
pub mod random;
pub mod scheduler;
pub mod telemetry;
pub mod topology;
pub mod types;
pub mod workflow;
