//! Small shared enums used across the topology, compute and queue modules.

use serde::{Deserialize, Serialize};

/// The mode a waiting-request is in while it occupies a channel or backlog
/// slot of a [`crate::queue::MultiQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaitMode {
    /// Occupying a link channel: the request is in flight on the wire.
    Transmitting,
    /// Occupying a compute-node channel: the request is being processed.
    Processing,
    /// Sitting in the backlog, waiting for a channel to free up.
    Queueing,
}

/// Whether a finished request contributes one rolled-up summary metric or
/// every per-step metric it accumulated along the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeteringMode {
    #[default]
    Summary,
    Debug,
}

/// The kind of calculator driving a queue, used as the `stc_type` tag on
/// [`crate::metrics::QueueMetric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StcKind {
    Client,
    PServer,
    VServer,
    Connection,
    Unknown,
}

/// The role a [`crate::compute::node::ComputeNode`] plays in the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputeKind {
    Client,
    Physical,
    Virtual,
}

/// Factor applied to a virtual node's per-core score relative to its host's
/// raw SPECintRate2017-per-core figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadingPolicy {
    Physical,
    Hyperthreaded,
}

impl ThreadingPolicy {
    /// PHYSICAL cores count in full; HYPERTHREADED cores are discounted.
    pub fn factor(self) -> f64 {
        match self {
            ThreadingPolicy::Physical => 1.0,
            ThreadingPolicy::Hyperthreaded => 0.5,
        }
    }
}

/// How a [`crate::compute::provider::ServiceProvider`] picks a node for a
/// given request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalancingPolicy {
    Single,
    RoundRobin,
    Failover,
    Containerized,
    Other,
}

impl BalancingPolicy {
    /// Case-insensitive parser matching the original catalog's string
    /// encoding (`"1"`, `"ROUNDROBIN"`, `"FAILOVER"`, `"CONTAINER"`, else
    /// `OTHER`).
    pub fn from_catalog_str(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "1" | "SINGLE" => BalancingPolicy::Single,
            "ROUNDROBIN" => BalancingPolicy::RoundRobin,
            "FAILOVER" => BalancingPolicy::Failover,
            "CONTAINER" | "CONTAINERIZED" => BalancingPolicy::Containerized,
            _ => BalancingPolicy::Other,
        }
    }
}

/// Where a workflow step's working set notionally lives; carried through
/// for downstream cache-hit-rate analysis, unused by the core calculators.
/// Not fully integrated (yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSourceKind {
    Relational,
    Object,
    File,
    Dbms,
    Big,
    Other,
    None,
}

impl DataSourceKind {
    /// Case-insensitive parser matching the original catalog's string
    /// encoding (`"relational"`, `"object"`, `"file"`, `"dbms"`, `"big"`,
    /// `"none"`, else `OTHER`).
    pub fn from_catalog_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "relational" => DataSourceKind::Relational,
            "object" => DataSourceKind::Object,
            "file" => DataSourceKind::File,
            "dbms" => DataSourceKind::Dbms,
            "big" => DataSourceKind::Big,
            "none" => DataSourceKind::None,
            _ => DataSourceKind::Other,
        }
    }
}

/// The rate source backing a [`crate::workflow::workflow::Workflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowKind {
    User,
    Transactional,
}
