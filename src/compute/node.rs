//! Compute nodes: clients, physical hosts and the virtual hosts a physical
//! host carries.

use uuid::Uuid;

use crate::metrics::StcKind;
use crate::planner::Request;
use crate::queue::MultiQueue;
use crate::topology::Zone;
use crate::types::{ComputeKind, ThreadingPolicy, WaitMode};

use super::hardware::{HardwareDef, BASELINE_PER_CORE};

/// A computing resource attached to a [`Zone`], driven by a [`HardwareDef`].
#[derive(Debug, Clone)]
pub struct ComputeNode {
    id: Uuid,
    pub name: String,
    pub description: String,
    pub hardware: HardwareDef,
    pub memory_gb: u32,
    pub zone: Zone,
    pub kind: ComputeKind,
    pub threading: ThreadingPolicy,
    vcore_count: u32,
    virtual_hosts: Vec<ComputeNode>,
}

impl ComputeNode {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        hardware: HardwareDef,
        memory_gb: u32,
        zone: Zone,
        kind: ComputeKind,
    ) -> Self {
        let threading = if matches!(kind, ComputeKind::Client) {
            ThreadingPolicy::Physical
        } else {
            ThreadingPolicy::Hyperthreaded
        };
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            hardware,
            memory_gb,
            zone,
            kind,
            threading,
            vcore_count: 0,
            virtual_hosts: Vec::new(),
        }
    }

    pub fn with_threading(mut self, threading: ThreadingPolicy) -> Self {
        self.threading = threading;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn vcore_count(&self) -> u32 {
        self.vcore_count
    }

    pub fn set_vcore_count(&mut self, count: u32) {
        if matches!(self.kind, ComputeKind::Virtual) {
            self.vcore_count = count;
        } else {
            self.vcore_count = 0;
        }
    }

    pub fn specint_rate2017_per_core(&self) -> f64 {
        self.hardware.specint_rate2017_per_core() * self.threading.factor()
    }

    /// Scales a workflow step's baseline service time by this node's
    /// relative performance against the baseline-per-core calibration.
    pub fn adjusted_service_time(&self, baseline_ms: i64) -> i64 {
        let relative = BASELINE_PER_CORE / self.specint_rate2017_per_core();
        (baseline_ms as f64 * relative) as i64
    }

    pub fn calculate_service_time(&self, request: &Request) -> Option<i64> {
        let step = request.solution.current_step()?;
        Some(self.adjusted_service_time(step.baseline_service_time_ms))
    }

    /// Only links carry latency; a compute node never does.
    pub fn calculate_latency(&self, _request: &Request) -> Option<i64> {
        None
    }

    pub fn stc_kind(&self) -> StcKind {
        match self.kind {
            ComputeKind::Client => StcKind::Client,
            ComputeKind::Physical => StcKind::PServer,
            ComputeKind::Virtual => StcKind::VServer,
        }
    }

    /// Channel count per spec.md §4.3: 1000 for clients (an unbounded-feeling
    /// crowd of user endpoints), physical core count for physical hosts, and
    /// vcore count for virtual hosts.
    pub fn provide_queue(&self) -> MultiQueue {
        let channel_count = match self.kind {
            ComputeKind::Client => 1000,
            ComputeKind::Physical => self.hardware.cores,
            ComputeKind::Virtual => self.vcore_count,
        };
        MultiQueue::new(self.name.clone(), self.stc_kind(), WaitMode::Processing, channel_count as usize)
    }

    /// Attaches a new virtual host to this physical node, sharing its
    /// hardware profile. Panics if this node is not a physical host — callers
    /// that need a fallible form should check `kind` first ([`ComputeNode::add_virtual_host`]
    /// mirrors the source's `TypeError`, which indicates programmer error).
    pub fn add_virtual_host(&mut self, name: impl Into<String>, vcores: u32, memory_gb: u32) -> Uuid {
        assert!(
            matches!(self.kind, ComputeKind::Physical),
            "virtual hosts can only be added to physical nodes"
        );
        let mut v = ComputeNode::new(name, "", self.hardware.clone(), memory_gb, self.zone.clone(), ComputeKind::Virtual);
        v.set_vcore_count(vcores);
        let id = v.id;
        self.virtual_hosts.push(v);
        id
    }

    pub fn remove_virtual_host(&mut self, virtual_id: Uuid) {
        self.virtual_hosts.retain(|v| v.id != virtual_id);
    }

    pub fn virtual_hosts(&self) -> &[ComputeNode] {
        &self.virtual_hosts
    }

    pub fn virtual_hosts_mut(&mut self) -> &mut Vec<ComputeNode> {
        &mut self.virtual_hosts
    }

    /// True iff `virtual_node` is hosted by this physical node. Used by the
    /// scheduler to roll a virtual queue's sampled work up into its physical
    /// host's `work_done` when gathering queue metrics.
    pub fn is_physical_host_for(&self, virtual_node: &ComputeNode) -> bool {
        self.virtual_hosts.iter().any(|v| v.id == virtual_node.id)
    }

    pub fn total_vcpu_allocation(&self) -> u32 {
        self.virtual_hosts.iter().map(|v| v.vcore_count()).sum()
    }

    pub fn total_cpu_allocation(&self) -> u32 {
        (self.total_vcpu_allocation() as f64 * self.threading.factor()) as u32
    }

    pub fn total_memory_allocation(&self) -> u32 {
        self.virtual_hosts.iter().map(|v| v.memory_gb).sum()
    }
}

impl PartialEq for ComputeNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComputeNode {}
