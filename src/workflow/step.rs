//! Workflow step definitions: one named hop in a workflow chain.

use serde::{Deserialize, Serialize};

use crate::types::DataSourceKind;

/// One step in a [`super::chain::WorkflowChain`]. Service time is expressed
/// relative to a hardware profile's `baseline_per_core` calibration and gets
/// rescaled per-node by [`crate::compute::node::ComputeNode::adjusted_service_time`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStepDef {
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub baseline_service_time_ms: i64,
    pub chatter: u32,
    pub request_size_kb: u32,
    pub response_size_kb: u32,
    pub data_source: DataSourceKind,
    pub cache_pct: u8,
}

impl WorkflowStepDef {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        service_type: impl Into<String>,
        baseline_service_time_ms: i64,
        chatter: u32,
        request_size_kb: u32,
        response_size_kb: u32,
        data_source: DataSourceKind,
        cache_pct: u8,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            service_type: service_type.into(),
            baseline_service_time_ms,
            chatter,
            request_size_kb,
            response_size_kb,
            data_source,
            cache_pct,
        }
    }
}
