//! Metric records emitted by queues and requests.

use serde::{Deserialize, Serialize};

pub use crate::types::StcKind;

/// A utilisation sample for one queue, taken at a point in logical time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueMetric {
    pub source: String,
    pub stc_kind: StcKind,
    pub clock: i64,
    pub channel_count: usize,
    pub request_count: usize,
    pub utilisation: f64,
}

/// A record of how long a request spent in service, in queue, and in
/// network latency for one step — or, summarised, for its whole traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMetric {
    pub source: String,
    pub clock: i64,
    pub request_name: String,
    pub workflow_name: String,
    pub service_time: i64,
    pub queue_time: i64,
    pub latency_time: i64,
}
