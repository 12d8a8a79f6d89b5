//! Links: one-way channels between zones.

use crate::metrics::StcKind;
use crate::planner::Request;
use crate::queue::MultiQueue;
use crate::types::WaitMode;

use super::zone::Zone;

/// A one-way channel between two zones (which may be the same zone, in
/// which case it is a self-loop). Two-way connectivity is modelled as a
/// pair of `Link`s with swapped endpoints.
#[derive(Debug, Clone)]
pub struct Link {
    pub source: Zone,
    pub destination: Zone,
    pub bandwidth_mbps: u32,
    pub latency_ms: u32,
}

impl Link {
    pub fn new(source: Zone, destination: Zone, bandwidth_mbps: u32, latency_ms: u32) -> Self {
        Self {
            source,
            destination,
            bandwidth_mbps,
            latency_ms,
        }
    }

    pub fn name(&self) -> String {
        format!("{} to {}", self.source.name, self.destination.name)
    }

    pub fn is_local(&self) -> bool {
        self.source.id() == self.destination.id()
    }

    /// A copy of this link with source and destination swapped.
    pub fn inverted(&self) -> Link {
        Link::new(
            self.destination.clone(),
            self.source.clone(),
            self.bandwidth_mbps,
            self.latency_ms,
        )
    }

    /// `data_size_kB * 8 / bandwidth_mbps`, integer-truncated. The source's
    /// `bandwidth * 1000 / 1000` conversion is a no-op and is simplified away
    /// here; see Open Question 1.
    pub fn calculate_service_time(&self, request: &Request) -> Option<i64> {
        let step = request.solution.current_step()?;
        let data_kbit = step.data_size_kb as i64 * 8;
        Some(data_kbit / self.bandwidth_mbps as i64)
    }

    pub fn calculate_latency(&self, request: &Request) -> Option<i64> {
        let step = request.solution.current_step()?;
        Some(self.latency_ms as i64 * step.chatter as i64)
    }

    pub fn provide_queue(&self) -> MultiQueue {
        MultiQueue::new(self.name(), StcKind::Connection, WaitMode::Transmitting, 2)
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.destination == other.destination
            && self.bandwidth_mbps == other.bandwidth_mbps
            && self.latency_ms == other.latency_ms
    }
}

impl Eq for Link {}
