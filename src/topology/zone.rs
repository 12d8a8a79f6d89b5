//! Zones: the abstract network regions compute nodes live in.

use uuid::Uuid;

use super::link::Link;

/// A network region. Identity is by a construction-time id, not by name —
/// two zones created with the same name and description are still distinct,
/// mirroring the source's reliance on default (reference) equality.
#[derive(Debug, Clone)]
pub struct Zone {
    id: Uuid,
    pub name: String,
    pub description: String,
}

impl Zone {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Builds the one-way link `self -> other`.
    pub fn connect(&self, other: &Zone, bandwidth_mbps: u32, latency_ms: u32) -> Link {
        Link::new(self.clone(), other.clone(), bandwidth_mbps, latency_ms)
    }

    /// Builds both directions of a two-way connection to `other`.
    pub fn connect_both_ways(&self, other: &Zone, bandwidth_mbps: u32, latency_ms: u32) -> (Link, Link) {
        let forward = self.connect(other, bandwidth_mbps, latency_ms);
        let backward = forward.inverted();
        (forward, backward)
    }

    /// Builds this zone's self-loop.
    pub fn self_connect(&self, bandwidth_mbps: u32, latency_ms: u32) -> Link {
        self.connect(self, bandwidth_mbps, latency_ms)
    }

    /// The first link in `network` whose source and destination are both
    /// this zone. By construction (`Design::add_zone` synthesizes exactly
    /// one self-loop per zone) first match and unique match coincide.
    pub fn local_link<'a>(&self, network: &'a [Link]) -> Option<&'a Link> {
        network
            .iter()
            .find(|link| link.source.id() == self.id && link.destination.id() == self.id)
    }

    pub fn links<'a>(&self, network: &'a [Link]) -> Vec<&'a Link> {
        network
            .iter()
            .filter(|link| link.source.id() == self.id || link.destination.id() == self.id)
            .collect()
    }

    pub fn entry_links<'a>(&self, network: &'a [Link]) -> Vec<&'a Link> {
        network
            .iter()
            .filter(|link| !link.is_local() && link.destination.id() == self.id)
            .collect()
    }

    pub fn exit_links<'a>(&self, network: &'a [Link]) -> Vec<&'a Link> {
        network
            .iter()
            .filter(|link| !link.is_local() && link.source.id() == self.id)
            .collect()
    }

    pub fn other_links<'a>(&self, network: &'a [Link]) -> Vec<&'a Link> {
        network
            .iter()
            .filter(|link| link.source.id() != self.id && link.destination.id() != self.id)
            .collect()
    }

    pub fn is_a_source(&self, network: &[Link]) -> bool {
        network.iter().any(|link| link.source.id() == self.id)
    }

    pub fn is_a_destination(&self, network: &[Link]) -> bool {
        network.iter().any(|link| link.destination.id() == self.id)
    }

    /// A zone is fully connected iff it has a self-loop and at least one
    /// entry and one exit link.
    pub fn is_fully_connected(&self, network: &[Link]) -> bool {
        self.local_link(network).is_some()
            && !self.entry_links(network).is_empty()
            && !self.exit_links(network).is_empty()
    }
}

impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Zone {}

impl std::hash::Hash for Zone {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
