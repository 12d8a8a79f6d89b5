//! Route finding: shortest (by hop count) simple path of links between two
//! zones, always prefixed by the source zone's self-loop.

use petgraph::algo::all_simple_paths;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;
use uuid::Uuid;

use super::link::Link;
use super::zone::Zone;

/// An ordered sequence of links forming a path through the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub links: Vec<Link>,
}

impl Route {
    pub fn count(&self) -> usize {
        self.links.len()
    }
}

/// Finds the fewest-hops simple path from `start` to `end` over `network`,
/// prefixed by `start`'s self-loop.
///
/// Returns `None` if `start` is not a source of any link, `end` is not a
/// destination of any link, or `start` has no self-loop. Enumerates simple
/// paths (no zone visited twice) over non-local links only; among paths
/// reaching `end`, the fewest-links one wins, ties broken by enumeration
/// order, matching the exhaustive-DFS source behaviour.
pub fn find_route(start: &Zone, end: &Zone, network: &[Link]) -> Option<Route> {
    if !start.is_a_source(network) || !end.is_a_destination(network) {
        return None;
    }
    let local = start.local_link(network)?;

    let mut inter_zone = Vec::new();
    let mut index_of: FxHashMap<Uuid, NodeIndex> = FxHashMap::default();
    let mut graph: DiGraph<Uuid, ()> = DiGraph::new();

    for link in network.iter().filter(|l| !l.is_local()) {
        let src_idx = *index_of
            .entry(link.source.id())
            .or_insert_with(|| graph.add_node(link.source.id()));
        let dst_idx = *index_of
            .entry(link.destination.id())
            .or_insert_with(|| graph.add_node(link.destination.id()));
        graph.add_edge(src_idx, dst_idx, ());
        inter_zone.push(link);
    }

    if start.id() == end.id() {
        return Some(Route {
            links: vec![local.clone()],
        });
    }

    let (Some(&start_idx), Some(&end_idx)) = (index_of.get(&start.id()), index_of.get(&end.id())) else {
        return None;
    };

    let best_nodes: Option<Vec<NodeIndex>> =
        all_simple_paths::<Vec<NodeIndex>, _>(&graph, start_idx, end_idx, 0, None)
            .min_by_key(|path| path.len());

    let best_nodes = best_nodes?;

    let mut links = Vec::with_capacity(best_nodes.len());
    links.push(local.clone());
    for pair in best_nodes.windows(2) {
        let (src_idx, dst_idx) = (pair[0], pair[1]);
        let src_id = graph[src_idx];
        let dst_id = graph[dst_idx];
        let link = inter_zone
            .iter()
            .find(|l| l.source.id() == src_id && l.destination.id() == dst_id)
            .expect("edge in graph implies a backing link exists");
        links.push((*link).clone());
    }

    Some(Route { links })
}
