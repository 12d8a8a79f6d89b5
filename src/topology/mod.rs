//! Zones, links and route finding — the network layer requests travel over.

pub mod link;
pub mod route;
pub mod zone;

pub use link::Link;
pub use route::{find_route, Route};
pub use zone::Zone;
