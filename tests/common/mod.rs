use meshsim::compute::{ComputeNode, HardwareDef, ServiceDef, ServiceProvider};
use meshsim::design::Design;
use meshsim::planner::{Request, RequestSolution, SolutionStep};
use meshsim::queue::Calculator;
use meshsim::topology::Zone;
use meshsim::types::{BalancingPolicy, ComputeKind, DataSourceKind};
use meshsim::workflow::{WorkflowChain, WorkflowStepDef};

/// A hardware profile whose per-core score equals `BASELINE_PER_CORE`, so
/// `adjusted_service_time` is an identity transform — useful whenever a test
/// wants to assert on raw baseline service times.
pub fn baseline_hardware() -> HardwareDef {
    HardwareDef::new("baseline", 10, 100.0)
}

pub fn zone(name: &str) -> Zone {
    Zone::new(name, "")
}

pub fn physical_node(name: &str, zone: &Zone) -> ComputeNode {
    ComputeNode::new(name, "", baseline_hardware(), 32, zone.clone(), ComputeKind::Physical)
}

pub fn client_node(name: &str, zone: &Zone) -> ComputeNode {
    ComputeNode::new(name, "", baseline_hardware(), 8, zone.clone(), ComputeKind::Client)
}

pub fn single_provider(name: &str, service_type: &str, node: ComputeNode) -> ServiceProvider {
    let service = ServiceDef::new(name, "", service_type, BalancingPolicy::Single);
    ServiceProvider::new(name, "", service, vec![node])
}

pub fn round_robin_provider(name: &str, service_type: &str, nodes: Vec<ComputeNode>) -> ServiceProvider {
    let service = ServiceDef::new(name, "", service_type, BalancingPolicy::RoundRobin);
    ServiceProvider::new(name, "", service, nodes)
}

pub fn step(
    name: &str,
    service_type: &str,
    baseline_ms: i64,
    request_kb: u32,
    response_kb: u32,
) -> WorkflowStepDef {
    WorkflowStepDef::new(name, "", service_type, baseline_ms, 1, request_kb, response_kb, DataSourceKind::Relational, 0)
}

/// A two-step chain (`client-step` -> `web-step`) with both steps serviced by
/// `node` under a SINGLE provider — Scenario A's topology from spec.md §8.
pub fn single_zone_round_trip_chain(zone: &Zone) -> (WorkflowChain, ComputeNode) {
    let node = physical_node("P", zone);
    let provider = single_provider("S_web", "web", node.clone());

    let mut chain = WorkflowChain::new(
        "round-trip",
        "",
        vec![
            step("client-step", "web", 20, 100, 2134),
            step("web-step", "web", 18, 100, 2134),
        ],
    );
    chain.service_providers.insert("web".to_string(), provider);
    (chain, node)
}

/// An empty design with one zone and its self-loop — enough scaffolding for
/// tests that only need the network layer.
pub fn design_with_one_zone(name: &str) -> (Design, Zone) {
    let mut design = Design::new(name, "");
    let z = zone("L");
    design.add_zone(z.clone(), 1_000, 0);
    (design, z)
}

/// A request with a single pending solution step, for exercising a
/// [`meshsim::queue::MultiQueue`] in isolation without going through the
/// planner or scheduler.
pub fn single_step_request(name: &str, calculator: Calculator, baseline_ms: i64, clock: i64) -> Request {
    let solution = RequestSolution::new(vec![SolutionStep {
        calculator,
        is_response: false,
        data_size_kb: 1,
        chatter: 1,
        baseline_service_time_ms: baseline_ms,
    }]);
    Request::new(name, "test-workflow", clock, solution, 0)
}
