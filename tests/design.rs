mod common;

use common::{baseline_hardware, client_node, physical_node, step, zone};
use meshsim::compute::{ServiceDef, ServiceProvider};
use meshsim::design::Design;
use meshsim::types::{BalancingPolicy, ComputeKind};
use meshsim::workflow::{WorkflowChain, WorkflowDef};

fn minimal_valid_design() -> Design {
    let mut design = Design::new("minimal", "");
    let client_zone = zone("field");
    let server_zone = zone("dc1");
    design.add_zone(client_zone.clone(), 1_000, 0);
    design.add_zone(server_zone.clone(), 1_000, 0);
    let (out, back) = client_zone.connect_both_ways(&server_zone, 1_000, 5);
    design.add_link(out);
    design.add_link(back);

    let client = client_node("client", &client_zone);
    let server = physical_node("server", &server_zone);
    design.add_compute_node(client);
    design.add_compute_node(server.clone());

    let service = ServiceDef::new("web", "", "web", BalancingPolicy::Single);
    design.add_service_def(service.clone());
    let provider = ServiceProvider::new("web-provider", "", service, vec![server]);
    design.add_service_provider(provider.clone());

    let mut chain = WorkflowChain::new("chain", "", vec![step("web-step", "web", 10, 1, 1)]);
    chain.service_providers.insert("web".to_string(), provider);
    let def = WorkflowDef::new("def", "", 1, vec![chain]);
    design.add_workflow_def(def.clone());
    design.add_transactional_workflow("wf", def, 3_600);

    design
}

#[test]
fn minimal_design_validates_clean() {
    let design = minimal_valid_design();
    assert!(design.is_valid(), "{:?}", design.validate());
}

#[test]
fn add_zone_is_idempotent_on_id_and_synthesizes_self_loop() {
    let mut design = Design::new("d", "");
    let z = zone("L");
    design.add_zone(z.clone(), 1_000, 0);
    design.add_zone(z.clone(), 1_000, 0);
    assert_eq!(design.zones.len(), 1);
    assert_eq!(design.network.len(), 1);
    assert!(design.network[0].is_local());
}

#[test]
fn compute_nodes_flattens_virtual_hosts_of_physical_nodes() {
    let mut design = Design::new("d", "");
    let z = zone("L");
    design.add_zone(z.clone(), 1_000, 0);
    let mut server = physical_node("server", &z);
    server.add_virtual_host("vm1", 4, 8);
    design.add_compute_node(server);

    assert_eq!(design.compute_nodes().len(), 2);
}

#[test]
fn add_compute_node_rejects_virtual_kind() {
    let mut design = Design::new("d", "");
    let z = zone("L");
    design.add_zone(z.clone(), 1_000, 0);
    let hardware = baseline_hardware();
    let virtual_node = meshsim::compute::ComputeNode::new("vm", "", hardware, 4, z, ComputeKind::Virtual);
    design.add_compute_node(virtual_node);
    assert!(design.compute_nodes().is_empty());
}

#[test]
fn removing_zone_cascades_to_compute_nodes_and_providers() {
    let mut design = minimal_valid_design();
    // "server" (the service provider's only node) lives in the second zone added.
    let server_zone_id = design.zones[1].id();

    design.remove_zone(server_zone_id);

    assert_eq!(design.zones.len(), 1);
    assert!(design.network.iter().all(|l| l.is_local()), "every inter-zone link touched the removed zone");
    assert_eq!(design.compute_nodes().len(), 1, "only the client node remains");
    assert!(design.service_providers.is_empty(), "provider's only node is gone");
}

#[test]
fn removing_service_def_prunes_providers_and_chain_assignments() {
    let mut design = minimal_valid_design();
    design.remove_service_def("web");

    assert!(design.service_providers.is_empty());
    for wdef in &design.workflow_definitions {
        for chain in &wdef.chains {
            assert!(chain.service_providers.is_empty());
        }
    }
}

#[test]
fn removing_workflow_def_prunes_configured_workflows() {
    let mut design = minimal_valid_design();
    assert_eq!(design.all_workflows().len(), 1);
    design.remove_workflow_def("def");
    assert!(design.all_workflows().is_empty());
}

#[test]
fn validate_reports_missing_pieces_and_shrinks_as_they_are_filled_in() {
    let mut design = Design::new("empty", "");
    let messages = design.validate();
    assert!(messages.iter().any(|m| m.message.contains("No zones")));
    assert!(messages.iter().any(|m| m.message.contains("No network")));
    assert!(messages.iter().any(|m| m.message.contains("No compute nodes")));

    let z = zone("L");
    design.add_zone(z, 1_000, 0);
    let messages_with_zone = design.validate();
    assert!(!messages_with_zone.iter().any(|m| m.message.contains("No zones")));
    assert!(!messages_with_zone.iter().any(|m| m.message.contains("No network")));
}

#[test]
fn provide_queues_covers_every_link_and_compute_node() {
    let design = minimal_valid_design();
    let queues = design.provide_queues();
    assert_eq!(queues.len(), design.network.len() + design.compute_nodes().len());
}
