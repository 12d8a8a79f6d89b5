//! The solution planner: expands a workflow chain into the ordered list of
//! queue hops a request must traverse, forward then back.

use std::collections::VecDeque;

use crate::compute::ComputeNode;
use crate::error::PlanningError;
use crate::metrics::RequestMetric;
use crate::queue::Calculator;
use crate::topology::{find_route, Link};
use crate::workflow::chain::WorkflowChain;

/// One hop in a [`RequestSolution`]: which calculator to run the request
/// through, whether this is a forward or return-trip hop, and the inputs
/// the calculator needs.
#[derive(Debug, Clone)]
pub struct SolutionStep {
    pub calculator: Calculator,
    pub is_response: bool,
    pub data_size_kb: u32,
    pub chatter: u32,
    pub baseline_service_time_ms: i64,
}

/// The ordered, mutable-by-consumption list of hops a [`Request`] still has
/// to perform.
#[derive(Debug, Clone, Default)]
pub struct RequestSolution {
    pub steps: VecDeque<SolutionStep>,
}

impl RequestSolution {
    pub fn new(steps: Vec<SolutionStep>) -> Self {
        Self { steps: steps.into() }
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn current_step(&self) -> Option<&SolutionStep> {
        self.steps.front()
    }

    pub fn goto_next_step(&mut self) {
        self.steps.pop_front();
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A single request traversing a resolved chain. Created when a
/// [`crate::workflow::Transaction`] fires, one per chain in the workflow's
/// definition.
#[derive(Debug, Clone)]
pub struct Request {
    pub name: String,
    pub workflow_name: String,
    pub request_clock: i64,
    pub solution: RequestSolution,
    pub tx_id: u64,
    pub accumulating_metrics: Vec<RequestMetric>,
}

impl Request {
    pub fn new(name: impl Into<String>, workflow_name: impl Into<String>, request_clock: i64, solution: RequestSolution, tx_id: u64) -> Self {
        Self {
            name: name.into(),
            workflow_name: workflow_name.into(),
            request_clock,
            solution,
            tx_id,
            accumulating_metrics: Vec::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.solution.is_finished()
    }

    /// Sums the accumulated per-step metrics into one `"Summary"`-sourced
    /// record. Clock is the first step's clock, or 0 if nothing accumulated.
    pub fn summary_metric(&self) -> RequestMetric {
        let clock = self.accumulating_metrics.first().map(|m| m.clock).unwrap_or(0);
        let (mut st, mut qt, mut lt) = (0i64, 0i64, 0i64);
        for m in &self.accumulating_metrics {
            st += m.service_time;
            qt += m.queue_time;
            lt += m.latency_time;
        }
        RequestMetric {
            source: "Summary".to_string(),
            clock,
            request_name: self.name.clone(),
            workflow_name: self.workflow_name.clone(),
            service_time: st,
            queue_time: qt,
            latency_time: lt,
        }
    }
}

/// Expands `chain` into a [`RequestSolution`]: forward pass resolving each
/// step's provider to a node (inserting network hops on zone crossings),
/// then a retrace back to the client. Per spec, forward and retrace handler
/// resolution are independent calls — a `ROUND_ROBIN` provider consulted on
/// both legs may hand back a different node on the way back (Design Notes,
/// Open Question 4).
pub fn create_solution(chain: &mut WorkflowChain, network: &[Link]) -> Result<RequestSolution, PlanningError> {
    if !chain.is_valid() {
        return Err(PlanningError::InvalidChain {
            chain: chain.name.clone(),
            missing: chain.missing_service_providers(),
        });
    }

    let mut steps: Vec<SolutionStep> = Vec::new();

    let step0 = chain.steps[0].clone();
    let mut source_node = resolve_handler(chain, 0)?;
    steps.push(SolutionStep {
        calculator: Calculator::Node(source_node.clone()),
        is_response: false,
        data_size_kb: step0.request_size_kb,
        chatter: 0,
        baseline_service_time_ms: step0.baseline_service_time_ms,
    });

    for i in 1..chain.steps.len() {
        let step_i = chain.steps[i].clone();
        let dest_node = resolve_handler(chain, i)?;

        if source_node.zone != dest_node.zone {
            append_route_hops(&mut steps, &source_node, &dest_node, network, step_i.request_size_kb, step_i.chatter, false)?;
        }

        steps.push(SolutionStep {
            calculator: Calculator::Node(dest_node.clone()),
            is_response: false,
            data_size_kb: step_i.request_size_kb,
            chatter: 0,
            baseline_service_time_ms: step_i.baseline_service_time_ms,
        });
        source_node = dest_node;
    }

    let mut current_node = source_node;
    for i in (0..chain.steps.len().saturating_sub(1)).rev() {
        let step_i = chain.steps[i].clone();
        let dest_node = resolve_handler(chain, i)?;

        if current_node.zone != dest_node.zone {
            append_route_hops(&mut steps, &current_node, &dest_node, network, step_i.response_size_kb, step_i.chatter, true)?;
        }

        steps.push(SolutionStep {
            calculator: Calculator::Node(dest_node.clone()),
            is_response: true,
            data_size_kb: step_i.response_size_kb,
            chatter: 0,
            baseline_service_time_ms: step_i.baseline_service_time_ms,
        });
        current_node = dest_node;
    }

    Ok(RequestSolution::new(steps))
}

fn resolve_handler(chain: &mut WorkflowChain, index: usize) -> Result<ComputeNode, PlanningError> {
    let step_name = chain.steps[index].name.clone();
    let provider = chain
        .service_provider_for_step_at_index_mut(index)
        .ok_or_else(|| PlanningError::InvalidChain {
            chain: chain.name.clone(),
            missing: vec![step_name.clone()],
        })?;
    let provider_name = provider.name.clone();
    provider
        .handler_node()
        .cloned()
        .ok_or(PlanningError::NoHandlerNode { provider: provider_name })
}

#[allow(clippy::too_many_arguments)]
fn append_route_hops(
    steps: &mut Vec<SolutionStep>,
    from: &ComputeNode,
    to: &ComputeNode,
    network: &[Link],
    data_size_kb: u32,
    chatter: u32,
    is_response: bool,
) -> Result<(), PlanningError> {
    let route = find_route(&from.zone, &to.zone, network).ok_or_else(|| PlanningError::NoRoute {
        from: from.zone.name.clone(),
        to: to.zone.name.clone(),
    })?;
    for link in route.links {
        steps.push(SolutionStep {
            calculator: Calculator::Link(link),
            is_response,
            data_size_kb,
            chatter,
            baseline_service_time_ms: 0,
        });
    }
    Ok(())
}
