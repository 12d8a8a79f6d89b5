//! The scheduler: the discrete-event tick loop that fires workflows, drains
//! queues, and advances the logical clock.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::design::Design;
use crate::error::{DesignError, SchedulerError, TimeAdvanceError};
use crate::metrics::{QueueMetric, RequestMetric};
use crate::planner::{create_solution, Request};
use crate::queue::{Calculator, CalculatorKey, MultiQueue};
use crate::random::RandomSource;
use crate::types::{ComputeKind, MeteringMode};

/// Drives a [`Design`] through logical time, one event at a time.
///
/// Each tick is either a workflow firing (new requests enter the system) or
/// a queue completion (a request advances to its next hop, or finishes). On
/// a tie the queue completion wins — a request already in flight always
/// drains before a new one is admitted.
pub struct Scheduler {
    design: Design,
    rng: Box<dyn RandomSource>,
    metering_mode: MeteringMode,
    clock: i64,
    generating: bool,
    queues: Vec<(Calculator, MultiQueue)>,
    next_workflow_fire: FxHashMap<String, i64>,
    next_tx_id: u64,
    next_request_id: u64,
    finished_requests: Vec<Request>,
    request_metrics: Vec<RequestMetric>,
    queue_metrics: Vec<QueueMetric>,
}

impl Scheduler {
    pub fn new(design: Design, metering_mode: MeteringMode, rng: Box<dyn RandomSource>) -> Self {
        Self {
            design,
            rng,
            metering_mode,
            clock: 0,
            generating: false,
            queues: Vec::new(),
            next_workflow_fire: FxHashMap::default(),
            next_tx_id: 0,
            next_request_id: 0,
            finished_requests: Vec::new(),
            request_metrics: Vec::new(),
            queue_metrics: Vec::new(),
        }
    }

    pub fn design(&self) -> &Design {
        &self.design
    }

    pub fn clock(&self) -> i64 {
        self.clock
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn finished_requests(&self) -> &[Request] {
        &self.finished_requests
    }

    pub fn request_metrics(&self) -> &[RequestMetric] {
        &self.request_metrics
    }

    pub fn queue_metrics(&self) -> &[QueueMetric] {
        &self.queue_metrics
    }

    /// Sum of requests currently occupying a channel or sitting in a
    /// backlog, across every queue.
    pub fn active_requests(&self) -> usize {
        self.queues.iter().map(|(_, q)| q.request_count()).sum()
    }

    /// Validates the design, rebuilds every queue from scratch, seeds each
    /// configured workflow's first firing time, and marks the scheduler as
    /// generating traffic. Refuses to run against an invalid design.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        let messages = self.design.validate();
        if !messages.is_empty() {
            return Err(DesignError { messages }.into());
        }

        self.queues = self.design.provide_queues();
        self.clock = 0;
        self.next_workflow_fire.clear();
        for workflow in self.design.all_workflows() {
            let next = workflow.calculate_next_event_time(0, self.rng.as_mut());
            self.next_workflow_fire.insert(workflow.name.clone(), next);
        }
        self.generating = true;
        debug!(queues = self.queues.len(), workflows = self.next_workflow_fire.len(), "scheduler started");
        Ok(())
    }

    /// Stops new workflow firings. Requests already enqueued keep draining
    /// on subsequent `do_next_task`/`advance_time_*` calls.
    pub fn stop(&mut self) {
        self.generating = false;
    }

    /// Clears all scheduler state back to a fresh, unstarted scheduler over
    /// the same design.
    pub fn reset(&mut self) {
        self.clock = 0;
        self.generating = false;
        self.queues.clear();
        self.next_workflow_fire.clear();
        self.next_tx_id = 0;
        self.next_request_id = 0;
        self.finished_requests.clear();
        self.request_metrics.clear();
        self.queue_metrics.clear();
    }

    /// The clock of the next event, whichever kind fires first. `None` if
    /// there is nothing left to do (no pending firings, every queue idle).
    pub fn next_event_time(&self) -> Option<i64> {
        match (self.next_workflow_firing(), self.next_queue_completion()) {
            (None, None) => None,
            (Some((_, wt)), None) => Some(wt),
            (None, Some((_, qt))) => Some(qt),
            (Some((_, wt)), Some((_, qt))) => Some(wt.min(qt)),
        }
    }

    fn next_workflow_firing(&self) -> Option<(String, i64)> {
        if !self.generating {
            return None;
        }
        self.next_workflow_fire.iter().min_by_key(|(_, &t)| t).map(|(name, &t)| (name.clone(), t))
    }

    fn next_queue_completion(&self) -> Option<(usize, i64)> {
        self.queues
            .iter()
            .enumerate()
            .filter_map(|(i, (_, q))| q.next_event_time().map(|t| (i, t)))
            .min_by_key(|&(_, t)| t)
    }

    /// Runs exactly one event: whichever of the next workflow firing or the
    /// next queue completion has the earlier clock. Ties favour the queue
    /// completion — a request already in flight always drains before a new
    /// one is admitted.
    pub fn do_next_task(&mut self) -> Result<(), SchedulerError> {
        let next_work = self.next_workflow_firing();
        let next_queue = self.next_queue_completion();

        let workflow_wins = match (&next_work, &next_queue) {
            (None, None) => return Err(SchedulerError::NoPendingWork),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some((_, wt)), Some((_, qt))) => *wt < *qt,
        };

        if workflow_wins {
            let (name, clock) = next_work.expect("workflow_wins implies Some");
            self.fire_workflow(&name, clock)
        } else {
            let (index, clock) = next_queue.expect("!workflow_wins implies Some");
            self.complete_queue(index, clock)
        }
    }

    /// Advances the clock by `delta_ms`, running every event up to and
    /// including the new clock.
    pub fn advance_time_by(&mut self, delta_ms: i64) -> Result<(), SchedulerError> {
        if delta_ms <= 0 {
            return Err(TimeAdvanceError::NonPositiveDelta(delta_ms).into());
        }
        self.advance_time_to(self.clock + delta_ms)
    }

    /// Advances the clock to `target`, running every event whose clock falls
    /// at or before it, then settling the clock exactly on `target` even if
    /// no event landed there.
    pub fn advance_time_to(&mut self, target: i64) -> Result<(), SchedulerError> {
        if target <= self.clock {
            return Err(TimeAdvanceError::TargetNotAfterCurrent { target, current: self.clock }.into());
        }
        while self.next_event_time().is_some_and(|t| t <= target) {
            self.do_next_task()?;
        }
        self.clock = target;
        Ok(())
    }

    fn fire_workflow(&mut self, name: &str, clock: i64) -> Result<(), SchedulerError> {
        self.clock = clock;
        let workflow = self
            .design
            .get_workflow(name)
            .cloned()
            .ok_or_else(|| SchedulerError::UnknownWorkflow { name: name.to_string() })?;

        let tx_id = self.next_tx_id;
        self.next_tx_id += 1;
        trace!(workflow = name, tx_id, clock, "workflow fired");

        for chain in &workflow.definition.chains {
            let mut chain = chain.clone();
            let solution = create_solution(&mut chain, &self.design.network)?;
            let request_id = self.next_request_id;
            self.next_request_id += 1;
            let request_name = format!("{}-{}-{}", workflow.name, tx_id, request_id);
            let request = Request::new(request_name, workflow.name.clone(), clock, solution, tx_id);
            self.dispatch_current_step(request, clock)?;
        }

        let next_fire = workflow.calculate_next_event_time(clock, self.rng.as_mut());
        self.next_workflow_fire.insert(workflow.name.clone(), next_fire);
        Ok(())
    }

    fn complete_queue(&mut self, index: usize, clock: i64) -> Result<(), SchedulerError> {
        self.clock = clock;
        let finished = self.queues[index].1.remove_finished_requests(clock);
        for (mut request, metric) in finished {
            if matches!(self.metering_mode, MeteringMode::Debug) {
                self.request_metrics.push(metric);
            }
            request.solution.goto_next_step();
            self.dispatch_current_step(request, clock)?;
        }
        Ok(())
    }

    /// Enqueues `request` onto the queue backing its current step's
    /// calculator, or — if the solution is exhausted — records it finished.
    fn dispatch_current_step(&mut self, request: Request, clock: i64) -> Result<(), SchedulerError> {
        if request.is_finished() {
            self.request_metrics.push(request.summary_metric());
            self.finished_requests.push(request);
            return Ok(());
        }
        let calculator = request.solution.current_step().expect("checked not finished above").calculator.clone();
        let key = calculator.key();
        let queue = self
            .find_queue_mut(&key)
            .ok_or_else(|| SchedulerError::QueueNotFound { calculator: calculator.name() })?;
        queue.enqueue(&calculator, request, clock);
        Ok(())
    }

    fn find_queue_mut(&mut self, key: &CalculatorKey) -> Option<&mut MultiQueue> {
        self.queues.iter_mut().find(|(c, _)| &c.key() == key).map(|(_, q)| q)
    }

    /// Samples every queue's utilisation since the last sample. Virtual
    /// queues are sampled first and their work credited into their physical
    /// host's queue before that queue samples itself, so a physical node's
    /// utilisation reflects the virtual hosts it carries.
    pub fn gather_queue_metrics(&mut self) {
        let clock = self.clock;
        let mut host_credits: FxHashMap<Uuid, i64> = FxHashMap::default();

        for (calculator, queue) in &self.queues {
            if let Calculator::Node(node) = calculator {
                if matches!(node.kind, ComputeKind::Virtual) {
                    let credit = queue.pending_work_credit(clock);
                    if let Some(host) = self.physical_host_for(node) {
                        *host_credits.entry(host).or_insert(0) += credit;
                    }
                }
            }
        }

        for (calculator, queue) in &mut self.queues {
            let is_virtual = matches!(calculator, Calculator::Node(node) if matches!(node.kind, ComputeKind::Virtual));
            if !is_virtual {
                continue;
            }
            self.queue_metrics.push(queue.get_performance_metric(clock));
        }

        for (calculator, queue) in &mut self.queues {
            let is_virtual = matches!(calculator, Calculator::Node(node) if matches!(node.kind, ComputeKind::Virtual));
            if is_virtual {
                continue;
            }
            if let Calculator::Node(node) = calculator {
                if let Some(credit) = host_credits.get(&node.id()) {
                    queue.add_work_done(*credit);
                }
            }
            self.queue_metrics.push(queue.get_performance_metric(clock));
        }
    }

    fn physical_host_for(&self, virtual_node: &crate::compute::ComputeNode) -> Option<Uuid> {
        self.queues.iter().find_map(|(calculator, _)| match calculator {
            Calculator::Node(node) if matches!(node.kind, ComputeKind::Physical) && node.is_physical_host_for(virtual_node) => {
                Some(node.id())
            }
            _ => None,
        })
    }
}
