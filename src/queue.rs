//! The multi-channel queue: parallel channels plus a shared FIFO backlog,
//! with per-channel wait computation and windowed utilisation accounting.

use std::collections::VecDeque;

use crate::compute::ComputeNode;
use crate::metrics::{QueueMetric, RequestMetric};
use crate::planner::Request;
use crate::topology::Link;
use crate::types::{StcKind, WaitMode};

/// Either a compute node or a link — whatever is driving a queue's
/// service-time and latency calculations. Identity (for queue lookup) is
/// [`CalculatorKey`], not structural equality, so two queues built over
/// structurally identical links stay distinct.
#[derive(Debug, Clone)]
pub enum Calculator {
    Node(ComputeNode),
    Link(Link),
}

/// A hashable, identity-carrying key for looking up the queue backing a
/// [`Calculator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CalculatorKey {
    Node(uuid::Uuid),
    Link {
        source: uuid::Uuid,
        destination: uuid::Uuid,
        bandwidth_mbps: u32,
        latency_ms: u32,
    },
}

impl Calculator {
    pub fn key(&self) -> CalculatorKey {
        match self {
            Calculator::Node(node) => CalculatorKey::Node(node.id()),
            Calculator::Link(link) => CalculatorKey::Link {
                source: link.source.id(),
                destination: link.destination.id(),
                bandwidth_mbps: link.bandwidth_mbps,
                latency_ms: link.latency_ms,
            },
        }
    }

    pub fn name(&self) -> String {
        match self {
            Calculator::Node(node) => node.name.clone(),
            Calculator::Link(link) => link.name(),
        }
    }

    pub fn stc_kind(&self) -> StcKind {
        match self {
            Calculator::Node(node) => node.stc_kind(),
            Calculator::Link(_) => StcKind::Connection,
        }
    }

    pub fn calculate_service_time(&self, request: &Request) -> Option<i64> {
        match self {
            Calculator::Node(node) => node.calculate_service_time(request),
            Calculator::Link(link) => link.calculate_service_time(request),
        }
    }

    pub fn calculate_latency(&self, request: &Request) -> Option<i64> {
        match self {
            Calculator::Node(node) => node.calculate_latency(request),
            Calculator::Link(link) => link.calculate_latency(request),
        }
    }

    /// Channel count per spec.md §4.3: 2 for links, 1000/cores/vcores for
    /// client/physical/virtual nodes.
    pub fn provide_queue(&self) -> MultiQueue {
        match self {
            Calculator::Node(node) => node.provide_queue(),
            Calculator::Link(link) => link.provide_queue(),
        }
    }
}

/// A request wrapped for its stay in a [`MultiQueue`] channel or backlog
/// slot.
#[derive(Debug)]
pub struct WaitingRequest {
    pub request: Request,
    pub wait_start: i64,
    pub service_time: Option<i64>,
    pub latency: Option<i64>,
    pub wait_mode: WaitMode,
    pub queue_time: i64,
}

impl WaitingRequest {
    fn queue_ended(&mut self, clock: i64, wait_mode: WaitMode) {
        self.wait_mode = wait_mode;
        self.queue_time = clock - self.wait_start;
    }

    /// The clock at which this request finishes processing. `None` while
    /// still queueing, or if service time is unknown (no current step).
    fn wait_end(&self) -> Option<i64> {
        if self.wait_mode == WaitMode::Queueing {
            return None;
        }
        let service_time = self.service_time?;
        let latency = self.latency.unwrap_or(0);
        Some(self.wait_start + service_time + latency + self.queue_time)
    }
}

/// A fixed-channel parallel server with a FIFO backlog. Drives itself off
/// whatever [`Calculator`] it was built for.
#[derive(Debug)]
pub struct MultiQueue {
    pub name: String,
    pub stc_kind: StcKind,
    wait_mode: WaitMode,
    channels: Vec<Option<WaitingRequest>>,
    backlog: VecDeque<WaitingRequest>,
    last_metric_clock: i64,
    work_done: i64,
}

impl MultiQueue {
    pub fn new(name: impl Into<String>, stc_kind: StcKind, wait_mode: WaitMode, channel_count: usize) -> Self {
        let mut channels = Vec::with_capacity(channel_count);
        channels.resize_with(channel_count, || None);
        Self {
            name: name.into(),
            stc_kind,
            wait_mode,
            channels,
            backlog: VecDeque::new(),
            last_metric_clock: 0,
            work_done: 0,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn available_channel_count(&self) -> usize {
        self.channels.iter().filter(|c| c.is_none()).count()
    }

    fn first_available_channel(&self) -> Option<usize> {
        self.channels.iter().position(|c| c.is_none())
    }

    pub fn request_count(&self) -> usize {
        self.backlog.len() + self.channels.len() - self.available_channel_count()
    }

    /// The clock when the next channel completion happens, or `None` if no
    /// channel is occupied. Backlog entries (QUEUEING) never contribute.
    pub fn next_event_time(&self) -> Option<i64> {
        self.channels
            .iter()
            .flatten()
            .filter_map(|wr| wr.wait_end())
            .min()
    }

    /// Places `request` using the calculator's service-time/latency
    /// calculation for its current step. Does nothing if the request has no
    /// current step (it is then silently dropped — callers never invoke
    /// `enqueue` on an exhausted solution).
    pub fn enqueue(&mut self, calculator: &Calculator, request: Request, clock: i64) {
        if request.solution.current_step().is_none() {
            return;
        }
        let service_time = calculator.calculate_service_time(&request);
        let latency = calculator.calculate_latency(&request);

        match self.first_available_channel() {
            Some(index) => {
                self.channels[index] = Some(WaitingRequest {
                    request,
                    wait_start: clock,
                    service_time,
                    latency,
                    wait_mode: self.wait_mode,
                    queue_time: 0,
                });
            }
            None => {
                self.backlog.push_back(WaitingRequest {
                    request,
                    wait_start: clock,
                    service_time,
                    latency,
                    wait_mode: WaitMode::Queueing,
                    queue_time: 0,
                });
            }
        }
    }

    /// Drains every channel whose request has finished by `clock`, crediting
    /// utilisation for it, emitting its request-metric, and promoting the
    /// next backlog entry (FIFO) into the freed slot if one is waiting.
    pub fn remove_finished_requests(&mut self, clock: i64) -> Vec<(Request, RequestMetric)> {
        let mut result = Vec::new();

        for i in 0..self.channels.len() {
            let finished = matches!(&self.channels[i], Some(wr) if wr.wait_end().is_some_and(|e| e <= clock));
            if !finished {
                continue;
            }
            let mut wr = self.channels[i].take().expect("checked Some above");
            let service_time = wr.service_time.unwrap_or(0);
            let latency_time = wr.latency.unwrap_or(0);
            let metric = RequestMetric {
                source: self.name.clone(),
                clock,
                request_name: wr.request.name.clone(),
                workflow_name: wr.request.workflow_name.clone(),
                service_time,
                queue_time: wr.queue_time,
                latency_time,
            };
            wr.request.accumulating_metrics.push(metric.clone());
            self.log_work_done(&wr, clock);
            result.push((wr.request, metric));

            if let Some(mut promoted) = self.backlog.pop_front() {
                promoted.queue_ended(clock, self.wait_mode);
                self.channels[i] = Some(promoted);
            } else {
                self.channels[i] = None;
            }
        }

        result
    }

    /// Samples utilisation since the last sample, resetting the window.
    /// `utilisation = work_done / (channel_count * (clock - last_sample))`.
    pub fn get_performance_metric(&mut self, clock: i64) -> QueueMetric {
        let waiting: Vec<&WaitingRequest> = self.channels.iter().flatten().chain(self.backlog.iter()).collect();
        let request_count = waiting.len();
        for wr in &waiting {
            self.work_done += Self::work_credit(wr, self.last_metric_clock, clock);
        }

        let window = clock - self.last_metric_clock;
        let max_work = window * self.channels.len() as i64;
        let utilisation = if max_work > 0 {
            self.work_done as f64 / max_work as f64
        } else {
            0.0
        };

        let metric = QueueMetric {
            source: self.name.clone(),
            stc_kind: self.stc_kind,
            clock,
            channel_count: self.channels.len(),
            request_count,
            utilisation,
        };

        self.work_done = 0;
        self.last_metric_clock = clock;
        metric
    }

    /// Credits work toward utilisation without resetting the window or
    /// clock, and without borrowing `self` mutably for the sample loop —
    /// used by the scheduler to roll a virtual queue's work up into its
    /// physical host's `work_done` before the physical queue samples itself.
    pub fn add_work_done(&mut self, credit: i64) {
        self.work_done += credit.max(0);
    }

    /// This queue's total work credit since the last sample: work already
    /// logged for requests that finished and were removed, plus work
    /// accrued so far by requests still waiting (channels then backlog).
    /// Exposed non-destructively so the scheduler can roll a virtual queue's
    /// credit up into its physical host's queue before either samples.
    pub fn pending_work_credit(&self, clock: i64) -> i64 {
        let waiting: i64 = self
            .channels
            .iter()
            .flatten()
            .chain(self.backlog.iter())
            .map(|wr| Self::work_credit(wr, self.last_metric_clock, clock))
            .sum();
        self.work_done + waiting
    }

    fn log_work_done(&mut self, wr: &WaitingRequest, clock: i64) {
        self.work_done += Self::work_credit(wr, self.last_metric_clock, clock);
    }

    /// Work a waiting request contributes to the current sampling window:
    /// its service time, minus any portion already credited in a prior
    /// window, minus any portion still in the future. Clamped at zero.
    fn work_credit(wr: &WaitingRequest, last_metric_clock: i64, clock: i64) -> i64 {
        let Some(wait_end) = wr.wait_end() else {
            return 0;
        };
        let Some(service_time) = wr.service_time else {
            return 0;
        };
        let mut total = service_time;
        if wr.wait_start < last_metric_clock {
            total -= last_metric_clock - wr.wait_start;
        }
        if clock < wait_end {
            total -= wait_end - clock;
        }
        total.max(0)
    }
}
