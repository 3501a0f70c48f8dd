use std::fmt;

use average::{Estimate, Mean};
use rustc_hash::FxHashMap;

use super::job::{ProcessOutcome, Workload, WorkloadError};
use crate::{
    config::{ConfigError, SimConfig},
    core::{
        event::{EventSink, SchedEvent, TraceSink},
        state::{ProcessId, Ticks},
    },
    scheduler::{MlfqScheduler, SchedError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    Config(ConfigError),
    Workload(WorkloadError),
    Sched(SchedError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Workload(err) => fmt::Display::fmt(err, f),
            Self::Sched(err) => write!(f, "scheduler invariant violated: {err}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Workload(err) => Some(err),
            Self::Sched(err) => Some(err),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<WorkloadError> for SimError {
    fn from(err: WorkloadError) -> Self {
        Self::Workload(err)
    }
}

impl From<SchedError> for SimError {
    fn from(err: SchedError) -> Self {
        Self::Sched(err)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimSummary {
    pub mean_turnaround: f64,
    pub mean_response: f64,
    pub longest_turnaround: Ticks,
}

impl fmt::Display for SimSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average turnaround time: {:.2} ticks", self.mean_turnaround)?;
        writeln!(f, "Average response time: {:.2} ticks", self.mean_response)?;
        write!(f, "Longest turnaround: {} ticks", self.longest_turnaround)
    }
}

#[derive(Debug, Clone)]
pub struct SimReport {
    pub events: Vec<SchedEvent>,
    pub outcomes: Vec<ProcessOutcome>,
    pub end_time: Ticks,
    pub summary: SimSummary,
}

impl SimReport {
    pub fn outcome(&self, id: ProcessId) -> Option<&ProcessOutcome> {
        self.outcomes.iter().find(|outcome| outcome.id == id)
    }
}

struct Recorder<'a, E: EventSink> {
    events: Vec<SchedEvent>,
    inner: &'a mut E,
}

impl<E: EventSink> EventSink for Recorder<'_, E> {
    fn emit(&mut self, event: &SchedEvent) {
        self.events.push(event.clone());
        self.inner.emit(event);
    }
}

// Each run starts from a fresh scheduler at time 0
pub struct Sim {
    workload: Workload,
    config: SimConfig,
}

impl Sim {
    pub fn new(workload: Workload, config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        if let Some(capacity) = config.capacity {
            if workload.len() > capacity {
                return Err(WorkloadError::OverCapacity {
                    count: workload.len(),
                    capacity,
                }
                .into());
            }
        }
        Ok(Self { workload, config })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    pub fn run(&self) -> Result<SimReport, SimError> {
        self.run_with(&mut TraceSink)
    }

    pub fn run_with<E: EventSink>(&self, sink: &mut E) -> Result<SimReport, SimError> {
        let scheduler = MlfqScheduler::new(self.workload.processes(), self.config.clone());
        let mut recorder = Recorder {
            events: Vec::new(),
            inner: sink,
        };
        let outcome = scheduler.run(&mut recorder)?;
        let events = recorder.events;

        let mut outcomes: Vec<ProcessOutcome> = outcome
            .processes
            .iter()
            .map(|process| ProcessOutcome {
                id: process.id(),
                burst_time: process.burst_time(),
                first_start: None,
                completion_time: None,
                final_remaining: process.remaining_time(),
            })
            .collect();
        let index: FxHashMap<ProcessId, usize> = outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| (outcome.id, i))
            .collect();

        for event in &events {
            let Some(&i) = index.get(&event.process_id()) else {
                debug_assert!(false, "Event for unknown process {}", event.process_id());
                continue;
            };
            match event {
                SchedEvent::Started { time, .. } => {
                    outcomes[i].first_start.get_or_insert(*time);
                }
                SchedEvent::Finished { time, .. } => outcomes[i].completion_time = Some(*time),
            }
        }

        let summary = summarize(&outcomes);
        Ok(SimReport {
            events,
            outcomes,
            end_time: outcome.end_time,
            summary,
        })
    }
}

fn summarize(outcomes: &[ProcessOutcome]) -> SimSummary {
    let mean_turnaround = outcomes
        .iter()
        .filter_map(ProcessOutcome::turnaround)
        .map(|t| t as f64)
        .collect::<Mean>()
        .estimate();
    let mean_response = outcomes
        .iter()
        .filter_map(ProcessOutcome::response)
        .map(|t| t as f64)
        .collect::<Mean>()
        .estimate();
    let longest_turnaround = outcomes
        .iter()
        .filter_map(ProcessOutcome::turnaround)
        .max()
        .unwrap_or(0);

    SimSummary {
        mean_turnaround,
        mean_response,
        longest_turnaround,
    }
}
