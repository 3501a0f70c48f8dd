use std::fmt;

use rand::prelude::*;
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::core::state::{Process, ProcessId, Ticks};

/// One `(id, burst_time)` line of a workload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadEntry {
    pub id: ProcessId,
    pub burst_time: Ticks,
    // Starting remaining time when it differs from the burst
    #[serde(default)]
    pub remaining_time: Option<Ticks>,
}

impl WorkloadEntry {
    pub fn new(id: ProcessId, burst_time: Ticks) -> Self {
        Self {
            id,
            burst_time,
            remaining_time: None,
        }
    }

    pub fn with_remaining(id: ProcessId, burst_time: Ticks, remaining_time: Ticks) -> Self {
        Self {
            id,
            burst_time,
            remaining_time: Some(remaining_time),
        }
    }

    fn to_process(&self) -> Process {
        Process::with_remaining(
            self.id,
            self.burst_time,
            self.remaining_time.unwrap_or(self.burst_time),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkloadError {
    Empty,
    ZeroId,
    ZeroBurst { id: ProcessId },
    ZeroRemaining { id: ProcessId },
    RemainingExceedsBurst { id: ProcessId },
    DuplicateId { id: ProcessId },
    OverCapacity { count: usize, capacity: usize },
}

impl fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid workload: ")?;
        match self {
            Self::Empty => write!(f, "no processes"),
            Self::ZeroId => write!(f, "process ids must be positive"),
            Self::ZeroBurst { id } => write!(f, "process {id} has a zero burst time"),
            Self::ZeroRemaining { id } => write!(f, "process {id} starts with no remaining time"),
            Self::RemainingExceedsBurst { id } => {
                write!(f, "process {id} starts with more remaining time than its burst")
            }
            Self::DuplicateId { id } => write!(f, "process id {id} appears more than once"),
            Self::OverCapacity { count, capacity } => {
                write!(f, "{count} processes exceed queue capacity {capacity}")
            }
        }
    }
}

impl std::error::Error for WorkloadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    entries: Vec<WorkloadEntry>,
}

impl Workload {
    pub fn new(
        entries: Vec<WorkloadEntry>,
        capacity: Option<usize>,
    ) -> Result<Self, WorkloadError> {
        if entries.is_empty() {
            return Err(WorkloadError::Empty);
        }
        if let Some(capacity) = capacity {
            if entries.len() > capacity {
                return Err(WorkloadError::OverCapacity {
                    count: entries.len(),
                    capacity,
                });
            }
        }

        let mut seen = FxHashSet::default();
        for entry in &entries {
            if entry.id == 0 {
                return Err(WorkloadError::ZeroId);
            }
            if entry.burst_time == 0 {
                return Err(WorkloadError::ZeroBurst { id: entry.id });
            }
            match entry.remaining_time {
                Some(0) => return Err(WorkloadError::ZeroRemaining { id: entry.id }),
                Some(remaining) if remaining > entry.burst_time => {
                    return Err(WorkloadError::RemainingExceedsBurst { id: entry.id });
                }
                _ => {}
            }
            if !seen.insert(entry.id) {
                return Err(WorkloadError::DuplicateId { id: entry.id });
            }
        }

        Ok(Self { entries })
    }

    // Bursts 1..=5, each starting with 3 units remaining. Processes 1 and 2
    // start above their burst, which validation would reject.
    pub fn sample() -> Self {
        Self {
            entries: (1..=5)
                .map(|id| WorkloadEntry::with_remaining(id, id, 3))
                .collect(),
        }
    }

    /// Seeded synthetic workload with uniform bursts in `min_burst..=max_burst`.
    pub fn random(
        count: usize,
        min_burst: Ticks,
        max_burst: Ticks,
        seed: u64,
    ) -> Result<Self, WorkloadError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let lo = min_burst.max(1);
        let hi = max_burst.max(lo);

        let entries = (1..=count as ProcessId)
            .map(|id| WorkloadEntry::new(id, rng.random_range(lo..=hi)))
            .collect();

        Self::new(entries, None)
    }

    pub fn entries(&self) -> &[WorkloadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn processes(&self) -> Vec<Process> {
        self.entries.iter().map(WorkloadEntry::to_process).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub id: ProcessId,
    pub burst_time: Ticks,
    pub first_start: Option<Ticks>,
    // Time of the last Finished event
    pub completion_time: Option<Ticks>,
    pub final_remaining: Ticks,
}

impl ProcessOutcome {
    // Every process arrives at time 0
    pub fn turnaround(&self) -> Option<Ticks> {
        self.completion_time
    }

    pub fn response(&self) -> Option<Ticks> {
        self.first_start
    }
}
