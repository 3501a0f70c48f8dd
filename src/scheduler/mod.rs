pub mod fcfs;
pub mod mlfq;

use std::fmt;

use crate::core::{QueueError, TierLabel};
pub use fcfs::FcfsMode;
pub use mlfq::{MlfqScheduler, RunOutcome};

/// Internal consistency failure during a run.
///
/// Never produced for a validated workload; seeing one means the scheduler
/// drove a queue past its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedError {
    Queue { queue: TierLabel, source: QueueError },
}

impl SchedError {
    pub(crate) fn queue(queue: TierLabel) -> impl FnOnce(QueueError) -> Self {
        move |source| Self::Queue { queue, source }
    }
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queue { queue, source } => write!(f, "queue {queue}: {source}"),
        }
    }
}

impl std::error::Error for SchedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Queue { source, .. } => Some(source),
        }
    }
}
