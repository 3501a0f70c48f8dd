use clap::ValueEnum;
use serde::Deserialize;

use super::SchedError;
use crate::core::{EventSink, Process, SchedCore, TierLabel, Ticks};

/// How the terminal FCFS queue treats the workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FcfsMode {
    /// Every process re-runs its full original burst, finished or not.
    #[default]
    Replay,
    /// Only unfinished processes run, for their remaining time.
    Remaining,
}

impl FcfsMode {
    pub fn admits(self, process: &Process) -> bool {
        match self {
            Self::Replay => true,
            Self::Remaining => !process.is_finished(),
        }
    }

    pub fn run_length(self, process: &Process) -> Ticks {
        match self {
            Self::Replay => process.burst_time(),
            Self::Remaining => process.remaining_time(),
        }
    }
}

/// Pour the workload into the FCFS queue in load order and drain it.
pub fn run_fcfs_phase<E: EventSink>(
    core: &mut SchedCore,
    mode: FcfsMode,
    sink: &mut E,
) -> Result<(), SchedError> {
    let fcfs = core.ctx.fcfs();

    for idx in 0..core.ctx.processes.len() {
        if mode.admits(core.ctx.process(idx)) {
            core.enqueue(fcfs, idx).map_err(SchedError::queue(TierLabel::Fcfs))?;
        }
    }

    tracing::info!(
        time = core.now(),
        admitted = core.ctx.queue(fcfs).size(),
        ?mode,
        "FCFS phase"
    );

    while !core.ctx.queue(fcfs).is_empty() {
        let idx = core.dequeue(fcfs).map_err(SchedError::queue(TierLabel::Fcfs))?;
        let length = mode.run_length(core.ctx.process(idx));
        core.run_to_completion(idx, length, sink);
    }

    Ok(())
}
