use super::{
    SchedError,
    fcfs::{self, FcfsMode},
};
use crate::{
    config::SimConfig,
    core::{EventSink, Process, SchedCore, TierLabel, Ticks},
};

#[derive(Debug)]
pub struct RunOutcome {
    pub end_time: Ticks,
    pub processes: Vec<Process>,
    pub steps: u64,
}

pub struct MlfqScheduler {
    core: SchedCore,
    config: SimConfig,
}

impl MlfqScheduler {
    /// `processes` must already be validated against `config`; queue
    /// capacity is `config.capacity` or the workload size.
    pub fn new(processes: Vec<Process>, config: SimConfig) -> Self {
        let capacity = config.capacity.unwrap_or(processes.len());
        Self {
            core: SchedCore::new(processes, config.num_tiers, capacity),
            config,
        }
    }

    pub fn run<E: EventSink>(mut self, sink: &mut E) -> Result<RunOutcome, SchedError> {
        self.load()?;

        for tier in 0..self.core.ctx.num_tiers() {
            self.run_tier(tier, sink)?;
        }

        fcfs::run_fcfs_phase(&mut self.core, self.config.fcfs_mode, sink)?;

        tracing::info!(end_time = self.core.now(), "run complete");
        Ok(RunOutcome {
            end_time: self.core.now(),
            steps: self.core.observer().steps(),
            processes: self.core.ctx.processes,
        })
    }

    fn load(&mut self) -> Result<(), SchedError> {
        let top = self.core.ctx.tier(0);
        for idx in 0..self.core.ctx.processes.len() {
            self.core.enqueue(top, idx).map_err(SchedError::queue(TierLabel::Feedback(0)))?;
        }
        Ok(())
    }

    // Single pass over one tier. The size is taken up front; survivors go to
    // the next tier, never back into this one.
    fn run_tier<E: EventSink>(&mut self, tier: usize, sink: &mut E) -> Result<(), SchedError> {
        let queue = self.core.ctx.tier(tier);
        let queue_size = self.core.ctx.queue(queue).size();
        let slice = self.config.slice_for(tier);
        let next = (tier + 1 < self.core.ctx.num_tiers()).then(|| self.core.ctx.tier(tier + 1));

        tracing::info!(time = self.core.now(), tier, queue_size, slice, "tier pass");

        for _ in 0..queue_size {
            let idx = self
                .core
                .dequeue(queue)
                .map_err(SchedError::queue(TierLabel::Feedback(tier)))?;

            let remaining = self.core.run_quantum(idx, tier, slice, sink);
            if remaining > 0 {
                // Leaving the last tier unfinished means waiting for FCFS
                if let Some(next) = next {
                    self.core
                        .enqueue(next, idx)
                        .map_err(SchedError::queue(TierLabel::Feedback(tier + 1)))?;
                }
            } else if self.config.fcfs_mode == FcfsMode::Remaining {
                self.core.finish(idx, sink);
            }
        }

        Ok(())
    }
}
