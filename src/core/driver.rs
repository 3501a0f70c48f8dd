use super::{
    event::{EventSink, SchedEvent, TierLabel},
    observer::Observer,
    state::{Process, ProcessIdx, QueueError, QueueId, SchedCtx, Ticks},
};

pub struct SchedCore {
    pub ctx: SchedCtx,
    observer: Observer,
}

impl SchedCore {
    pub fn new(processes: Vec<Process>, num_tiers: usize, capacity: usize) -> Self {
        Self {
            ctx: SchedCtx::new(processes, num_tiers, capacity),
            observer: Observer::new(),
        }
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn enqueue(&mut self, queue: QueueId, idx: ProcessIdx) -> Result<(), QueueError> {
        self.ctx.enqueue(queue, idx)?;
        self.observer.observe(&self.ctx);
        Ok(())
    }

    pub fn dequeue(&mut self, queue: QueueId) -> Result<ProcessIdx, QueueError> {
        let idx = self.ctx.dequeue(queue)?;
        self.observer.observe(&self.ctx);
        Ok(idx)
    }

    // Run one feedback quantum; returns the remaining time afterwards
    pub fn run_quantum<E: EventSink>(
        &mut self,
        idx: ProcessIdx,
        tier: usize,
        slice: Ticks,
        sink: &mut E,
    ) -> Ticks {
        let process_id = self.ctx.process(idx).id();
        sink.emit(&SchedEvent::Started {
            time: self.ctx.now,
            process_id,
            tier: TierLabel::Feedback(tier),
        });

        self.ctx.advance_time(slice);
        let process = self.ctx.process_mut(idx);
        process.consume(slice);
        let remaining = process.remaining_time();

        tracing::debug!(
            time = self.ctx.now,
            process_id,
            tier,
            remaining,
            "quantum consumed"
        );
        self.observer.observe(&self.ctx);
        remaining
    }

    // Run `length` units without preemption and report completion
    pub fn run_to_completion<E: EventSink>(
        &mut self,
        idx: ProcessIdx,
        length: Ticks,
        sink: &mut E,
    ) {
        let process_id = self.ctx.process(idx).id();
        sink.emit(&SchedEvent::Started {
            time: self.ctx.now,
            process_id,
            tier: TierLabel::Fcfs,
        });

        self.ctx.advance_time(length);
        self.ctx.process_mut(idx).consume(length);

        tracing::debug!(time = self.ctx.now, process_id, length, "ran to completion");
        self.finish(idx, sink);
    }

    pub fn finish<E: EventSink>(&mut self, idx: ProcessIdx, sink: &mut E) {
        sink.emit(&SchedEvent::Finished {
            time: self.ctx.now,
            process_id: self.ctx.process(idx).id(),
        });
        self.observer.observe(&self.ctx);
    }
}
