use super::state::{SchedCtx, Ticks};

// Release builds only count steps
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    last_time: Ticks,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SchedCtx) {
        self.step += 1;

        debug_assert!(
            ctx.now >= self.last_time,
            "Simulated time went backwards: {} -> {}",
            self.last_time,
            ctx.now
        );
        self.last_time = ctx.now;

        for (queue_id, queue) in &ctx.queues {
            debug_assert!(
                queue.size() <= queue.capacity(),
                "Queue {queue_id:?} holds {} processes, capacity {}",
                queue.size(),
                queue.capacity()
            );
            for idx in queue.iter() {
                debug_assert_eq!(
                    ctx.location(idx),
                    Some(queue_id),
                    "Process {} sits in queue {queue_id:?} but is tracked elsewhere",
                    ctx.process(idx).id()
                );
            }
        }

        for (&idx, &queue_id) in &ctx.process_to_queue {
            match ctx.queues.get(queue_id) {
                Some(queue) => debug_assert!(
                    queue.contains(idx),
                    "process_to_queue claims process {} in queue {queue_id:?}, which lacks it",
                    ctx.process(idx).id()
                ),
                None => {
                    debug_assert!(false, "process_to_queue references unknown queue {queue_id:?}")
                }
            }
        }
    }
}
