use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;
use std::fmt;

// Index into the process Vec
pub type ProcessIdx = usize;
pub type ProcessId = u64;
pub type Ticks = u64;
new_key_type! {
    pub struct QueueId;
}

// id and burst_time never change after construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    id: ProcessId,
    burst_time: Ticks,
    remaining_time: Ticks,
}

impl Process {
    pub fn new(id: ProcessId, burst_time: Ticks) -> Self {
        Self::with_remaining(id, burst_time, burst_time)
    }

    pub fn with_remaining(id: ProcessId, burst_time: Ticks, remaining_time: Ticks) -> Self {
        Self {
            id,
            burst_time,
            remaining_time,
        }
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn burst_time(&self) -> Ticks {
        self.burst_time
    }

    pub fn remaining_time(&self) -> Ticks {
        self.remaining_time
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_time == 0
    }

    // Returns what was actually consumed
    pub fn consume(&mut self, slice: Ticks) -> Ticks {
        let consumed = slice.min(self.remaining_time);
        self.remaining_time -= consumed;
        consumed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    Empty,
    Full { capacity: usize },
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "dequeue from an empty queue"),
            Self::Full { capacity } => write!(f, "queue already holds {capacity} processes"),
        }
    }
}

impl std::error::Error for QueueError {}

#[derive(Debug)]
pub struct TierQueue {
    slots: VecDeque<ProcessIdx>,
    capacity: usize,
}

impl TierQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn enqueue(&mut self, process: ProcessIdx) -> Result<(), QueueError> {
        if self.slots.len() >= self.capacity {
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }
        self.slots.push_back(process);
        Ok(())
    }

    pub fn dequeue(&mut self) -> Result<ProcessIdx, QueueError> {
        self.slots.pop_front().ok_or(QueueError::Empty)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, process: ProcessIdx) -> bool {
        self.slots.contains(&process)
    }

    pub fn iter(&self) -> impl Iterator<Item = ProcessIdx> + '_ {
        self.slots.iter().copied()
    }
}

#[derive(Debug)]
pub struct SchedCtx {
    pub now: Ticks,
    pub processes: Vec<Process>,
    pub queues: SlotMap<QueueId, TierQueue>,
    pub process_to_queue: FxHashMap<ProcessIdx, QueueId>,
    pub tier_ids: Vec<QueueId>,
    pub fcfs_id: QueueId,
}

impl SchedCtx {
    pub fn new(processes: Vec<Process>, num_tiers: usize, capacity: usize) -> Self {
        let mut queues = SlotMap::with_capacity_and_key(num_tiers + 1);

        // Feedback tiers, highest priority first
        let tier_ids = (0..num_tiers)
            .map(|_| queues.insert(TierQueue::with_capacity(capacity)))
            .collect();

        // Terminal FCFS queue
        let fcfs_id = queues.insert(TierQueue::with_capacity(capacity));

        Self {
            now: 0,
            processes,
            queues,
            process_to_queue: FxHashMap::default(),
            tier_ids,
            fcfs_id,
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn enqueue(&mut self, queue_id: QueueId, idx: ProcessIdx) -> Result<(), QueueError> {
        assert!(
            !self.process_to_queue.contains_key(&idx),
            "Process {} already present in some queue",
            self.processes[idx].id()
        );

        self.queues[queue_id].enqueue(idx)?;
        self.process_to_queue.insert(idx, queue_id);
        Ok(())
    }

    pub fn dequeue(&mut self, queue_id: QueueId) -> Result<ProcessIdx, QueueError> {
        let idx = self.queues[queue_id].dequeue()?;

        let removed = self.process_to_queue.remove(&idx);
        debug_assert_eq!(removed, Some(queue_id), "Process {idx} queue membership mismatch");

        Ok(idx)
    }

    pub fn queue(&self, queue_id: QueueId) -> &TierQueue {
        &self.queues[queue_id]
    }

    pub fn tier(&self, tier: usize) -> QueueId {
        self.tier_ids[tier]
    }

    pub fn num_tiers(&self) -> usize {
        self.tier_ids.len()
    }

    pub fn fcfs(&self) -> QueueId {
        self.fcfs_id
    }

    pub fn location(&self, idx: ProcessIdx) -> Option<QueueId> {
        self.process_to_queue.get(&idx).copied()
    }

    pub fn process(&self, idx: ProcessIdx) -> &Process {
        &self.processes[idx]
    }

    pub fn process_mut(&mut self, idx: ProcessIdx) -> &mut Process {
        &mut self.processes[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_fifo() {
        let mut queue = TierQueue::with_capacity(3);
        queue.enqueue(2).unwrap();
        queue.enqueue(0).unwrap();
        queue.enqueue(1).unwrap();

        assert_eq!(queue.size(), 3);
        assert_eq!(queue.dequeue(), Ok(2));
        assert_eq!(queue.dequeue(), Ok(0));
        assert_eq!(queue.dequeue(), Ok(1));
        assert!(queue.is_empty());
    }

    #[test]
    fn empty_dequeue_is_an_error() {
        let mut queue = TierQueue::with_capacity(1);
        assert_eq!(queue.dequeue(), Err(QueueError::Empty));
    }

    #[test]
    fn enqueue_past_capacity_is_rejected() {
        let mut queue = TierQueue::with_capacity(1);
        queue.enqueue(0).unwrap();
        assert_eq!(queue.enqueue(1), Err(QueueError::Full { capacity: 1 }));
        assert_eq!(queue.size(), 1);
    }

    #[test]
    fn consume_floors_at_zero() {
        let mut process = Process::new(7, 3);
        assert_eq!(process.consume(2), 2);
        assert_eq!(process.consume(2), 1);
        assert_eq!(process.remaining_time(), 0);
        assert!(process.is_finished());
        assert_eq!(process.burst_time(), 3);
    }

    #[test]
    fn ctx_tracks_queue_membership() {
        let processes = vec![Process::new(1, 2), Process::new(2, 4)];
        let mut ctx = SchedCtx::new(processes, 2, 2);
        let tier0 = ctx.tier(0);

        ctx.enqueue(tier0, 1).unwrap();
        assert_eq!(ctx.location(1), Some(tier0));
        assert_eq!(ctx.location(0), None);

        assert_eq!(ctx.dequeue(tier0), Ok(1));
        assert_eq!(ctx.location(1), None);
        assert_eq!(ctx.dequeue(tier0), Err(QueueError::Empty));
    }

    #[test]
    #[should_panic(expected = "already present")]
    fn double_enqueue_panics() {
        let mut ctx = SchedCtx::new(vec![Process::new(1, 1)], 2, 1);
        let (tier0, tier1) = (ctx.tier(0), ctx.tier(1));
        ctx.enqueue(tier0, 0).unwrap();
        let _ = ctx.enqueue(tier1, 0);
    }
}
