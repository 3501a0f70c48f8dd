#![allow(dead_code)]

use mlfq_model::{SchedEvent, Sim, SimConfig, TierLabel, Workload, WorkloadEntry, sim::SimReport};

/// Initialize tracing from `RUST_LOG`. Safe to call from every test.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn run(workload: Workload, config: SimConfig) -> SimReport {
    Sim::new(workload, config)
        .expect("valid simulation")
        .run()
        .expect("run completes")
}

pub fn workload(bursts: &[u64]) -> Workload {
    let entries = bursts
        .iter()
        .enumerate()
        .map(|(i, &burst)| WorkloadEntry::new(i as u64 + 1, burst))
        .collect();
    Workload::new(entries, None).expect("valid workload")
}

pub fn started(time: u64, process_id: u64, tier: usize) -> SchedEvent {
    SchedEvent::Started {
        time,
        process_id,
        tier: TierLabel::Feedback(tier),
    }
}

pub fn started_fcfs(time: u64, process_id: u64) -> SchedEvent {
    SchedEvent::Started {
        time,
        process_id,
        tier: TierLabel::Fcfs,
    }
}

pub fn finished(time: u64, process_id: u64) -> SchedEvent {
    SchedEvent::Finished { time, process_id }
}

/// `(time, process_id)` of every start in one tier, in emission order.
pub fn starts_in(events: &[SchedEvent], label: TierLabel) -> Vec<(u64, u64)> {
    events
        .iter()
        .filter_map(|event| match event {
            SchedEvent::Started {
                time,
                process_id,
                tier,
            } if *tier == label => Some((*time, *process_id)),
            _ => None,
        })
        .collect()
}
