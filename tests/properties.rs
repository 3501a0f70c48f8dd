//! Properties that hold for any valid workload, checked over a spread of
//! seeded random workloads and configurations.

use mlfq_model::{FcfsMode, SchedEvent, SimConfig, TierLabel, Workload};
use pretty_assertions::assert_eq;

mod common;

fn cases() -> impl Iterator<Item = (Workload, SimConfig)> {
    (0..24u64).map(|seed| {
        let count = 1 + (seed as usize * 7) % 12;
        let workload = Workload::random(count, 1, 8, seed).unwrap();
        let config = SimConfig {
            num_tiers: 1 + (seed as usize % 4),
            time_slice: 1 + seed % 3,
            ..SimConfig::default()
        };
        (workload, config)
    })
}

#[test]
fn identical_inputs_give_identical_traces() {
    common::setup_test();

    for (workload, config) in cases() {
        let first = common::run(workload.clone(), config.clone());
        let second = common::run(workload, config);
        assert_eq!(first.events, second.events);
    }
}

#[test]
fn fcfs_replays_every_process_once() {
    common::setup_test();

    for (workload, config) in cases() {
        let report = common::run(workload.clone(), config);

        let fcfs_ids: Vec<u64> = common::starts_in(&report.events, TierLabel::Fcfs)
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        let all_ids: Vec<u64> = workload.entries().iter().map(|e| e.id).collect();
        assert_eq!(fcfs_ids, all_ids);
    }
}

#[test]
fn no_process_skips_a_tier() {
    common::setup_test();

    for (workload, config) in cases() {
        let report = common::run(workload.clone(), config);

        for entry in workload.entries() {
            let visits: Vec<(u64, usize)> = report
                .events
                .iter()
                .filter_map(|event| match event {
                    SchedEvent::Started {
                        time,
                        process_id,
                        tier: TierLabel::Feedback(tier),
                    } if *process_id == entry.id => Some((*time, *tier)),
                    _ => None,
                })
                .collect();

            for (expected_tier, &(_, tier)) in visits.iter().enumerate() {
                assert_eq!(tier, expected_tier, "process {} skipped a tier", entry.id);
            }
            assert!(visits.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }
}

#[test]
fn tiers_preserve_enqueue_order() {
    common::setup_test();

    for (workload, config) in cases() {
        let report = common::run(workload.clone(), config.clone());

        // Tier 0 is filled in load order
        let mut enqueued: Vec<u64> = workload.entries().iter().map(|e| e.id).collect();
        for tier in 0..config.num_tiers {
            let starts = common::starts_in(&report.events, TierLabel::Feedback(tier));
            assert!(starts.windows(2).all(|w| w[0].0 < w[1].0));

            let ids: Vec<u64> = starts.iter().map(|&(_, id)| id).collect();
            assert_eq!(ids, enqueued, "tier {tier} reordered its queue");

            // Survivors of this pass fill the next tier in the same order
            let burst = |id: u64| {
                workload
                    .entries()
                    .iter()
                    .find(|e| e.id == id)
                    .map(|e| e.burst_time)
                    .unwrap()
            };
            let consumed = config.time_slice * (tier as u64 + 1);
            enqueued = ids.into_iter().filter(|&id| burst(id) > consumed).collect();
        }
    }
}

#[test]
fn time_advances_by_slice_and_burst() {
    common::setup_test();

    for (workload, config) in cases() {
        let report = common::run(workload.clone(), config.clone());

        let mut expected_time = 0;
        let mut running: Option<(u64, u64)> = None;
        for event in &report.events {
            match event {
                SchedEvent::Started {
                    time,
                    tier: TierLabel::Feedback(_),
                    ..
                } => {
                    assert_eq!(*time, expected_time);
                    expected_time += config.time_slice;
                }
                SchedEvent::Started {
                    time,
                    process_id,
                    tier: TierLabel::Fcfs,
                } => {
                    assert_eq!(*time, expected_time);
                    running = Some((*process_id, *time));
                }
                SchedEvent::Finished { time, process_id } => {
                    let (id, start) = running.take().expect("finish without start");
                    assert_eq!(id, *process_id);
                    let burst = workload
                        .entries()
                        .iter()
                        .find(|e| e.id == id)
                        .map(|e| e.burst_time)
                        .unwrap();
                    assert_eq!(*time, start + burst);
                    expected_time = *time;
                }
            }
        }
        assert_eq!(report.end_time, expected_time);
    }
}

#[test]
fn remaining_mode_does_each_unit_of_work_once() {
    common::setup_test();

    for (workload, mut config) in cases() {
        config.fcfs_mode = FcfsMode::Remaining;
        let report = common::run(workload.clone(), config);

        for entry in workload.entries() {
            let outcome = report.outcome(entry.id).unwrap();
            assert_eq!(outcome.final_remaining, 0);
            let finishes = report
                .events
                .iter()
                .filter(|e| e.process_id() == entry.id && matches!(e, SchedEvent::Finished { .. }))
                .count();
            assert_eq!(finishes, 1, "process {} finished {finishes} times", entry.id);
        }

        // FCFS only ever sees unfinished work
        let fcfs = common::starts_in(&report.events, TierLabel::Fcfs);
        assert!(fcfs.len() <= workload.len());
    }
}
