pub mod config;
pub mod core;
pub mod scheduler;
pub mod sim;

pub use config::SimConfig;
pub use crate::core::{EventSink, SchedEvent, TierLabel};
pub use scheduler::{FcfsMode, MlfqScheduler};
pub use sim::{Sim, Workload, WorkloadEntry};
