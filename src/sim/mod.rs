pub mod driver;
pub mod job;

pub use driver::{Sim, SimError, SimReport, SimSummary};
pub use job::{ProcessOutcome, Workload, WorkloadEntry, WorkloadError};
