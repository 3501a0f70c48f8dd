pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::SchedCore;
pub use event::{EventSink, LinePrinter, SchedEvent, TierLabel, TraceSink};
pub use observer::Observer;
pub use state::{
    Process, ProcessId, ProcessIdx, QueueError, QueueId, SchedCtx, Ticks, TierQueue,
};
