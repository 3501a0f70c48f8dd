use std::fmt;
use std::io::{self, Write};

use crate::core::{ProcessId, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierLabel {
    // Feedback tier index, 0 = highest priority
    Feedback(usize),
    Fcfs,
}

impl fmt::Display for TierLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feedback(tier) => write!(f, "{tier}"),
            Self::Fcfs => write!(f, "FCFS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedEvent {
    Started {
        time: Ticks,
        process_id: ProcessId,
        tier: TierLabel,
    },
    Finished {
        time: Ticks,
        process_id: ProcessId,
    },
}

impl SchedEvent {
    pub fn time(&self) -> Ticks {
        match self {
            Self::Started { time, .. } | Self::Finished { time, .. } => *time,
        }
    }

    pub fn process_id(&self) -> ProcessId {
        match self {
            Self::Started { process_id, .. } | Self::Finished { process_id, .. } => *process_id,
        }
    }
}

/// Receiver of the ordered event stream of a run. Sinks that can fail keep
/// the failure and report it themselves.
pub trait EventSink {
    fn emit(&mut self, event: &SchedEvent);
}

impl EventSink for Vec<SchedEvent> {
    fn emit(&mut self, event: &SchedEvent) {
        self.push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &SchedEvent) {
        (**self).emit(event);
    }
}

#[derive(Debug, Default)]
pub struct TraceSink;

impl EventSink for TraceSink {
    fn emit(&mut self, event: &SchedEvent) {
        match event {
            SchedEvent::Started {
                time,
                process_id,
                tier,
            } => tracing::trace!(time, process_id, %tier, "started"),
            SchedEvent::Finished { time, process_id } => {
                tracing::trace!(time, process_id, "finished")
            }
        }
    }
}

// Feedback tiers are numbered from 1 in the output
pub struct LinePrinter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> LinePrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn render(event: &SchedEvent) -> String {
        match event {
            SchedEvent::Started {
                time,
                process_id,
                tier: TierLabel::Feedback(tier),
            } => format!(
                "Time {time}: Executing Process {process_id} from Queue {}",
                tier + 1
            ),
            SchedEvent::Started {
                time,
                process_id,
                tier: TierLabel::Fcfs,
            } => format!("Time {time}: Executing Process {process_id} from FCFS Queue"),
            SchedEvent::Finished { time, process_id } => {
                format!("Process {process_id} finished at time {time}")
            }
        }
    }

    /// Flush and return the writer, or the first write error seen.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> EventSink for LinePrinter<W> {
    fn emit(&mut self, event: &SchedEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{}", Self::render(event)) {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_classic_lines() {
        let mut printer = LinePrinter::new(Vec::new());
        printer.emit(&SchedEvent::Started {
            time: 0,
            process_id: 1,
            tier: TierLabel::Feedback(0),
        });
        printer.emit(&SchedEvent::Started {
            time: 15,
            process_id: 1,
            tier: TierLabel::Fcfs,
        });
        printer.emit(&SchedEvent::Finished {
            time: 16,
            process_id: 1,
        });

        let out = String::from_utf8(printer.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "Time 0: Executing Process 1 from Queue 1\n\
             Time 15: Executing Process 1 from FCFS Queue\n\
             Process 1 finished at time 16\n"
        );
    }

    #[test]
    fn tier_labels_display() {
        assert_eq!(TierLabel::Feedback(2).to_string(), "2");
        assert_eq!(TierLabel::Fcfs.to_string(), "FCFS");
    }
}
