use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

/// One calibrated reading, timestamped relative to the start of the run.
///
/// Ownership passes to the event sink on emission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since the run's start timestamp.
    pub elapsed_ms: u64,
    /// Calibrated voltage in volts.
    pub voltage: f64,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms  {:.4} V", self.elapsed_ms, self.voltage)
    }
}

/// Ordered stream of events a run emits to its host.
///
/// Exactly one terminal event (`Completed` or `Aborted`) closes the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// Human-readable protocol log line.
    Log(String),
    /// One successful measurement.
    Sample(Sample),
    /// The run finished normally, power-off included.
    Completed,
    /// The startup handshake failed; no measurement was attempted.
    Aborted(String),
}

/// Sending half of the event sink the host supplies.
pub type EventSender = mpsc::UnboundedSender<RunEvent>;
