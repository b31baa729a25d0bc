use crate::command::{Command, CommandFrame};
use crate::constants::VERBOSE_LOG_MAX_RUN;
use crate::error::TagError;
use crate::event::{EventSender, RunEvent, Sample};
use crate::gain::GainFactor;
use crate::transport::{TagTransport, exchange};
use crate::voltage::decode_voltage;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use strum_macros::Display;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Configuration of one measurement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of measurement iterations; `0` means run until cancelled.
    pub repeat_count: u32,
}

impl RunConfig {
    pub fn finite(repeat_count: u32) -> Self {
        Self { repeat_count }
    }

    pub fn infinite() -> Self {
        Self { repeat_count: 0 }
    }

    pub fn is_infinite(&self) -> bool {
        self.repeat_count == 0
    }

    /// Whether per-iteration frame logs are emitted for this run.
    /// Long finite runs would drown the log, so they stay quiet.
    fn verbose(&self) -> bool {
        self.is_infinite() || self.repeat_count <= VERBOSE_LOG_MAX_RUN
    }
}

/// Where the sequencer is in a run's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SequencerState {
    Idle,
    ConfiguringGain,
    PoweringOn,
    Measuring,
    PoweringOff,
    Completed,
    Aborted,
}

/// Drives one measurement run against a single tag transport.
///
/// The fixed startup handshake (config read, then power on) runs first;
/// any failure there aborts the run before a measurement is attempted.
/// The measuring loop then repeats until the configured count is reached
/// or the cancellation token fires, yielding to the host scheduler between
/// iterations. A transport error inside the loop is logged and retried and
/// does not consume the repeat budget. Exactly one power-off exchange is
/// attempted on the way out of the loop, whatever its outcome.
///
/// The gain factor and iteration counter are owned by the sequencer, so
/// successive runs cannot interfere. A run borrows the sequencer mutably
/// for its whole duration; a second run on the same transport cannot start
/// while one is in progress.
pub struct Sequencer<T: TagTransport> {
    transport: T,
    events: EventSender,
    cancel: CancellationToken,
    state: SequencerState,
    gain: GainFactor,
    completed_iterations: u32,
}

impl<T: TagTransport> Sequencer<T> {
    pub fn new(transport: T, events: EventSender) -> Self {
        Self {
            transport,
            events,
            cancel: CancellationToken::new(),
            state: SequencerState::Idle,
            gain: GainFactor::default(),
            completed_iterations: 0,
        }
    }

    /// Token that stops the run at the next iteration boundary. Power-off
    /// is still issued after cancellation, so the tag is not left powered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Gain factor of the current (or last) run.
    pub fn gain(&self) -> GainFactor {
        self.gain
    }

    /// Iterations completed so far in the current (or last) run.
    pub fn completed_iterations(&self) -> u32 {
        self.completed_iterations
    }

    /// Execute one complete run. All failures are converted into log
    /// events or the terminal status; nothing escapes the engine boundary.
    pub async fn run(&mut self, config: RunConfig) {
        self.completed_iterations = 0;
        self.gain = GainFactor::default();

        if let Err(err) = self.startup().await {
            self.log(format!("startup failed: {err}"));
            self.state = SequencerState::Aborted;
            let _ = self.events.send(RunEvent::Aborted(err.to_string()));
            return;
        }

        self.measure_loop(&config).await;
        self.power_off().await;

        self.state = SequencerState::Completed;
        let _ = self.events.send(RunEvent::Completed);
    }

    /// Config read, gain calibration, power on. Errors abort the run.
    async fn startup(&mut self) -> Result<(), TagError> {
        self.state = SequencerState::ConfiguringGain;
        let frame = CommandFrame::new(Command::ReadConfig);
        self.log(format!("-> {} command: {}", Command::ReadConfig, frame));
        let response = exchange(&mut self.transport, frame).await?;
        self.log(format!("<- {} response: {}", Command::ReadConfig, response));

        self.gain = GainFactor::from_config_response(&response)?;
        self.log(format!("gain read from config register: {}", self.gain));

        self.state = SequencerState::PoweringOn;
        let frame = CommandFrame::new(Command::PowerOn);
        self.log(format!("-> {} command: {}", Command::PowerOn, frame));
        // The power-on response carries no fields worth validating.
        let response = exchange(&mut self.transport, frame).await?;
        self.log(format!("<- {} response: {}", Command::PowerOn, response));
        Ok(())
    }

    async fn measure_loop(&mut self, config: &RunConfig) {
        self.state = SequencerState::Measuring;
        self.log("starting measurement...".to_string());

        let verbose = config.verbose();
        let frame = CommandFrame::new(Command::Measure);
        let started = Instant::now();

        while !self.cancel.is_cancelled()
            && (config.is_infinite() || self.completed_iterations < config.repeat_count)
        {
            if verbose {
                self.log(format!("-> {} command: {}", Command::Measure, frame));
            }
            match exchange(&mut self.transport, frame).await {
                Ok(response) => {
                    if verbose {
                        self.log(format!("<- {} response: {}", Command::Measure, response));
                    }
                    if let Some(voltage) = decode_voltage(&response, self.gain) {
                        let sample = Sample {
                            elapsed_ms: started.elapsed().as_millis() as u64,
                            voltage,
                        };
                        debug!(elapsed_ms = sample.elapsed_ms, voltage = sample.voltage, "sample");
                        let _ = self.events.send(RunEvent::Sample(sample));
                    }
                    self.completed_iterations += 1;
                }
                Err(err) => {
                    // Failed exchanges are retried and do not consume the
                    // repeat budget.
                    warn!("measurement exchange failed: {err}");
                    self.log(format!("measurement failed, retrying: {err}"));
                }
            }
            // Hand control back to the host between iterations.
            tokio::task::yield_now().await;
        }
    }

    /// Best-effort power-off on the way out; a failure here is logged but
    /// the run still completes.
    async fn power_off(&mut self) {
        self.state = SequencerState::PoweringOff;
        self.log("measurement finished, powering off...".to_string());

        let frame = CommandFrame::new(Command::PowerOff);
        self.log(format!("-> {} command: {}", Command::PowerOff, frame));
        match exchange(&mut self.transport, frame).await {
            Ok(response) => {
                self.log(format!("<- {} response: {}", Command::PowerOff, response));
                self.log("tag supply disabled".to_string());
            }
            Err(err) => self.log(format!("power off failed: {err}")),
        }
    }

    fn log(&self, line: String) {
        debug!("{line}");
        let _ = self.events.send(RunEvent::Log(line));
    }
}
