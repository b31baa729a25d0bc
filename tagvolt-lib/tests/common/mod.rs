//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use tagvolt_lib::command::{Command, CommandFrame, bytes_to_hex, hex_to_bytes};
#[allow(unused_imports)]
pub use tagvolt_lib::error::TagError;
#[allow(unused_imports)]
pub use tagvolt_lib::event::{RunEvent, Sample};
#[allow(unused_imports)]
pub use tagvolt_lib::gain::GainFactor;
#[allow(unused_imports)]
pub use tagvolt_lib::response::ResponseFrame;
#[allow(unused_imports)]
pub use tagvolt_lib::sequencer::{RunConfig, Sequencer, SequencerState};
#[allow(unused_imports)]
pub use tagvolt_lib::transport::TagTransport;
#[allow(unused_imports)]
pub use tagvolt_lib::voltage::decode_voltage;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Wire bytes of the four command frames.
#[allow(dead_code)]
pub const CONFIG_FRAME: [u8; 3] = [0x02, 0xA3, 0x07];
#[allow(dead_code)]
pub const POWER_ON_FRAME: [u8; 3] = [0x02, 0xA1, 0x07];
#[allow(dead_code)]
pub const MEASURE_FRAME: [u8; 3] = [0x02, 0xA2, 0x07];
#[allow(dead_code)]
pub const POWER_OFF_FRAME: [u8; 3] = [0x02, 0xA4, 0x07];

/// Build a config-read response carrying the given register byte.
#[allow(dead_code)]
pub fn config_response(register: u8) -> Vec<u8> {
    vec![0x00, 0xA3, 0x00, register, 0x00]
}

/// Build a minimal response echoing the given opcode.
#[allow(dead_code)]
pub fn echo_response(opcode: u8) -> Vec<u8> {
    vec![0x00, opcode, 0x00, 0x00, 0x00]
}

/// Build a measurement response carrying the given raw ADC word.
#[allow(dead_code)]
pub fn measure_response(adc: u16) -> Vec<u8> {
    vec![0x00, 0xA2, 0x00, (adc & 0xFF) as u8, (adc >> 8) as u8]
}

/// One scripted transport reaction.
#[allow(dead_code)]
pub enum ScriptStep {
    /// Serve these response bytes.
    Respond(Vec<u8>),
    /// Fail the transceive with a transport I/O error.
    IoError,
    /// Fail the connect before any frame is sent.
    ConnectError,
}

/// Scripted in-memory transport. Serves queued reactions in order,
/// recording every frame that was actually transmitted; falls back to
/// `default_response` once the script runs out.
pub struct MockTransport {
    script: VecDeque<ScriptStep>,
    default_response: Option<Vec<u8>>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    connected: bool,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            default_response: None,
            sent: Arc::new(Mutex::new(Vec::new())),
            connected: false,
        }
    }

    pub fn push(&mut self, step: ScriptStep) {
        self.script.push_back(step);
    }

    pub fn push_response(&mut self, response: Vec<u8>) {
        self.push(ScriptStep::Respond(response));
    }

    pub fn push_io_error(&mut self) {
        self.push(ScriptStep::IoError);
    }

    pub fn push_connect_error(&mut self) {
        self.push(ScriptStep::ConnectError);
    }

    pub fn with_default_response(mut self, response: Vec<u8>) -> Self {
        self.default_response = Some(response);
        self
    }

    /// Handle onto the record of transmitted frames; stays valid after the
    /// transport has been moved into a sequencer.
    pub fn sent_frames(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.sent)
    }
}

impl TagTransport for MockTransport {
    async fn connect(&mut self) -> Result<(), TagError> {
        if matches!(self.script.front(), Some(ScriptStep::ConnectError)) {
            self.script.pop_front();
            return Err(TagError::TransportUnavailable("tag out of field".to_string()));
        }
        self.connected = true;
        Ok(())
    }

    async fn transceive(&mut self, frame: &[u8]) -> Result<Bytes, TagError> {
        assert!(self.connected, "transceive without connect");
        self.sent.lock().unwrap().push(frame.to_vec());
        match self.script.pop_front() {
            Some(ScriptStep::Respond(response)) => Ok(Bytes::from(response)),
            Some(ScriptStep::IoError) => Err(TagError::TransportIo("tag left the field".to_string())),
            Some(ScriptStep::ConnectError) => unreachable!("consumed in connect"),
            None => match &self.default_response {
                Some(response) => Ok(Bytes::from(response.clone())),
                None => Err(TagError::TransportIo("mock script exhausted".to_string())),
            },
        }
    }

    async fn close(&mut self) {
        self.connected = false;
    }
}

/// Drain everything currently buffered in the event channel.
#[allow(dead_code)]
pub fn drain_events(rx: &mut mpsc::UnboundedReceiver<RunEvent>) -> Vec<RunEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Extract the samples from an event stream, in order.
#[allow(dead_code)]
pub fn samples(events: &[RunEvent]) -> Vec<Sample> {
    events
        .iter()
        .filter_map(|e| match e {
            RunEvent::Sample(s) => Some(*s),
            _ => None,
        })
        .collect()
}

/// Extract the log lines from an event stream, in order.
#[allow(dead_code)]
pub fn log_lines(events: &[RunEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            RunEvent::Log(line) => Some(line.clone()),
            _ => None,
        })
        .collect()
}
