//! An in-process stand-in for the physical tag, so the engine can be
//! exercised without an NFC reader in range.

use bytes::Bytes;
use std::time::Duration;
use tagvolt_lib::TagTransport;
use tagvolt_lib::command::Command;
use tagvolt_lib::constants::ADC_MAX;
use tagvolt_lib::error::TagError;
use tracing::trace;

/// Per-exchange latency, roughly what an NFC-V transceive costs.
const EXCHANGE_LATENCY: Duration = Duration::from_millis(50);

/// Simulated sensor tag. Answers the four-command set with well-formed
/// responses; the measurement channel follows a capacitor-charging curve
/// so plots and logs look like a live sensor.
pub struct SimulatedTag {
    gain_sel: u8,
    fail_every: Option<u32>,
    powered: bool,
    measures: u32,
    tick: u32,
}

impl SimulatedTag {
    pub fn new(gain_sel: u8, fail_every: Option<u32>) -> Self {
        Self {
            gain_sel,
            fail_every,
            powered: false,
            measures: 0,
            tick: 0,
        }
    }

    fn next_adc(&mut self) -> u16 {
        self.tick += 1;
        // Charging curve toward full scale with a time constant of 30 ticks
        let level = 1.0 - (-(self.tick as f64) / 30.0).exp();
        (ADC_MAX as f64 * level) as u16
    }
}

impl TagTransport for SimulatedTag {
    async fn connect(&mut self) -> Result<(), TagError> {
        Ok(())
    }

    async fn transceive(&mut self, frame: &[u8]) -> Result<Bytes, TagError> {
        tokio::time::sleep(EXCHANGE_LATENCY).await;

        let opcode = *frame
            .get(1)
            .ok_or_else(|| TagError::TransportIo("frame too short".to_string()))?;
        let command = Command::try_from(opcode)
            .map_err(|_| TagError::TransportIo(format!("unknown opcode {opcode:#04X}")))?;
        trace!("simulated tag handling {command}");

        let response = match command {
            Command::ReadConfig => vec![0x00, 0xA3, 0x00, self.gain_sel << 3, 0x00],
            Command::PowerOn => {
                self.powered = true;
                vec![0x00, 0xA1, 0x00, 0x00, 0x00]
            }
            Command::Measure => {
                self.measures += 1;
                if self.fail_every.is_some_and(|n| n > 0 && self.measures % n == 0) {
                    return Err(TagError::TransportIo("simulated link dropout".to_string()));
                }
                if !self.powered {
                    return Err(TagError::TransportIo("tag supply is off".to_string()));
                }
                let adc = self.next_adc();
                vec![0x00, 0xA2, 0x00, (adc & 0xFF) as u8, (adc >> 8) as u8]
            }
            Command::PowerOff => {
                self.powered = false;
                vec![0x00, 0xA4, 0x00, 0x00, 0x00]
            }
        };
        Ok(Bytes::from(response))
    }

    async fn close(&mut self) {}
}
