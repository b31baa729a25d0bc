use crate::command::{Command, bytes_to_hex};
use crate::constants::{
    MIN_RESPONSE_SIZE, OFFSET_ADC_HIGH, OFFSET_ADC_LOW, OFFSET_CONFIG_REGISTER,
    OFFSET_ECHOED_OPCODE,
};
use bytes::Bytes;
use std::fmt;

/// A raw response frame returned by the transport.
///
/// Fields live at fixed offsets: byte 1 echoes the command opcode, bytes 3
/// and 4 carry the ADC word (low, high) for measurement-shaped responses,
/// and byte 3 doubles as the configuration register in a config-read
/// response. There is no checksum; integrity is the transport's problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    bytes: Bytes,
}

impl ResponseFrame {
    pub fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The opcode echoed back by the tag, if the frame is long enough.
    pub fn echoed_opcode(&self) -> Option<u8> {
        self.bytes.get(OFFSET_ECHOED_OPCODE).copied()
    }

    /// The echoed opcode parsed as a known command.
    pub fn command(&self) -> Option<Command> {
        Command::try_from(self.echoed_opcode()?).ok()
    }

    /// The raw ADC word, high byte at offset 4 and low byte at offset 3.
    pub fn adc_raw(&self) -> Option<u16> {
        if self.bytes.len() < MIN_RESPONSE_SIZE {
            return None;
        }
        let low = self.bytes[OFFSET_ADC_LOW] as u16;
        let high = self.bytes[OFFSET_ADC_HIGH] as u16;
        Some((high << 8) | low)
    }

    /// The configuration register byte of a config-read response.
    pub fn config_register(&self) -> Option<u8> {
        if self.bytes.len() < MIN_RESPONSE_SIZE {
            return None;
        }
        Some(self.bytes[OFFSET_CONFIG_REGISTER])
    }
}

impl AsRef<[u8]> for ResponseFrame {
    fn as_ref(&self) -> &[u8] {
        self.bytes.as_ref()
    }
}

impl From<Bytes> for ResponseFrame {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Display for ResponseFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bytes_to_hex(self.bytes.as_ref()))
    }
}
