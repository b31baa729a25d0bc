use crate::constants::{COMMAND_FRAME_SIZE, FRAME_FLAGS, FRAME_HEADER};
use crate::error::TagError;
use bytes::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use strum_macros::Display;

/// Opcodes of the tag's register-based command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Command {
    #[strum(to_string = "power on")]
    PowerOn = 0xA1,
    #[strum(to_string = "measure")]
    Measure = 0xA2,
    #[strum(to_string = "config read")]
    ReadConfig = 0xA3,
    #[strum(to_string = "power off")]
    PowerOff = 0xA4,
}

/// A 3-byte command frame: `[0x02, opcode, 0x07]`.
///
/// `0x02` is the fixed length/header byte and `0x07` the fixed flag byte
/// shared by every command the tag understands. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame([u8; COMMAND_FRAME_SIZE]);

impl CommandFrame {
    pub fn new(command: Command) -> Self {
        Self([FRAME_HEADER, command.into(), FRAME_FLAGS])
    }

    pub fn command(&self) -> Command {
        // The constructor is the only way to build a frame, so the opcode
        // byte is always one of the four known commands.
        Command::try_from(self.0[1]).unwrap_or(Command::Measure)
    }

    pub fn as_bytes(&self) -> &[u8; COMMAND_FRAME_SIZE] {
        &self.0
    }
}

impl From<CommandFrame> for Bytes {
    fn from(frame: CommandFrame) -> Self {
        Bytes::copy_from_slice(&frame.0)
    }
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bytes_to_hex(&self.0))
    }
}

/// Decode an even-length hex string into bytes, most significant nibble first.
///
/// Fails with [`TagError::MalformedHex`] on an odd number of digits or any
/// non-hex character.
pub fn hex_to_bytes(s: &str) -> Result<Bytes, TagError> {
    if s.len() % 2 != 0 {
        return Err(TagError::MalformedHex {
            reason: format!("odd number of digits ({})", s.len()),
        });
    }
    let decoded = hex::decode(s).map_err(|e| TagError::MalformedHex { reason: e.to_string() })?;
    Ok(Bytes::from(decoded))
}

/// Render bytes as uppercase hex pairs separated by single spaces.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
