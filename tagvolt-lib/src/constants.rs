// Protocol constants for the NFC-V sensor tag

/// First byte of every command frame (fixed length/header byte)
pub const FRAME_HEADER: u8 = 0x02;

/// Trailing flag byte carried by every command in this command set
pub const FRAME_FLAGS: u8 = 0x07;

/// Size of a command frame: header + opcode + flags (3 bytes)
pub const COMMAND_FRAME_SIZE: usize = 3;

/// Minimum response size that carries usable fields (5 bytes)
pub const MIN_RESPONSE_SIZE: usize = 5;

/// Offset of the echoed opcode in a response
pub const OFFSET_ECHOED_OPCODE: usize = 1;

/// Offset of the configuration register in a config-read response
pub const OFFSET_CONFIG_REGISTER: usize = 3;

/// Offset of the ADC low byte in a measurement response
pub const OFFSET_ADC_LOW: usize = 3;

/// Offset of the ADC high byte in a measurement response
pub const OFFSET_ADC_HIGH: usize = 4;

/// Full-scale value of the tag's 14-bit ADC
pub const ADC_MAX: u16 = (1 << 14) - 1;

/// ADC reference voltage in volts
pub const VREF: f64 = 0.9;

/// Longest finite run for which per-iteration frame logs are emitted
pub const VERBOSE_LOG_MAX_RUN: u32 = 50;
