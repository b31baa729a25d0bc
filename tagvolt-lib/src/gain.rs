use crate::command::Command;
use crate::constants::MIN_RESPONSE_SIZE;
use crate::error::TagError;
use crate::response::ResponseFrame;
use modular_bitfield::prelude::*;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::Display;

/// Layout of the tag's configuration register. Only the 2-bit gain
/// selector in bits 3-4 is meaningful to the engine.
#[bitfield]
#[derive(Debug, Clone, Copy)]
pub struct ConfigRegister {
    #[skip]
    reserved_low: B3,
    pub gain_sel: B2,
    #[skip]
    reserved_high: B3,
}

/// Amplifier gain selected by the configuration register.
///
/// The discriminant is the raw 2-bit selector value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Default, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum GainFactor {
    #[default]
    #[strum(to_string = "1x")]
    X1 = 0,
    #[strum(to_string = "2x")]
    X2 = 1,
    #[strum(to_string = "4x")]
    X4 = 2,
    #[strum(to_string = "8x")]
    X8 = 3,
}

impl GainFactor {
    /// Multiplicative divisor applied to the raw-to-voltage conversion.
    pub fn factor(&self) -> f64 {
        match self {
            GainFactor::X1 => 1.0,
            GainFactor::X2 => 2.0,
            GainFactor::X4 => 4.0,
            GainFactor::X8 => 8.0,
        }
    }

    /// Interpret a config-read response as a gain factor.
    ///
    /// The response must be at least 5 bytes and echo the config-read
    /// opcode; anything else is an [`TagError::InvalidConfigResponse`].
    /// The selector mapping is total over 2 bits, but any value that
    /// somehow falls outside it maps to 1x.
    pub fn from_config_response(response: &ResponseFrame) -> Result<Self, TagError> {
        if response.len() < MIN_RESPONSE_SIZE {
            return Err(TagError::InvalidConfigResponse {
                detail: format!("response too short ({} bytes)", response.len()),
            });
        }
        if response.command() != Some(Command::ReadConfig) {
            return Err(TagError::InvalidConfigResponse {
                detail: format!("echoed opcode {:02X?} is not a config read", response.echoed_opcode()),
            });
        }
        let register = response
            .config_register()
            .ok_or_else(|| TagError::InvalidConfigResponse {
                detail: "missing config register".to_string(),
            })?;
        let selector = ConfigRegister::from_bytes([register]).gain_sel();
        Ok(GainFactor::try_from(selector).unwrap_or_default())
    }
}
