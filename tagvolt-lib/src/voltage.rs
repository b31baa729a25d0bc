use crate::command::Command;
use crate::constants::{ADC_MAX, VREF};
use crate::gain::GainFactor;
use crate::response::ResponseFrame;

/// Convert a measurement response into a calibrated voltage.
///
/// Returns `None` for anything that is not a measurement: frames shorter
/// than 5 bytes or frames echoing any opcode other than `0xA2`. A config
/// response carries a byte at the ADC offset too, but treating it as a
/// reading would register a bogus sample, so only the measurement opcode
/// is accepted.
///
/// `voltage = (adc / ADC_MAX) * VREF / gain` with the tag's 14-bit full
/// scale and 0.9 V reference. No rounding or clamping; callers pick the
/// display precision.
pub fn decode_voltage(response: &ResponseFrame, gain: GainFactor) -> Option<f64> {
    if response.command() != Some(Command::Measure) {
        return None;
    }
    let adc = response.adc_raw()? as f64;
    Some((adc / ADC_MAX as f64) * VREF / gain.factor())
}
