//! 8-bit Quantization
//!
//! Scales line values relative to the spectrum's own maximum: the loudest
//! line becomes 255, silence becomes all zeros.

use crate::error::DspError;

/// Quantize `lines` into `out` as `round(255 * line / max)`
///
/// A zero (or non-finite) `max` yields all-zero output instead of dividing by zero.
pub fn quantize(lines: &[f64], max: f64, out: &mut [u8]) -> Result<(), DspError> {
    if out.len() != lines.len() {
        return Err(DspError::BufferSizeMismatch {
            expected: lines.len(),
            got: out.len(),
        });
    }

    if !(max > 0.0 && max.is_finite()) {
        out.fill(0);
        return Ok(());
    }

    let scale = 255.0 / max;
    for (o, &line) in out.iter_mut().zip(lines) {
        *o = (line * scale).round().clamp(0.0, 255.0) as u8;
    }

    Ok(())
}
