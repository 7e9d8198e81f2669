//! Gain/decibel conversions and the proximity volume curve.

/// Convert a linear gain (0..=1) to decibels. Zero gain maps to `-inf`.
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.log10()
}

/// Convert decibels back to linear gain. `-inf` maps to zero.
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Volume for an ambient bed at `distance` from the reading line, in dB.
///
/// The linear ratio `1 - distance / audible_distance` is squared (perceptual
/// curve) before the dB conversion. At the reading line this is 0 dB, at the
/// audible edge and beyond `-inf`.
pub fn proximity_db(distance: f64, audible_distance: f64) -> f32 {
    if audible_distance <= 0.0 {
        return f32::NEG_INFINITY;
    }
    let ratio = (1.0 - distance / audible_distance).clamp(0.0, 1.0) as f32;
    gain_to_db(ratio * ratio)
}
