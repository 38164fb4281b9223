//! Sample format conversion shared by the backends.

const SCALE: f32 = 32768.0;

/// 16-bit PCM to normalized float in `[-1.0, 1.0)`.
pub(crate) fn to_float(pcm: &[i16]) -> Vec<f32> {
    pcm.iter().map(|&s| f32::from(s) / SCALE).collect()
}

/// Normalized float back to 16-bit PCM, rounded and clamped.
pub(crate) fn from_float(samples: &[f32]) -> impl Iterator<Item = i16> + '_ {
    samples
        .iter()
        .map(|&s| (s * SCALE).round().clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16)
}
