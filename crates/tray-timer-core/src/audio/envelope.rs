/// Length of the fade-in and fade-out ramps.
pub const FADE_RAMP_MS: u64 = 1000;

/// `min(file length, cap)`: the length a session is allowed to play.
pub fn effective_duration_ms(file_ms: u64, max_ms: u64) -> u64 {
    file_ms.min(max_ms)
}

/// Volume as a function of elapsed playback time.
///
/// Linear ramp up over the first [`FADE_RAMP_MS`], linear ramp down over the
/// last [`FADE_RAMP_MS`] before the effective duration, nominal in between.
/// Where the ramps overlap (sessions shorter than two ramps) the lower value
/// wins. Results are always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeEnvelope {
    effective_ms: u64,
    nominal: f32,
}

impl FadeEnvelope {
    /// Envelope over `effective_ms` peaking at `nominal` (clamped to `[0, 1]`).
    pub fn new(effective_ms: u64, nominal: f32) -> Self {
        Self {
            effective_ms,
            nominal: clamp_volume(nominal),
        }
    }

    /// Session length the envelope spans.
    pub fn effective_ms(&self) -> u64 {
        self.effective_ms
    }

    /// Volume at `elapsed_ms` into the session.
    pub fn volume_at(&self, elapsed_ms: u64) -> f32 {
        if elapsed_ms >= self.effective_ms {
            return 0.0;
        }

        let ramp = FADE_RAMP_MS as f64;
        let fade_in = (elapsed_ms as f64 / ramp).min(1.0);
        let fade_out = ((self.effective_ms - elapsed_ms) as f64 / ramp).min(1.0);

        clamp_volume((f64::from(self.nominal) * fade_in.min(fade_out)) as f32)
    }
}

/// Clamp to the linear `[0.0, 1.0]` volume scale. NaN maps to silence.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
