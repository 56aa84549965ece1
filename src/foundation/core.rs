use crate::foundation::error::{WaveformError, WaveformResult};

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "FpsDef")]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

/// JSON-facing frame rate: either a plain integer (`30`) or `{ "num": 30000, "den": 1001 }`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum FpsDef {
    Whole(u32),
    Ratio { num: u32, den: u32 },
}

impl TryFrom<FpsDef> for Fps {
    type Error = WaveformError;

    fn try_from(def: FpsDef) -> Result<Self, Self::Error> {
        match def {
            FpsDef::Whole(num) => Fps::new(num, 1),
            FpsDef::Ratio { num, den } => Fps::new(num, den),
        }
    }
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> WaveformResult<Self> {
        if den == 0 {
            return Err(WaveformError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(WaveformError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Convert seconds to frame count using floor semantics.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }
}

/// Convert a frame offset to the nearest sample index at `sample_rate`.
///
/// Exact rational arithmetic, rounding half up: `round(frames / fps * sample_rate)`.
pub fn frame_to_sample(frames: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frames) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num);
    let rounded = (num + (den / 2)) / den;
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
