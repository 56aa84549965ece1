use std::convert::Infallible;
use std::str::FromStr;

use kurbo::{BezPath, Point};

/// Height of one timeline layer in pixels.
pub const TIMELINE_LAYER_HEIGHT: f64 = 75.0;

/// Clip volume as handed over by the editor.
#[derive(Clone, Debug, PartialEq)]
pub enum Volume {
    /// One number. The clip's volume may vary per frame, so no static curve exists.
    Constant(f64),
    /// Static gain envelope sampled at evenly spaced points over the clip.
    Keyframes(Vec<f64>),
}

impl Volume {
    /// Parse a comma-separated keyframe list such as `"0,1,0.5"`.
    ///
    /// Tokens are trimmed. Tokens that are empty or not numbers become NaN and are skipped when the
    /// envelope is drawn, keeping the slots of the other keyframes.
    pub fn parse_keyframes(spec: &str) -> Self {
        Self::Keyframes(
            spec.split(',')
                .map(|t| t.trim().parse::<f64>().unwrap_or(f64::NAN))
                .collect(),
        )
    }
}

impl From<f64> for Volume {
    fn from(v: f64) -> Self {
        Self::Constant(v)
    }
}

impl FromStr for Volume {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_keyframes(s))
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum VolumeDef {
    Number(f64),
    Text(String),
}

impl<'de> serde::Deserialize<'de> for Volume {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match VolumeDef::deserialize(d)? {
            VolumeDef::Number(v) => Self::Constant(v),
            VolumeDef::Text(s) => Self::parse_keyframes(&s),
        })
    }
}

impl serde::Serialize for Volume {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Constant(v) => s.serialize_f64(*v),
            Self::Keyframes(values) => {
                let joined = values
                    .iter()
                    .map(f64::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                s.serialize_str(&joined)
            }
        }
    }
}

/// Geometry of the area the envelope is drawn into.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EnvelopeOpts {
    /// Height of the bar area in pixels.
    pub layer_height: f64,
    /// Pixels kept free below gain `0.0`.
    pub bottom_margin: f64,
}

impl Default for EnvelopeOpts {
    fn default() -> Self {
        Self {
            layer_height: TIMELINE_LAYER_HEIGHT,
            bottom_margin: 2.0,
        }
    }
}

/// Polyline of the static gain envelope, in pixel space with `y` growing downwards.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Envelope {
    points: Vec<Point>,
}

impl Envelope {
    /// Points in ascending `x` order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Stroke path through all points.
    ///
    /// A single point becomes a zero-length segment so it still strokes.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some((&first, rest)) = self.points.split_first() else {
            return path;
        };
        path.move_to(first);
        if rest.is_empty() {
            path.line_to(first);
        }
        for &p in rest {
            path.line_to(p);
        }
        path
    }
}

/// Map a volume specification onto the waveform's pixel space.
///
/// Returns `None` for [`Volume::Constant`] and when no keyframe is drawable. Keyframe `i` of `n`
/// sits at `x = i / (n - 1) * visualization_width` (a single keyframe sits at `x = 0`) and
/// `y = (1 - gain) * (layer_height - bottom_margin)`. Gains are clamped to `[0, 1]`; non-finite
/// gains are skipped.
pub fn compute_envelope(
    volume: &Volume,
    visualization_width: u32,
    opts: EnvelopeOpts,
) -> Option<Envelope> {
    let Volume::Keyframes(values) = volume else {
        return None;
    };

    let width = f64::from(visualization_width);
    let span = (opts.layer_height - opts.bottom_margin).max(0.0);
    let last = values.len().saturating_sub(1);

    let points = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| {
            let x = if last == 0 {
                0.0
            } else {
                (i as f64 / last as f64) * width
            };
            Point::new(x, (1.0 - v.clamp(0.0, 1.0)) * span)
        })
        .collect::<Vec<_>>();

    if points.is_empty() {
        return None;
    }
    Some(Envelope { points })
}

#[cfg(test)]
#[path = "../../tests/unit/waveform/envelope.rs"]
mod tests;
