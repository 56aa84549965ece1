use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::Fps;
use crate::foundation::error::{WaveformError, WaveformResult};
use crate::media::cache::MetadataCache;
use crate::media::metadata::{AudioMetadata, max_media_duration_frames};
use crate::media::provider::AudioMetadataProvider;
use crate::timeline::range::{FrameRange, resolve};
use crate::view::state::WaveformView;
use crate::waveform::bars::{Bar, compute_bars};
use crate::waveform::envelope::{Envelope, EnvelopeOpts, Volume, compute_envelope};

/// JSON-facing description of one clip's waveform on the timeline.
///
/// ```json
/// { "src": "voice.wav", "fps": 30, "start_from": 15, "duration": 90,
///   "visualization_width": 400, "volume": "0,1,0.5" }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaveformRequest {
    /// Source identifier handed to the metadata provider.
    pub src: String,
    /// Timeline frame rate.
    pub fps: Fps,
    /// First media frame; negative values count back from the end of the media.
    #[serde(default)]
    pub start_from: i64,
    /// Window length in frames; `null` or absent plays until the end of the media.
    #[serde(default)]
    pub duration: Option<u64>,
    /// On-screen width in pixels, one bar per pixel slot.
    pub visualization_width: u32,
    /// Clip volume: a number or a comma-separated keyframe string.
    #[serde(default = "default_volume")]
    pub volume: Volume,
    /// Envelope drawing geometry.
    #[serde(default)]
    pub envelope: EnvelopeOpts,
}

fn default_volume() -> Volume {
    Volume::Constant(1.0)
}

/// Everything the presentation layer needs to draw one clip.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct WaveformReport {
    /// Media length in frames, when metadata is known.
    pub max_media_duration: Option<u64>,
    /// Peak bars, empty while metadata is unavailable.
    pub bars: Vec<Bar>,
    /// Static volume envelope, if the volume has one.
    pub envelope: Option<Envelope>,
}

impl WaveformRequest {
    /// Parse a request from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> WaveformResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| WaveformError::validation(format!("parse waveform request JSON: {e}")))
    }

    /// Parse a request from a JSON string.
    pub fn from_json_str(s: &str) -> WaveformResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a request from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> WaveformResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            WaveformError::validation(format!(
                "open waveform request JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Resolved frame window of the clip.
    pub fn frame_range(&self) -> FrameRange {
        resolve(self.start_from, self.duration.into())
    }

    /// Build the report from already fetched metadata (`None` while loading or after a failure).
    pub fn evaluate(&self, metadata: Option<&AudioMetadata>) -> WaveformReport {
        let envelope = compute_envelope(&self.volume, self.visualization_width, self.envelope);
        let Some(m) = metadata else {
            return WaveformReport {
                envelope,
                ..WaveformReport::default()
            };
        };

        WaveformReport {
            max_media_duration: Some(max_media_duration_frames(m, self.fps)),
            bars: compute_bars(m, self.frame_range(), self.fps, self.visualization_width),
            envelope,
        }
    }

    /// Fetch metadata through `cache` and build the report. Decode failures yield no bars.
    pub async fn run<P: AudioMetadataProvider>(&self, cache: &MetadataCache<P>) -> WaveformReport {
        let mut view = WaveformView::new(self.src.clone());
        view.load(cache).await;
        self.evaluate(view.metadata().map(|m| &**m))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/view_request.rs"]
mod tests;
