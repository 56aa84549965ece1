use std::sync::Arc;

use crate::foundation::core::Fps;
use crate::foundation::error::{WaveformError, WaveformResult};

/// Decoded, immutable audio metadata for one source.
///
/// Channels are stored planar. All channels have the same sample count and
/// `duration_secs == samples / sample_rate`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "AudioMetadataDef")]
pub struct AudioMetadata {
    sample_rate: u32,
    duration_secs: f64,
    channel_data: Vec<Arc<[f32]>>,
}

#[derive(serde::Deserialize)]
struct AudioMetadataDef {
    sample_rate: u32,
    channel_data: Vec<Vec<f32>>,
}

impl TryFrom<AudioMetadataDef> for AudioMetadata {
    type Error = WaveformError;

    fn try_from(def: AudioMetadataDef) -> Result<Self, Self::Error> {
        AudioMetadata::new(def.sample_rate, def.channel_data)
    }
}

impl AudioMetadata {
    /// Build metadata from planar channel buffers.
    pub fn new(sample_rate: u32, channel_data: Vec<Vec<f32>>) -> WaveformResult<Self> {
        if sample_rate == 0 {
            return Err(WaveformError::validation("sample_rate must be > 0"));
        }
        let len = channel_data.first().map_or(0, Vec::len);
        if let Some(idx) = channel_data.iter().position(|c| c.len() != len) {
            return Err(WaveformError::validation(format!(
                "channel {idx} has {} samples, expected {len}",
                channel_data[idx].len()
            )));
        }

        Ok(Self {
            sample_rate,
            duration_secs: (len as f64) / f64::from(sample_rate),
            channel_data: channel_data.into_iter().map(Arc::from).collect(),
        })
    }

    /// Build metadata from interleaved decoder output.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(
        sample_rate: u32,
        channels: u16,
        interleaved: &[f32],
    ) -> WaveformResult<Self> {
        let ch = usize::from(channels);
        if ch == 0 {
            return Self::new(sample_rate, Vec::new());
        }
        let frames = interleaved.len() / ch;
        let mut planar: Vec<Vec<f32>> = (0..ch).map(|_| Vec::with_capacity(frames)).collect();
        for frame in interleaved.chunks_exact(ch) {
            for (c, &s) in frame.iter().enumerate() {
                planar[c].push(s);
            }
        }
        Self::new(sample_rate, planar)
    }

    /// Metadata for a source that decoded without any audio stream.
    pub fn silent(sample_rate: u32) -> WaveformResult<Self> {
        Self::new(sample_rate, Vec::new())
    }

    /// Samples per second.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count. `0` means the source has no usable audio.
    pub fn number_of_channels(&self) -> usize {
        self.channel_data.len()
    }

    /// Total duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Samples per channel.
    pub fn samples_per_channel(&self) -> usize {
        self.channel_data.first().map_or(0, |c| c.len())
    }

    /// Planar sample buffers, one per channel.
    pub fn channel_data(&self) -> &[Arc<[f32]>] {
        &self.channel_data
    }

    /// Mean of all channels at `idx`.
    ///
    /// Callers guarantee `idx < samples_per_channel()` and at least one channel.
    pub(crate) fn mixed_sample(&self, idx: usize) -> f32 {
        let sum: f32 = self.channel_data.iter().map(|c| c[idx]).sum();
        sum / self.channel_data.len() as f32
    }
}

/// Full length of the media in timeline frames, `floor(duration * fps)`.
pub fn max_media_duration_frames(metadata: &AudioMetadata, fps: Fps) -> u64 {
    fps.secs_to_frames_floor(metadata.duration_secs())
}

#[cfg(test)]
#[path = "../../tests/unit/media/metadata.rs"]
mod tests;
