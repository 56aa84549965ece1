use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::foundation::error::{WaveformError, WaveformResult};
use crate::media::metadata::AudioMetadata;

/// Sample rate reported for sources that have no audio stream at all.
pub const FALLBACK_SAMPLE_RATE: u32 = 48_000;

/// Source of decoded audio metadata, keyed by a source identifier.
///
/// Implementations are pure from the caller's point of view: the same identifier always decodes
/// to the same metadata. Failures are reported as [`WaveformError::Decode`].
pub trait AudioMetadataProvider: Send + Sync {
    /// Fetch and decode `source`.
    fn load(&self, source: &str) -> impl Future<Output = WaveformResult<AudioMetadata>> + Send;
}

/// Provider backed by metadata registered up front.
#[derive(Clone, Debug, Default)]
pub struct InMemoryProvider {
    entries: HashMap<String, AudioMetadata>,
}

impl InMemoryProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `metadata` under `source`, replacing any previous entry.
    pub fn insert(&mut self, source: impl Into<String>, metadata: AudioMetadata) {
        self.entries.insert(source.into(), metadata);
    }

    /// Builder-style [`InMemoryProvider::insert`].
    pub fn with(mut self, source: impl Into<String>, metadata: AudioMetadata) -> Self {
        self.insert(source, metadata);
        self
    }
}

impl AudioMetadataProvider for InMemoryProvider {
    async fn load(&self, source: &str) -> WaveformResult<AudioMetadata> {
        self.entries
            .get(source)
            .cloned()
            .ok_or_else(|| WaveformError::decode(format!("unknown audio source '{source}'")))
    }
}

/// Provider that decodes files below `assets_root` with `ffprobe`/`ffmpeg`.
///
/// Decoding requires the `media-ffmpeg` feature and both tools on `PATH`.
#[derive(Clone, Debug)]
pub struct FfmpegProvider {
    assets_root: PathBuf,
}

impl FfmpegProvider {
    /// Resolve relative sources against `assets_root`.
    pub fn new(assets_root: impl Into<PathBuf>) -> Self {
        Self {
            assets_root: assets_root.into(),
        }
    }

    /// Map a source identifier to a file path.
    ///
    /// Absolute paths are used as-is. Relative ones are normalized to `/` separators and must not
    /// escape `assets_root` through `..`.
    pub fn resolve_path(&self, source: &str) -> WaveformResult<PathBuf> {
        if Path::new(source).is_absolute() {
            return Ok(PathBuf::from(source));
        }
        Ok(self.assets_root.join(normalize_rel_path(source)?))
    }
}

impl AudioMetadataProvider for FfmpegProvider {
    #[tracing::instrument(skip(self))]
    async fn load(&self, source: &str) -> WaveformResult<AudioMetadata> {
        let path = self.resolve_path(source)?;
        tokio::task::spawn_blocking(move || decode_audio_metadata(&path))
            .await
            .map_err(|e| WaveformError::decode(format!("decode task failed: {e}")))?
    }
}

fn normalize_rel_path(source: &str) -> WaveformResult<String> {
    let s = source.replace('\\', "/");
    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(WaveformError::decode(format!(
                "audio source '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }
    if out.is_empty() {
        return Err(WaveformError::decode(
            "audio source must contain a file name",
        ));
    }
    Ok(out.join("/"))
}

#[cfg(feature = "media-ffmpeg")]
fn probe_audio_stream(path: &Path) -> WaveformResult<Option<(u32, u16)>> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        sample_rate: Option<String>,
        channels: Option<u16>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
    }

    let out = std::process::Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(path)
        .output()
        .map_err(|e| WaveformError::decode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(WaveformError::decode(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| WaveformError::decode(format!("ffprobe json parse failed: {e}")))?;
    let Some(stream) = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
    else {
        return Ok(None);
    };

    let sample_rate = stream
        .sample_rate
        .as_deref()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&sr| sr > 0)
        .ok_or_else(|| WaveformError::decode("missing audio sample_rate from ffprobe"))?;
    let channels = stream
        .channels
        .filter(|&c| c > 0)
        .ok_or_else(|| WaveformError::decode("missing audio channel count from ffprobe"))?;
    Ok(Some((sample_rate, channels)))
}

#[cfg(feature = "media-ffmpeg")]
fn decode_audio_metadata(path: &Path) -> WaveformResult<AudioMetadata> {
    let Some((sample_rate, channels)) = probe_audio_stream(path)? else {
        tracing::debug!(path = %path.display(), "no audio stream, using silent metadata");
        return AudioMetadata::silent(FALLBACK_SAMPLE_RATE);
    };

    // Native rate and layout: the waveform mixes channels itself.
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args(["-vn", "-f", "f32le", "-acodec", "pcm_f32le", "pipe:1"])
        .output()
        .map_err(|e| WaveformError::decode(format!("failed to run ffmpeg for audio decode: {e}")))?;
    if !out.status.success() {
        return Err(WaveformError::decode(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(WaveformError::decode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let pcm: Vec<f32> = out
        .stdout
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    AudioMetadata::from_interleaved(sample_rate, channels, &pcm)
}

#[cfg(not(feature = "media-ffmpeg"))]
fn decode_audio_metadata(path: &Path) -> WaveformResult<AudioMetadata> {
    Err(WaveformError::decode(format!(
        "decoding '{}' requires the 'media-ffmpeg' feature",
        path.display()
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/media/provider.rs"]
mod tests;
