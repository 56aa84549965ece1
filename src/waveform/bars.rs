use std::ops::Range;

use crate::foundation::core::{Fps, frame_to_sample};
use crate::media::metadata::{AudioMetadata, max_media_duration_frames};
use crate::timeline::range::{ClipDuration, FrameRange};

/// One horizontal slot of the waveform display.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bar {
    /// Slot index, left to right.
    pub index: u32,
    /// Peak magnitude of the channel-mixed signal in the slot, in `[0, 1]`.
    pub amplitude: f32,
}

/// Absolute sample indices covered by `range`, clamped to the decoded audio.
///
/// A from-end start is pinned against the media length in whole frames first. Start and end
/// frames are then mapped to the nearest sample. `UntilEnd` windows run to the last decoded
/// sample. The result is empty (never inverted) when the range lies past the media.
pub fn sample_window(metadata: &AudioMetadata, range: FrameRange, fps: Fps) -> Range<usize> {
    let total = metadata.samples_per_channel() as u64;
    let sample_rate = metadata.sample_rate();

    let start_frame = range.start_frame(max_media_duration_frames(metadata, fps));
    let start = frame_to_sample(start_frame, fps, sample_rate).min(total);
    let end = match range.duration {
        ClipDuration::Frames(n) => {
            frame_to_sample(start_frame.saturating_add(n), fps, sample_rate).min(total)
        }
        ClipDuration::UntilEnd => total,
    }
    .max(start);
    start as usize..end as usize
}

/// Reduce the visible part of `metadata` to `visualization_width` peak bars.
///
/// Channels are averaged per sample before peaks are taken. The sample window is split into
/// `visualization_width` contiguous buckets whose boundaries are `floor(i * len / width)`, so every
/// sample lands in exactly one bucket and the last bucket ends on the window end. A bucket that
/// covers less than one sample reports the sample it falls inside.
///
/// Zero channels, zero width and an empty window all yield no bars.
pub fn compute_bars(
    metadata: &AudioMetadata,
    range: FrameRange,
    fps: Fps,
    visualization_width: u32,
) -> Vec<Bar> {
    if metadata.number_of_channels() == 0 || visualization_width == 0 {
        return Vec::new();
    }
    let window = sample_window(metadata, range, fps);
    if window.is_empty() {
        return Vec::new();
    }

    let width = visualization_width as usize;
    let len = window.len();
    (0..width)
        .map(|i| {
            let lo = window.start + bucket_start(i, len, width);
            let hi = window.start + bucket_start(i + 1, len, width);
            let peak = if lo < hi {
                peak_abs(metadata, lo..hi)
            } else {
                metadata.mixed_sample(lo.min(window.end - 1)).abs()
            };
            Bar {
                index: i as u32,
                amplitude: normalize(peak),
            }
        })
        .collect()
}

fn bucket_start(bucket: usize, len: usize, width: usize) -> usize {
    if bucket >= width {
        return len;
    }
    ((bucket as u128 * len as u128) / width as u128) as usize
}

fn peak_abs(metadata: &AudioMetadata, samples: Range<usize>) -> f32 {
    samples.fold(0.0f32, |peak, idx| peak.max(metadata.mixed_sample(idx).abs()))
}

fn normalize(peak: f32) -> f32 {
    if peak.is_nan() {
        return 0.0;
    }
    peak.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/waveform/bars.rs"]
mod tests;
