//! clipwave turns decoded audio into the amplitude bars and volume overlay an editor timeline
//! draws for an audio clip.
//!
//! The pure core is three functions:
//!
//! - [`resolve`] turns an editor-level `(start_from, duration)` pair into a [`FrameRange`]
//! - [`compute_bars`] reduces the visible window of [`AudioMetadata`] to one peak [`Bar`] per
//!   pixel slot
//! - [`compute_envelope`] maps a keyframed [`Volume`] onto the bar area as a polyline
//!
//! Decoded metadata comes from an [`AudioMetadataProvider`] through a [`MetadataCache`], and a
//! [`WaveformView`] tracks the loading state of one clip.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod media;
mod request;
mod timeline;
mod view;
mod waveform;

pub use crate::foundation::core::{Fps, frame_to_sample};
pub use crate::foundation::error::{WaveformError, WaveformResult};
pub use crate::media::cache::MetadataCache;
pub use crate::media::metadata::{AudioMetadata, max_media_duration_frames};
pub use crate::media::provider::{
    AudioMetadataProvider, FALLBACK_SAMPLE_RATE, FfmpegProvider, InMemoryProvider,
};
pub use crate::request::view_request::{WaveformReport, WaveformRequest};
pub use crate::timeline::range::{ClipDuration, FrameRange, StartFrom, resolve};
pub use crate::view::state::{LoadTicket, WaveformState, WaveformView};
pub use crate::waveform::bars::{Bar, compute_bars, sample_window};
pub use crate::waveform::envelope::{
    Envelope, EnvelopeOpts, TIMELINE_LAYER_HEIGHT, Volume, compute_envelope,
};

pub use kurbo::{BezPath, Point};
