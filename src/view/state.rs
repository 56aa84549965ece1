use std::sync::Arc;

use crate::foundation::core::Fps;
use crate::foundation::error::WaveformResult;
use crate::media::cache::MetadataCache;
use crate::media::metadata::{AudioMetadata, max_media_duration_frames};
use crate::media::provider::AudioMetadataProvider;
use crate::timeline::range::FrameRange;
use crate::waveform::bars::{Bar, compute_bars};

/// Metadata lifecycle of one waveform view.
#[derive(Clone, Debug)]
pub enum WaveformState {
    /// Fetch in flight; nothing is drawn.
    Loading,
    /// Metadata known; bars can be computed.
    Ready(Arc<AudioMetadata>),
    /// Decode failed; the waveform stays empty.
    Failed(String),
}

/// Tag for one metadata fetch. Only the latest ticket of a view is honored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    source: String,
    generation: u64,
}

impl LoadTicket {
    /// Source identifier the fetch was issued for.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Timeline view of one audio clip.
///
/// Moves between [`WaveformState`]s only through [`WaveformView::apply`]; results carrying a
/// superseded [`LoadTicket`] are dropped.
#[derive(Clone, Debug)]
pub struct WaveformView {
    source: String,
    generation: u64,
    state: WaveformState,
}

impl WaveformView {
    /// Create a view in [`WaveformState::Loading`] for `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            generation: 0,
            state: WaveformState::Loading,
        }
    }

    /// Current source identifier.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Current state.
    pub fn state(&self) -> &WaveformState {
        &self.state
    }

    /// Metadata when [`WaveformState::Ready`].
    pub fn metadata(&self) -> Option<&Arc<AudioMetadata>> {
        match &self.state {
            WaveformState::Ready(m) => Some(m),
            WaveformState::Loading | WaveformState::Failed(_) => None,
        }
    }

    /// Ticket for the fetch the view is currently waiting on.
    pub fn ticket(&self) -> LoadTicket {
        LoadTicket {
            source: self.source.clone(),
            generation: self.generation,
        }
    }

    /// Point the view at `source`.
    ///
    /// The same source keeps the current state and ticket. A different one restarts loading and
    /// supersedes every outstanding ticket.
    pub fn set_source(&mut self, source: impl Into<String>) -> LoadTicket {
        let source = source.into();
        if source != self.source {
            self.source = source;
            self.restart();
        }
        self.ticket()
    }

    /// Restart loading the current source, superseding outstanding tickets.
    pub fn reload(&mut self) -> LoadTicket {
        self.restart();
        self.ticket()
    }

    fn restart(&mut self) {
        self.generation += 1;
        self.state = WaveformState::Loading;
    }

    /// Apply the result of the fetch tagged `ticket`.
    ///
    /// Returns `false` and leaves the state untouched when the ticket is stale or the view is not
    /// loading anymore.
    pub fn apply(
        &mut self,
        ticket: &LoadTicket,
        result: WaveformResult<Arc<AudioMetadata>>,
    ) -> bool {
        if *ticket != self.ticket() || !matches!(self.state, WaveformState::Loading) {
            tracing::debug!(
                source = ticket.source(),
                generation = ticket.generation,
                "discarding stale waveform metadata"
            );
            return false;
        }

        self.state = match result {
            Ok(m) => WaveformState::Ready(m),
            Err(err) => {
                tracing::error!(source = ticket.source(), error = %err, "could not load waveform");
                WaveformState::Failed(err.to_string())
            }
        };
        true
    }

    /// Fetch the current source through `cache` and apply the result.
    pub async fn load<P: AudioMetadataProvider>(&mut self, cache: &MetadataCache<P>) -> bool {
        let ticket = self.ticket();
        let result = cache.get(ticket.source()).await;
        self.apply(&ticket, result)
    }

    /// Media length in frames once metadata is known.
    pub fn max_media_duration(&self, fps: Fps) -> Option<u64> {
        self.metadata().map(|m| max_media_duration_frames(m, fps))
    }

    /// Bars for the visible window, or nothing while loading, after a failure, or for silent media.
    pub fn bars(&self, range: FrameRange, fps: Fps, visualization_width: u32) -> Vec<Bar> {
        match self.metadata() {
            Some(m) => compute_bars(m, range, fps, visualization_width),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/state.rs"]
mod tests;
