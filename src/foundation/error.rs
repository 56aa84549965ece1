/// Convenience result type used across clipwave.
pub type WaveformResult<T> = Result<T, WaveformError>;

/// Top-level error taxonomy used at the crate boundaries.
///
/// The waveform core itself is total; only providers and boundary constructors fail.
#[derive(thiserror::Error, Debug)]
pub enum WaveformError {
    /// Source audio could not be fetched or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid caller-provided data (frame rates, sample buffers, requests).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WaveformError {
    /// Build a [`WaveformError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`WaveformError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WaveformError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for [`WaveformError::Decode`].
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
