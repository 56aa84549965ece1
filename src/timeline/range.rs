/// Length of a clip's audio window in timeline frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClipDuration {
    /// A fixed number of frames.
    Frames(u64),
    /// Play until the end of the underlying media, whatever its length turns out to be.
    UntilEnd,
}

impl ClipDuration {
    /// Clamp a signed editor-level frame count; negative counts become an empty window.
    pub fn from_frames(frames: i64) -> Self {
        Self::Frames(u64::try_from(frames).unwrap_or(0))
    }
}

impl From<Option<u64>> for ClipDuration {
    fn from(frames: Option<u64>) -> Self {
        frames.map_or(Self::UntilEnd, Self::Frames)
    }
}

/// Where a clip's audio window begins in the source media.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StartFrom {
    /// Frames after the start of the media.
    Frames(u64),
    /// Frames before the end of the media. Pinned to an absolute frame once the media length is
    /// known; starts at frame 0 when the media is shorter.
    FromEnd(u64),
}

impl StartFrom {
    /// Absolute start frame in a media of `media_frames` frames. Not capped at `media_frames`.
    pub fn frame_in(self, media_frames: u64) -> u64 {
        match self {
            Self::Frames(n) => n,
            Self::FromEnd(n) => media_frames.saturating_sub(n),
        }
    }

    /// Signed editor-level value: negative for [`StartFrom::FromEnd`].
    pub fn as_signed(self) -> i64 {
        match self {
            Self::Frames(n) => i64::try_from(n).unwrap_or(i64::MAX),
            Self::FromEnd(n) => i64::try_from(n).map_or(i64::MIN, |n| -n),
        }
    }
}

/// Portion of the source audio covered by a clip, in timeline frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRange {
    /// First media frame of the window.
    pub start: StartFrom,
    /// Window length.
    pub duration: ClipDuration,
}

impl FrameRange {
    /// Absolute first frame in a media of `media_frames` frames.
    pub fn start_frame(self, media_frames: u64) -> u64 {
        self.start.frame_in(media_frames)
    }

    /// Pin the window to a media of `media_frames` frames.
    ///
    /// A from-end start becomes `media_frames - n` (0 when the media is shorter). `UntilEnd`
    /// becomes the remaining frames after the start; fixed windows are cut at the end of the
    /// media. The result never extends past `media_frames`.
    pub fn clip_to_media(self, media_frames: u64) -> FrameRange {
        let start = self.start_frame(media_frames).min(media_frames);
        let available = media_frames - start;
        let frames = match self.duration {
            ClipDuration::Frames(n) => n.min(available),
            ClipDuration::UntilEnd => available,
        };
        FrameRange {
            start: StartFrom::Frames(start),
            duration: ClipDuration::Frames(frames),
        }
    }
}

/// Turn an editor-level `(start_from, duration)` pair into a [`FrameRange`].
///
/// A negative `start_from` counts back from the end of the media. Media length is not needed
/// here: from-end starts, `UntilEnd` and any overhang past the end are pinned downstream once
/// metadata is known. Resolving an already resolved range returns it unchanged.
pub fn resolve(start_from: i64, duration: ClipDuration) -> FrameRange {
    let start = if start_from >= 0 {
        StartFrom::Frames(start_from.unsigned_abs())
    } else {
        StartFrom::FromEnd(start_from.unsigned_abs())
    };
    FrameRange { start, duration }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/range.rs"]
mod tests;
