use serde::{Deserialize, Serialize};

/// Placeholder title used when no title source is present on the page
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Why a watch page could not yield a duration
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The page reported a non-OK playability status (private, removed, region locked, ...)
    #[error("video unavailable: status={status} reason={reason}")]
    Unavailable { status: String, reason: String },

    /// None of the known duration markers were present
    #[error("unsupported page format: no duration found")]
    UnsupportedFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub duration_seconds: u64,
    pub thumbnail: String,
}

/// Which strategy produced the duration. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSource {
    QuotedLengthSeconds,
    NumericLengthSeconds,
    ApproxDurationMs,
    VideoDetails,
    Microformat,
    Iso8601,
}

impl DurationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuotedLengthSeconds => "lengthSeconds (quoted)",
            Self::NumericLengthSeconds => "lengthSeconds (numeric)",
            Self::ApproxDurationMs => "approxDurationMs",
            Self::VideoDetails => "videoDetails.lengthSeconds",
            Self::Microformat => "microformat.lengthSeconds",
            Self::Iso8601 => "ISO-8601 duration",
        }
    }
}

impl std::fmt::Display for DurationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
