pub mod youtube;

pub use youtube::WatchPageFetcher;

use crate::errors::IngestError;
use crate::metadata::types::VideoMetadata;

/// Source of playback metadata for a canonical video id
pub trait MetadataFetcher {
    /// Fetch and extract metadata. Transport failures come back as
    /// [`IngestError::Transient`] so callers can retry them.
    fn fetch(&self, video_id: &str) -> Result<VideoMetadata, IngestError>;

    /// Get the name of this fetcher for logging/debugging
    fn name(&self) -> &'static str;
}
