use std::path::Path;

use crate::errors::IngestError;
use crate::metadata::{
    extract_from_html, extract_video_id, format_duration, MetadataFetcher, VideoMetadata,
};
use crate::retry::RetryPolicy;

/// Stand-in id for pages loaded from disk, only used to synthesize the thumbnail.
pub const LOCAL_VIDEO_ID: &str = "local";

/// Fetch metadata for `url` without touching the catalog.
pub fn probe(
    fetcher: &dyn MetadataFetcher,
    retry: &RetryPolicy,
    url: &str,
) -> Result<VideoMetadata, IngestError> {
    let video_id = extract_video_id(url)?;
    retry.run(|| fetcher.fetch(&video_id))
}

/// Run the extractor over a saved watch page.
pub fn probe_html(path: &Path) -> Result<VideoMetadata, IngestError> {
    let html = std::fs::read_to_string(path)?;
    Ok(extract_from_html(LOCAL_VIDEO_ID, &html)?)
}

pub fn render(meta: &VideoMetadata) -> String {
    format!(
        "Title: {}\nDuration (seconds): {}\nDuration (H:MM:SS): {}",
        meta.title,
        meta.duration_seconds,
        format_duration(meta.duration_seconds)
    )
}
