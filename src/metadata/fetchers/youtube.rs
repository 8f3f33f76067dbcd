use std::time::Duration;

use crate::errors::IngestError;
use crate::metadata::fetchers::MetadataFetcher;
use crate::metadata::normalize::normalize_to_watch;
use crate::metadata::types::VideoMetadata;
use crate::scrape;

/// Scrapes the public watch page. No API key, no third party extractor.
pub struct WatchPageFetcher {
    client: reqwest::blocking::Client,
}

impl WatchPageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, IngestError> {
        Ok(Self {
            client: scrape::build_client(user_agent, timeout)?,
        })
    }
}

impl MetadataFetcher for WatchPageFetcher {
    fn fetch(&self, video_id: &str) -> Result<VideoMetadata, IngestError> {
        let url = normalize_to_watch(video_id);
        let html = scrape::fetch_page(&self.client, &url)?;

        let meta = crate::metadata::extract_from_html(video_id, &html)?;
        log::info!(
            "{video_id}: title={:?} duration={}s",
            meta.title,
            meta.duration_seconds
        );

        Ok(meta)
    }

    fn name(&self) -> &'static str {
        "WatchPage"
    }
}
