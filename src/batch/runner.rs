use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::hint::HintCache;
use super::input::{BatchSpec, ChannelBatch};
use crate::catalog::{CatalogBackend, ChannelDescriptor, ChannelItem, NewChannelItem};
use crate::channel::{already_present, find_channel_items, next_position, normalize_id, resolve};
use crate::errors::IngestError;
use crate::metadata::{
    extract_video_id, is_platform_url, normalize_to_watch, MetadataFetcher, VideoMetadata,
};
use crate::retry::RetryPolicy;

pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);

/// Which identifier of a resolved channel goes into the `channel_id` form field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ChannelIdMode {
    /// Internal catalog id
    #[default]
    Id,
    /// Human channel number, falling back to the legacy `channel_id` field
    Number,
}

impl fmt::Display for ChannelIdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelIdMode::Id => write!(f, "id"),
            ChannelIdMode::Number => write!(f, "number"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Pause after every real insert.
    pub delay: Duration,
    pub dry_run: bool,
    pub continue_on_error: bool,
    pub channel_id_mode: ChannelIdMode,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            dry_run: false,
            continue_on_error: false,
            channel_id_mode: ChannelIdMode::Id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertedItem {
    pub url: String,
    pub video_id: String,
    pub position: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedItem {
    pub url: String,
    pub video_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFailure {
    pub url: String,
    pub video_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelReport {
    pub name: String,
    pub channel_id: String,
    pub inserted: Vec<InsertedItem>,
    pub skipped: Vec<SkippedItem>,
    pub failures: Vec<ItemFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub channels: Vec<ChannelReport>,
}

impl BatchReport {
    pub fn inserted(&self) -> usize {
        self.channels.iter().map(|c| c.inserted.len()).sum()
    }

    pub fn skipped(&self) -> usize {
        self.channels.iter().map(|c| c.skipped.len()).sum()
    }

    pub fn failed(&self) -> usize {
        self.channels.iter().map(|c| c.failures.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Inserted(InsertedItem),
    Duplicate(SkippedItem),
}

/// Per-channel working state: the advisory shadow of the remote items and the
/// next position to hand out.
struct ChannelState {
    channel_id: String,
    items: Vec<ChannelItem>,
    next_position: u64,
    hint: Option<String>,
}

impl ChannelState {
    fn new(channel_id: String, items: Vec<ChannelItem>, hint: Option<String>) -> Self {
        let next_position = next_position(&items);
        Self {
            channel_id,
            items,
            next_position,
            hint,
        }
    }
}

/// Drives videos from urls into catalog channels, one item at a time.
pub struct Ingestor<'a> {
    catalog: &'a dyn CatalogBackend,
    fetcher: &'a dyn MetadataFetcher,
    retry: RetryPolicy,
    hint_field: String,
    hints: HintCache,
    sleep: Box<dyn FnMut(Duration) + 'a>,
}

impl<'a> Ingestor<'a> {
    pub fn new(
        catalog: &'a dyn CatalogBackend,
        fetcher: &'a dyn MetadataFetcher,
        retry: RetryPolicy,
        hint_field: &str,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            retry,
            hint_field: hint_field.to_string(),
            hints: HintCache::new(),
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the blocking sleep used for insert delays and retry backoff.
    #[cfg(test)]
    pub fn with_sleeper<S>(mut self, sleep: S) -> Self
    where
        S: FnMut(Duration) + 'a,
    {
        self.sleep = Box::new(sleep);
        self
    }

    /// Process every channel of `spec` in order.
    ///
    /// Resolution and validation failures always abort. Per-item failures abort
    /// too unless `continue_on_error` is set, in which case they end up in the report.
    pub fn run(&mut self, spec: &BatchSpec, opts: &BatchOptions) -> Result<BatchReport, IngestError> {
        let mut report = BatchReport::default();

        for entry in &spec.channels {
            report.channels.push(self.run_channel(entry, opts)?);
        }

        log::info!(
            "batch done: {} inserted, {} skipped, {} failed",
            report.inserted(),
            report.skipped(),
            report.failed()
        );

        Ok(report)
    }

    fn run_channel(&mut self, entry: &ChannelBatch, opts: &BatchOptions) -> Result<ChannelReport, IngestError> {
        let _span = tracing::info_span!("channel", name = %entry.name).entered();

        let channels = self.catalog.list_channels()?;
        let descriptor = resolve(&entry.name, &channels)?;
        let channel_id = write_channel_id(descriptor, opts.channel_id_mode)?;

        log::info!(
            "== Channel: '{}' (use_channel_id={channel_id}, internal_id={}, number={}, provider={}) ==",
            entry.name,
            descriptor.id.as_deref().unwrap_or("-"),
            descriptor.channel_number.as_deref().unwrap_or("-"),
            descriptor.provider_name.as_deref().unwrap_or("-"),
        );

        // admin pages are addressed by internal id whatever the write mode
        let admin_id = descriptor
            .id
            .as_deref()
            .and_then(normalize_id)
            .unwrap_or_else(|| channel_id.clone());
        let hint = self.hints.get_or_lookup(self.catalog, &admin_id);
        let mut state = ChannelState::new(channel_id.clone(), descriptor.items.clone(), hint);

        let mut report = ChannelReport {
            name: entry.name.clone(),
            channel_id,
            ..Default::default()
        };

        let total = entry.urls.len();
        for (idx, url) in entry.urls.iter().enumerate() {
            log::info!("[{}/{total}] {url}", idx + 1);

            match self.ingest_url(&mut state, url, opts.dry_run) {
                Ok(ItemOutcome::Inserted(item)) => {
                    report.inserted.push(item);
                    if !opts.dry_run && !opts.delay.is_zero() {
                        log::info!("Sleep {:?}...", opts.delay);
                        (self.sleep)(opts.delay);
                    }
                }
                Ok(ItemOutcome::Duplicate(item)) => report.skipped.push(item),
                Err(err) if err.is_structural() => return Err(err),
                Err(err) => {
                    let video_id = extract_video_id(url).ok();
                    log::error!(
                        "channel='{}' url='{url}' video_id={}: {err}",
                        entry.name,
                        video_id.as_deref().unwrap_or("-")
                    );

                    if !opts.continue_on_error {
                        return Err(err);
                    }

                    report.failures.push(ItemFailure {
                        url: url.clone(),
                        video_id,
                        message: err.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Insert one url into the channel addressed by any of its identifiers.
    ///
    /// Returns whether an item was inserted, `false` for duplicates.
    pub fn insert_single(&mut self, channel_id: &str, url: &str, dry_run: bool) -> Result<bool, IngestError> {
        let channels = self.catalog.list_channels()?;
        let items = find_channel_items(channel_id, &channels);
        if items.is_empty() {
            log::info!("channel {channel_id}: no existing items found");
        }

        let hint = self.hints.get_or_lookup(self.catalog, channel_id);
        let mut state = ChannelState::new(channel_id.to_string(), items, hint);

        Ok(matches!(
            self.ingest_url(&mut state, url, dry_run)?,
            ItemOutcome::Inserted(_)
        ))
    }

    fn ingest_url(&mut self, state: &mut ChannelState, url: &str, dry_run: bool) -> Result<ItemOutcome, IngestError> {
        if !is_platform_url(url) {
            return Err(IngestError::InvalidUrl(format!(
                "{url}: only YouTube urls are supported"
            )));
        }

        let video_id = extract_video_id(url)?;

        if already_present(&video_id, &state.items) {
            log::info!(
                "Skip duplicate: channel_id={} url={url} video_id={video_id}",
                state.channel_id
            );
            return Ok(ItemOutcome::Duplicate(SkippedItem {
                url: url.to_string(),
                video_id,
            }));
        }

        let meta = self.fetch_metadata(&video_id)?;

        let item = NewChannelItem {
            channel_id: state.channel_id.clone(),
            position: state.next_position,
            url: normalize_to_watch(&video_id),
            duration: meta.duration_seconds,
            hint: state
                .hint
                .as_ref()
                .map(|hint| (self.hint_field.clone(), hint.clone())),
        };

        log::info!("Payload: {:?}", item.form_fields());
        if dry_run {
            log::info!("dry run, not posting");
        } else {
            self.catalog.create_item(&item)?;
        }

        state
            .items
            .push(item.to_shadow_item(Some(meta.title), Some(meta.thumbnail)));
        state.next_position += 1;

        Ok(ItemOutcome::Inserted(InsertedItem {
            url: url.to_string(),
            video_id,
            position: item.position,
        }))
    }

    fn fetch_metadata(&mut self, video_id: &str) -> Result<VideoMetadata, IngestError> {
        let fetcher = self.fetcher;
        log::debug!("fetching {video_id} with {}", fetcher.name());

        self.retry
            .run_with_sleep(&mut || fetcher.fetch(video_id), &mut self.sleep)
    }
}

/// Pick the identifier used for writes, normalized the same way lookups are.
pub fn write_channel_id(descriptor: &ChannelDescriptor, mode: ChannelIdMode) -> Result<String, IngestError> {
    let raw = match mode {
        ChannelIdMode::Id => descriptor.id.as_deref(),
        ChannelIdMode::Number => descriptor
            .channel_number
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(descriptor.legacy_channel_id.as_deref()),
    };

    raw.and_then(normalize_id).ok_or_else(|| {
        IngestError::Validation(format!(
            "cannot compute channel_id for '{}' (mode={mode})",
            descriptor.name
        ))
    })
}
