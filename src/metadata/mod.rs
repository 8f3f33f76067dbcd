pub mod duration;
pub mod fetchers;
pub mod normalize;
pub mod player_response;
pub mod types;

pub use duration::format_duration;
pub use fetchers::{MetadataFetcher, WatchPageFetcher};
pub use normalize::{extract_video_id, is_platform_url, normalize_to_watch, thumbnail_url};
pub use types::{DurationSource, ExtractionError, VideoMetadata, UNKNOWN_TITLE};

use once_cell::sync::Lazy;
use player_response::PlayerResponse;
use scraper::{Html, Selector};

static META_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="title"]"#).expect("invalid selector"));

static OG_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("invalid selector"));

/// Extract metadata from an already fetched watch page.
///
/// Duration is mandatory, title falls back to [`UNKNOWN_TITLE`] and the thumbnail
/// is always synthesized from `video_id`.
pub fn extract_from_html(video_id: &str, html: &str) -> Result<VideoMetadata, ExtractionError> {
    let player = PlayerResponse::from_html(html);

    let (duration_seconds, source) = match resolve_duration(html, player.as_ref()) {
        Some(found) => found,
        None => {
            if let Some((status, reason)) = player.as_ref().and_then(PlayerResponse::unplayable) {
                return Err(ExtractionError::Unavailable { status, reason });
            }
            return Err(ExtractionError::UnsupportedFormat);
        }
    };

    log::debug!("{video_id}: duration {duration_seconds}s from {source}");

    let title = player
        .as_ref()
        .and_then(PlayerResponse::title)
        .or_else(|| meta_title(html))
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    Ok(VideoMetadata {
        title,
        duration_seconds,
        thumbnail: thumbnail_url(video_id),
    })
}

/// Try every duration source in order of reliability, first positive value wins.
fn resolve_duration(html: &str, player: Option<&PlayerResponse>) -> Option<(u64, DurationSource)> {
    duration::quoted_length_seconds(html)
        .map(|s| (s, DurationSource::QuotedLengthSeconds))
        .or_else(|| duration::numeric_length_seconds(html).map(|s| (s, DurationSource::NumericLengthSeconds)))
        .or_else(|| duration::approx_duration_ms(html).map(|s| (s, DurationSource::ApproxDurationMs)))
        .or_else(|| {
            player
                .and_then(PlayerResponse::length_seconds)
                .map(|s| (s, DurationSource::VideoDetails))
        })
        .or_else(|| {
            player
                .and_then(PlayerResponse::microformat_length_seconds)
                .map(|s| (s, DurationSource::Microformat))
        })
        .or_else(|| duration::schema_iso8601(html).map(|s| (s, DurationSource::Iso8601)))
}

fn meta_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    [&*META_TITLE_SELECTOR, &*OG_TITLE_SELECTOR]
        .into_iter()
        .find_map(|selector| {
            document
                .select(selector)
                .filter_map(|el| el.value().attr("content"))
                .map(str::trim)
                .find(|content| !content.is_empty())
                .map(str::to_string)
        })
}
