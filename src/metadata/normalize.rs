use url::Url;

use crate::errors::IngestError;

/// Host aliases the platform serves videos from.
pub const PLATFORM_HOSTS: [&str; 3] = ["youtube.com", "youtu.be", "youtube-nocookie.com"];

const SHORT_LINK_HOST: &str = "youtu.be";

/// Parse user input leniently: protocol-relative and scheme-less URLs are treated as https.
fn parse_loose(url: &str) -> Option<Url> {
    let url = url.trim();
    let url_to_parse = if url.starts_with("//") {
        format!("https:{url}")
    } else if !url.contains("://") {
        format!("https://{url}")
    } else {
        url.to_string()
    };

    Url::parse(&url_to_parse).ok()
}

fn is_platform_host(host: &str) -> bool {
    PLATFORM_HOSTS.iter().any(|alias| host.contains(alias))
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// True if the url's host is one of the platform's domain aliases.
pub fn is_platform_url(url: &str) -> bool {
    parse_loose(url)
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .map(|host| is_platform_host(&host))
        .unwrap_or(false)
}

/// Extract the canonical video id from any recognized url shape:
///
/// - `youtu.be/<id>`
/// - `youtube.com/watch?v=<id>` (`v` may appear anywhere in the query)
/// - `youtube.com/embed/<id>` and `youtube-nocookie.com/embed/<id>`
/// - `youtube.com/live/<id>`
pub fn extract_video_id(url: &str) -> Result<String, IngestError> {
    let invalid = || IngestError::InvalidUrl(url.to_string());

    let parsed = parse_loose(url).ok_or_else(invalid)?;
    let host = parsed
        .host_str()
        .map(|h| h.to_lowercase())
        .ok_or_else(invalid)?;

    if !is_platform_host(&host) {
        return Err(invalid());
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    let candidate = if host == SHORT_LINK_HOST || host.ends_with(".youtu.be") {
        segments.first().map(|id| id.to_string())
    } else {
        match segments.as_slice() {
            ["watch", ..] => parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            ["embed", id, ..] | ["live", id, ..] => Some(id.to_string()),
            _ => None,
        }
    };

    candidate.filter(|id| is_valid_id(id)).ok_or_else(invalid)
}

/// The only url form ever written to the catalog.
pub fn normalize_to_watch(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg")
}
