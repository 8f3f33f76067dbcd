use crate::catalog::ChannelItem;
use crate::metadata::normalize::{extract_video_id, normalize_to_watch};

/// True if `video_id` is already in the channel, whatever url shape the item was stored with.
pub fn already_present(video_id: &str, existing_items: &[ChannelItem]) -> bool {
    let target_url = normalize_to_watch(video_id);

    existing_items
        .iter()
        .filter_map(|item| item.url.as_deref().map(str::trim))
        .filter(|url| !url.is_empty())
        .any(|url| match extract_video_id(url) {
            Ok(existing_id) => existing_id == video_id,
            Err(_) => url == target_url,
        })
}
