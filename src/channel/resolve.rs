use std::collections::BTreeSet;

use crate::catalog::{ChannelDescriptor, ChannelItem};
use crate::errors::{ChannelMatch, IngestError};

/// How many candidate names a not-found error suggests.
const NOT_FOUND_SAMPLE: usize = 20;

/// Collapse whitespace runs, trim and case-fold.
///
/// Folding is `to_lowercase` plus `ß` → `ss`, the one expansion channel names
/// actually hit. Other multi-character foldings are not applied.
pub fn normalize_channel_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .replace('ß', "ss")
}

/// Canonical form of an identifier: purely decimal ids lose leading zeros so
/// `"003"` and `"3"` compare equal, anything else is only trimmed.
pub fn normalize_id(id: &str) -> Option<String> {
    let id = id.trim();
    if id.is_empty() {
        return None;
    }

    if id.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = id.trim_start_matches('0');
        return Some(if stripped.is_empty() { "0" } else { stripped }.to_string());
    }

    Some(id.to_string())
}

/// Map a human channel name to exactly one channel.
pub fn resolve<'a>(
    name: &str,
    candidates: &'a [ChannelDescriptor],
) -> Result<&'a ChannelDescriptor, IngestError> {
    let needle = normalize_channel_name(name);
    if needle.is_empty() {
        return Err(IngestError::Validation("empty channel name".to_string()));
    }

    let matches: Vec<&ChannelDescriptor> = candidates
        .iter()
        .filter(|ch| normalize_channel_name(&ch.name) == needle)
        .collect();

    match matches.as_slice() {
        [] => {
            let available: BTreeSet<&str> = candidates
                .iter()
                .map(|ch| ch.name.trim())
                .filter(|n| !n.is_empty())
                .collect();

            Err(IngestError::NotFound {
                name: name.to_string(),
                available: available
                    .into_iter()
                    .take(NOT_FOUND_SAMPLE)
                    .map(str::to_string)
                    .collect(),
            })
        }
        [only] => Ok(only),
        many => Err(IngestError::Ambiguous {
            name: name.to_string(),
            matches: many
                .iter()
                .map(|ch| ChannelMatch {
                    id: ch.id.clone(),
                    channel_number: ch.channel_number.clone(),
                    provider: ch.provider_name.clone(),
                })
                .collect(),
        }),
    }
}

/// Items of the channel addressed by `channel_id`, matched against every identifier
/// variant the catalog exposes. Unknown channel → no items.
pub fn find_channel_items(channel_id: &str, candidates: &[ChannelDescriptor]) -> Vec<ChannelItem> {
    let Some(target) = normalize_id(channel_id) else {
        return Vec::new();
    };

    candidates
        .iter()
        .find(|ch| {
            [&ch.id, &ch.channel_number, &ch.legacy_channel_id]
                .into_iter()
                .filter_map(|v| v.as_deref().and_then(normalize_id))
                .any(|v| v == target)
        })
        .map(|ch| ch.items.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: &str, number: &str, name: &str, provider: &str) -> ChannelDescriptor {
        ChannelDescriptor {
            id: Some(id.to_string()),
            channel_number: Some(number.to_string()),
            name: name.to_string(),
            provider_name: Some(provider.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_channel_name() {
        assert_eq!(normalize_channel_name("  Canal   DE\tNotícias "), "canal de notícias");
        assert_eq!(normalize_channel_name("   "), "");
        assert_eq!(normalize_channel_name("Straße TV"), normalize_channel_name("STRASSE tv"));
        assert_eq!(normalize_channel_name("GROẞE"), "grosse");
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("003").as_deref(), Some("3"));
        assert_eq!(normalize_id(" 3 ").as_deref(), Some("3"));
        assert_eq!(normalize_id("000").as_deref(), Some("0"));
        assert_eq!(normalize_id(" ch-03 ").as_deref(), Some("ch-03"));
        assert_eq!(normalize_id(""), None);
        assert_eq!(
            normalize_id("000123456789012345678901234567890").as_deref(),
            Some("123456789012345678901234567890")
        );
    }

    #[test]
    fn test_resolve_exact_insensitive_match() {
        let channels = vec![
            channel("1", "10", "Music Hits", "Alpha"),
            channel("2", "11", "News 24", "Alpha"),
        ];
        let found = resolve("  music   HITS ", &channels).unwrap();
        assert_eq!(found.id.as_deref(), Some("1"));
    }

    #[test]
    fn test_resolve_no_fuzzy_matching() {
        let channels = vec![channel("1", "10", "Music Hits", "Alpha")];
        assert!(matches!(
            resolve("Music", &channels),
            Err(IngestError::NotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_not_found_lists_sorted_sample() {
        let mut channels: Vec<_> = (0..30)
            .map(|i| channel(&i.to_string(), &i.to_string(), &format!("Channel {i:02}"), "P"))
            .collect();
        channels.push(channel("99", "99", " Channel 00 ", "Q"));
        channels.push(channel("98", "98", "", "Q"));

        match resolve("Missing", &channels) {
            Err(IngestError::NotFound { name, available }) => {
                assert_eq!(name, "Missing");
                assert_eq!(available.len(), 20);
                assert_eq!(available[0], "Channel 00");
                assert_eq!(available[1], "Channel 01");
                assert_eq!(available[19], "Channel 19");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_ambiguous_lists_all_matches() {
        let channels = vec![
            channel("1", "10", "News", "Alpha"),
            channel("2", "20", " news ", "Beta"),
            channel("3", "30", "Sports", "Alpha"),
        ];

        match resolve("NEWS", &channels) {
            Err(IngestError::Ambiguous { matches, .. }) => {
                assert_eq!(matches.len(), 2);
                assert_eq!(matches[0].id.as_deref(), Some("1"));
                assert_eq!(matches[1].provider.as_deref(), Some("Beta"));
                assert_eq!(matches[1].channel_number.as_deref(), Some("20"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_empty_name_is_validation_error() {
        assert!(matches!(resolve("  ", &[]), Err(IngestError::Validation(_))));
    }

    #[test]
    fn test_find_channel_items_by_any_identifier() {
        let mut news = channel("7", "003", "News", "Alpha");
        news.items = vec![ChannelItem {
            url: Some("https://youtu.be/x".into()),
            ..Default::default()
        }];
        let mut legacy = channel("8", "", "Legacy", "Alpha");
        legacy.channel_number = None;
        legacy.legacy_channel_id = Some("0042".into());
        let channels = vec![news, legacy];

        assert_eq!(find_channel_items("7", &channels).len(), 1);
        assert_eq!(find_channel_items("3", &channels).len(), 1);
        assert_eq!(find_channel_items("00003", &channels).len(), 1);
        assert!(find_channel_items("42", &channels).is_empty());
        assert!(find_channel_items("999", &channels).is_empty());
        assert!(find_channel_items("", &channels).is_empty());
    }
}
