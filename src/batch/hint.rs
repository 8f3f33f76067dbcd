use std::collections::HashMap;

use crate::catalog::CatalogBackend;
use crate::channel::normalize_id;

/// Run-scoped memo of write-time hints, keyed by normalized channel id.
///
/// Lookups never fail: an error is logged and remembered as "no hint".
#[derive(Debug, Default)]
pub struct HintCache {
    hints: HashMap<String, Option<String>>,
}

impl HintCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_lookup(&mut self, backend: &dyn CatalogBackend, channel_id: &str) -> Option<String> {
        let key = normalize_id(channel_id)?;

        if let Some(hint) = self.hints.get(&key) {
            return hint.clone();
        }

        let hint = match backend.lookup_hint(channel_id) {
            Ok(Some(hint)) => {
                log::info!("channel {channel_id}: detected hint {hint:?}");
                Some(hint)
            }
            Ok(None) => {
                log::info!("channel {channel_id}: no hint detected");
                None
            }
            Err(err) => {
                log::warn!("channel {channel_id}: hint lookup failed, continuing without: {err}");
                None
            }
        };

        self.hints.insert(key, hint.clone());
        hint
    }
}
