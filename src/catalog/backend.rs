use super::types::{ChannelDescriptor, NewChannelItem};
use crate::errors::IngestError;

/// The remote channel catalog, consumed over its HTTP contract.
pub trait CatalogBackend {
    /// Every channel visible to this client, flattened out of providers, with items.
    fn list_channels(&self) -> Result<Vec<ChannelDescriptor>, IngestError>;

    /// Insert one item. Never retried by callers.
    fn create_item(&self, item: &NewChannelItem) -> Result<(), IngestError>;

    /// Optional write-time hint scraped from the channel's admin page.
    /// `Ok(None)` means the page had nothing to offer.
    fn lookup_hint(&self, channel_id: &str) -> Result<Option<String>, IngestError>;
}
