pub mod backend;
pub mod hint;
pub mod remote;
pub mod types;

pub use backend::CatalogBackend;
pub use remote::CatalogRemote;
pub use types::{ChannelDescriptor, ChannelItem, NewChannelItem};
