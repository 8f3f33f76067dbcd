pub mod dedup;
pub mod position;
pub mod resolve;

pub use dedup::already_present;
pub use position::next_position;
pub use resolve::{find_channel_items, normalize_id, resolve};
