use crate::catalog::ChannelItem;

/// Next free position in a channel.
///
/// Empty channel → 1. Otherwise one past the highest numeric position, ignoring
/// items whose position does not parse. When none parse, one past the item count.
pub fn next_position(existing_items: &[ChannelItem]) -> u64 {
    if existing_items.is_empty() {
        return 1;
    }

    match existing_items.iter().filter_map(ChannelItem::numeric_position).max() {
        Some(max) if max >= 0 => max as u64 + 1,
        // negative positions are garbage, never hand out anything below 1
        Some(_) => 1,
        None => existing_items.len() as u64 + 1,
    }
}
