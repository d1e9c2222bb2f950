use std::cmp::{Ordering, Reverse};
use std::sync::Arc;

use super::dates::parse_date;
use crate::models::Item;

/// Host-supplied ordering for items, applied before grouping.
pub type ItemComparator = Arc<dyn Fn(&Item, &Item) -> Ordering + Send + Sync>;

/// Newest `date` first; items without a parsable date go last. Stable.
pub fn sort_by_date(items: &mut [Item]) {
    items.sort_by_cached_key(|item| {
        let date = item.date.as_deref().and_then(parse_date);
        (date.is_none(), date.map(Reverse))
    });
}

/// Newest `birth_time` first; items without one go last. Stable.
pub fn sort_by_birth_time(items: &mut [Item]) {
    items.sort_by_cached_key(|item| {
        let born = item.birth_time.as_deref().and_then(parse_date);
        (born.is_none(), born.map(Reverse))
    });
}
