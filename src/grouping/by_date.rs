use std::collections::HashMap;

use super::dates::{day_label, parse_date};
use crate::models::{Item, ItemGroup};

/// Label for items without a usable date.
pub const NO_DATE: &str = "No date";

/// Buckets items by calendar day, keeping buckets in order of first appearance.
///
/// Sort first if buckets should come out newest first. Each bucket's description
/// is the first non-empty location among its items.
pub fn group_by_date(items: Vec<Item>) -> Vec<ItemGroup> {
    let mut groups: Vec<ItemGroup> = Vec::new();
    let mut index_by_label: HashMap<String, usize> = HashMap::new();

    for item in items {
        let label = item
            .date
            .as_deref()
            .and_then(parse_date)
            .map(|d| day_label(&d))
            .unwrap_or_else(|| NO_DATE.to_string());

        let slot = match index_by_label.get(&label) {
            Some(&slot) => slot,
            None => {
                index_by_label.insert(label.clone(), groups.len());
                groups.push(ItemGroup::new(label, String::new(), Vec::new()));
                groups.len() - 1
            }
        };

        let group = &mut groups[slot];
        if group.description.is_empty() {
            if let Some(location) = item.location.as_deref().filter(|l| !l.trim().is_empty()) {
                group.description = location.to_string();
            }
        }
        group.items.push(item);
    }

    groups
}
