use serde::{Deserialize, Serialize};

use super::{Item, LayoutRect, RowModel};

/// A date bucket of items, as produced by `group_by_date` or read from groupify output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGroup {
    /// Bucket key, e.g. "29 June 2018" or "No date".
    pub date: String,
    #[serde(default)]
    pub description: String,
    pub items: Vec<Item>,
}

impl ItemGroup {
    pub fn new(date: impl Into<String>, description: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            items,
        }
    }
}

/// Laid-out geometry of one group.
///
/// `rects[i]` belongs to `items[i]` of the source group with the same index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLayout {
    pub date: String,
    pub description: String,
    /// Top of the group's first row. The header band sits directly above it.
    pub group_translate_y: f64,
    /// Vertical span consumed by the group's rows, header band excluded.
    pub height: f64,
    pub rects: Vec<LayoutRect>,
    pub rows: Vec<RowModel>,
}

impl GroupLayout {
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// The full, scroll-independent layout for one container width.
///
/// Never patched in place: every repack builds a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub container_width: f64,
    /// Whether groups carry headers. Ungrouped layouts hold a single headerless group.
    pub grouped: bool,
    pub groups: Vec<GroupLayout>,
    pub total_height: f64,
}

impl LayoutResult {
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.rects.len()).sum()
    }

    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }
}
