use serde::Serialize;

/// Position and size assigned to an item by the row packer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRect {
    pub width: f64,
    pub height: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl LayoutRect {
    pub fn bottom(&self) -> f64 {
        self.translate_y + self.height
    }

    /// True when the rect touches the vertical band `[min_y, max_y]`.
    pub fn overlaps(&self, min_y: f64, max_y: f64) -> bool {
        self.bottom() >= min_y && self.translate_y <= max_y
    }
}

/// One closed row: a run of consecutive items sharing a height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowModel {
    pub row_index: u32,
    /// Start index in the packed items (inclusive)
    pub start_index: usize,
    /// End index in the packed items (exclusive)
    pub end_index: usize,
    pub height_px: f64,
    pub translate_y: f64,
}

impl RowModel {
    pub fn new(
        row_index: u32,
        start_index: usize,
        end_index: usize,
        height_px: f64,
        translate_y: f64,
    ) -> Self {
        Self {
            row_index,
            start_index,
            end_index,
            height_px,
            translate_y,
        }
    }

    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }
}
