use crate::error::{GridError, Result};
use crate::models::{Item, LayoutRect, RowModel};

/// Configuration for the justified row packing algorithm.
///
/// Items are placed left-to-right and collected into a row until the row's summed
/// aspect ratio reaches the minimum for the current width. The row is then scaled
/// to a common height so that widths plus gaps fill the container exactly.
#[derive(Debug, Clone)]
pub struct RowPacker {
    /// Gap between items in a row and between rows in pixels (default: 8)
    pub grid_gap: f64,
    /// Decimal places kept on computed sizes (default: 3)
    pub precision: u32,
}

impl Default for RowPacker {
    fn default() -> Self {
        Self {
            grid_gap: 8.0,
            precision: 3,
        }
    }
}

/// Output of one packing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedRows {
    /// One rect per input item, in input order.
    pub rects: Vec<LayoutRect>,
    pub rows: Vec<RowModel>,
    /// Offset just below the last row, trailing gap included.
    pub end_y: f64,
}

impl RowPacker {
    pub fn new(grid_gap: f64) -> Self {
        Self {
            grid_gap,
            ..Self::default()
        }
    }

    fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.precision as i32);
        (value * scale).round() / scale
    }

    /// Packs `items` into justified rows starting at `start_y`.
    ///
    /// # Algorithm
    /// 1. Accumulate items and their aspect ratios into a running row.
    /// 2. Close the row once the sum reaches `min_aspect_ratio`, or at the last item.
    /// 3. Row height is the width left after gaps divided by `max(sum, min_aspect_ratio)`,
    ///    so a trailing under-full row keeps the height of a full one instead of stretching.
    /// 4. Advance by the floored row height plus the gap.
    ///
    /// A zero container width yields zero-sized rects rather than an error.
    ///
    /// # Errors
    /// `InvalidItem` if an item's aspect ratio is not a finite positive number.
    pub fn pack(
        &self,
        items: &[Item],
        container_width: f64,
        min_aspect_ratio: f64,
        start_y: f64,
    ) -> Result<PackedRows> {
        let mut rects = Vec::with_capacity(items.len());
        let mut rows = Vec::new();
        let mut translate_y = start_y;
        let mut row_start = 0usize;
        let mut row_aspect_ratio = 0.0f64;

        for (index, item) in items.iter().enumerate() {
            let ar = item.aspect_ratio;
            if !ar.is_finite() || ar <= 0.0 {
                return Err(GridError::invalid_item(
                    &item.id,
                    format!("aspect ratio must be positive, got {}", ar),
                ));
            }
            row_aspect_ratio += ar;

            let is_last = index + 1 == items.len();
            if row_aspect_ratio < min_aspect_ratio && !is_last {
                continue;
            }

            let row = &items[row_start..=index];
            let gaps = self.grid_gap * (row.len() - 1) as f64;
            let desired_width = (container_width - gaps).max(0.0);
            let row_height = desired_width / row_aspect_ratio.max(min_aspect_ratio);
            let height = self.round(row_height);

            let mut translate_x = 0.0f64;
            for img in row {
                let width = self.round(row_height * img.aspect_ratio);
                rects.push(LayoutRect {
                    width,
                    height,
                    translate_x: self.round(translate_x),
                    translate_y,
                });
                translate_x += width + self.grid_gap;
            }

            rows.push(RowModel::new(
                rows.len() as u32,
                row_start,
                index + 1,
                height,
                translate_y,
            ));

            translate_y += row_height.floor() + self.grid_gap;
            row_start = index + 1;
            row_aspect_ratio = 0.0;
        }

        Ok(PackedRows {
            rects,
            rows,
            end_y: translate_y,
        })
    }
}
