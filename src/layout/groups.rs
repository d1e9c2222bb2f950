use tracing::trace;

use super::justified::RowPacker;
use crate::error::Result;
use crate::models::{GroupLayout, Item, ItemGroup, LayoutResult};

/// Stacks date groups vertically, packing each group's items into its own rows.
#[derive(Debug, Clone, Default)]
pub struct GroupLayoutComposer {
    pub packer: RowPacker,
}

impl GroupLayoutComposer {
    pub fn new(packer: RowPacker) -> Self {
        Self { packer }
    }

    /// Lays out `groups` top to bottom.
    ///
    /// Each group reserves `group_spacing` for its header and then packs its rows
    /// from `group_translate_y`. Empty groups stay in the sequence with zero height
    /// and reserve nothing. The total height drops the trailing gap of the last row.
    pub fn compose_groups(
        &self,
        groups: &[ItemGroup],
        container_width: f64,
        min_aspect_ratio: f64,
        group_spacing: f64,
    ) -> Result<LayoutResult> {
        let mut laid_out = Vec::with_capacity(groups.len());
        let mut cursor = 0.0f64;

        for group in groups {
            if group.items.is_empty() {
                laid_out.push(GroupLayout {
                    date: group.date.clone(),
                    description: group.description.clone(),
                    group_translate_y: cursor + group_spacing,
                    height: 0.0,
                    rects: Vec::new(),
                    rows: Vec::new(),
                });
                continue;
            }

            let group_translate_y = cursor + group_spacing;
            let packed = self.packer.pack(
                &group.items,
                container_width,
                min_aspect_ratio,
                group_translate_y,
            )?;
            let height = packed.end_y - group_translate_y;
            trace!(
                date = %group.date,
                items = group.items.len(),
                rows = packed.rows.len(),
                group_translate_y,
                height,
                "Composed group"
            );

            laid_out.push(GroupLayout {
                date: group.date.clone(),
                description: group.description.clone(),
                group_translate_y,
                height,
                rects: packed.rects,
                rows: packed.rows,
            });
            cursor = packed.end_y;
        }

        Ok(LayoutResult {
            container_width,
            grouped: true,
            groups: laid_out,
            total_height: self.total_height(cursor),
        })
    }

    /// Lays out an ungrouped sequence as a single headerless group.
    pub fn compose_flat(
        &self,
        items: &[Item],
        container_width: f64,
        min_aspect_ratio: f64,
    ) -> Result<LayoutResult> {
        let packed = self.packer.pack(items, container_width, min_aspect_ratio, 0.0)?;
        let total_height = self.total_height(packed.end_y);

        Ok(LayoutResult {
            container_width,
            grouped: false,
            groups: vec![GroupLayout {
                date: String::new(),
                description: String::new(),
                group_translate_y: 0.0,
                height: packed.end_y,
                rects: packed.rects,
                rows: packed.rows,
            }],
            total_height,
        })
    }

    fn total_height(&self, end_y: f64) -> f64 {
        (end_y - self.packer.grid_gap).max(0.0)
    }
}
