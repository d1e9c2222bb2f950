use crate::models::LayoutResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    #[default]
    Down,
}

impl ScrollDirection {
    /// Direction of travel from `previous` to `next`. Ties keep `self`.
    pub fn follow(self, previous: f64, next: f64) -> Self {
        if next > previous {
            Self::Down
        } else if next < previous {
            Self::Up
        } else {
            self
        }
    }
}

/// Scroll position and viewport geometry, in container coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportState {
    pub scroll_offset: f64,
    pub scroll_direction: ScrollDirection,
    /// Distance from the top of the scrolling page to the top of the grid container.
    pub container_offset_top: f64,
    pub viewport_height: f64,
}

impl ViewportState {
    /// The vertical band `[min_y, max_y]` whose items stay mounted.
    ///
    /// `primary` extends the side the user is scrolling towards, `secondary` the
    /// side being left behind.
    pub fn window_bounds(&self, primary: f64, secondary: f64) -> (f64, f64) {
        let (buffer_top, buffer_bottom) = match self.scroll_direction {
            ScrollDirection::Up => (primary, secondary),
            ScrollDirection::Down => (secondary, primary),
        };
        let min_y = self.scroll_offset - self.container_offset_top - buffer_top;
        let max_y = self.scroll_offset + self.viewport_height + buffer_bottom;
        (min_y, max_y)
    }
}

/// Indices of one group's items that survived the window filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleGroup {
    pub group_index: usize,
    pub item_indices: Vec<usize>,
}

/// The windowed subset of a layout. Holds indices only; the layout is never touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSet {
    pub min_y: f64,
    pub max_y: f64,
    pub groups: Vec<VisibleGroup>,
}

impl RenderSet {
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.item_indices.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn contains(&self, group_index: usize, item_index: usize) -> bool {
        self.groups
            .iter()
            .find(|g| g.group_index == group_index)
            .is_some_and(|g| g.item_indices.contains(&item_index))
    }
}

/// Filters `layout` down to the items touching the buffered viewport.
///
/// An item is kept iff its bottom edge is at or below `min_y` and its top edge at
/// or above `max_y`, so items straddling either boundary stay. Groups left with no
/// items are dropped along with their header. Order is preserved.
pub fn compute_visible(
    layout: &LayoutResult,
    viewport: &ViewportState,
    buffer_primary: f64,
    buffer_secondary: f64,
) -> RenderSet {
    let (min_y, max_y) = viewport.window_bounds(buffer_primary, buffer_secondary);

    let groups = layout
        .groups
        .iter()
        .enumerate()
        .filter_map(|(group_index, group)| {
            let item_indices: Vec<usize> = group
                .rects
                .iter()
                .enumerate()
                .filter(|(_, rect)| rect.overlaps(min_y, max_y))
                .map(|(i, _)| i)
                .collect();
            if item_indices.is_empty() {
                None
            } else {
                Some(VisibleGroup {
                    group_index,
                    item_indices,
                })
            }
        })
        .collect();

    RenderSet {
        min_y,
        max_y,
        groups,
    }
}
