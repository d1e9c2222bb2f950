//! The grid's state machine: owns the current layout and window, decides when to
//! repack and when to re-window, and publishes what should be rendered.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::config::GridSettings;
use crate::error::{GridError, Result};
use crate::grouping::{group_by_date, sort_by_date, ItemComparator};
use crate::layout::{
    grid_image_height, CacheKey, GroupLayoutComposer, LayoutCache, MinAspectRatio, RowPacker,
};
use crate::models::{Item, ItemGroup, LayoutResult};
use crate::render::{
    expanded_rect, tile_sources, CloudinaryUrl, GroupHeader, RenderNode, RenderTile, Selection,
    SharedResolver, SourceHeights, UrlResolver,
};
use crate::viewport::{
    compute_visible, Debouncer, FrameThrottle, RenderSet, ScrollDirection, ScrollSpeedEstimator,
    ScrollTier, ViewportState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Waiting for a measured, non-zero container width.
    Uninitialized,
    LaidOut,
    Resizing,
    Scrolling,
    Unmounted,
}

type TotalHeightCallback = Box<dyn FnMut(f64)>;
type RenderSetCallback = Box<dyn FnMut(&RenderSet)>;

/// Builder for [`LayoutController`] carrying the pluggable policies that do not
/// belong in serialized settings.
pub struct LayoutControllerBuilder {
    settings: GridSettings,
    comparator: Option<ItemComparator>,
    min_aspect_ratio: MinAspectRatio,
    resolver: SharedResolver,
    cache: Option<Arc<LayoutCache>>,
}

impl Default for LayoutControllerBuilder {
    fn default() -> Self {
        Self {
            settings: GridSettings::default(),
            comparator: None,
            min_aspect_ratio: MinAspectRatio::default(),
            resolver: Arc::new(CloudinaryUrl),
            cache: None,
        }
    }
}

impl LayoutControllerBuilder {
    pub fn settings(mut self, settings: GridSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Orders items with `comparator` instead of `sort_by_date`.
    pub fn comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Item, &Item) -> std::cmp::Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    pub fn min_aspect_ratio(mut self, policy: MinAspectRatio) -> Self {
        self.min_aspect_ratio = policy;
        self
    }

    pub fn url_resolver<R>(mut self, resolver: R) -> Self
    where
        R: UrlResolver + Send + Sync + 'static,
    {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Shares a layout cache with other controllers.
    pub fn layout_cache(mut self, cache: Arc<LayoutCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Builds a controller over a flat item collection, sorting and grouping it
    /// as the settings ask.
    ///
    /// # Errors
    /// `Configuration` for invalid settings, `MissingData` when `items` is empty
    /// or every item is rejected.
    pub fn build(self, items: Vec<Item>) -> Result<LayoutController> {
        self.settings.validate()?;
        let grouped = self.settings.group_by_date;
        let mut controller = self.into_controller(grouped);
        controller.replace_items(items)?;
        Ok(controller)
    }

    /// Builds a controller over groups that were bucketed upstream.
    pub fn build_grouped(self, groups: Vec<ItemGroup>) -> Result<LayoutController> {
        self.settings.validate()?;
        let mut controller = self.into_controller(true);
        controller.replace_groups(groups)?;
        Ok(controller)
    }

    fn into_controller(self, grouped: bool) -> LayoutController {
        let settings = self.settings;
        let speed = ScrollSpeedEstimator::new(
            settings.medium_speed_threshold,
            settings.fast_speed_threshold,
            settings.idle_decay_factor,
        );
        LayoutController {
            composer: GroupLayoutComposer::new(RowPacker::new(settings.grid_gap)),
            resize_debounce: Debouncer::new(settings.resize_debounce()),
            scroll_throttle: FrameThrottle::new(settings.scroll_throttle()),
            speed,
            settings,
            comparator: self.comparator,
            min_aspect_ratio: self.min_aspect_ratio,
            resolver: self.resolver,
            cache: self.cache.unwrap_or_default(),
            groups: Vec::new(),
            grouped,
            list_hash: 0,
            rejected: Vec::new(),
            state: ControllerState::Uninitialized,
            layout: None,
            viewport: ViewportState::default(),
            render_set: RenderSet::default(),
            selection: Selection::None,
            on_total_height_changed: None,
            on_render_set_changed: None,
        }
    }
}

/// Orchestrates layout and windowing for one grid.
///
/// Everything runs synchronously on the caller's thread. Repacks happen only on
/// mount, resize and collection changes; scroll frames only re-window.
pub struct LayoutController {
    settings: GridSettings,
    comparator: Option<ItemComparator>,
    min_aspect_ratio: MinAspectRatio,
    resolver: SharedResolver,
    composer: GroupLayoutComposer,
    cache: Arc<LayoutCache>,
    groups: Vec<ItemGroup>,
    grouped: bool,
    list_hash: u64,
    rejected: Vec<GridError>,
    state: ControllerState,
    layout: Option<Arc<LayoutResult>>,
    viewport: ViewportState,
    render_set: RenderSet,
    selection: Selection,
    speed: ScrollSpeedEstimator,
    resize_debounce: Debouncer<f64>,
    scroll_throttle: FrameThrottle,
    on_total_height_changed: Option<TotalHeightCallback>,
    on_render_set_changed: Option<RenderSetCallback>,
}

impl LayoutController {
    pub fn builder() -> LayoutControllerBuilder {
        LayoutControllerBuilder::default()
    }

    pub fn new(items: Vec<Item>, settings: GridSettings) -> Result<Self> {
        Self::builder().settings(settings).build(items)
    }

    pub fn from_groups(groups: Vec<ItemGroup>, settings: GridSettings) -> Result<Self> {
        Self::builder().settings(settings).build_grouped(groups)
    }

    // =========================================================================
    // Collection
    // =========================================================================

    /// Replaces the item collection, then repacks if already laid out.
    pub fn replace_items(&mut self, items: Vec<Item>) -> Result<()> {
        let mut items = self.accept_items(items)?;
        if let Some(comparator) = &self.comparator {
            items.sort_by(|a, b| comparator(a, b));
        } else if self.settings.sort_by_date {
            sort_by_date(&mut items);
        }

        let groups = if self.grouped {
            group_by_date(items)
        } else {
            vec![ItemGroup::new(String::new(), String::new(), items)]
        };
        self.install_groups(groups)
    }

    /// Replaces the collection with pre-bucketed groups, then repacks if already
    /// laid out. Empty groups are kept in sequence.
    pub fn replace_groups(&mut self, groups: Vec<ItemGroup>) -> Result<()> {
        if groups.iter().all(|g| g.items.is_empty()) {
            return Err(GridError::MissingData);
        }
        self.rejected.clear();
        let mut accepted = Vec::with_capacity(groups.len());
        for group in groups {
            let mut items = Vec::with_capacity(group.items.len());
            for item in group.items {
                match item.validate() {
                    Ok(()) => items.push(item),
                    Err(err) => {
                        warn!("Skipping item: {}", err);
                        self.rejected.push(err);
                    }
                }
            }
            if let Some(comparator) = &self.comparator {
                items.sort_by(|a, b| comparator(a, b));
            } else if self.settings.sort_by_date {
                sort_by_date(&mut items);
            }
            accepted.push(ItemGroup::new(group.date, group.description, items));
        }
        if accepted.iter().all(|g| g.items.is_empty()) {
            return Err(GridError::MissingData);
        }
        self.install_groups(accepted)
    }

    fn accept_items(&mut self, items: Vec<Item>) -> Result<Vec<Item>> {
        if items.is_empty() {
            return Err(GridError::MissingData);
        }
        self.rejected.clear();
        let mut accepted = Vec::with_capacity(items.len());
        for item in items {
            match item.validate() {
                Ok(()) => accepted.push(item),
                Err(err) => {
                    warn!("Skipping item: {}", err);
                    self.rejected.push(err);
                }
            }
        }
        if accepted.is_empty() {
            return Err(GridError::MissingData);
        }
        Ok(accepted)
    }

    fn install_groups(&mut self, groups: Vec<ItemGroup>) -> Result<()> {
        self.list_hash = LayoutCache::compute_list_hash(&groups);
        self.groups = groups;
        self.selection = Selection::None;
        if let Some(width) = self.layout.as_ref().map(|l| l.container_width) {
            self.relayout(width)?;
        }
        Ok(())
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// First layout. A zero width means the container is not measured yet: the
    /// repack is deferred until `resize` sees a non-zero width.
    pub fn mount(
        &mut self,
        container_width: f64,
        viewport_height: f64,
        container_offset_top: f64,
    ) -> Result<()> {
        if self.state == ControllerState::Unmounted {
            warn!("mount called on an unmounted grid");
            return Ok(());
        }
        self.viewport.viewport_height = viewport_height.max(0.0);
        self.viewport.container_offset_top = container_offset_top;

        if container_width.is_nan() || container_width <= 0.0 {
            debug!("Container not measured yet, deferring layout");
            return Ok(());
        }
        self.relayout(container_width)?;
        self.state = ControllerState::LaidOut;
        info!(
            container_width,
            items = self.item_count(),
            groups = self.groups.len(),
            "Mounted grid"
        );
        Ok(())
    }

    /// Full repack at `new_width`, replacing the layout wholesale.
    pub fn resize(&mut self, new_width: f64) -> Result<()> {
        match self.state {
            ControllerState::Unmounted => {
                warn!("resize called on an unmounted grid");
                Ok(())
            }
            ControllerState::Uninitialized => {
                let (height, top) = (
                    self.viewport.viewport_height,
                    self.viewport.container_offset_top,
                );
                self.mount(new_width, height, top)
            }
            _ => {
                self.state = ControllerState::Resizing;
                let result = self.relayout(new_width);
                self.state = ControllerState::LaidOut;
                result
            }
        }
    }

    /// Updates the viewport geometry (window resize, page reflow) and re-windows.
    pub fn set_viewport(&mut self, viewport_height: f64, container_offset_top: f64) {
        self.viewport.viewport_height = viewport_height.max(0.0);
        self.viewport.container_offset_top = container_offset_top;
        self.rewindow();
    }

    pub fn scroll(&mut self, new_offset: f64) {
        self.scroll_at(new_offset, Instant::now());
    }

    /// One scroll frame: direction, speed tier, window. Clears the selection.
    pub fn scroll_at(&mut self, new_offset: f64, now: Instant) {
        if self.state == ControllerState::Unmounted {
            warn!("scroll called on an unmounted grid");
            return;
        }
        let previous = self.viewport.scroll_offset;
        self.viewport.scroll_direction = self.viewport.scroll_direction.follow(previous, new_offset);
        self.viewport.scroll_offset = new_offset;
        self.speed
            .sample_at(new_offset, self.settings.scroll_throttle(), now);
        self.selection = Selection::None;

        if self.state == ControllerState::Uninitialized {
            return;
        }
        self.state = ControllerState::Scrolling;
        self.rewindow();
        self.state = ControllerState::LaidOut;
        trace!(
            offset = new_offset,
            direction = ?self.viewport.scroll_direction,
            tier = ?self.speed.tier(),
            rendered = self.render_set.len(),
            "Scroll frame"
        );
    }

    /// Releases every pending timer and listener. Later calls are ignored.
    pub fn unmount(&mut self) {
        if self.state == ControllerState::Unmounted {
            return;
        }
        self.release();
        self.state = ControllerState::Unmounted;
        info!("Unmounted grid");
    }

    fn release(&mut self) {
        self.resize_debounce.cancel();
        self.scroll_throttle.cancel();
        self.speed.cancel();
        self.on_total_height_changed = None;
        self.on_render_set_changed = None;
    }

    // =========================================================================
    // Raw host events
    // =========================================================================

    /// Queues a container width; applied by `on_frame` once resizing goes quiet.
    pub fn on_resize_event(&mut self, width: f64, now: Instant) {
        if self.state != ControllerState::Unmounted {
            self.resize_debounce.trigger(width, now);
        }
    }

    /// Queues a scroll offset; only the latest one reaches the next eligible frame.
    pub fn on_scroll_event(&mut self, offset: f64) {
        if self.state != ControllerState::Unmounted {
            self.scroll_throttle.push(offset);
        }
    }

    /// Animation-frame hook: applies a settled resize, at most one scroll, and
    /// fires the idle callback when scrolling has stopped.
    pub fn on_frame(&mut self, now: Instant) -> Result<()> {
        if self.state == ControllerState::Unmounted {
            return Ok(());
        }
        if let Some(width) = self.resize_debounce.poll(now) {
            self.resize(width)?;
        }
        if let Some(offset) = self.scroll_throttle.on_frame(now) {
            self.scroll_at(offset, now);
        }
        self.speed.poll(now);
        Ok(())
    }

    pub fn has_pending_timers(&self) -> bool {
        self.resize_debounce.is_pending()
            || self.scroll_throttle.is_pending()
            || self.speed.is_idle_pending()
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    pub fn connect_total_height_changed<F>(&mut self, callback: F)
    where
        F: FnMut(f64) + 'static,
    {
        self.on_total_height_changed = Some(Box::new(callback));
    }

    pub fn connect_render_set_changed<F>(&mut self, callback: F)
    where
        F: FnMut(&RenderSet) + 'static,
    {
        self.on_render_set_changed = Some(Box::new(callback));
    }

    /// Called once each time scrolling stops for the idle period.
    pub fn connect_idle<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.speed.connect_idle(callback);
    }

    // =========================================================================
    // Layout and windowing
    // =========================================================================

    fn relayout(&mut self, container_width: f64) -> Result<()> {
        let width = if container_width.is_finite() {
            container_width.max(0.0)
        } else {
            0.0
        };
        let min_aspect_ratio = self.min_aspect_ratio.for_width(width);
        let spacing = if self.grouped {
            self.settings.group_spacing(width)
        } else {
            0.0
        };
        let key = CacheKey::new(
            width,
            self.list_hash,
            self.settings.grid_gap,
            spacing,
            min_aspect_ratio,
            self.grouped,
        );

        let layout = match self.cache.get(&key) {
            Some(hit) => {
                debug!(width, "Layout cache hit");
                hit
            }
            None => {
                let computed = if self.grouped {
                    self.composer
                        .compose_groups(&self.groups, width, min_aspect_ratio, spacing)?
                } else {
                    let items = self.groups.first().map(|g| g.items.as_slice()).unwrap_or(&[]);
                    self.composer.compose_flat(items, width, min_aspect_ratio)?
                };
                let computed = Arc::new(computed);
                self.cache.set(key, Arc::clone(&computed));
                debug!(
                    width,
                    min_aspect_ratio,
                    rows = computed.row_count(),
                    total_height = computed.total_height,
                    "Computed layout"
                );
                computed
            }
        };

        let previous_height = self.layout.as_ref().map(|l| l.total_height);
        let total_height = layout.total_height;
        self.layout = Some(layout);
        if previous_height != Some(total_height) {
            if let Some(callback) = self.on_total_height_changed.as_mut() {
                callback(total_height);
            }
        }
        self.rewindow();
        Ok(())
    }

    fn rewindow(&mut self) {
        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        self.render_set = compute_visible(
            layout,
            &self.viewport,
            self.settings.primary_image_buffer_height,
            self.settings.secondary_image_buffer_height,
        );
        if let Some(callback) = self.on_render_set_changed.as_mut() {
            callback(&self.render_set);
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggles the expanded tile. Tiles that already span the container are not
    /// expanded; unknown ids leave the selection unchanged.
    pub fn activate(&mut self, id: &str) -> &Selection {
        if self.selection.is_active(id) {
            self.selection = Selection::None;
            return &self.selection;
        }
        let Some(layout) = self.layout.as_ref() else {
            return &self.selection;
        };
        let found = self.groups.iter().zip(&layout.groups).find_map(|(group, laid)| {
            group
                .items
                .iter()
                .position(|item| item.id == id)
                .map(|i| laid.rects[i])
        });
        if let Some(rect) = found {
            self.selection = if rect.width >= layout.container_width {
                Selection::None
            } else {
                Selection::Active(id.to_string())
            };
        }
        &self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Ordered headers and tiles for the current window.
    pub fn render_nodes(&self) -> Vec<RenderNode<'_>> {
        let Some(layout) = self.layout.as_ref() else {
            return Vec::new();
        };
        let heights = SourceHeights {
            thumbnail: self.settings.thumbnail_size,
            grid: grid_image_height(layout.container_width),
            expanded: self.settings.expanded_size,
        };
        let tier = self.speed.tier();

        let mut nodes = Vec::with_capacity(self.render_set.len() + self.render_set.groups.len());
        for visible in &self.render_set.groups {
            let group = &self.groups[visible.group_index];
            let laid = &layout.groups[visible.group_index];
            if layout.grouped {
                nodes.push(RenderNode::Header(GroupHeader {
                    date: &group.date,
                    description: &group.description,
                    group_translate_y: laid.group_translate_y,
                    height: laid.height,
                }));
            }
            for &index in &visible.item_indices {
                let item = &group.items[index];
                let is_active = self.selection.is_active(&item.id);
                let expanded = is_active.then(|| {
                    expanded_rect(
                        item.aspect_ratio,
                        layout.container_width,
                        self.viewport.viewport_height,
                        self.viewport.scroll_offset,
                        self.viewport.container_offset_top,
                        self.settings.grid_gap,
                    )
                });
                nodes.push(RenderNode::Tile(RenderTile {
                    item,
                    rect: laid.rects[index],
                    sources: tile_sources(self.resolver.as_ref(), &item.url, tier, is_active, heights),
                    expanded,
                }));
            }
        }
        nodes
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn layout(&self) -> Option<&Arc<LayoutResult>> {
        self.layout.as_ref()
    }

    pub fn render_set(&self) -> &RenderSet {
        &self.render_set
    }

    pub fn total_height(&self) -> f64 {
        self.layout.as_ref().map(|l| l.total_height).unwrap_or(0.0)
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        self.viewport.scroll_direction
    }

    pub fn scroll_tier(&self) -> ScrollTier {
        self.speed.tier()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn groups(&self) -> &[ItemGroup] {
        &self.groups
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    /// Items dropped by the last collection change, with the reason.
    pub fn rejected(&self) -> &[GridError] {
        &self.rejected
    }
}

impl Drop for LayoutController {
    fn drop(&mut self) {
        if self.state != ControllerState::Unmounted {
            self.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    fn make_item(i: usize, aspect_ratio: f64) -> Item {
        Item::new(
            format!("img{}", i),
            format!("https://res.cloudinary.com/demo/image/upload/img{}.jpg", i),
            aspect_ratio,
        )
    }

    fn make_items(count: usize) -> Vec<Item> {
        const RATIOS: [f64; 5] = [1.5, 0.667, 1.0, 1.778, 0.75];
        (0..count).map(|i| make_item(i, RATIOS[i % RATIOS.len()])).collect()
    }

    fn mounted(count: usize) -> LayoutController {
        let mut controller = LayoutController::new(make_items(count), GridSettings::default()).unwrap();
        controller.mount(1200.0, 800.0, 0.0).unwrap();
        controller
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_empty_collection_is_missing_data() {
        let err = LayoutController::new(Vec::new(), GridSettings::default()).err();
        assert_eq!(err, Some(GridError::MissingData));

        let err = LayoutController::from_groups(
            vec![ItemGroup::new("1 May 2019", "", Vec::new())],
            GridSettings::default(),
        )
        .err();
        assert_eq!(err, Some(GridError::MissingData));
    }

    #[test]
    fn test_invalid_items_excluded() {
        let mut items = make_items(4);
        items.push(make_item(99, 0.0));
        items.push(Item::new("nourl", "", 1.0));

        let mut controller = LayoutController::new(items, GridSettings::default()).unwrap();
        assert_eq!(controller.item_count(), 4);
        assert_eq!(controller.rejected().len(), 2);

        controller.mount(1000.0, 800.0, 0.0).unwrap();
        assert_eq!(controller.layout().unwrap().item_count(), 4);
    }

    #[test]
    fn test_all_invalid_is_missing_data() {
        let items = vec![make_item(0, -1.0), make_item(1, 0.0)];
        let err = LayoutController::new(items, GridSettings::default()).err();
        assert_eq!(err, Some(GridError::MissingData));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = GridSettings {
            group_gap_sm: -5.0,
            ..GridSettings::default()
        };
        let err = LayoutController::new(make_items(3), settings).err();
        assert!(matches!(
            err,
            Some(GridError::Configuration { field: "groupGapSm", .. })
        ));
    }

    #[test]
    fn test_mount_defers_until_width_known() {
        let mut controller = LayoutController::new(make_items(10), GridSettings::default()).unwrap();
        controller.mount(0.0, 800.0, 0.0).unwrap();
        assert_eq!(controller.state(), ControllerState::Uninitialized);
        assert!(controller.layout().is_none());
        assert!(controller.render_nodes().is_empty());

        controller.resize(1024.0).unwrap();
        assert_eq!(controller.state(), ControllerState::LaidOut);
        assert_eq!(controller.layout().unwrap().container_width, 1024.0);
        assert!(!controller.render_set().is_empty());
    }

    #[test]
    fn test_mount_windows_initial_viewport() {
        let controller = mounted(500);
        let layout = controller.layout().unwrap();
        assert!(controller.total_height() > 800.0);
        assert!(controller.render_set().len() < layout.item_count());

        // Everything rendered touches [min_y, max_y].
        let set = controller.render_set();
        for node in controller.render_nodes() {
            if let RenderNode::Tile(tile) = node {
                assert!(tile.rect.overlaps(set.min_y, set.max_y));
            }
        }
    }

    #[test]
    fn test_resize_replaces_layout() {
        let mut controller = mounted(60);
        let heights = Rc::new(RefCell::new(Vec::new()));
        let sink = heights.clone();
        controller.connect_total_height_changed(move |h| sink.borrow_mut().push(h));

        let before = Arc::clone(controller.layout().unwrap());
        controller.resize(600.0).unwrap();
        let after = Arc::clone(controller.layout().unwrap());

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.container_width, 600.0);
        assert_eq!(before.container_width, 1200.0);
        assert_eq!(heights.borrow().as_slice(), &[after.total_height]);
        assert_eq!(controller.state(), ControllerState::LaidOut);
    }

    #[test]
    fn test_resize_back_hits_cache() {
        let mut controller = mounted(60);
        let first = Arc::clone(controller.layout().unwrap());
        controller.resize(700.0).unwrap();
        controller.resize(1200.0).unwrap();
        assert!(Arc::ptr_eq(&first, controller.layout().unwrap()));
    }

    #[test]
    fn test_shared_cache_between_grids() {
        let cache = Arc::new(LayoutCache::new());
        let mut a = LayoutController::builder()
            .layout_cache(Arc::clone(&cache))
            .build(make_items(20))
            .unwrap();
        let mut b = LayoutController::builder()
            .layout_cache(Arc::clone(&cache))
            .build(make_items(20))
            .unwrap();
        a.mount(900.0, 600.0, 0.0).unwrap();
        b.mount(900.0, 600.0, 0.0).unwrap();
        assert!(Arc::ptr_eq(a.layout().unwrap(), b.layout().unwrap()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_width_resize_is_degenerate() {
        let mut controller = mounted(10);
        controller.resize(0.0).unwrap();
        let layout = controller.layout().unwrap();
        assert!(layout
            .groups
            .iter()
            .flat_map(|g| g.rects.iter())
            .all(|r| r.width == 0.0 && r.height == 0.0));
    }

    #[test]
    fn test_scroll_direction_tracking() {
        let mut controller = mounted(300);
        assert_eq!(controller.scroll_direction(), ScrollDirection::Down);

        controller.scroll(500.0);
        assert_eq!(controller.scroll_direction(), ScrollDirection::Down);
        controller.scroll(200.0);
        assert_eq!(controller.scroll_direction(), ScrollDirection::Up);
        controller.scroll(200.0);
        assert_eq!(controller.scroll_direction(), ScrollDirection::Up);
        controller.scroll(250.0);
        assert_eq!(controller.scroll_direction(), ScrollDirection::Down);
    }

    #[test]
    fn test_scroll_moves_window() {
        let mut controller = mounted(400);
        let first_top = controller.render_set().min_y;
        controller.scroll(5000.0);
        let set = controller.render_set();
        assert!(set.min_y > first_top);
        assert!(!set.contains(0, 0));
        assert!(!set.is_empty());
    }

    #[test]
    fn test_activate_and_scroll_clears_selection() {
        let mut controller = mounted(30);
        assert_eq!(controller.activate("img1"), &Selection::Active("img1".into()));

        let expanded: Vec<_> = controller
            .render_nodes()
            .into_iter()
            .filter_map(|n| match n {
                RenderNode::Tile(t) if t.expanded.is_some() => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(expanded.len(), 1);
        assert!(expanded[0].sources.expanded.is_some());

        // Clicking the same tile again collapses it.
        assert_eq!(controller.activate("img1"), &Selection::None);

        controller.activate("img2");
        controller.scroll(10.0);
        assert_eq!(controller.selection(), &Selection::None);

        assert_eq!(controller.activate("missing"), &Selection::None);
    }

    #[test]
    fn test_full_width_tile_not_expanded() {
        let items = vec![make_item(0, 6.0), make_item(1, 1.0)];
        let settings = GridSettings::default();
        let mut controller = LayoutController::builder()
            .settings(settings)
            .min_aspect_ratio(MinAspectRatio::Fixed(4.0))
            .build(items)
            .unwrap();
        controller.mount(1000.0, 800.0, 0.0).unwrap();
        assert_eq!(controller.activate("img0"), &Selection::None);
        assert_eq!(controller.activate("img1"), &Selection::Active("img1".into()));
    }

    #[test]
    fn test_frame_applies_debounced_resize_and_throttled_scroll() {
        let t0 = Instant::now();
        let mut controller = mounted(200);
        let windows = Rc::new(Cell::new(0u32));
        let counter = windows.clone();
        controller.connect_render_set_changed(move |_| counter.set(counter.get() + 1));

        controller.on_resize_event(900.0, t0);
        controller.on_resize_event(800.0, t0 + ms(40));
        controller.on_frame(t0 + ms(60)).unwrap();
        assert_eq!(controller.layout().unwrap().container_width, 1200.0);
        controller.on_frame(t0 + ms(120)).unwrap();
        assert_eq!(controller.layout().unwrap().container_width, 800.0);
        assert_eq!(windows.get(), 1);

        controller.on_scroll_event(100.0);
        controller.on_scroll_event(300.0);
        controller.on_frame(t0 + ms(136)).unwrap();
        assert_eq!(controller.viewport().scroll_offset, 300.0);
        assert_eq!(windows.get(), 2);

        controller.on_scroll_event(400.0);
        controller.on_frame(t0 + ms(152)).unwrap();
        assert_eq!(controller.viewport().scroll_offset, 300.0);
        controller.on_frame(t0 + ms(400)).unwrap();
        assert_eq!(controller.viewport().scroll_offset, 400.0);
    }

    #[test]
    fn test_idle_callback_after_scrolling_stops() {
        let t0 = Instant::now();
        let mut controller = mounted(200);
        let idled = Rc::new(Cell::new(0u32));
        let counter = idled.clone();
        controller.connect_idle(move || counter.set(counter.get() + 1));

        controller.scroll_at(0.0, t0);
        controller.scroll_at(800.0, t0 + ms(250));
        assert_eq!(controller.scroll_tier(), ScrollTier::Fast);

        // Fast scrolling requests no images.
        let tiles: Vec<_> = controller
            .render_nodes()
            .into_iter()
            .filter_map(|n| match n {
                RenderNode::Tile(t) => Some(t),
                RenderNode::Header(_) => None,
            })
            .collect();
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.sources.grid.is_none()));

        controller.on_frame(t0 + ms(250 + 625)).unwrap();
        assert_eq!(idled.get(), 1);
        assert_eq!(controller.scroll_tier(), ScrollTier::Idle);
    }

    #[test]
    fn test_unmount_releases_timers() {
        let t0 = Instant::now();
        let mut controller = mounted(50);
        controller.scroll_at(100.0, t0);
        controller.on_resize_event(700.0, t0);
        controller.on_scroll_event(400.0);
        assert!(controller.has_pending_timers());

        controller.unmount();
        assert!(!controller.has_pending_timers());
        assert_eq!(controller.state(), ControllerState::Unmounted);

        controller.on_frame(t0 + ms(1000)).unwrap();
        controller.resize(300.0).unwrap();
        controller.scroll(900.0);
        assert_eq!(controller.layout().unwrap().container_width, 1200.0);
        assert_eq!(controller.viewport().scroll_offset, 100.0);
    }

    #[test]
    fn test_grouped_output_interleaves_headers() {
        let mut items = Vec::new();
        for (i, date) in ["2019-05-01", "2019-05-01", "2018-06-29", "2018-06-29", "2018-06-29"]
            .iter()
            .enumerate()
        {
            items.push(make_item(i, 1.0).with_date(*date).with_location("Amsterdam"));
        }
        let settings = GridSettings {
            group_by_date: true,
            sort_by_date: true,
            ..GridSettings::default()
        };
        let mut controller = LayoutController::new(items, settings).unwrap();
        controller.mount(1200.0, 900.0, 0.0).unwrap();

        let nodes = controller.render_nodes();
        let headers: Vec<&str> = nodes
            .iter()
            .filter_map(|n| match n {
                RenderNode::Header(h) => Some(h.date),
                RenderNode::Tile(_) => None,
            })
            .collect();
        assert_eq!(headers, vec!["1 May 2019", "29 June 2018"]);
        assert!(matches!(nodes[0], RenderNode::Header(ref h) if h.description == "Amsterdam"));
        assert_eq!(nodes.len(), 2 + 5);

        let layout = controller.layout().unwrap();
        assert_eq!(layout.groups[0].group_translate_y, 50.0);
    }

    #[test]
    fn test_pre_grouped_input_uses_small_gap_below_breakpoint() {
        let groups = vec![
            ItemGroup::new("29 June 2018", "Amsterdam", make_items(6)),
            ItemGroup::new("Empty", "", Vec::new()),
            ItemGroup::new("28 June 2018", "", make_items(3)),
        ];
        let mut controller = LayoutController::from_groups(groups, GridSettings::default()).unwrap();
        controller.mount(600.0, 700.0, 0.0).unwrap();

        let layout = controller.layout().unwrap();
        assert!(layout.grouped);
        assert_eq!(layout.groups.len(), 3);
        assert_eq!(layout.groups[0].group_translate_y, 20.0);
        assert!(controller.render_set().groups.iter().all(|g| g.group_index != 1));
    }

    #[test]
    fn test_custom_comparator_and_resolver() {
        let items = vec![make_item(2, 1.0), make_item(0, 1.0), make_item(1, 1.0)];
        let mut controller = LayoutController::builder()
            .comparator(|a: &Item, b: &Item| a.id.cmp(&b.id))
            .url_resolver(|url: &str, h: u32| format!("{}#{}", url, h))
            .build(items)
            .unwrap();
        controller.mount(1200.0, 800.0, 0.0).unwrap();

        let ids: Vec<&str> = controller.groups()[0].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["img0", "img1", "img2"]);
        match &controller.render_nodes()[0] {
            RenderNode::Tile(tile) => {
                assert!(tile.sources.grid.as_deref().unwrap().ends_with("#250"))
            }
            RenderNode::Header(_) => panic!("ungrouped grid rendered a header"),
        }
    }

    #[test]
    fn test_replace_items_repacks() {
        let mut controller = mounted(10);
        controller.activate("img1");
        controller.replace_items(make_items(40)).unwrap();
        assert_eq!(controller.layout().unwrap().item_count(), 40);
        assert_eq!(controller.selection(), &Selection::None);
        assert!(controller.replace_items(Vec::new()).is_err());
    }
}
