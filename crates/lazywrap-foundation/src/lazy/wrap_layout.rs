//! The wrap layout model: measure and arrange passes over a virtualized
//! collection.
//!
//! A measure pass finds the first row touching the cache margin before the
//! viewport, realizes items forward until the cache margin after the
//! viewport is passed, virtualizes every other container and refreshes the
//! extent. An arrange pass re-packs the realized rows with final sizes and
//! hands each container its bounds.

use std::ops::RangeInclusive;
use std::rc::Rc;

use lazywrap_geometry::{OrientedPoint, OrientedSize, Point, Size};

use super::config::{CacheLengthUnit, WrapLayoutConfig};
use super::container::{ChildrenCollection, Container, ContainerFactory, ContainerId, ItemSizeOracle};
use super::container_manager::{ItemContainerManager, LazyLayoutStats, VirtualizationMode};
use super::error::{LayoutError, LayoutResult};
use super::events::{LayoutEvent, ListenerId, Listeners};
use super::extent::KnownExtent;
use super::items::{ItemCollection, ItemKey, ItemsChanged, ItemsChangedAction};
use super::row_arranger::{RowArranger, RowEntry};
use super::row_walker::{cursor_before, find_row_start, walk_extent, RowCursor, UniformRows};
use super::size_cache::SizeCache;
use super::size_resolver::SizeResolver;
use super::viewport::{ViewportHandler, ViewportState};
use crate::collections::map::HashSet;

/// Realized range produced by the last measure pass.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct RealizedWindow {
    pub(super) range: RangeInclusive<usize>,
    /// First item of the row holding `range.start()`.
    pub(super) row_start: usize,
    /// Top of that row.
    pub(super) row_y: f32,
}

/// Virtualized wrap layout over an item collection.
pub struct WrapLayout<F: ContainerFactory, H> {
    pub(super) config: WrapLayoutConfig,
    pub(super) manager: ItemContainerManager<F, H>,
    pub(super) oracle: Option<Box<dyn ItemSizeOracle<F::Item>>>,
    pub(super) size_cache: SizeCache,
    pub(super) size_of_first_item: Option<Size>,
    pub(super) state: ViewportState,
    pub(super) known_extent: KnownExtent,
    pub(super) window: Option<RealizedWindow>,
    pub(super) listeners: Listeners<LayoutEvent>,
    pub(super) measure_dirty: bool,
}

impl<F, H> WrapLayout<F, H>
where
    F: ContainerFactory,
    H: ChildrenCollection<F::Container>,
{
    pub fn new(factory: F, children: H, items: ItemCollection<F::Item>, config: WrapLayoutConfig) -> Self {
        Self {
            config,
            manager: ItemContainerManager::new(factory, children, items),
            oracle: None,
            size_cache: SizeCache::new(),
            size_of_first_item: None,
            state: ViewportState::default(),
            known_extent: KnownExtent::default(),
            window: None,
            listeners: Listeners::default(),
            measure_dirty: true,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Outputs
    // ─────────────────────────────────────────────────────────────────────

    pub fn extent(&self) -> Size {
        self.state.extent
    }

    pub fn viewport(&self) -> Size {
        self.state.viewport
    }

    pub fn offset(&self) -> Point {
        self.state.offset
    }

    /// Index range realized by the last measure pass.
    pub fn realized_range(&self) -> Option<RangeInclusive<usize>> {
        self.window.as_ref().map(|window| window.range.clone())
    }

    /// True when a change since the last measure pass requires a new one.
    pub fn needs_measure(&self) -> bool {
        self.measure_dirty
    }

    pub fn config(&self) -> &WrapLayoutConfig {
        &self.config
    }

    pub fn items(&self) -> &ItemCollection<F::Item> {
        self.manager.items()
    }

    pub fn manager(&self) -> &ItemContainerManager<F, H> {
        &self.manager
    }

    pub fn size_cache(&self) -> &SizeCache {
        &self.size_cache
    }

    pub fn stats(&self) -> LazyLayoutStats {
        self.manager.stats()
    }

    pub fn container_for_index(&self, index: usize) -> Option<ContainerId> {
        self.manager.container_for_index(index)
    }

    pub fn add_listener(&mut self, callback: Rc<dyn Fn(&LayoutEvent)>) -> ListenerId {
        self.listeners.add(callback)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────────────

    /// Replaces the configuration.
    ///
    /// Changing the item size or the different-sizes flag forgets every
    /// measured size. Changing the orientation scrolls back to the origin.
    pub fn set_config(&mut self, config: WrapLayoutConfig) {
        if config == self.config {
            return;
        }
        let previous = std::mem::replace(&mut self.config, config);
        if previous.item_size != self.config.item_size
            || previous.allow_different_sized_items != self.config.allow_different_sized_items
        {
            self.size_of_first_item = None;
            self.size_cache.clear();
            self.known_extent.reset();
        }
        if previous.orientation != self.config.orientation {
            self.state.offset = Point::ZERO;
            self.known_extent.reset();
            self.listeners.notify(&LayoutEvent::ScrollInfoInvalidated);
        }
        self.invalidate_measure();
    }

    /// Edits a copy of the configuration and applies it with [`set_config`](Self::set_config).
    pub fn update_config(&mut self, update: impl FnOnce(&mut WrapLayoutConfig)) {
        let mut config = self.config.clone();
        update(&mut config);
        self.set_config(config);
    }

    /// Installs a size oracle; its answers win over measuring and the cache.
    pub fn set_size_oracle<O>(&mut self, oracle: O)
    where
        O: ItemSizeOracle<F::Item> + 'static,
    {
        self.oracle = Some(Box::new(oracle));
        self.known_extent.reset();
        self.invalidate_measure();
    }

    pub fn clear_size_oracle(&mut self) {
        if self.oracle.take().is_some() {
            self.known_extent.reset();
            self.invalidate_measure();
        }
    }

    pub fn set_virtualization_mode(&mut self, mode: VirtualizationMode) {
        self.manager.set_mode(mode);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Collection changes
    // ─────────────────────────────────────────────────────────────────────

    pub fn push(&mut self, item: F::Item) -> ItemsChanged {
        let change = self.manager.push(item);
        self.apply_items_changed(&change);
        change
    }

    pub fn insert<I>(&mut self, index: usize, items: I) -> LayoutResult<ItemsChanged>
    where
        I: IntoIterator<Item = F::Item>,
    {
        let change = self.manager.insert(index, items)?;
        self.apply_items_changed(&change);
        Ok(change)
    }

    pub fn insert_keyed<I>(&mut self, index: usize, items: I) -> LayoutResult<ItemsChanged>
    where
        I: IntoIterator<Item = (ItemKey, F::Item)>,
    {
        let change = self.manager.insert_keyed(index, items)?;
        self.apply_items_changed(&change);
        Ok(change)
    }

    pub fn remove(&mut self, range: std::ops::Range<usize>) -> LayoutResult<ItemsChanged> {
        let change = self.manager.remove(range)?;
        self.apply_items_changed(&change);
        Ok(change)
    }

    pub fn replace(&mut self, index: usize, item: F::Item) -> LayoutResult<ItemsChanged> {
        let change = self.manager.replace(index, item)?;
        self.apply_items_changed(&change);
        Ok(change)
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> LayoutResult<ItemsChanged> {
        let change = self.manager.move_item(from, to)?;
        self.apply_items_changed(&change);
        Ok(change)
    }

    pub fn reset<I>(&mut self, items: I) -> ItemsChanged
    where
        I: IntoIterator<Item = F::Item>,
    {
        let change = self.manager.reset(items);
        self.apply_items_changed(&change);
        change
    }

    fn apply_items_changed(&mut self, change: &ItemsChanged) {
        match change.action {
            ItemsChangedAction::Remove | ItemsChangedAction::Replace => {
                for key in &change.removed {
                    self.size_cache.remove(*key);
                }
            }
            ItemsChangedAction::Reset => {
                self.size_cache.clear();
                self.size_of_first_item = None;
                // Offsets computed from estimated sizes mean nothing for a
                // new collection.
                if self.config.allow_different_sized_items
                    && self.oracle.is_none()
                    && self.state.offset != Point::ZERO
                {
                    self.state.offset = Point::ZERO;
                    self.listeners.notify(&LayoutEvent::ScrollInfoInvalidated);
                }
            }
            ItemsChangedAction::Add | ItemsChangedAction::Move => {}
        }
        log::debug!(
            "items changed: {:?} at {} (+{}), {} containers virtualized",
            change.action,
            change.index,
            change.count,
            change.affected_containers.len()
        );
        self.known_extent.reset();
        self.window = None;
        self.invalidate_measure();
    }

    pub(super) fn invalidate_measure(&mut self) {
        self.measure_dirty = true;
        self.listeners.notify(&LayoutEvent::MeasureInvalidated);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Measure
    // ─────────────────────────────────────────────────────────────────────

    /// Runs a measure pass against `available` and returns the desired size.
    ///
    /// If the refreshed extent forces the offset down, the pass runs once
    /// more with the corrected offset.
    pub fn measure(&mut self, available: Size) -> LayoutResult<Size> {
        let before = self.state;
        let mut desired = self.measure_pass(available)?;
        if self.clamp_offset() {
            log::debug!("offset clamped to {:?}, measuring again", self.state.offset);
            desired = self.measure_pass(available)?;
            if self.clamp_offset() {
                self.measure_dirty = true;
            }
        }
        if self.state != before {
            self.listeners.notify(&LayoutEvent::ScrollInfoInvalidated);
        }
        Ok(desired)
    }

    fn clamp_offset(&mut self) -> bool {
        let clamped = self.state.clamp(self.state.offset);
        if clamped == self.state.offset {
            return false;
        }
        self.state.offset = clamped;
        true
    }

    fn measure_pass(&mut self, available: Size) -> LayoutResult<Size> {
        let orientation = self.config.orientation;
        let count = self.manager.items().len();
        let average = self.resolver().average_size();
        let handler = ViewportHandler::new(available, average);
        let viewport = handler.effective_size();
        self.state.viewport = viewport;

        if count == 0 {
            let stale: Vec<ContainerId> = self.manager.realized_containers().map(|(_, id)| id).collect();
            for id in stale {
                self.manager.virtualize(id);
            }
            self.window = None;
            self.known_extent.reset();
            self.state.extent = Size::ZERO;
            self.measure_dirty = false;
            return Ok(Size::ZERO);
        }

        // Row math below needs the shared size before the start is located.
        self.prime_uniform_size()?;

        let view = orientation.orient_size(viewport);
        let offset = orientation.orient_point(self.state.offset);
        let row_width = view.width;
        let uniform = self
            .resolver()
            .uniform_size()
            .map(|size| UniformRows::new(count, orientation.orient_size(size), row_width));

        // Find the first realized item and the cursor right before it.
        let start_offset = (offset.y - self.config.cache_before_pixels(view.height)).max(0.0);
        let row_begin = match &uniform {
            Some(rows) => rows.find_row_start(start_offset),
            None => find_row_start(count, start_offset, row_width, |i| self.assumed_oriented(i)),
        };
        let before_items = self.config.cache_before_items();
        let (start, mut cursor) = if before_items > 0 && row_begin.row_start > 0 {
            let start = row_begin.row_start.saturating_sub(before_items);
            let cursor = match &uniform {
                Some(rows) => rows.cursor_before(start),
                None => cursor_before(start, row_width, |i| self.assumed_oriented(i)),
            };
            (start, cursor)
        } else {
            (row_begin.row_start, row_begin)
        };

        // Realize forward until the cache margin after the viewport is passed.
        let threshold = offset.y + view.height + self.config.cache_after_pixels(view.height);
        let mut remaining_extra = (self.config.cache_unit == CacheLengthUnit::Item)
            .then(|| self.config.cache_after_items());
        let stops = |origin: OrientedPoint, remaining: Option<usize>| {
            origin.y >= threshold && remaining.map_or(true, |extra| extra == 0)
        };

        let mut end = start;
        let mut row_start = start;
        let mut row_y = cursor.y;
        for index in start..count {
            if index > start {
                if let Some(size) = self.predicted_size(index) {
                    let mut probe = cursor;
                    let origin = probe.place(index, orientation.orient_size(size), row_width);
                    if stops(origin, remaining_extra) {
                        break;
                    }
                }
            }

            let realized = self.manager.realize(index)?;
            let size = orientation.orient_size(self.measure_container(index, realized.id));
            let mut next = cursor;
            let origin = next.place(index, size, row_width);
            if index > start && stops(origin, remaining_extra) {
                break;
            }
            if origin.y >= threshold {
                if let Some(extra) = remaining_extra.as_mut() {
                    *extra = extra.saturating_sub(1);
                }
            }
            if index == start {
                row_start = next.row_start;
                row_y = origin.y;
            }
            cursor = next;
            end = index;
        }

        self.virtualize_outside(start..=end);

        // Refresh the extent.
        let covered = OrientedSize::new(cursor.max_width, cursor.bottom());
        if uniform.is_none() {
            self.known_extent.record(end + 1, covered);
        }
        let mut extent = self.compute_extent(count, row_width);
        extent.height = extent.height.max(covered.height);
        self.state.extent = orientation.screen_size(extent);

        self.window = Some(RealizedWindow {
            range: start..=end,
            row_start,
            row_y,
        });
        self.measure_dirty = false;

        log::debug!(
            "measure: realized {}..={} of {} at offset {}, extent {}x{}",
            start,
            end,
            count,
            offset.y,
            self.state.extent.width,
            self.state.extent.height
        );
        if handler.is_infinite() {
            log::debug!("measure: viewport fallback {}x{} in use", viewport.width, viewport.height);
        }

        Ok(viewport.min(self.state.extent))
    }

    /// Measures item 0 when items share one size that is not known yet.
    fn prime_uniform_size(&mut self) -> LayoutResult<()> {
        let resolver = self.resolver();
        if self.config.allow_different_sized_items
            || resolver.has_oracle()
            || resolver.uniform_size().is_some()
        {
            return Ok(());
        }
        let realized = self.manager.realize(0)?;
        self.measure_container(0, realized.id);
        Ok(())
    }

    /// Size known without realizing item `index`, if any.
    fn predicted_size(&self, index: usize) -> Option<Size> {
        let resolver = self.resolver();
        let items = self.manager.items();
        let item = items.get(index)?;
        resolver
            .upfront_size(item)
            .or_else(|| resolver.uniform_size())
            .or_else(|| items.key_at(index).and_then(|key| self.size_cache.get(key)))
    }

    /// Measures the container for `index` if needed and returns its layout size.
    fn measure_container(&mut self, index: usize, id: ContainerId) -> Size {
        let available = self
            .manager
            .items()
            .get(index)
            .and_then(|item| self.resolver().upfront_size(item))
            .unwrap_or(Size::INFINITE);
        if let Some(container) = self.manager.container_mut(id) {
            if !container.is_measure_valid() {
                container.measure(available);
                if !container.is_measure_valid() {
                    log::warn!("container {id} for index {index} is still invalid after measure");
                    debug_assert!(false, "container reports an invalid measure after measuring");
                }
            }
        }

        let (key, size) = {
            let resolver = self.resolver();
            let items = self.manager.items();
            match (items.key_at(index), items.get(index)) {
                (Some(key), Some(item)) => {
                    let size = match self.manager.container(id) {
                        Some(container) => resolver.container_size(item, container),
                        None => resolver.assumed_size(key, item),
                    };
                    (Some(key), size)
                }
                _ => (None, Size::ZERO),
            }
        };

        if let Some(key) = key {
            if self.config.allow_different_sized_items {
                self.size_cache.insert(key, size);
            } else if self.size_of_first_item.is_none() && self.config.item_size.is_none() {
                log::debug!("first item measured at {}x{}", size.width, size.height);
                self.size_of_first_item = Some(size);
            }
        }
        size
    }

    /// Virtualizes every realized container whose item lies outside `range`.
    fn virtualize_outside(&mut self, range: RangeInclusive<usize>) {
        let items = self.manager.items();
        let keep: HashSet<ItemKey> = range.filter_map(|index| items.key_at(index)).collect();
        let mut stale: Vec<ContainerId> = self
            .manager
            .realized_containers()
            .filter(|(key, _)| !keep.contains(key))
            .map(|(_, id)| id)
            .collect();
        stale.sort();
        for id in stale {
            self.manager.virtualize(id);
        }
    }

    fn compute_extent(&self, count: usize, row_width: f32) -> OrientedSize {
        let orientation = self.config.orientation;
        let resolver = self.resolver();
        if let Some(size) = resolver.uniform_size() {
            return UniformRows::new(count, orientation.orient_size(size), row_width).extent();
        }
        if resolver.has_oracle() || self.size_cache.len() >= count {
            return walk_extent(count, row_width, |i| self.assumed_oriented(i));
        }
        self.known_extent
            .estimate(count, orientation.orient_size(resolver.average_size()), row_width)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Arrange
    // ─────────────────────────────────────────────────────────────────────

    /// Places every realized container within `final_size`.
    ///
    /// Fails with [`LayoutError::InvariantViolation`] when two indices in the
    /// realized range resolve to the same container.
    pub fn arrange(&mut self, final_size: Size) -> LayoutResult<Size> {
        let Some(window) = self.window.clone() else {
            return Ok(final_size);
        };
        let orientation = self.config.orientation;
        let mut row_width = orientation.orient_size(final_size).width;
        if !row_width.is_finite() {
            row_width = orientation.orient_size(self.state.viewport).width;
        }

        let placed = {
            let resolver = self.resolver();
            let items = self.manager.items();
            let uniform_width = resolver
                .uniform_size()
                .map(|size| orientation.orient_size(size).width);
            let mut arranger = RowArranger::new(
                row_width,
                window.row_y,
                self.config.spacing_mode,
                self.config.stretch_items,
                uniform_width,
            );

            for index in window.row_start..*window.range.start() {
                arranger.push(RowEntry {
                    id: None,
                    size: self.assumed_oriented(index),
                    max_width: f32::INFINITY,
                });
            }

            let mut seen: HashSet<ContainerId> = HashSet::default();
            for index in window.range.clone() {
                let (Some(key), Some(item)) = (items.key_at(index), items.get(index)) else {
                    return Err(LayoutError::InvalidArgument {
                        index,
                        count: items.len(),
                    });
                };
                let Some(id) = self.manager.container_for_key(key) else {
                    log::warn!("arrange: {key} at index {index} has no container");
                    continue;
                };
                if !seen.insert(id) {
                    log::warn!("arrange: {key} at index {index} resolves to {id} twice");
                    return Err(LayoutError::InvariantViolation { key, index });
                }
                let Some(container) = self.manager.container(id) else {
                    continue;
                };
                arranger.push(RowEntry {
                    id: Some(id),
                    size: orientation.orient_size(resolver.container_size(item, container)),
                    max_width: orientation.orient_size(container.max_size()).width,
                });
            }
            arranger.finish()
        };

        let offset = orientation.orient_point(self.state.offset);
        for item in &placed {
            let origin = OrientedPoint::new(item.origin.x - offset.x, item.origin.y - offset.y);
            let rect = orientation.screen_rect(origin, item.size);
            if let Some(container) = self.manager.container_mut(item.id) {
                container.arrange(rect);
            }
        }
        log::trace!("arrange: placed {} containers", placed.len());

        Ok(final_size)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────

    pub(super) fn resolver(&self) -> SizeResolver<'_, F::Item> {
        SizeResolver::new(
            &self.config,
            self.oracle.as_deref(),
            &self.size_cache,
            self.size_of_first_item,
        )
    }

    /// Assumed size of item `index` in row-relative terms.
    pub(super) fn assumed_oriented(&self, index: usize) -> OrientedSize {
        let items = self.manager.items();
        match (items.key_at(index), items.get(index)) {
            (Some(key), Some(item)) => self
                .config
                .orientation
                .orient_size(self.resolver().assumed_size(key, item)),
            _ => OrientedSize::ZERO,
        }
    }

    /// Cursor right before `index` and the item's own size, by arithmetic
    /// for uniform items or by replaying the row walk.
    pub(super) fn locate(&self, index: usize, row_width: f32) -> (RowCursor, OrientedSize) {
        let orientation = self.config.orientation;
        let count = self.manager.items().len();
        match self.resolver().uniform_size() {
            Some(size) => {
                let size = orientation.orient_size(size);
                let rows = UniformRows::new(count, size, row_width);
                (rows.cursor_before(index), size)
            }
            None => (
                cursor_before(index, row_width, |i| self.assumed_oriented(i)),
                self.assumed_oriented(index),
            ),
        }
    }
}
