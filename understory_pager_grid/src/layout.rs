// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout and scroll engine for a paged grid.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Rect, Vec2};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::geometry::{CellSize, GridGeometry};
use crate::page::PageTracker;
use crate::util::overlaps;
use crate::{
    ConfigError, GridConfig, LayoutHost, LayoutState, MeasureSpec, Orientation, PageListener,
    ScrollAxes, ScrollState, ScrollVectorProvider, SmoothScroller, SnapLayout, Viewport,
};

/// Pages kept materialized on each side of the current page.
const BUFFER_PAGES: usize = 2;

/// Page distance beyond which a smooth scroll first jumps discretely, so the
/// animation never has to cover more than this many pages.
pub const MAX_SMOOTH_SCROLL_PAGES: usize = 3;

/// An item view placed by the most recent layout or scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachedChild {
    /// Item index.
    pub index: usize,
    /// Bounds in list-view coordinates, after margins and padding.
    pub bounds: Rect,
}

/// Layout and scroll engine for a virtualized, page-granular grid.
///
/// The engine:
/// - keeps the scroll offset along the paging axis within `[0, max_scroll]`,
/// - tracks the page count and the committed page, publishing both to an
///   optional [`PageListener`],
/// - keeps at most four pages of items materialized around the current page
///   and places those that touch the viewport (plus one cell of slack),
/// - offers discrete and animated page navigation.
///
/// The host view forwards its callbacks (`on_attached`, `on_measure`,
/// `on_layout_children`, `scroll_*_by`, `on_scroll_state_changed`, ...) and
/// receives placement requests through [`LayoutHost`].
///
/// Navigation requests that cannot be honored (out-of-range pages, an empty
/// list, a detached engine) are ignored and logged at `debug` level.
pub struct PagerGridLayout {
    config: GridConfig,
    offset_x: i32,
    offset_y: i32,
    max_scroll_x: i32,
    max_scroll_y: i32,
    cell: Option<CellSize>,
    viewport: Viewport,
    item_count: usize,
    scroll_state: ScrollState,
    attached: bool,
    children: SmallVec<[AttachedChild; 24]>,
    pages: PageTracker,
    listener: Option<Box<dyn PageListener>>,
}

impl fmt::Debug for PagerGridLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagerGridLayout")
            .field("config", &self.config)
            .field("offset", &(self.offset_x, self.offset_y))
            .field("max_scroll", &(self.max_scroll_x, self.max_scroll_y))
            .field("cell", &self.cell)
            .field("viewport", &self.viewport)
            .field("item_count", &self.item_count)
            .field("scroll_state", &self.scroll_state)
            .field("attached", &self.attached)
            .field("children", &self.children.len())
            .field("pages", &self.pages)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl PagerGridLayout {
    /// Creates an engine for a validated grid configuration.
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            offset_x: 0,
            offset_y: 0,
            max_scroll_x: 0,
            max_scroll_y: 0,
            cell: None,
            viewport: Viewport::default(),
            item_count: 0,
            scroll_state: ScrollState::Idle,
            attached: false,
            children: SmallVec::new(),
            pages: PageTracker::default(),
            listener: None,
        }
    }

    /// Creates an engine for `rows x columns` cells per page.
    ///
    /// Fails when either dimension is zero.
    pub fn with_grid(
        rows: usize,
        columns: usize,
        orientation: Orientation,
    ) -> Result<Self, ConfigError> {
        GridConfig::new(rows, columns, orientation).map(Self::new)
    }

    /// Returns the grid configuration.
    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Returns the paging orientation.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.config.orientation()
    }

    /// Horizontal scroll offset.
    #[must_use]
    pub const fn offset_x(&self) -> i32 {
        self.offset_x
    }

    /// Vertical scroll offset.
    #[must_use]
    pub const fn offset_y(&self) -> i32 {
        self.offset_y
    }

    /// Largest reachable offsets `(x, y)`.
    #[must_use]
    pub const fn max_scroll(&self) -> (i32, i32) {
        (self.max_scroll_x, self.max_scroll_y)
    }

    /// Cell size derived by the last layout pass, if any.
    #[must_use]
    pub const fn cell_size(&self) -> Option<CellSize> {
        self.cell
    }

    /// Last published page count.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.page_count()
    }

    /// Last committed page, if any.
    #[must_use]
    pub const fn committed_page(&self) -> Option<usize> {
        self.pages.page_index()
    }

    /// Page nearest to the current offset.
    ///
    /// Mid-scroll this may differ from [`committed_page`](Self::committed_page).
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.geometry().page_index_at_offset(self.axis_offset())
    }

    /// Scroll state last reported by the host.
    #[must_use]
    pub const fn scroll_state(&self) -> ScrollState {
        self.scroll_state
    }

    /// Returns `true` between [`on_attached`](Self::on_attached) and
    /// [`on_detached`](Self::on_detached).
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Item views placed by the last layout or scroll, in placement order.
    #[must_use]
    pub fn children(&self) -> &[AttachedChild] {
        &self.children
    }

    /// Returns `true` if the view for `index` is currently placed.
    #[must_use]
    pub fn is_index_attached(&self, index: usize) -> bool {
        self.children.iter().any(|child| child.index == index)
    }

    /// Registers the listener for page count and page selection changes.
    pub fn set_page_listener(&mut self, listener: impl PageListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Removes the page listener.
    pub fn clear_page_listener(&mut self) {
        self.listener = None;
    }

    /// Chooses whether page changes are committed and published while a
    /// scroll is still moving (`true`, the default) or only once it settles.
    pub fn set_notify_while_scrolling(&mut self, notify: bool) {
        self.pages.notify_while_scrolling = notify;
    }

    /// Returns the policy set by [`set_notify_while_scrolling`](Self::set_notify_while_scrolling).
    #[must_use]
    pub const fn notify_while_scrolling(&self) -> bool {
        self.pages.notify_while_scrolling
    }

    /// Returns `true` when paging horizontally.
    #[must_use]
    pub const fn can_scroll_horizontally(&self) -> bool {
        matches!(self.config.orientation(), Orientation::Horizontal)
    }

    /// Returns `true` when paging vertically.
    #[must_use]
    pub const fn can_scroll_vertically(&self) -> bool {
        matches!(self.config.orientation(), Orientation::Vertical)
    }

    /// Geometry for the current configuration, viewport, and cell size.
    #[must_use]
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(
            self.config,
            self.viewport.content_width(),
            self.viewport.content_height(),
            self.cell.unwrap_or_default(),
        )
    }

    // --- host callbacks -------------------------------------------------------

    /// The engine was installed on a host view; runs a full layout pass.
    pub fn on_attached<H: LayoutHost>(&mut self, host: &mut H) {
        self.attached = true;
        self.on_layout_children(host, LayoutState::STRUCTURE_CHANGED);
    }

    /// The engine was removed from its host view; releases every placed view.
    pub fn on_detached<H: LayoutHost>(&mut self, host: &mut H) {
        self.attached = false;
        self.scroll_state = ScrollState::Idle;
        self.children.clear();
        self.pages.forget_index();
        host.remove_all();
    }

    /// Resolves the host's size constraints.
    ///
    /// The grid always fills its box, so constraints with a known positive
    /// size become exact.
    #[must_use]
    pub const fn on_measure(&self, width: MeasureSpec, height: MeasureSpec) -> (MeasureSpec, MeasureSpec) {
        (width.coerce_exact(), height.coerce_exact())
    }

    /// Lays out the grid after a structural change.
    ///
    /// Pre-layout passes and passes without a structural change are ignored.
    pub fn on_layout_children<H: LayoutHost>(&mut self, host: &mut H, state: LayoutState) {
        if state.is_pre_layout || !state.did_structure_change {
            trace!(?state, "layout pass skipped");
            return;
        }
        self.sync_viewport(host.viewport());

        let item_count = host.item_count();
        self.item_count = item_count;
        if item_count == 0 {
            host.remove_all();
            self.children.clear();
            self.offset_x = 0;
            self.offset_y = 0;
            self.max_scroll_x = 0;
            self.max_scroll_y = 0;
            self.publish_page_count(0);
            self.publish_page_index(0, false);
            return;
        }

        let geometry = self.geometry();
        let page_count = geometry.page_count(item_count);
        // Clamp first, then publish. Publishing the page before clamping would
        // announce a page past the end of a list that just shrank, so this
        // order is intentional and must stay.
        (self.max_scroll_x, self.max_scroll_y) = geometry.max_scroll(page_count);
        self.offset_x = self.offset_x.clamp(0, self.max_scroll_x);
        self.offset_y = self.offset_y.clamp(0, self.max_scroll_y);

        self.publish_page_count(page_count);
        self.publish_page_index(self.current_page(), false);

        if self.cell.is_none() {
            let cell = CellSize::for_page(
                &self.config,
                self.viewport.content_width(),
                self.viewport.content_height(),
            );
            debug!(width = cell.width, height = cell.height, "cell size derived");
            self.cell = Some(cell);
        }

        if self.offset_x == 0 && self.offset_y == 0 {
            for index in 0..self.config.page_capacity().min(item_count) {
                host.prefetch(index);
            }
        }

        self.recycle_and_fill(host, true);
    }

    /// The host finished a layout pass; re-publishes page count and commits
    /// the page nearest to the offset.
    pub fn on_layout_completed<H: LayoutHost>(&mut self, host: &H, state: LayoutState) {
        if state.is_pre_layout {
            return;
        }
        let page_count = self.geometry().page_count(host.item_count());
        self.publish_page_count(page_count);
        self.publish_page_index(self.current_page(), false);
    }

    /// Scrolls horizontally by up to `dx` pixels and returns the applied delta.
    ///
    /// The offset stops hard at `0` and at the last page.
    pub fn scroll_horizontally_by<H: LayoutHost>(&mut self, host: &mut H, dx: i32) -> i32 {
        if !self.can_scroll_horizontally() || self.cell.is_none() {
            return 0;
        }
        let applied = clamp_delta(self.offset_x, dx, self.max_scroll_x);
        self.offset_x += applied;
        self.publish_page_index(self.current_page(), true);
        self.offset_children(host, -applied, 0);
        self.recycle_and_fill(host, applied > 0);
        applied
    }

    /// Scrolls vertically by up to `dy` pixels and returns the applied delta.
    ///
    /// The offset stops hard at `0` and at the last page.
    pub fn scroll_vertically_by<H: LayoutHost>(&mut self, host: &mut H, dy: i32) -> i32 {
        if !self.can_scroll_vertically() || self.cell.is_none() {
            return 0;
        }
        let applied = clamp_delta(self.offset_y, dy, self.max_scroll_y);
        self.offset_y += applied;
        self.publish_page_index(self.current_page(), true);
        self.offset_children(host, 0, -applied);
        self.recycle_and_fill(host, applied > 0);
        applied
    }

    /// Scrolls along whichever axis pages; the other component is ignored.
    ///
    /// Returns the applied `(dx, dy)`.
    pub fn scroll_by<H: LayoutHost>(&mut self, host: &mut H, dx: i32, dy: i32) -> (i32, i32) {
        match self.orientation() {
            Orientation::Horizontal => (self.scroll_horizontally_by(host, dx), 0),
            Orientation::Vertical => (0, self.scroll_vertically_by(host, dy)),
        }
    }

    /// Records the host's scroll state; settling to idle commits the page
    /// nearest to the offset.
    pub fn on_scroll_state_changed(&mut self, state: ScrollState) {
        self.scroll_state = state;
        if state == ScrollState::Idle {
            self.publish_page_index(self.current_page(), false);
        }
    }

    // --- navigation -----------------------------------------------------------

    /// Jumps to `page` without animation and commits it.
    ///
    /// Returns the applied `(dx, dy)`; `(0, 0)` when the request is ignored.
    pub fn scroll_to_page<H: LayoutHost>(&mut self, host: &mut H, page: usize) -> (i32, i32) {
        if !self.can_navigate(&*host, page) {
            return (0, 0);
        }
        if self.find_snap_view(&*host).is_none() {
            debug!(page, "scroll_to_page ignored: no item view is placed");
            return (0, 0);
        }
        let (target_x, target_y) = self.geometry().page_origin(page);
        let applied = self.scroll_by(
            host,
            target_x.saturating_sub(self.offset_x),
            target_y.saturating_sub(self.offset_y),
        );
        self.publish_page_index(page, false);
        applied
    }

    /// Jumps to the page after the current one.
    pub fn scroll_next_page<H: LayoutHost>(&mut self, host: &mut H) -> (i32, i32) {
        let page = self.current_page().saturating_add(1);
        self.scroll_to_page(host, page)
    }

    /// Jumps to the page before the current one.
    pub fn scroll_prev_page<H: LayoutHost>(&mut self, host: &mut H) -> (i32, i32) {
        match self.current_page().checked_sub(1) {
            Some(page) => self.scroll_to_page(host, page),
            None => {
                debug!("scroll_prev_page ignored: already on the first page");
                (0, 0)
            }
        }
    }

    /// Jumps to the page holding item `position`.
    pub fn scroll_to_position<H: LayoutHost>(&mut self, host: &mut H, position: usize) -> (i32, i32) {
        let page = self.geometry().page_of(position);
        self.scroll_to_page(host, page)
    }

    /// Animates to `page`.
    ///
    /// Targets more than [`MAX_SMOOTH_SCROLL_PAGES`] away are first reached by
    /// a discrete jump to the page that distance short of the target. Returns
    /// `true` if an animation was handed to the host.
    pub fn smooth_scroll_to_page<H: LayoutHost>(&mut self, host: &mut H, page: usize) -> bool {
        if !self.can_navigate(&*host, page) {
            return false;
        }
        let current = self.current_page();
        if page.abs_diff(current) > MAX_SMOOTH_SCROLL_PAGES {
            let hop = if page > current {
                page - MAX_SMOOTH_SCROLL_PAGES
            } else {
                page + MAX_SMOOTH_SCROLL_PAGES
            };
            trace!(from = current, hop, to = page, "smooth scroll starts with a jump");
            self.scroll_to_page(host, hop);
        }
        if self.find_snap_view(&*host).is_none() {
            debug!(page, "smooth_scroll_to_page ignored: no item view is placed");
            return false;
        }
        let target = self.geometry().first_index_of_page(page);
        host.start_smooth_scroll(SmoothScroller::new(target));
        true
    }

    /// Animates to the page after the current one.
    pub fn smooth_next_page<H: LayoutHost>(&mut self, host: &mut H) -> bool {
        let page = self.current_page().saturating_add(1);
        self.smooth_scroll_to_page(host, page)
    }

    /// Animates to the page before the current one.
    pub fn smooth_prev_page<H: LayoutHost>(&mut self, host: &mut H) -> bool {
        match self.current_page().checked_sub(1) {
            Some(page) => self.smooth_scroll_to_page(host, page),
            None => {
                debug!("smooth_prev_page ignored: already on the first page");
                false
            }
        }
    }

    /// Animates to the page holding item `position`.
    pub fn smooth_scroll_to_position<H: LayoutHost>(&mut self, host: &mut H, position: usize) -> bool {
        let page = self.geometry().page_of(position);
        self.smooth_scroll_to_page(host, page)
    }

    // --- reconfiguration ------------------------------------------------------

    /// Switches the paging axis and returns the orientation now in effect.
    ///
    /// Ignored while a scroll is in flight. Offsets are remapped page for page
    /// with integer division, so any partial-page scroll is dropped.
    pub fn set_orientation<H: LayoutHost>(&mut self, host: &mut H, orientation: Orientation) -> Orientation {
        let current = self.orientation();
        if orientation == current {
            return current;
        }
        if self.scroll_state != ScrollState::Idle {
            debug!(?current, requested = ?orientation, state = ?self.scroll_state, "orientation change ignored mid-scroll");
            return current;
        }
        let width = self.viewport.content_width();
        let height = self.viewport.content_height();
        let (x, y) = (self.offset_x, self.offset_y);
        self.offset_x = remap_extent(y, height, width);
        self.offset_y = remap_extent(x, width, height);
        let (max_x, max_y) = (self.max_scroll_x, self.max_scroll_y);
        self.max_scroll_x = remap_extent(max_y, height, width);
        self.max_scroll_y = remap_extent(max_x, width, height);
        self.config = self.config.with_orientation(orientation);
        debug!(?orientation, offset_x = self.offset_x, offset_y = self.offset_y, "orientation changed");
        self.recycle_and_fill(host, true);
        orientation
    }

    /// Replaces the grid configuration and lays out again.
    ///
    /// Invalid dimensions fail. A valid request made while a scroll is in
    /// flight is ignored and returns `Ok(false)`. Otherwise the grid is laid out
    /// on the page that holds the first item of the previous current page.
    pub fn refresh_layout<H: LayoutHost>(
        &mut self,
        host: &mut H,
        rows: usize,
        columns: usize,
        orientation: Orientation,
    ) -> Result<bool, ConfigError> {
        let config = GridConfig::new(rows, columns, orientation)?;
        if self.scroll_state != ScrollState::Idle {
            debug!(state = ?self.scroll_state, "refresh_layout ignored mid-scroll");
            return Ok(false);
        }
        let leading = self.geometry().first_index_of_page(self.current_page());
        self.config = config;
        self.cell = None;
        let geometry = self.geometry();
        (self.offset_x, self.offset_y) = geometry.page_origin(geometry.page_of(leading));
        debug!(rows, columns, ?orientation, leading, "grid reconfigured");
        self.on_layout_children(host, LayoutState::STRUCTURE_CHANGED);
        Ok(true)
    }

    // --- snapping -------------------------------------------------------------

    /// The placed view to align pages against: the focused item, else the
    /// first item of the current page, else the first placed item.
    #[must_use]
    pub fn find_snap_view<H: LayoutHost>(&self, host: &H) -> Option<usize> {
        if let Some(focused) = host.focused_index().filter(|&i| self.is_index_attached(i)) {
            return Some(focused);
        }
        let anchor = self.geometry().first_index_of_page(self.current_page());
        self.children
            .iter()
            .find(|child| child.index == anchor)
            .or_else(|| self.children.first())
            .map(|child| child.index)
    }

    /// Distance `(dx, dy)` from the current offset to the start of the page
    /// holding `index`.
    #[must_use]
    pub fn snap_offset(&self, index: usize) -> (i32, i32) {
        let geometry = self.geometry();
        let (x, y) = geometry.page_origin(geometry.page_of(index));
        (x.saturating_sub(self.offset_x), y.saturating_sub(self.offset_y))
    }

    /// First item of the page after the last settled one, clamped to the last
    /// page.
    ///
    /// Pages committed mid-scroll are not counted, so a drag that ends in a
    /// fling moves one page from where the drag started.
    #[must_use]
    pub fn next_page_first_index(&self) -> Option<usize> {
        let last = self.page_count().checked_sub(1)?;
        let page = self.pages.settled_index().map_or(0, |page| page + 1).min(last);
        Some(self.geometry().first_index_of_page(page))
    }

    /// First item of the page before the last settled one, clamped to the
    /// first page.
    #[must_use]
    pub fn prev_page_first_index(&self) -> Option<usize> {
        let last = self.page_count().checked_sub(1)?;
        let page = self
            .pages
            .settled_index()
            .map_or(0, |page| page.saturating_sub(1))
            .min(last);
        Some(self.geometry().first_index_of_page(page))
    }

    // --- internals ------------------------------------------------------------

    fn axis_offset(&self) -> i32 {
        match self.orientation() {
            Orientation::Horizontal => self.offset_x,
            Orientation::Vertical => self.offset_y,
        }
    }

    /// Shared guard for page navigation.
    fn can_navigate<H: LayoutHost>(&self, host: &H, page: usize) -> bool {
        if !self.attached {
            debug!(page, "page navigation ignored: engine is not attached");
            return false;
        }
        if host.item_count() == 0 {
            debug!(page, "page navigation ignored: list is empty");
            return false;
        }
        let page_count = self.page_count();
        if page >= page_count {
            debug!(page, page_count, "page navigation ignored: page out of range");
            return false;
        }
        true
    }

    /// Picks up a new viewport size, dropping the cached cell size and keeping
    /// the offset on the same page.
    fn sync_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        let resized = viewport.content_width() != self.viewport.content_width()
            || viewport.content_height() != self.viewport.content_height();
        if resized {
            let page = self.current_page();
            self.viewport = viewport;
            self.cell = None;
            (self.offset_x, self.offset_y) = self.geometry().page_origin(page);
            debug!(width = viewport.width, height = viewport.height, page, "viewport resized");
        } else {
            self.viewport = viewport;
        }
    }

    fn offset_children<H: LayoutHost>(&mut self, host: &mut H, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        host.offset_children(dx, dy);
        let shift = Vec2::new(f64::from(dx), f64::from(dy));
        for child in &mut self.children {
            child.bounds = child.bounds + shift;
        }
    }

    /// Re-places the buffered window of items around the current page.
    ///
    /// Items whose cells touch the viewport (grown by one cell on each side)
    /// are attached; the rest of the window is recycled. `forward` only
    /// controls iteration order, which decides which pooled views get reused
    /// first.
    fn recycle_and_fill<H: LayoutHost>(&mut self, host: &mut H, forward: bool) {
        let Some(cell) = self.cell else {
            return;
        };
        let geometry = self.geometry();
        let (width, height) = (geometry.page_width(), geometry.page_height());
        let (ox, oy) = (self.offset_x, self.offset_y);

        let display_rect = Rect::new(
            f64::from(ox.saturating_sub(cell.width)),
            f64::from(oy.saturating_sub(cell.height)),
            f64::from(width.saturating_add(ox).saturating_add(cell.width)),
            f64::from(height.saturating_add(oy).saturating_add(cell.height)),
        )
        .intersect(Rect::new(
            0.0,
            0.0,
            f64::from(self.max_scroll_x.saturating_add(width)),
            f64::from(self.max_scroll_y.saturating_add(height)),
        ));

        let capacity = self.config.page_capacity();
        let item_count = self.item_count.min(host.item_count());
        let start = geometry
            .first_index_of_page(self.current_page())
            .saturating_sub(capacity.saturating_mul(BUFFER_PAGES));
        let stop = start
            .saturating_add(capacity.saturating_mul(2 * BUFFER_PAGES))
            .min(item_count);
        trace!(start, stop, ?display_rect, "recycle and fill");

        host.detach_all();
        self.children.clear();
        if forward {
            for index in start..stop {
                self.place(host, &geometry, display_rect, index);
            }
        } else {
            for index in (start..stop).rev() {
                self.place(host, &geometry, display_rect, index);
            }
        }
    }

    fn place<H: LayoutHost>(&mut self, host: &mut H, geometry: &GridGeometry, display: Rect, index: usize) {
        let cell = geometry.cell_rect(index);
        if !overlaps(display, cell) {
            host.recycle(index);
            return;
        }
        let margins = host.margins(index);
        let padding = self.viewport.padding;
        let left = f64::from(padding.left) - f64::from(self.offset_x);
        let top = f64::from(padding.top) - f64::from(self.offset_y);
        let bounds = Rect::new(
            cell.x0 + left + f64::from(margins.left),
            cell.y0 + top + f64::from(margins.top),
            cell.x1 + left - f64::from(margins.right),
            cell.y1 + top - f64::from(margins.bottom),
        );
        host.attach(index, bounds);
        self.children.push(AttachedChild { index, bounds });
    }

    fn publish_page_count(&mut self, page_count: usize) {
        if self.pages.set_page_count(page_count) {
            debug!(page_count, "page count changed");
            if let Some(listener) = self.listener.as_deref_mut() {
                listener.on_page_count_changed(page_count);
            }
        }
    }

    fn publish_page_index(&mut self, page_index: usize, is_scrolling: bool) {
        if self.pages.set_page_index(page_index, is_scrolling) {
            debug!(page_index, is_scrolling, "page selected");
            if let Some(listener) = self.listener.as_deref_mut() {
                listener.on_page_selected(page_index);
            }
        }
    }
}

impl ScrollVectorProvider for PagerGridLayout {
    fn compute_scroll_vector_for_position(&self, target: usize) -> Vec2 {
        let (dx, dy) = self.snap_offset(target);
        Vec2::new(f64::from(dx), f64::from(dy))
    }
}

impl SnapLayout for PagerGridLayout {
    fn scroll_axes(&self) -> ScrollAxes {
        self.orientation().axes()
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn next_page_first_index(&self) -> Option<usize> {
        Self::next_page_first_index(self)
    }

    fn prev_page_first_index(&self) -> Option<usize> {
        Self::prev_page_first_index(self)
    }

    fn snap_offset(&self, index: usize) -> (i32, i32) {
        Self::snap_offset(self, index)
    }

    fn find_snap_view<H: LayoutHost>(&self, host: &H) -> Option<usize> {
        Self::find_snap_view(self, host)
    }
}

/// Limits `delta` so that `offset + delta` stays within `[0, max]`.
fn clamp_delta(offset: i32, delta: i32, max: i32) -> i32 {
    let target = offset.saturating_add(delta);
    if target > max {
        max - offset
    } else if target < 0 {
        -offset
    } else {
        delta
    }
}

/// Maps an offset measured in pages of `from` pixels onto pages of `to` pixels.
fn remap_extent(value: i32, from: i32, to: i32) -> i32 {
    if from <= 0 {
        return 0;
    }
    (value / from).saturating_mul(to)
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::Rect;

    use super::{PagerGridLayout, clamp_delta, remap_extent};
    use crate::test_host::RecordingHost;
    use crate::{
        ConfigError, LayoutState, MeasureMode, MeasureSpec, Orientation, PageEvent, Padding,
        ScrollState, Viewport,
    };

    type Events = Rc<RefCell<Vec<PageEvent>>>;

    /// 33 items on a 2x3 grid in a 300x200 viewport: six pages of 100x100 cells.
    fn setup(orientation: Orientation) -> (PagerGridLayout, RecordingHost, Events) {
        let mut layout = PagerGridLayout::with_grid(2, 3, orientation).unwrap();
        let events: Events = Rc::default();
        let sink = Rc::clone(&events);
        layout.set_page_listener(move |event: PageEvent| sink.borrow_mut().push(event));
        let mut host = RecordingHost::new(33, Viewport::new(300, 200));
        layout.on_attached(&mut host);
        (layout, host, events)
    }

    #[test]
    fn construction_rejects_empty_grids() {
        assert_eq!(
            PagerGridLayout::with_grid(0, 3, Orientation::Horizontal).unwrap_err(),
            ConfigError::ZeroRows
        );
        assert_eq!(
            PagerGridLayout::with_grid(2, 0, Orientation::Vertical).unwrap_err(),
            ConfigError::ZeroColumns
        );
    }

    #[test]
    fn first_layout_publishes_pages_and_places_the_first_page() {
        let (layout, host, events) = setup(Orientation::Horizontal);
        assert_eq!(layout.page_count(), 6);
        assert_eq!(layout.committed_page(), Some(0));
        assert_eq!(layout.max_scroll(), (1500, 0));
        assert_eq!(
            events.borrow().as_slice(),
            [PageEvent::CountChanged(6), PageEvent::Selected(0)]
        );
        assert_eq!(host.prefetched, [0, 1, 2, 3, 4, 5]);

        // The first page plus the first column of the second page.
        let placed: Vec<usize> = layout.children().iter().map(|c| c.index).collect();
        assert_eq!(placed, [0, 1, 2, 3, 4, 5, 6, 9]);
        assert_eq!(host.bounds_of(4), Some(Rect::new(100.0, 100.0, 200.0, 200.0)));
        assert_eq!(host.bounds_of(6), Some(Rect::new(300.0, 0.0, 400.0, 100.0)));
        // Cells beyond the buffered viewport are recycled.
        assert!(host.recycled.contains(&7));
        assert!(host.recycled.contains(&23));
        assert!(!host.recycled.contains(&24));
    }

    #[test]
    fn padding_and_margins_shift_placed_views() {
        let mut layout = PagerGridLayout::with_grid(1, 2, Orientation::Vertical).unwrap();
        let viewport = Viewport::new(220, 120).with_padding(Padding::uniform(10));
        let mut host = RecordingHost::new(4, viewport);
        host.margins = Padding::uniform(2);
        layout.on_attached(&mut host);
        assert_eq!(host.bounds_of(1), Some(Rect::new(112.0, 12.0, 208.0, 108.0)));
    }

    #[test]
    fn scroll_delta_is_clamped_to_content() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        assert_eq!(layout.scroll_horizontally_by(&mut host, -40), 0);
        assert_eq!(layout.scroll_horizontally_by(&mut host, 1000), 1000);
        assert_eq!(layout.scroll_horizontally_by(&mut host, 1000), 500);
        assert_eq!(layout.offset_x(), 1500);
        assert_eq!(layout.scroll_horizontally_by(&mut host, -2000), -1500);
        assert_eq!(layout.offset_x(), 0);
        // The cross axis never scrolls.
        assert_eq!(layout.scroll_vertically_by(&mut host, 50), 0);
        assert_eq!(layout.offset_y(), 0);
    }

    #[test]
    fn scrolling_shifts_and_refills_views() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        layout.scroll_horizontally_by(&mut host, 150);
        assert_eq!(host.offsets.last(), Some(&(-150, 0)));
        assert_eq!(layout.current_page(), 0);
        // Cell 6 (content x = 300) now starts at 150 on screen.
        assert_eq!(host.bounds_of(6), Some(Rect::new(150.0, 0.0, 250.0, 100.0)));
        assert!(layout.is_index_attached(7));

        layout.scroll_horizontally_by(&mut host, 1);
        assert_eq!(layout.current_page(), 1);
    }

    #[test]
    fn page_changes_publish_while_scrolling_by_default() {
        let (mut layout, mut host, events) = setup(Orientation::Horizontal);
        events.borrow_mut().clear();
        layout.on_scroll_state_changed(ScrollState::Dragging);
        layout.scroll_horizontally_by(&mut host, 200);
        assert_eq!(events.borrow().as_slice(), [PageEvent::Selected(1)]);
        assert_eq!(layout.committed_page(), Some(1));
        layout.on_scroll_state_changed(ScrollState::Idle);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn page_changes_wait_for_idle_when_configured() {
        let (mut layout, mut host, events) = setup(Orientation::Horizontal);
        layout.set_notify_while_scrolling(false);
        events.borrow_mut().clear();
        layout.on_scroll_state_changed(ScrollState::Dragging);
        layout.scroll_horizontally_by(&mut host, 200);
        layout.scroll_horizontally_by(&mut host, 400);
        assert!(events.borrow().is_empty());
        assert_eq!(layout.committed_page(), Some(0));
        layout.on_scroll_state_changed(ScrollState::Idle);
        assert_eq!(events.borrow().as_slice(), [PageEvent::Selected(2)]);
    }

    #[test]
    fn backward_scrolls_place_views_in_descending_order() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        layout.scroll_to_page(&mut host, 2);
        let ascending: Vec<usize> = layout.children().iter().map(|c| c.index).collect();
        assert!(ascending.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(layout.scroll_horizontally_by(&mut host, -150), -150);
        let placed: Vec<usize> = layout.children().iter().map(|c| c.index).collect();
        assert!(placed.len() > 1);
        assert!(placed.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(host.attached.last().map(|&(index, _)| index), placed.last().copied());
    }

    #[test]
    fn scroll_to_page_jumps_and_commits() {
        let (mut layout, mut host, events) = setup(Orientation::Horizontal);
        events.borrow_mut().clear();
        assert_eq!(layout.scroll_to_page(&mut host, 2), (600, 0));
        assert_eq!(layout.offset_x(), 600);
        assert_eq!(layout.committed_page(), Some(2));
        assert_eq!(events.borrow().as_slice(), [PageEvent::Selected(2)]);

        // Already there: nothing moves and nothing is published.
        assert_eq!(layout.scroll_to_page(&mut host, 2), (0, 0));
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn out_of_range_pages_are_ignored() {
        let (mut layout, mut host, events) = setup(Orientation::Horizontal);
        events.borrow_mut().clear();
        assert_eq!(layout.scroll_to_page(&mut host, 6), (0, 0));
        assert_eq!(layout.scroll_prev_page(&mut host), (0, 0));
        assert!(!layout.smooth_scroll_to_page(&mut host, 9));
        assert!(!layout.smooth_prev_page(&mut host));
        assert_eq!(layout.offset_x(), 0);
        assert!(events.borrow().is_empty());
        assert!(host.smooth_scrolls.is_empty());
    }

    #[test]
    fn next_and_prev_pages_walk_the_grid() {
        let (mut layout, mut host, _) = setup(Orientation::Vertical);
        assert_eq!(layout.scroll_next_page(&mut host), (0, 200));
        assert_eq!(layout.scroll_next_page(&mut host), (0, 200));
        assert_eq!(layout.scroll_prev_page(&mut host), (0, -200));
        assert_eq!(layout.committed_page(), Some(1));
        assert_eq!(layout.scroll_to_position(&mut host, 32), (0, 800));
        assert_eq!(layout.committed_page(), Some(5));
        assert_eq!(layout.scroll_next_page(&mut host), (0, 0));
    }

    #[test]
    fn navigation_requires_an_attached_engine() {
        let mut layout = PagerGridLayout::with_grid(2, 3, Orientation::Horizontal).unwrap();
        let mut host = RecordingHost::new(33, Viewport::new(300, 200));
        layout.on_layout_children(&mut host, LayoutState::STRUCTURE_CHANGED);
        assert_eq!(layout.scroll_to_page(&mut host, 1), (0, 0));

        layout.on_attached(&mut host);
        assert_eq!(layout.scroll_to_page(&mut host, 1), (300, 0));
        layout.on_detached(&mut host);
        assert!(layout.children().is_empty());
        assert!(host.attached.is_empty());
        assert!(!layout.smooth_next_page(&mut host));
    }

    #[test]
    fn smooth_scroll_hands_the_first_item_to_the_host() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        assert!(layout.smooth_next_page(&mut host));
        assert_eq!(host.smooth_scrolls.len(), 1);
        assert_eq!(host.smooth_scrolls[0].target_position(), 6);
        assert!(layout.smooth_scroll_to_position(&mut host, 20));
        assert_eq!(host.smooth_scrolls[1].target_position(), 18);
        // No jump was needed for nearby pages.
        assert_eq!(layout.offset_x(), 0);
    }

    #[test]
    fn distant_smooth_scrolls_jump_first() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        assert!(layout.smooth_scroll_to_page(&mut host, 5));
        // Jumped to page 2, three pages short of the target.
        assert_eq!(layout.offset_x(), 600);
        assert_eq!(layout.committed_page(), Some(2));
        assert_eq!(host.smooth_scrolls[0].target_position(), 30);

        layout.scroll_to_page(&mut host, 5);
        assert!(layout.smooth_scroll_to_page(&mut host, 0));
        assert_eq!(layout.offset_x(), 900);
        assert_eq!(host.smooth_scrolls[1].target_position(), 0);
    }

    #[test]
    fn shrinking_the_list_clamps_the_offset() {
        let (mut layout, mut host, events) = setup(Orientation::Horizontal);
        layout.scroll_to_page(&mut host, 5);
        events.borrow_mut().clear();
        host.item_count = 13;
        layout.on_layout_children(&mut host, LayoutState::STRUCTURE_CHANGED);
        assert_eq!(layout.max_scroll(), (600, 0));
        assert_eq!(layout.offset_x(), 600);
        assert_eq!(
            events.borrow().as_slice(),
            [PageEvent::CountChanged(3), PageEvent::Selected(2)]
        );
    }

    #[test]
    fn emptying_the_list_resets_to_page_zero() {
        let (mut layout, mut host, events) = setup(Orientation::Horizontal);
        layout.scroll_to_page(&mut host, 3);
        events.borrow_mut().clear();
        host.item_count = 0;
        layout.on_layout_children(&mut host, LayoutState::STRUCTURE_CHANGED);
        assert_eq!(layout.page_count(), 0);
        assert_eq!(layout.offset_x(), 0);
        assert!(layout.children().is_empty());
        assert!(host.attached.is_empty());
        assert_eq!(
            events.borrow().as_slice(),
            [PageEvent::CountChanged(0), PageEvent::Selected(0)]
        );
        assert_eq!(layout.scroll_to_page(&mut host, 0), (0, 0));
    }

    #[test]
    fn pre_layout_and_unchanged_passes_are_skipped() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        host.item_count = 6;
        layout.on_layout_children(&mut host, LayoutState::PRE_LAYOUT);
        layout.on_layout_children(&mut host, LayoutState::UNCHANGED);
        assert_eq!(layout.page_count(), 6);

        layout.on_layout_completed(&host, LayoutState::UNCHANGED);
        assert_eq!(layout.page_count(), 1);
    }

    #[test]
    fn orientation_round_trip_keeps_the_page() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        layout.scroll_to_page(&mut host, 2);
        assert_eq!(
            layout.set_orientation(&mut host, Orientation::Vertical),
            Orientation::Vertical
        );
        assert_eq!((layout.offset_x(), layout.offset_y()), (0, 400));
        assert_eq!(layout.max_scroll(), (0, 1000));
        assert_eq!(layout.current_page(), 2);
        assert_eq!(host.bounds_of(12), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));

        layout.set_orientation(&mut host, Orientation::Horizontal);
        assert_eq!((layout.offset_x(), layout.offset_y()), (600, 0));
        assert_eq!(layout.committed_page(), Some(2));
    }

    #[test]
    fn orientation_remap_drops_partial_pages() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        layout.scroll_horizontally_by(&mut host, 450);
        layout.set_orientation(&mut host, Orientation::Vertical);
        assert_eq!(layout.offset_y(), 200);
    }

    #[test]
    fn orientation_change_is_rejected_mid_scroll() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        layout.on_scroll_state_changed(ScrollState::Settling);
        assert_eq!(
            layout.set_orientation(&mut host, Orientation::Vertical),
            Orientation::Horizontal
        );
        assert_eq!(
            layout.set_orientation(&mut host, Orientation::Horizontal),
            Orientation::Horizontal
        );
        assert_eq!(
            layout.refresh_layout(&mut host, 3, 3, Orientation::Vertical),
            Ok(false)
        );
        assert_eq!(layout.config().page_capacity(), 6);
    }

    #[test]
    fn refresh_layout_rebuilds_the_grid() {
        let (mut layout, mut host, events) = setup(Orientation::Horizontal);
        layout.scroll_to_page(&mut host, 3);
        events.borrow_mut().clear();
        // Item 18 led page 3; with nine items per page it sits on page 2.
        assert_eq!(
            layout.refresh_layout(&mut host, 3, 3, Orientation::Vertical),
            Ok(true)
        );
        assert_eq!(layout.page_count(), 4);
        assert_eq!((layout.offset_x(), layout.offset_y()), (0, 400));
        assert_eq!(
            events.borrow().as_slice(),
            [PageEvent::CountChanged(4), PageEvent::Selected(2)]
        );
        assert_eq!(
            layout.cell_size().map(|cell| (cell.width, cell.height)),
            Some((100, 66))
        );
        assert_eq!(
            layout.refresh_layout(&mut host, 0, 3, Orientation::Vertical),
            Err(ConfigError::ZeroRows)
        );
    }

    #[test]
    fn viewport_resize_rederives_cells_on_the_same_page() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        layout.scroll_to_page(&mut host, 2);
        host.viewport = Viewport::new(600, 400);
        layout.on_layout_children(&mut host, LayoutState::STRUCTURE_CHANGED);
        assert_eq!(layout.offset_x(), 1200);
        assert_eq!(layout.current_page(), 2);
        assert_eq!(
            layout.cell_size().map(|cell| (cell.width, cell.height)),
            Some((200, 200))
        );
    }

    #[test]
    fn snap_view_prefers_focus_then_page_anchor() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        layout.scroll_to_page(&mut host, 1);
        assert_eq!(layout.find_snap_view(&host), Some(6));
        host.focused = Some(8);
        assert_eq!(layout.find_snap_view(&host), Some(8));
        // Focus on an item that is not placed is ignored.
        host.focused = Some(30);
        assert_eq!(layout.find_snap_view(&host), Some(6));
    }

    #[test]
    fn snap_offsets_point_at_page_starts() {
        let (mut layout, mut host, _) = setup(Orientation::Horizontal);
        layout.scroll_horizontally_by(&mut host, 420);
        assert_eq!(layout.snap_offset(7), (-120, 0));
        assert_eq!(layout.snap_offset(13), (180, 0));
        layout.scroll_to_page(&mut host, 2);
        assert_eq!(layout.next_page_first_index(), Some(18));
        assert_eq!(layout.prev_page_first_index(), Some(6));
        layout.scroll_to_page(&mut host, 5);
        assert_eq!(layout.next_page_first_index(), Some(30));
    }

    #[test]
    fn measure_coerces_known_sizes_to_exact() {
        let layout = PagerGridLayout::with_grid(1, 1, Orientation::Horizontal).unwrap();
        let (width, height) = layout.on_measure(
            MeasureSpec::new(MeasureMode::AtMost, 320),
            MeasureSpec::new(MeasureMode::Unspecified, 0),
        );
        assert_eq!(width, MeasureSpec::exactly(320));
        assert_eq!(height.mode, MeasureMode::Unspecified);
    }

    #[test]
    fn helpers() {
        assert_eq!(clamp_delta(0, -5, 100), 0);
        assert_eq!(clamp_delta(90, 20, 100), 10);
        assert_eq!(clamp_delta(50, -20, 100), -20);
        assert_eq!(remap_extent(450, 300, 200), 200);
        assert_eq!(remap_extent(450, 0, 200), 0);
    }
}
