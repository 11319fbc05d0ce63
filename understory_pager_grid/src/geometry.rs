// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure page and cell arithmetic for a paged grid.
//!
//! A [`GridGeometry`] maps flat item indices onto pages, rows, and columns, and
//! from there onto pixel rectangles in *content space*: the unscrolled plane in
//! which page `p` starts at `p * page_width` (horizontal paging) or
//! `p * page_height` (vertical paging).
//!
//! All values are integer pixels. Divisions truncate, so a page whose extent
//! is not a multiple of its row or column count leaves a few pixels of slack
//! at the trailing edge.

use kurbo::Rect;

use crate::util::px;
use crate::{GridConfig, Orientation};

/// Size of one grid cell in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellSize {
    /// Cell width.
    pub width: i32,
    /// Cell height.
    pub height: i32,
}

impl CellSize {
    /// Splits a page of `page_width x page_height` into `columns x rows` cells.
    #[must_use]
    pub fn for_page(config: &GridConfig, page_width: i32, page_height: i32) -> Self {
        Self {
            width: page_width.max(0) / px(config.columns()),
            height: page_height.max(0) / px(config.rows()),
        }
    }

    /// Returns `true` if either side is zero or negative.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Location of an item inside the paged grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    /// Page containing the item.
    pub page: usize,
    /// Row within the page.
    pub row: usize,
    /// Column within the page.
    pub column: usize,
}

/// Page and cell arithmetic for a fixed grid configuration and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    config: GridConfig,
    page_width: i32,
    page_height: i32,
    cell: CellSize,
}

impl GridGeometry {
    /// Creates a geometry with an explicit cell size.
    #[must_use]
    pub const fn new(config: GridConfig, page_width: i32, page_height: i32, cell: CellSize) -> Self {
        Self {
            config,
            page_width,
            page_height,
            cell,
        }
    }

    /// Creates a geometry whose cells evenly divide the page.
    #[must_use]
    pub fn with_derived_cells(config: GridConfig, page_width: i32, page_height: i32) -> Self {
        let cell = CellSize::for_page(&config, page_width, page_height);
        Self::new(config, page_width, page_height, cell)
    }

    /// Returns the grid configuration.
    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Returns the cell size.
    #[must_use]
    pub const fn cell(&self) -> CellSize {
        self.cell
    }

    /// Width of one page (the viewport minus padding).
    #[must_use]
    pub const fn page_width(&self) -> i32 {
        self.page_width
    }

    /// Height of one page (the viewport minus padding).
    #[must_use]
    pub const fn page_height(&self) -> i32 {
        self.page_height
    }

    /// Extent of one page along the paging axis.
    #[must_use]
    pub const fn page_extent(&self) -> i32 {
        match self.config.orientation() {
            Orientation::Horizontal => self.page_width,
            Orientation::Vertical => self.page_height,
        }
    }

    /// Number of pages needed for `item_count` items; zero when there are none.
    #[must_use]
    pub const fn page_count(&self, item_count: usize) -> usize {
        page_count(item_count, self.config.page_capacity())
    }

    /// Page containing `index`.
    #[must_use]
    pub const fn page_of(&self, index: usize) -> usize {
        index / self.config.page_capacity()
    }

    /// First item index on `page`.
    #[must_use]
    pub const fn first_index_of_page(&self, page: usize) -> usize {
        page.saturating_mul(self.config.page_capacity())
    }

    /// Page, row, and column of `index`.
    #[must_use]
    pub const fn position_of(&self, index: usize) -> CellPosition {
        let capacity = self.config.page_capacity();
        let page = index / capacity;
        let page_pos = index % capacity;
        let row = page_pos / self.config.columns();
        let column = page_pos - row * self.config.columns();
        CellPosition { page, row, column }
    }

    /// Content-space origin (top-left) of `page`.
    #[must_use]
    pub fn page_origin(&self, page: usize) -> (i32, i32) {
        let page = px(page);
        match self.config.orientation() {
            Orientation::Horizontal => (page.saturating_mul(self.page_width), 0),
            Orientation::Vertical => (0, page.saturating_mul(self.page_height)),
        }
    }

    /// Content-space rectangle of the cell holding `index`.
    #[must_use]
    pub fn cell_rect(&self, index: usize) -> Rect {
        let CellPosition { page, row, column } = self.position_of(index);
        let (page_x, page_y) = self.page_origin(page);
        let x = page_x.saturating_add(px(column).saturating_mul(self.cell.width));
        let y = page_y.saturating_add(px(row).saturating_mul(self.cell.height));
        Rect::new(
            f64::from(x),
            f64::from(y),
            f64::from(x.saturating_add(self.cell.width)),
            f64::from(y.saturating_add(self.cell.height)),
        )
    }

    /// Nearest page to a scroll offset along the paging axis.
    ///
    /// A viewport scrolled more than half-way into the next page reports that
    /// page, so partially scrolled positions resolve to the closest boundary.
    #[must_use]
    pub const fn page_index_at_offset(&self, offset: i32) -> usize {
        page_index_at_offset(offset, self.page_extent())
    }

    /// Maximum scroll offsets `(x, y)` for `page_count` pages.
    ///
    /// The axis that does not page is always `0`.
    #[must_use]
    pub fn max_scroll(&self, page_count: usize) -> (i32, i32) {
        let span = px(page_count.saturating_sub(1));
        match self.config.orientation() {
            Orientation::Horizontal => (span.saturating_mul(self.page_width).max(0), 0),
            Orientation::Vertical => (0, span.saturating_mul(self.page_height).max(0)),
        }
    }
}

/// `ceil(item_count / page_capacity)`, or zero for an empty list.
#[must_use]
pub const fn page_count(item_count: usize, page_capacity: usize) -> usize {
    if item_count == 0 || page_capacity == 0 {
        return 0;
    }
    item_count.div_ceil(page_capacity)
}

/// Nearest page to `offset` for pages of `page_extent` pixels.
///
/// Non-positive offsets and degenerate extents map to page `0`.
#[must_use]
#[allow(
    clippy::cast_sign_loss,
    reason = "Both operands are positive, so the quotient is non-negative"
)]
pub const fn page_index_at_offset(offset: i32, page_extent: i32) -> usize {
    if offset <= 0 || page_extent <= 0 {
        return 0;
    }
    let mut index = offset / page_extent;
    if offset % page_extent > page_extent / 2 {
        index += 1;
    }
    index as usize
}
