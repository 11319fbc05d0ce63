// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pager_grid --heading-base-level=0

//! Understory Pager Grid: a page-granular grid viewport controller.
//!
//! This crate lays a flat list of items out as a sequence of fixed-size pages,
//! each holding `rows × columns` cells filled row by row, and scrolls those
//! pages along a single axis. It is a headless controller: a host list view
//! owns the actual views, the viewport, and gesture detection, and forwards its
//! callbacks here.
//!
//! The core pieces are:
//!
//! - [`GridConfig`] and [`GridGeometry`]: validated grid dimensions and the pure
//!   index ↔ page ↔ cell ↔ pixel arithmetic built on them.
//! - [`PagerGridLayout`]: the layout and scroll engine. It clamps offsets,
//!   keeps a window of at most four pages materialized around the current
//!   page, places the items that touch the viewport, and publishes page count
//!   and page selection changes to a [`PageListener`].
//! - [`LayoutHost`]: what the engine needs from the host (item count, viewport,
//!   attach/recycle of item views, and a place to run animations).
//! - [`SnapController`]: turns a fast fling into a one-page move and settles
//!   slow drags back onto the nearest page.
//! - [`SmoothScroller`]: an animated scroll towards a target item, stepped by
//!   the host once per frame.
//!
//! ## Minimal example
//!
//! A 2×3 grid of 33 items in a 300×200 viewport, which makes six pages:
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_pager_grid::{
//!     LayoutHost, Orientation, PagerGridLayout, ScrollStatus, SmoothScroller, Viewport,
//! };
//!
//! #[derive(Default)]
//! struct Host {
//!     placed: Vec<(usize, Rect)>,
//!     animation: Option<SmoothScroller>,
//! }
//!
//! impl LayoutHost for Host {
//!     fn item_count(&self) -> usize { 33 }
//!     fn viewport(&self) -> Viewport { Viewport::new(300, 200) }
//!     fn attach(&mut self, index: usize, bounds: Rect) { self.placed.push((index, bounds)); }
//!     fn recycle(&mut self, _index: usize) {}
//!     fn detach_all(&mut self) { self.placed.clear(); }
//!     fn remove_all(&mut self) { self.placed.clear(); }
//!     fn offset_children(&mut self, _dx: i32, _dy: i32) {}
//!     fn start_smooth_scroll(&mut self, scroller: SmoothScroller) {
//!         self.animation = Some(scroller);
//!     }
//! }
//!
//! let mut layout = PagerGridLayout::with_grid(2, 3, Orientation::Horizontal)?;
//! let mut host = Host::default();
//! layout.on_attached(&mut host);
//! assert_eq!(layout.page_count(), 6);
//!
//! // Discrete navigation moves and commits immediately.
//! layout.scroll_to_page(&mut host, 2);
//! assert_eq!(layout.committed_page(), Some(2));
//!
//! // Animated navigation hands a scroller to the host, which steps it per frame.
//! layout.smooth_next_page(&mut host);
//! let mut scroller = host.animation.take().unwrap();
//! while scroller.step(&mut layout, &mut host, 16) == ScrollStatus::Running {}
//! assert_eq!(layout.committed_page(), Some(3));
//! # Ok::<(), understory_pager_grid::ConfigError>(())
//! ```
//!
//! Offsets and sizes are integer pixels; item bounds are reported as
//! [`kurbo::Rect`]s in list-view coordinates.
//!
//! Diagnostics (ignored navigation requests, page changes, recycling windows)
//! are emitted through [`tracing`] at `debug` and `trace` level.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod geometry;
mod host;
mod layout;
mod page;
mod smooth_scroll;
mod snap;
mod util;

#[cfg(test)]
mod test_host;

pub use config::{ConfigError, GridConfig, Orientation, ScrollAxes};
pub use geometry::{CellPosition, CellSize, GridGeometry, page_count, page_index_at_offset};
pub use host::{
    DEFAULT_MIN_FLING_VELOCITY, LayoutHost, LayoutState, MeasureMode, MeasureSpec, Padding,
    ScrollState, Viewport,
};
pub use layout::{AttachedChild, MAX_SMOOTH_SCROLL_PAGES, PagerGridLayout};
pub use page::{PageEvent, PageListener};
pub use smooth_scroll::{
    DEFAULT_MILLIS_PER_PIXEL, DEFAULT_TARGET_FOUND_DURATION_MS, Interpolation, ScrollAction,
    ScrollStatus, ScrollVectorProvider, SmoothScroller,
};
pub use snap::{DEFAULT_FLING_THRESHOLD, SnapController, SnapLayout};
