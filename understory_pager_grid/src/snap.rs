// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fling-driven page snapping.

use tracing::debug;

use crate::{LayoutHost, ScrollAxes, ScrollVectorProvider, SmoothScroller};

/// Velocity, in pixels per second, a fling must exceed to change page.
pub const DEFAULT_FLING_THRESHOLD: i32 = 1000;

/// What the snap controller needs to know about a paged layout.
pub trait SnapLayout: ScrollVectorProvider {
    /// Axes the layout scrolls along.
    fn scroll_axes(&self) -> ScrollAxes;

    /// Returns `true` while the layout is installed on a host.
    fn is_attached(&self) -> bool;

    /// First item of the page after the committed one.
    fn next_page_first_index(&self) -> Option<usize>;

    /// First item of the page before the committed one.
    fn prev_page_first_index(&self) -> Option<usize>;

    /// Distance `(dx, dy)` from the current offset to the page holding `index`.
    fn snap_offset(&self, index: usize) -> (i32, i32);

    /// The placed item to align against when settling without a fling.
    fn find_snap_view<H: LayoutHost>(&self, host: &H) -> Option<usize>;
}

/// Turns fling gestures into page-aligned smooth scrolls.
///
/// A fling faster than the threshold moves exactly one page in the fling's
/// direction; anything slower is left to [`settle`](Self::settle), which
/// returns to the nearest page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapController {
    fling_threshold: i32,
}

impl Default for SnapController {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapController {
    /// A controller with the default fling threshold.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fling_threshold: DEFAULT_FLING_THRESHOLD,
        }
    }

    /// Overrides the page-changing fling threshold.
    #[must_use]
    pub const fn with_fling_threshold(mut self, threshold: i32) -> Self {
        self.fling_threshold = threshold;
        self
    }

    /// Current fling threshold.
    #[must_use]
    pub const fn fling_threshold(&self) -> i32 {
        self.fling_threshold
    }

    /// Item to scroll to for a fling of `(vx, vy)`, if the fling is fast
    /// enough along the layout's only scroll axis.
    ///
    /// Layouts that scroll along both axes, or neither, never snap.
    #[must_use]
    pub fn find_target_snap_position<L: SnapLayout>(&self, layout: &L, vx: i32, vy: i32) -> Option<usize> {
        let velocity = match layout.scroll_axes() {
            axes if axes == ScrollAxes::HORIZONTAL => vx,
            axes if axes == ScrollAxes::VERTICAL => vy,
            _ => return None,
        };
        if velocity > self.fling_threshold {
            layout.next_page_first_index()
        } else if velocity < -self.fling_threshold {
            layout.prev_page_first_index()
        } else {
            None
        }
    }

    /// Distance from the current offset to the page holding `index`.
    #[must_use]
    pub fn calculate_distance_to_final_snap<L: SnapLayout>(&self, layout: &L, index: usize) -> (i32, i32) {
        layout.snap_offset(index)
    }

    /// Handles a fling reported by the host.
    ///
    /// Returns `true` if the fling was consumed and a smooth scroll to the
    /// target page was started; `false` leaves the fling to the host.
    pub fn on_fling<L: SnapLayout, H: LayoutHost>(&self, layout: &L, host: &mut H, vx: i32, vy: i32) -> bool {
        if !layout.is_attached() {
            return false;
        }
        let min = host.min_fling_velocity();
        if vx.unsigned_abs() <= min.unsigned_abs() && vy.unsigned_abs() <= min.unsigned_abs() {
            return false;
        }
        let Some(target) = self.find_target_snap_position(layout, vx, vy) else {
            return false;
        };
        debug!(vx, vy, item = target, "fling snaps to page");
        host.start_smooth_scroll(SmoothScroller::new(target));
        true
    }

    /// Returns to the nearest page after a drag that ended without a fling.
    ///
    /// Returns `true` if a smooth scroll was started; `false` when already
    /// aligned or nothing is placed.
    pub fn settle<L: SnapLayout, H: LayoutHost>(&self, layout: &L, host: &mut H) -> bool {
        if !layout.is_attached() {
            return false;
        }
        let Some(view) = layout.find_snap_view(&*host) else {
            return false;
        };
        if self.calculate_distance_to_final_snap(layout, view) == (0, 0) {
            return false;
        }
        host.start_smooth_scroll(SmoothScroller::new(view));
        true
    }
}
