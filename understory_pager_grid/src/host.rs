// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host capability set: what the engine needs from the view system that owns it.
//!
//! The host owns the viewport, the item views, the reuse pool, and gesture
//! detection. It forwards layout, measure, scroll, and scroll-state callbacks
//! into [`PagerGridLayout`](crate::PagerGridLayout), which in turn calls back
//! through [`LayoutHost`] to place, recycle, and shift item views.
//!
//! Views are identified by item index. A host keeps whatever per-view state it
//! needs keyed by that index.

use kurbo::Rect;

use crate::SmoothScroller;

/// Minimum fling velocity, in pixels per second, used when the host does not
/// report its own.
pub const DEFAULT_MIN_FLING_VELOCITY: i32 = 50;

/// Pixel insets on each side of a box, used for both padding and margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Padding {
    /// Left inset.
    pub left: i32,
    /// Top inset.
    pub top: i32,
    /// Right inset.
    pub right: i32,
    /// Bottom inset.
    pub bottom: i32,
}

impl Padding {
    /// No insets.
    pub const ZERO: Self = Self::uniform(0);

    /// Same inset on every side.
    #[must_use]
    pub const fn uniform(inset: i32) -> Self {
        Self {
            left: inset,
            top: inset,
            right: inset,
            bottom: inset,
        }
    }
}

/// The list view's measured box and its padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Outer width.
    pub width: i32,
    /// Outer height.
    pub height: i32,
    /// Inner padding; pages occupy the box minus this padding.
    pub padding: Padding,
}

impl Viewport {
    /// A viewport without padding.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            padding: Padding::ZERO,
        }
    }

    /// Returns a copy with the given padding.
    #[must_use]
    pub const fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Width available to a page.
    #[must_use]
    pub const fn content_width(&self) -> i32 {
        self.width - self.padding.left - self.padding.right
    }

    /// Height available to a page.
    #[must_use]
    pub const fn content_height(&self) -> i32 {
        self.height - self.padding.top - self.padding.bottom
    }
}

/// How a measure constraint should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureMode {
    /// No constraint.
    Unspecified,
    /// Size must be exactly `size`.
    Exactly,
    /// Size may be at most `size`.
    AtMost,
}

/// A single-axis measure constraint handed down by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasureSpec {
    /// Constraint kind.
    pub mode: MeasureMode,
    /// Constraint size in pixels.
    pub size: i32,
}

impl MeasureSpec {
    /// Builds a constraint.
    #[must_use]
    pub const fn new(mode: MeasureMode, size: i32) -> Self {
        Self { mode, size }
    }

    /// An exact constraint of `size` pixels.
    #[must_use]
    pub const fn exactly(size: i32) -> Self {
        Self::new(MeasureMode::Exactly, size)
    }

    /// Treats any constraint with a known positive size as exact.
    ///
    /// A paged grid always fills its box; "fit content" would otherwise
    /// collapse it, since the content size depends on the box size.
    #[must_use]
    pub const fn coerce_exact(self) -> Self {
        if !matches!(self.mode, MeasureMode::Exactly) && self.size > 0 {
            Self::exactly(self.size)
        } else {
            self
        }
    }
}

/// Scroll state reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScrollState {
    /// Not scrolling.
    #[default]
    Idle,
    /// Following a pointer drag.
    Dragging,
    /// Animating towards a final position (fling or smooth scroll).
    Settling,
}

/// Flags describing a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutState {
    /// The host is running a pre-layout pass for change animations.
    pub is_pre_layout: bool,
    /// Items were added, removed, or the adapter changed since the last pass.
    pub did_structure_change: bool,
}

impl LayoutState {
    /// A real layout pass following a structural change.
    pub const STRUCTURE_CHANGED: Self = Self {
        is_pre_layout: false,
        did_structure_change: true,
    };

    /// A real layout pass with no structural change.
    pub const UNCHANGED: Self = Self {
        is_pre_layout: false,
        did_structure_change: false,
    };

    /// A pre-layout pass.
    pub const PRE_LAYOUT: Self = Self {
        is_pre_layout: true,
        did_structure_change: true,
    };
}

/// Services the hosting list view provides to the engine.
///
/// All calls happen on the host's callback thread while it is dispatching into
/// the engine.
pub trait LayoutHost {
    /// Number of items in the data source.
    fn item_count(&self) -> usize;

    /// Current measured box and padding of the list view.
    fn viewport(&self) -> Viewport;

    /// Index of the item view that holds input focus, if any.
    fn focused_index(&self) -> Option<usize> {
        None
    }

    /// Margins requested by the item view at `index`.
    fn margins(&self, index: usize) -> Padding {
        let _ = index;
        Padding::ZERO
    }

    /// Binds a view for `index` ahead of placement so the first page does not
    /// pop in. Hosts without a warm-up step can ignore this.
    fn prefetch(&mut self, index: usize) {
        let _ = index;
    }

    /// Materializes (or reuses) the view for `index` and places it at `bounds`,
    /// given in list-view coordinates.
    fn attach(&mut self, index: usize, bounds: Rect);

    /// Releases the view for `index` back to the reuse pool.
    fn recycle(&mut self, index: usize);

    /// Temporarily detaches every attached view, keeping them available for a
    /// following [`attach`](Self::attach) of the same index.
    fn detach_all(&mut self);

    /// Removes every view and recycles it.
    fn remove_all(&mut self);

    /// Moves every attached view by `(dx, dy)`.
    fn offset_children(&mut self, dx: i32, dy: i32);

    /// Hands an animated scroll to the host's animation driver, replacing any
    /// animation already running.
    fn start_smooth_scroll(&mut self, scroller: SmoothScroller);

    /// Smallest velocity, in pixels per second, that counts as a fling.
    fn min_fling_velocity(&self) -> i32 {
        DEFAULT_MIN_FLING_VELOCITY
    }
}

#[cfg(test)]
mod tests {
    use super::{MeasureMode, MeasureSpec, Padding, Viewport};

    #[test]
    fn content_box_subtracts_padding() {
        let viewport = Viewport::new(320, 240).with_padding(Padding {
            left: 10,
            top: 4,
            right: 6,
            bottom: 8,
        });
        assert_eq!(viewport.content_width(), 304);
        assert_eq!(viewport.content_height(), 228);
    }

    #[test]
    fn fit_content_constraints_become_exact() {
        let at_most = MeasureSpec::new(MeasureMode::AtMost, 400);
        assert_eq!(at_most.coerce_exact(), MeasureSpec::exactly(400));

        let unspecified = MeasureSpec::new(MeasureMode::Unspecified, 0);
        assert_eq!(unspecified.coerce_exact(), unspecified);

        let exact = MeasureSpec::exactly(120);
        assert_eq!(exact.coerce_exact(), exact);
    }
}
