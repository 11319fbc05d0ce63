// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated scrolling towards a target item.
//!
//! A [`SmoothScroller`] is created by the engine (or the snap controller) and
//! handed to the host through [`LayoutHost::start_smooth_scroll`]. The host
//! owns the clock: it calls [`SmoothScroller::step`] once per frame with the
//! elapsed time until the scroller reports [`ScrollStatus::Finished`].
//! Starting a new scroller supersedes the previous one.
//!
//! While the target item is not yet placed, the scroller *seeks*: it moves
//! along the direction reported by [`ScrollVectorProvider`] at a constant
//! speed. As soon as the target is placed it *lands*: the exact remaining
//! distance to the target's page is covered over a fixed duration with a
//! decelerating curve.

use kurbo::Vec2;
use tracing::trace;

use crate::util::{ceil_ms, round_px};
use crate::{LayoutHost, PagerGridLayout, ScrollState, SnapLayout};

/// Default scroll speed: 0.25 ms per pixel, independent of screen density.
pub const DEFAULT_MILLIS_PER_PIXEL: f64 = 0.25;

/// Default duration of the landing step once the target is placed.
pub const DEFAULT_TARGET_FOUND_DURATION_MS: u32 = 500;

/// Distance covered by one seek step while the target is not placed.
const TARGET_SEEK_SCROLL_DISTANCE_PX: f64 = 10_000.0;

/// Seek steps overshoot both distance and time by this factor so the motion
/// stays continuous between re-evaluations.
const TARGET_SEEK_EXTRA_SCROLL_RATIO: f64 = 1.2;

/// Ratio between linear and decelerated travel time for the same distance.
const DECELERATION_TIME_RATIO: f64 = 0.3356;

/// Direction towards an item that may not be placed yet.
pub trait ScrollVectorProvider {
    /// Remaining scroll delta from the current offset to the start of the
    /// page holding `target`. Only the sign and axis are meaningful for
    /// targets that are not placed.
    fn compute_scroll_vector_for_position(&self, target: usize) -> Vec2;
}

/// Easing curve applied over a [`ScrollAction`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    /// Constant speed.
    #[default]
    Linear,
    /// Fast start, slowing to a stop: `1 - (1 - t)^2`.
    Decelerate,
}

impl Interpolation {
    /// Maps linear progress `t` in `[0, 1]` onto eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Decelerate => {
                let rest = 1.0 - t;
                1.0 - rest * rest
            }
        }
    }
}

/// One leg of an animated scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollAction {
    /// Total horizontal travel.
    pub dx: i32,
    /// Total vertical travel.
    pub dy: i32,
    /// Time to cover the distance.
    pub duration_ms: u32,
    /// Easing curve.
    pub interpolation: Interpolation,
}

impl ScrollAction {
    /// Travel `(dx, dy)` covered after `elapsed_ms`.
    ///
    /// Reaches exactly `(self.dx, self.dy)` once `elapsed_ms >= duration_ms`.
    #[must_use]
    pub fn distance_at(&self, elapsed_ms: u32) -> (i32, i32) {
        if elapsed_ms >= self.duration_ms {
            return (self.dx, self.dy);
        }
        let progress = self
            .interpolation
            .apply(f64::from(elapsed_ms) / f64::from(self.duration_ms));
        (
            round_px(f64::from(self.dx) * progress),
            round_px(f64::from(self.dy) * progress),
        )
    }
}

/// Result of [`SmoothScroller::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollStatus {
    /// More frames are needed.
    Running,
    /// The scroll is over; further steps do nothing.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Leg {
    action: ScrollAction,
    elapsed_ms: u32,
    applied: (i32, i32),
    landing: bool,
}

impl Leg {
    fn new(action: ScrollAction, landing: bool) -> Self {
        Self {
            action,
            elapsed_ms: 0,
            applied: (0, 0),
            landing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    NotStarted,
    /// Started, next leg not chosen yet.
    Choosing,
    Running(Leg),
    Finished,
}

/// Animated scroll to the page holding a target item.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothScroller {
    target: usize,
    millis_per_pixel: f64,
    target_found_duration_ms: u32,
    phase: Phase,
}

impl SmoothScroller {
    /// Creates a scroller towards item `target` with default timing.
    #[must_use]
    pub const fn new(target: usize) -> Self {
        Self {
            target,
            millis_per_pixel: DEFAULT_MILLIS_PER_PIXEL,
            target_found_duration_ms: DEFAULT_TARGET_FOUND_DURATION_MS,
            phase: Phase::NotStarted,
        }
    }

    /// Overrides the scroll speed; non-positive or NaN values keep the default.
    #[must_use]
    pub fn with_millis_per_pixel(mut self, millis_per_pixel: f64) -> Self {
        if millis_per_pixel > 0.0 {
            self.millis_per_pixel = millis_per_pixel;
        }
        self
    }

    /// Overrides the landing duration.
    #[must_use]
    pub const fn with_target_found_duration(mut self, duration_ms: u32) -> Self {
        self.target_found_duration_ms = duration_ms;
        self
    }

    /// Item this scroller is heading for.
    #[must_use]
    pub const fn target_position(&self) -> usize {
        self.target
    }

    /// Milliseconds per pixel.
    #[must_use]
    pub const fn millis_per_pixel(&self) -> f64 {
        self.millis_per_pixel
    }

    /// Returns `true` once [`step`](Self::step) has been called at least once
    /// and the scroll is not over.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Choosing | Phase::Running(_))
    }

    /// Returns `true` once the scroll is over.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// Linear time to travel `dx` pixels, rounded up.
    #[must_use]
    pub fn time_for_scrolling(&self, dx: i32) -> u32 {
        ceil_ms(f64::from(dx.unsigned_abs()) * self.millis_per_pixel)
    }

    /// Time to travel `dx` pixels on a decelerating curve, rounded up.
    #[must_use]
    pub fn time_for_deceleration(&self, dx: i32) -> u32 {
        ceil_ms(f64::from(self.time_for_scrolling(dx)) / DECELERATION_TIME_RATIO)
    }

    /// Final leg once the target is placed: the exact distance to the
    /// target's page over the landing duration.
    #[must_use]
    pub fn on_target_found(&self, layout: &impl SnapLayout) -> ScrollAction {
        let (dx, dy) = layout.snap_offset(self.target);
        ScrollAction {
            dx,
            dy,
            duration_ms: self.target_found_duration_ms,
            interpolation: Interpolation::Decelerate,
        }
    }

    /// Seek leg while the target is not placed, or `None` if there is no
    /// direction to move in.
    #[must_use]
    pub fn seek_action(&self, provider: &impl ScrollVectorProvider) -> Option<ScrollAction> {
        let vector = provider.compute_scroll_vector_for_position(self.target);
        let length = vector.length();
        if length.is_nan() || length <= 0.0 {
            return None;
        }
        let unit = vector / length;
        let reach = TARGET_SEEK_SCROLL_DISTANCE_PX * TARGET_SEEK_EXTRA_SCROLL_RATIO;
        let time = f64::from(self.time_for_scrolling(round_px(TARGET_SEEK_SCROLL_DISTANCE_PX)));
        Some(ScrollAction {
            dx: round_px(unit.x * reach),
            dy: round_px(unit.y * reach),
            duration_ms: ceil_ms(time * TARGET_SEEK_EXTRA_SCROLL_RATIO),
            interpolation: Interpolation::Linear,
        })
    }

    /// Advances the animation by `dt_ms` milliseconds.
    ///
    /// The first step reports [`ScrollState::Settling`] to the engine and the
    /// last reports [`ScrollState::Idle`], which commits the page. A scroller
    /// whose target is out of range, or whose engine is detached, finishes on
    /// its first step.
    pub fn step<H: LayoutHost>(
        &mut self,
        layout: &mut PagerGridLayout,
        host: &mut H,
        dt_ms: u32,
    ) -> ScrollStatus {
        match self.phase {
            Phase::Finished => return ScrollStatus::Finished,
            Phase::NotStarted => {
                if !layout.is_attached() || self.target >= host.item_count() {
                    trace!(item = self.target, "smooth scroll dropped");
                    self.phase = Phase::Finished;
                    return ScrollStatus::Finished;
                }
                layout.on_scroll_state_changed(ScrollState::Settling);
                self.phase = Phase::Choosing;
            }
            Phase::Choosing | Phase::Running(_) => {}
        }

        let found = layout.is_index_attached(self.target);
        let mut leg = match self.phase {
            Phase::Running(leg) if leg.landing || !found => leg,
            _ if found => {
                let action = self.on_target_found(&*layout);
                trace!(item = self.target, ?action, "smooth scroll target found");
                Leg::new(action, true)
            }
            _ => match self.seek_action(&*layout) {
                Some(action) => Leg::new(action, false),
                None => return self.finish(layout),
            },
        };

        leg.elapsed_ms = leg.elapsed_ms.saturating_add(dt_ms).min(leg.action.duration_ms);
        let (total_x, total_y) = leg.action.distance_at(leg.elapsed_ms);
        let (step_x, step_y) = (total_x - leg.applied.0, total_y - leg.applied.1);
        let (moved_x, moved_y) = layout.scroll_by(host, step_x, step_y);
        leg.applied = (total_x, total_y);

        let blocked = !leg.landing && (moved_x, moved_y) != (step_x, step_y);
        if blocked || (leg.landing && leg.elapsed_ms >= leg.action.duration_ms) {
            return self.finish(layout);
        }
        self.phase = if leg.elapsed_ms >= leg.action.duration_ms {
            Phase::Choosing
        } else {
            Phase::Running(leg)
        };
        ScrollStatus::Running
    }

    fn finish(&mut self, layout: &mut PagerGridLayout) -> ScrollStatus {
        self.phase = Phase::Finished;
        layout.on_scroll_state_changed(ScrollState::Idle);
        ScrollStatus::Finished
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Vec2;

    use super::{
        Interpolation, ScrollAction, ScrollStatus, ScrollVectorProvider, SmoothScroller,
    };
    use crate::test_host::RecordingHost;
    use crate::{Orientation, PagerGridLayout, ScrollState, Viewport};

    fn attached(orientation: Orientation, items: usize) -> (PagerGridLayout, RecordingHost) {
        let mut layout = PagerGridLayout::with_grid(2, 3, orientation).unwrap();
        let mut host = RecordingHost::new(items, Viewport::new(300, 200));
        layout.on_attached(&mut host);
        (layout, host)
    }

    fn run(scroller: &mut SmoothScroller, layout: &mut PagerGridLayout, host: &mut RecordingHost) -> usize {
        let mut frames = 0;
        while scroller.step(layout, host, 16) == ScrollStatus::Running {
            frames += 1;
            assert!(frames < 10_000, "smooth scroll never finished");
        }
        frames
    }

    #[test]
    fn timing_follows_the_pixel_speed() {
        let scroller = SmoothScroller::new(0);
        assert_eq!(scroller.time_for_scrolling(300), 75);
        assert_eq!(scroller.time_for_scrolling(-301), 76);
        assert_eq!(scroller.time_for_deceleration(300), 224);
        let slow = SmoothScroller::new(0).with_millis_per_pixel(1.0);
        assert_eq!(slow.time_for_scrolling(300), 300);
        let ignored = SmoothScroller::new(0).with_millis_per_pixel(-1.0);
        assert!((ignored.millis_per_pixel() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn decelerate_front_loads_travel() {
        assert!((Interpolation::Decelerate.apply(0.5) - 0.75).abs() < 1e-9);
        assert!((Interpolation::Linear.apply(0.5) - 0.5).abs() < 1e-9);
        assert!((Interpolation::Decelerate.apply(2.0) - 1.0).abs() < 1e-9);

        let action = ScrollAction {
            dx: 300,
            dy: 0,
            duration_ms: 500,
            interpolation: Interpolation::Decelerate,
        };
        assert_eq!(action.distance_at(250), (225, 0));
        assert_eq!(action.distance_at(900), (300, 0));
    }

    struct Fixed(Vec2);

    impl ScrollVectorProvider for Fixed {
        fn compute_scroll_vector_for_position(&self, _target: usize) -> Vec2 {
            self.0
        }
    }

    #[test]
    fn seek_moves_along_the_normalized_vector() {
        let scroller = SmoothScroller::new(40);
        let action = scroller.seek_action(&Fixed(Vec2::new(0.0, -2400.0))).unwrap();
        assert_eq!((action.dx, action.dy), (0, -12_000));
        assert_eq!(action.duration_ms, 3000);
        assert_eq!(action.interpolation, Interpolation::Linear);
        assert!(scroller.seek_action(&Fixed(Vec2::ZERO)).is_none());
    }

    #[test]
    fn landing_covers_the_exact_distance() {
        let (mut layout, mut host) = attached(Orientation::Horizontal, 33);
        let mut scroller = SmoothScroller::new(6);
        let action = scroller.on_target_found(&layout);
        assert_eq!((action.dx, action.dy, action.duration_ms), (300, 0, 500));

        assert_eq!(scroller.step(&mut layout, &mut host, 16), ScrollStatus::Running);
        assert!(scroller.is_running());
        assert_eq!(layout.scroll_state(), ScrollState::Settling);
        run(&mut scroller, &mut layout, &mut host);
        assert!(scroller.is_finished());
        assert_eq!(layout.offset_x(), 300);
        assert_eq!(layout.committed_page(), Some(1));
        assert_eq!(layout.scroll_state(), ScrollState::Idle);
        assert_eq!(scroller.step(&mut layout, &mut host, 16), ScrollStatus::Finished);
    }

    #[test]
    fn seeking_reaches_targets_that_are_not_placed() {
        let (mut layout, mut host) = attached(Orientation::Vertical, 33);
        let mut scroller = SmoothScroller::new(24);
        assert!(!layout.is_index_attached(24));
        run(&mut scroller, &mut layout, &mut host);
        assert_eq!(layout.offset_y(), 800);
        assert_eq!(layout.committed_page(), Some(4));

        let mut back = SmoothScroller::new(2);
        run(&mut back, &mut layout, &mut host);
        assert_eq!(layout.offset_y(), 0);
        assert_eq!(layout.committed_page(), Some(0));
    }

    #[test]
    fn page_changes_can_wait_for_the_end_of_the_animation() {
        let (mut layout, mut host) = attached(Orientation::Horizontal, 33);
        layout.set_notify_while_scrolling(false);
        let mut scroller = SmoothScroller::new(12);
        let mut committed = Vec::new();
        while scroller.step(&mut layout, &mut host, 16) == ScrollStatus::Running {
            committed.push(layout.committed_page());
        }
        assert!(committed.iter().all(|page| *page == Some(0)));
        assert_eq!(layout.committed_page(), Some(2));
    }

    #[test]
    fn invalid_targets_finish_immediately() {
        let (mut layout, mut host) = attached(Orientation::Horizontal, 33);
        let mut scroller = SmoothScroller::new(33);
        assert_eq!(scroller.step(&mut layout, &mut host, 16), ScrollStatus::Finished);
        assert_eq!(layout.scroll_state(), ScrollState::Idle);

        let mut detached = PagerGridLayout::with_grid(2, 3, Orientation::Horizontal).unwrap();
        let mut scroller = SmoothScroller::new(0);
        assert_eq!(scroller.step(&mut detached, &mut host, 16), ScrollStatus::Finished);
    }
}
