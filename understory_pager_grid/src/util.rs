// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

/// Returns `true` if the two rectangles share a region of positive area.
///
/// Touching edges do not count as overlap.
#[inline]
pub(crate) fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Converts an item or page count into pixel space, saturating at `i32::MAX`.
#[inline]
pub(crate) fn px(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Rounds a non-negative duration up to whole milliseconds.
#[inline]
pub(crate) fn ceil_ms(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    if value >= f64::from(u32::MAX) {
        return u32::MAX;
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Value is checked to lie in (0, u32::MAX) above"
    )]
    let whole = value as u32;
    if f64::from(whole) < value {
        whole + 1
    } else {
        whole
    }
}

/// Rounds to the nearest pixel, halves away from zero.
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "Value is clamped into the i32 range before the cast"
)]
pub(crate) fn round_px(value: f64) -> i32 {
    let clamped = value.clamp(f64::from(i32::MIN), f64::from(i32::MAX));
    let biased = if clamped < 0.0 {
        clamped - 0.5
    } else {
        clamped + 0.5
    };
    biased as i32
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::{ceil_ms, overlaps, px, round_px};

    #[test]
    fn overlap_excludes_shared_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(a, Rect::new(5.0, 5.0, 15.0, 15.0)));
        assert!(!overlaps(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!overlaps(a, Rect::new(0.0, 10.0, 10.0, 20.0)));
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(ceil_ms(0.0), 0);
        assert_eq!(ceil_ms(-3.0), 0);
        assert_eq!(ceil_ms(2.0), 2);
        assert_eq!(ceil_ms(2.01), 3);
        assert_eq!(round_px(2.5), 3);
        assert_eq!(round_px(-2.5), -3);
        assert_eq!(round_px(-2.4), -2);
        assert_eq!(px(7), 7);
        assert_eq!(px(usize::MAX), i32::MAX);
    }
}
