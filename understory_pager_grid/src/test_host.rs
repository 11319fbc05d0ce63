// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`LayoutHost`] that records every call, for unit tests.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::{LayoutHost, Padding, SmoothScroller, Viewport};

#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    pub(crate) item_count: usize,
    pub(crate) viewport: Viewport,
    pub(crate) focused: Option<usize>,
    pub(crate) margins: Padding,
    /// Currently placed views, in attach order.
    pub(crate) attached: Vec<(usize, Rect)>,
    pub(crate) recycled: Vec<usize>,
    pub(crate) prefetched: Vec<usize>,
    pub(crate) offsets: Vec<(i32, i32)>,
    pub(crate) smooth_scrolls: Vec<SmoothScroller>,
}

impl RecordingHost {
    pub(crate) fn new(item_count: usize, viewport: Viewport) -> Self {
        Self {
            item_count,
            viewport,
            ..Self::default()
        }
    }

    pub(crate) fn bounds_of(&self, index: usize) -> Option<Rect> {
        self.attached
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, bounds)| *bounds)
    }
}

impl LayoutHost for RecordingHost {
    fn item_count(&self) -> usize {
        self.item_count
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    fn margins(&self, _index: usize) -> Padding {
        self.margins
    }

    fn prefetch(&mut self, index: usize) {
        self.prefetched.push(index);
    }

    fn attach(&mut self, index: usize, bounds: Rect) {
        self.attached.push((index, bounds));
    }

    fn recycle(&mut self, index: usize) {
        self.recycled.push(index);
    }

    fn detach_all(&mut self) {
        self.attached.clear();
    }

    fn remove_all(&mut self) {
        self.recycled.extend(self.attached.drain(..).map(|(index, _)| index));
    }

    fn offset_children(&mut self, dx: i32, dy: i32) {
        self.offsets.push((dx, dy));
    }

    fn start_smooth_scroll(&mut self, scroller: SmoothScroller) {
        self.smooth_scrolls.push(scroller);
    }
}
