// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page count and page selection bookkeeping.

use tracing::trace;

/// A page change reported to a [`PageListener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEvent {
    /// The total number of pages changed.
    CountChanged(usize),
    /// A page became the current page.
    Selected(usize),
}

/// Receives page count and page selection changes.
///
/// Any `FnMut(PageEvent)` closure is a listener.
pub trait PageListener {
    /// The total page count changed to `page_count`.
    fn on_page_count_changed(&mut self, page_count: usize);

    /// Page `page_index` became the current page.
    fn on_page_selected(&mut self, page_index: usize);
}

impl<F: FnMut(PageEvent)> PageListener for F {
    fn on_page_count_changed(&mut self, page_count: usize) {
        self(PageEvent::CountChanged(page_count));
    }

    fn on_page_selected(&mut self, page_index: usize) {
        self(PageEvent::Selected(page_index));
    }
}

/// Last published page count and committed page index.
///
/// Both start out unknown so the first layout always publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageTracker {
    page_count: Option<usize>,
    page_index: Option<usize>,
    /// Last index committed while no scroll was moving.
    settled_index: Option<usize>,
    /// Commit and publish index changes while a scroll is still moving.
    pub(crate) notify_while_scrolling: bool,
}

impl Default for PageTracker {
    fn default() -> Self {
        Self {
            page_count: None,
            page_index: None,
            settled_index: None,
            notify_while_scrolling: true,
        }
    }
}

impl PageTracker {
    /// Last published page count, or `0` before the first layout.
    pub(crate) fn page_count(&self) -> usize {
        self.page_count.unwrap_or(0)
    }

    /// Last committed page index.
    pub(crate) const fn page_index(&self) -> Option<usize> {
        self.page_index
    }

    /// Last index committed while no scroll was moving.
    pub(crate) const fn settled_index(&self) -> Option<usize> {
        self.settled_index
    }

    /// Records a page count.
    ///
    /// Returns `true` if it differs from the last one and should be published.
    pub(crate) fn set_page_count(&mut self, page_count: usize) -> bool {
        if self.page_count == Some(page_count) {
            return false;
        }
        self.page_count = Some(page_count);
        true
    }

    /// Records a page index.
    ///
    /// A settled index is always committed. While scrolling, the index is
    /// committed only if `notify_while_scrolling` is set; otherwise the settle
    /// at the end of the scroll commits it. Returns `true` if the index was
    /// committed and should be published.
    pub(crate) fn set_page_index(&mut self, page_index: usize, is_scrolling: bool) -> bool {
        if !is_scrolling {
            self.settled_index = Some(page_index);
        }
        if self.page_index == Some(page_index) {
            return false;
        }
        if is_scrolling && !self.notify_while_scrolling {
            trace!(page_index, "page change deferred until scroll settles");
            return false;
        }
        self.page_index = Some(page_index);
        true
    }

    /// Forgets the committed index so the next settle publishes again.
    pub(crate) fn forget_index(&mut self) {
        self.page_index = None;
        self.settled_index = None;
    }
}
