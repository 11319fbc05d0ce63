// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paged grid walkthrough: a scripted host driving `understory_pager_grid`.
//!
//! This example shows how a host view:
//! - forwards attach, layout, scroll, and fling callbacks into a `PagerGridLayout`,
//! - keeps a map of placed item views,
//! - steps smooth scrolls frame by frame,
//! - reacts to page count and page selection changes.
//!
//! It replays a short session on 33 items in a 2×3 grid: page buttons, a
//! fling, an orientation toggle, and adding and removing items.
//!
//! Run:
//! - `cargo run -p understory_pager_grid_demos --example pager_grid_walkthrough`
//! - `RUST_LOG=understory_pager_grid=trace cargo run -p understory_pager_grid_demos --example pager_grid_walkthrough`

use std::collections::BTreeMap;

use kurbo::Rect;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use understory_pager_grid::{
    LayoutHost, LayoutState, Orientation, PageEvent, PagerGridLayout, ScrollState, ScrollStatus,
    SmoothScroller, SnapController, Viewport,
};

/// Frame length used to step animations.
const FRAME_MS: u32 = 16;

/// A host with string items and a fixed 300×200 viewport.
#[derive(Debug)]
struct DemoHost {
    items: Vec<String>,
    viewport: Viewport,
    placed: BTreeMap<usize, Rect>,
    animation: Option<SmoothScroller>,
    next_label: usize,
}

impl DemoHost {
    fn new(count: usize) -> Self {
        Self {
            items: (0..count).map(|i| format!("item {i}")).collect(),
            viewport: Viewport::new(300, 200),
            placed: BTreeMap::new(),
            animation: None,
            next_label: count,
        }
    }

    fn push_item(&mut self) {
        self.items.push(format!("item {}", self.next_label));
        self.next_label += 1;
    }

    fn visible_labels(&self) -> Vec<&str> {
        let view = Rect::new(
            0.0,
            0.0,
            f64::from(self.viewport.width),
            f64::from(self.viewport.height),
        );
        self.placed
            .iter()
            .filter(|(_, bounds)| bounds.intersect(view).area() > 0.0)
            .map(|(index, _)| self.items[*index].as_str())
            .collect()
    }
}

impl LayoutHost for DemoHost {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn attach(&mut self, index: usize, bounds: Rect) {
        self.placed.insert(index, bounds);
    }

    fn recycle(&mut self, index: usize) {
        self.placed.remove(&index);
    }

    fn detach_all(&mut self) {
        self.placed.clear();
    }

    fn remove_all(&mut self) {
        self.placed.clear();
    }

    fn offset_children(&mut self, dx: i32, dy: i32) {
        for bounds in self.placed.values_mut() {
            *bounds = *bounds + kurbo::Vec2::new(f64::from(dx), f64::from(dy));
        }
    }

    fn start_smooth_scroll(&mut self, scroller: SmoothScroller) {
        // A newer animation supersedes the running one.
        self.animation = Some(scroller);
    }
}

/// Steps pending animations until none is left.
fn run_animations(layout: &mut PagerGridLayout, host: &mut DemoHost) {
    let mut frames = 0_u32;
    while let Some(mut scroller) = host.animation.take() {
        loop {
            let status = scroller.step(layout, host, FRAME_MS);
            frames += 1;
            if status == ScrollStatus::Finished || host.animation.is_some() {
                break;
            }
        }
    }
    if frames > 0 {
        println!("  animated over {frames} frames");
    }
}

/// Ends a horizontal drag with velocity `vx`: flings to a page, settles on
/// the nearest one, or simply goes idle when already aligned.
fn release(snap: &SnapController, layout: &mut PagerGridLayout, host: &mut DemoHost, vx: i32) {
    if !snap.on_fling(&*layout, host, vx, 0) && !snap.settle(&*layout, host) {
        layout.on_scroll_state_changed(ScrollState::Idle);
    }
    run_animations(layout, host);
}

fn report(layout: &PagerGridLayout, host: &DemoHost) {
    println!(
        "  page {}/{} offset=({}, {}) visible={:?}",
        layout.current_page() + 1,
        layout.page_count(),
        layout.offset_x(),
        layout.offset_y(),
        host.visible_labels(),
    );
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("understory_pager_grid=debug")),
        )
        .with(fmt::layer().with_target(false))
        .init();

    let mut host = DemoHost::new(33);
    let mut layout = match PagerGridLayout::with_grid(2, 3, Orientation::Horizontal) {
        Ok(layout) => layout,
        Err(err) => {
            eprintln!("invalid grid: {err}");
            return;
        }
    };
    layout.set_page_listener(|event: PageEvent| match event {
        PageEvent::CountChanged(count) => println!("  listener: {count} pages"),
        PageEvent::Selected(page) => println!("  listener: page {} selected", page + 1),
    });
    let snap = SnapController::new();

    println!("== attach");
    layout.on_attached(&mut host);
    report(&layout, &host);

    println!("== next page");
    layout.scroll_next_page(&mut host);
    report(&layout, &host);

    println!("== smooth next page");
    layout.smooth_next_page(&mut host);
    run_animations(&mut layout, &mut host);
    report(&layout, &host);

    println!("== smooth to the last page");
    let last = host.item_count() - 1;
    layout.smooth_scroll_to_position(&mut host, last);
    run_animations(&mut layout, &mut host);
    report(&layout, &host);

    println!("== drag back 120px, then fling left");
    layout.on_scroll_state_changed(ScrollState::Dragging);
    layout.scroll_horizontally_by(&mut host, -120);
    release(&snap, &mut layout, &mut host, -1800);
    report(&layout, &host);

    println!("== slow drag forward settles back");
    layout.on_scroll_state_changed(ScrollState::Dragging);
    layout.scroll_horizontally_by(&mut host, 90);
    release(&snap, &mut layout, &mut host, 300);
    report(&layout, &host);

    println!("== toggle orientation");
    let orientation = layout.orientation().flipped();
    layout.set_orientation(&mut host, orientation);
    report(&layout, &host);

    println!("== add three items");
    for _ in 0..3 {
        host.push_item();
    }
    layout.on_layout_children(&mut host, LayoutState::STRUCTURE_CHANGED);
    report(&layout, &host);

    println!("== remove twenty items");
    host.items.truncate(host.items.len().saturating_sub(20));
    layout.on_layout_children(&mut host, LayoutState::STRUCTURE_CHANGED);
    report(&layout, &host);

    println!("== switch to a 3×3 grid");
    if let Err(err) = layout.refresh_layout(&mut host, 3, 3, Orientation::Horizontal) {
        eprintln!("refresh rejected: {err}");
    }
    report(&layout, &host);

    println!("== back to the first page");
    layout.smooth_scroll_to_page(&mut host, 0);
    run_animations(&mut layout, &mut host);
    report(&layout, &host);
}
