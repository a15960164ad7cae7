//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).
//! The terminal is the scroll surface: every frame tick advances the smooth
//! scroll animation and drives the coordinator with the resulting offset.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::core::coordinator::{from_fn, FrameRequest, ScrollCoordinator, SubscriberOptions};
use crate::core::observer::{EngineObserver, TracingObserver};
use crate::core::sticky::StickyManager;
use crate::ui::smooth_scroll::SmoothScroll;

use super::page::{HeaderLandmark, PageNode, SharedLayout, REVIEWS_HEADING_ID, SIDEBAR_ID};

pub const PROGRESS_ID: &str = "reading-progress";
const PROGRESS_PRIORITY: i32 = 1;
const PROGRESS_THROTTLE: Duration = Duration::from_millis(50);

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    pub coordinator: ScrollCoordinator,
    pub sticky: Rc<RefCell<StickyManager<PageNode>>>,
    pub layout: SharedLayout,
    pub scroll: SmoothScroll,
    /// Offset last delivered to the throttled reading-progress subscriber.
    pub progress_y: Rc<Cell<f64>>,
    /// Gap below the header requested for the order summary.
    natural_offset: f64,
    /// Header height requested on the command line.
    full_header: u16,
    /// Rows available to the page (terminal minus the status bar).
    pub viewport_height: u16,
    /// Offset last reported to the coordinator.
    notified_y: f64,
    pub sidebar_enabled: bool,
    pub show_diagnostics: bool,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Frame counter, drives the scroll indicator.
    pub tick: u64,
}

impl AppState {
    pub fn new(config: AppConfig, layout: SharedLayout, natural_offset: f64, viewport_height: u16) -> Self {
        let observer: Rc<dyn EngineObserver> = Rc::new(TracingObserver);
        let mut coordinator =
            ScrollCoordinator::with_observer(config.coordinator_config(), Rc::clone(&observer));

        let sticky = Rc::new(RefCell::new(StickyManager::with_observer(
            HeaderLandmark(Rc::clone(&layout)),
            config.sticky_config(),
            observer,
        )));
        StickyManager::attach(&sticky, &mut coordinator);

        let progress_y = Rc::new(Cell::new(0.0));
        let sink = Rc::clone(&progress_y);
        coordinator.register_system(
            PROGRESS_ID,
            from_fn(move |y| {
                sink.set(y);
                Ok(())
            }),
            SubscriberOptions::default()
                .priority(PROGRESS_PRIORITY)
                .throttle(PROGRESS_THROTTLE),
        );

        let full_header = layout.borrow().header_height;
        let scroll = SmoothScroll::new(config.smooth_scroll_speed);
        let mut state = Self {
            config,
            coordinator,
            sticky,
            layout,
            scroll,
            progress_y,
            natural_offset,
            full_header,
            viewport_height: 0,
            notified_y: 0.0,
            sidebar_enabled: true,
            show_diagnostics: false,
            should_quit: false,
            status_message: None,
            tick: 0,
        };
        state.set_viewport_height(viewport_height);
        state.register_elements();
        state
    }

    /// (Re)register both sticky elements from the current layout.
    ///
    /// Registration captures natural size, so this runs again whenever the
    /// page is reflowed.
    fn register_elements(&mut self) {
        let elements = [
            (SIDEBAR_ID, PageNode::order_summary(&self.layout), self.natural_offset),
            (REVIEWS_HEADING_ID, PageNode::reviews_heading(&self.layout), 0.0),
        ];

        let mut sticky = self.sticky.borrow_mut();
        for (id, node, offset) in elements {
            let Some(bounds) = node.initial_bounds() else {
                tracing::warn!(id, "layout unavailable; element not registered");
                continue;
            };
            sticky.add_element(id, node, bounds, offset);
        }
        sticky.set_element_active(SIDEBAR_ID, self.sidebar_enabled);
    }

    fn set_viewport_height(&mut self, height: u16) {
        self.viewport_height = height;
        let max = self.layout.borrow().max_scroll(height);
        self.scroll.set_max_scroll(max);
    }

    // ── frame loop ─────────────────────────────────────────────

    /// One display frame: advance the animation, report any offset change,
    /// run the scheduled frame, then check for scroll end.
    pub fn on_tick(&mut self, now: Instant) {
        self.tick = self.tick.wrapping_add(1);
        self.scroll.tick();

        let y = self.scroll.position();
        if y != self.notified_y {
            self.notified_y = y;
            if self.coordinator.on_scroll(now) == FrameRequest::Schedule {
                tracing::trace!(y, "frame scheduled");
            }
        }
        if self.coordinator.is_frame_pending() {
            self.coordinator.on_frame(y, now);
        }
        if self.coordinator.poll_scroll_end(now) {
            tracing::debug!(y, "scroll settled");
        }
    }

    // ── page actions ───────────────────────────────────────────

    /// Reflow the page for a new terminal size.
    pub fn resize(&mut self, width: u16, viewport_height: u16) {
        self.layout.borrow_mut().width = width;
        self.set_viewport_height(viewport_height);
        self.register_elements();
    }

    /// Rows moved by one page step: the viewport minus the header chrome.
    pub fn page_step(&self) -> f64 {
        let header = self.layout.borrow().header_height;
        f64::from(self.viewport_height.saturating_sub(header).max(2) - 1)
    }

    pub fn scroll_to_bottom(&mut self) {
        let max = self.layout.borrow().max_scroll(self.viewport_height);
        self.scroll.scroll_to(max);
    }

    pub fn refresh_bounds(&mut self) {
        self.sticky.borrow_mut().refresh_bounds();
        self.status_message = Some("Bounds refreshed".into());
    }

    pub fn reset_sticky(&mut self) {
        self.sticky.borrow_mut().reset_all_elements();
        self.status_message = Some("Sticky state reset; positions return on the next scroll".into());
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_enabled = !self.sidebar_enabled;
        self.sticky
            .borrow_mut()
            .set_element_active(SIDEBAR_ID, self.sidebar_enabled);
        self.status_message = Some(if self.sidebar_enabled {
            "Order summary sticks again".into()
        } else {
            "Order summary scrolls with the page".into()
        });
    }

    /// Cycle the header between full, compact and hidden, then re-detect.
    /// A hidden header cannot be found, so the last known height stays.
    pub fn cycle_header(&mut self) {
        let height = {
            let mut layout = self.layout.borrow_mut();
            layout.header_height = match layout.header_height {
                0 => self.full_header,
                1 => 0,
                _ => 1,
            };
            layout.header_height
        };
        self.sticky.borrow_mut().refresh_bounds();
        self.status_message = Some(match height {
            0 => "Header hidden".into(),
            h => format!("Header height {h}"),
        });
    }

    /// Reading progress through the page as seen by the throttled
    /// subscriber, in `0.0..=1.0`.
    pub fn reading_progress(&self) -> f64 {
        let max = self.layout.borrow().max_scroll(self.viewport_height);
        if max <= 0.0 {
            1.0
        } else {
            (self.progress_y.get() / max).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::page::PageLayout;
    use crate::core::phase::StickyPhase;
    use crate::core::sticky::StickyNode;

    fn state() -> AppState {
        let layout = PageLayout::new(100, 3, 10).shared();
        AppState::new(AppConfig::default(), layout, 1.0, 30)
    }

    /// Tick at 16 ms until the animation and scroll-end signal settle.
    fn run_until_idle(state: &mut AppState, start: Instant) -> Instant {
        let mut now = start;
        for _ in 0..200 {
            now += Duration::from_millis(16);
            state.on_tick(now);
            if !state.scroll.is_animating() && !state.coordinator.is_currently_scrolling() {
                break;
            }
        }
        now
    }

    #[test]
    fn both_elements_register_and_the_page_subscribers_attach() {
        let state = state();
        let sticky = state.sticky.borrow();
        assert_eq!(sticky.len(), 2);
        assert_eq!(sticky.header_height(), 3.0);
        assert_eq!(state.coordinator.subscriber_count(), 2);
        assert!(state.coordinator.is_registered(PROGRESS_ID));
    }

    #[test]
    fn scrolling_into_the_products_pins_the_summary() {
        let mut state = state();
        // Products start at row 11; sticky start is 11 - (3 + 1) = 7.
        state.scroll.scroll_to(20.0);
        run_until_idle(&mut state, Instant::now());

        let sticky = state.sticky.borrow();
        assert_eq!(sticky.scroll_y(), 20.0);
        assert_eq!(sticky.phase(SIDEBAR_ID), Some(StickyPhase::Sticky));
        let top = sticky.node(SIDEBAR_ID).and_then(|n| n.style().top);
        assert_eq!(top, Some(4.0));
        assert!(state.progress_y.get() > 0.0);
    }

    #[test]
    fn disabled_summary_stays_in_flow() {
        let mut state = state();
        state.toggle_sidebar();
        state.scroll.scroll_to(20.0);
        run_until_idle(&mut state, Instant::now());

        let sticky = state.sticky.borrow();
        assert!(!sticky.is_active(SIDEBAR_ID));
        assert_eq!(sticky.phase(SIDEBAR_ID), Some(StickyPhase::Before));
    }

    #[test]
    fn hidden_header_keeps_the_last_height() {
        let mut state = state();
        state.cycle_header();
        assert_eq!(state.sticky.borrow().header_height(), 1.0);
        state.cycle_header();
        assert_eq!(state.layout.borrow().header_height, 0);
        assert_eq!(state.sticky.borrow().header_height(), 1.0);
        state.cycle_header();
        assert_eq!(state.sticky.borrow().header_height(), 3.0);
    }

    #[test]
    fn resize_recaptures_the_summary_width() {
        let mut state = state();
        state.resize(150, 30);
        state.scroll.scroll_to(20.0);
        run_until_idle(&mut state, Instant::now());

        let sticky = state.sticky.borrow();
        let style = sticky.node(SIDEBAR_ID).map(|n| n.style());
        assert_eq!(style.and_then(|s| s.width), Some(50.0));
        assert_eq!(style.and_then(|s| s.left), Some(100.0));
    }
}
