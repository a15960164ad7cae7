//! Frame-coalesced scroll dispatch.
//!
//! One [`ScrollCoordinator`] exists per scrollable page.  It is the single
//! listener for scroll notifications and fans the offset out to registered
//! subscribers:
//!
//! 1. [`ScrollCoordinator::on_scroll`] marks the page dirty and asks the host
//!    for an animation frame only if none is pending, so any burst of
//!    notifications between two frames costs exactly one dispatch.
//! 2. [`ScrollCoordinator::on_frame`] reads the offset once and calls every
//!    enabled, due subscriber in descending priority order.
//! 3. [`ScrollCoordinator::poll_scroll_end`] fires the debounced scroll-end
//!    signal once no notification arrived for the quiet window.
//!
//! The coordinator never blocks and never touches visual output.  Time is
//! supplied by the host, which keeps every decision reproducible.

use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::anyhow;

use super::observer::{EngineObserver, TracingObserver};

pub const DEFAULT_PRIORITY: i32 = 5;
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(8);
pub const SCROLL_END_QUIET: Duration = Duration::from_millis(150);

// ───────────────────────────────────────── subscribers ───────

/// A system interested in scroll offsets.
pub trait ScrollSubscriber {
    /// Called with the cycle's scroll offset when this subscriber is due.
    ///
    /// An `Err` or a panic is reported and the subscriber is retried next
    /// cycle; the rest of the cycle still runs.
    fn on_update(&mut self, scroll_y: f64) -> anyhow::Result<()>;

    /// Called once scrolling has settled.  Optional.  Failures are reported
    /// the same way as for [`on_update`](Self::on_update).
    fn on_scroll_end(&mut self, _scroll_y: f64) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Shared subscribers, for systems the owner also needs to reach directly
/// (e.g. the sticky manager).  A reentrant borrow counts as a fault.
impl<S: ScrollSubscriber + ?Sized> ScrollSubscriber for Rc<RefCell<S>> {
    fn on_update(&mut self, scroll_y: f64) -> anyhow::Result<()> {
        let mut inner = self
            .try_borrow_mut()
            .map_err(|_| anyhow!("subscriber is already borrowed"))?;
        inner.on_update(scroll_y)
    }

    fn on_scroll_end(&mut self, scroll_y: f64) -> anyhow::Result<()> {
        let mut inner = self
            .try_borrow_mut()
            .map_err(|_| anyhow!("subscriber is already borrowed"))?;
        inner.on_scroll_end(scroll_y)
    }
}

/// Run one subscriber callback, turning a panic into an error.
fn isolated(call: impl FnOnce() -> anyhow::Result<()>) -> anyhow::Result<()> {
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(anyhow!("subscriber panicked: {msg}"))
    })
}

/// Adapter turning a closure into an update-only subscriber.
pub struct FnSubscriber<F>(F);

impl<F> ScrollSubscriber for FnSubscriber<F>
where
    F: FnMut(f64) -> anyhow::Result<()>,
{
    fn on_update(&mut self, scroll_y: f64) -> anyhow::Result<()> {
        (self.0)(scroll_y)
    }
}

/// Wrap a closure as a [`ScrollSubscriber`].
pub fn from_fn<F>(f: F) -> FnSubscriber<F>
where
    F: FnMut(f64) -> anyhow::Result<()>,
{
    FnSubscriber(f)
}

/// Registration options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubscriberOptions {
    /// Higher runs earlier within a frame.
    pub priority: i32,
    /// Minimum interval between two invocations.
    pub throttle: Duration,
    pub enabled: bool,
}

impl Default for SubscriberOptions {
    fn default() -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
            throttle: DEFAULT_THROTTLE,
            enabled: true,
        }
    }
}

impl SubscriberOptions {
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

struct Registration {
    subscriber: Box<dyn ScrollSubscriber>,
    priority: i32,
    throttle: Duration,
    enabled: bool,
    /// Written only by the dispatch loop.
    last_update: Option<Instant>,
    /// Registration order; breaks priority ties.
    seq: u64,
}

impl Registration {
    fn is_due(&self, now: Instant) -> bool {
        self.last_update
            .map_or(true, |last| now.saturating_duration_since(last) >= self.throttle)
    }
}

// ───────────────────────────────────────── config / stats ────

/// Tunables for a coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorConfig {
    /// Quiet window after the last notification before scroll-end fires.
    pub scroll_end_quiet: Duration,
    /// Options used by [`ScrollCoordinator::register_default`].
    pub defaults: SubscriberOptions,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            scroll_end_quiet: SCROLL_END_QUIET,
            defaults: SubscriberOptions::default(),
        }
    }
}

/// Diagnostics snapshot.  Never consulted by dispatch decisions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerformanceStats {
    /// Running average wall time of one dispatch cycle.
    pub average_frame_time: Duration,
    /// Dispatch cycles run so far.
    pub frame_count: u64,
    pub subscriber_count: usize,
}

/// What the host must do after a scroll notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// No frame was pending: schedule one and call `on_frame` from it.
    Schedule,
    /// A frame is already scheduled; it will pick this notification up.
    AlreadyPending,
}

// ───────────────────────────────────────── coordinator ───────

pub struct ScrollCoordinator {
    config: CoordinatorConfig,
    systems: HashMap<String, Registration>,
    next_seq: u64,
    observer: Rc<dyn EngineObserver>,
    /// Offset observed by the last dispatch.
    scroll_y: f64,
    dirty: bool,
    frame_pending: bool,
    scrolling: bool,
    quiet_deadline: Option<Instant>,
    last_frame_at: Option<Instant>,
    total_frame_time: Duration,
    frame_count: u64,
}

impl Default for ScrollCoordinator {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

impl ScrollCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self::with_observer(config, Rc::new(TracingObserver))
    }

    pub fn with_observer(config: CoordinatorConfig, observer: Rc<dyn EngineObserver>) -> Self {
        Self {
            config,
            systems: HashMap::new(),
            next_seq: 0,
            observer,
            scroll_y: 0.0,
            dirty: false,
            frame_pending: false,
            scrolling: false,
            quiet_deadline: None,
            last_frame_at: None,
            total_frame_time: Duration::ZERO,
            frame_count: 0,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    // ── registration ────────────────────────────────────────────

    /// Install or replace the subscriber under `id`.  A replacement starts
    /// with fresh throttling state.
    pub fn register_system(
        &mut self,
        id: impl Into<String>,
        subscriber: impl ScrollSubscriber + 'static,
        options: SubscriberOptions,
    ) {
        let id = id.into();
        let seq = self.next_seq;
        self.next_seq += 1;
        let registration = Registration {
            subscriber: Box::new(subscriber),
            priority: options.priority,
            throttle: options.throttle,
            enabled: options.enabled,
            last_update: None,
            seq,
        };
        if self.systems.insert(id.clone(), registration).is_some() {
            tracing::debug!(subscriber = %id, "replaced scroll subscriber");
        }
    }

    /// Register with the configured default options.
    pub fn register_default(
        &mut self,
        id: impl Into<String>,
        subscriber: impl ScrollSubscriber + 'static,
    ) {
        let defaults = self.config.defaults;
        self.register_system(id, subscriber, defaults);
    }

    /// Remove a subscriber and its throttling state.  Returns `false` if
    /// nothing was registered under `id`.
    pub fn unregister_system(&mut self, id: &str) -> bool {
        self.systems.remove(id).is_some()
    }

    pub fn enable_system(&mut self, id: &str) -> bool {
        self.set_enabled(id, true)
    }

    pub fn disable_system(&mut self, id: &str) -> bool {
        self.set_enabled(id, false)
    }

    fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.systems.get_mut(id) {
            Some(reg) => {
                reg.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.systems.contains_key(id)
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.systems.get(id).is_some_and(|reg| reg.enabled)
    }

    pub fn subscriber_count(&self) -> usize {
        self.systems.len()
    }

    // ── host driving ────────────────────────────────────────────

    /// Record a scroll notification from the rendering surface.
    pub fn on_scroll(&mut self, now: Instant) -> FrameRequest {
        self.dirty = true;
        self.scrolling = true;
        // Debounce: restart, never accumulate.
        self.quiet_deadline = Some(now + self.config.scroll_end_quiet);

        if self.frame_pending {
            FrameRequest::AlreadyPending
        } else {
            self.frame_pending = true;
            FrameRequest::Schedule
        }
    }

    /// The animation frame scheduled after [`FrameRequest::Schedule`] fired.
    /// `scroll_y` is the surface's offset, read once for the whole cycle.
    pub fn on_frame(&mut self, scroll_y: f64, now: Instant) {
        self.frame_pending = false;
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let started = Instant::now();
        let now = self.last_frame_at.map_or(now, |prev| now.max(prev));
        self.last_frame_at = Some(now);
        self.scroll_y = scroll_y;

        for id in self.dispatch_order() {
            let Some(reg) = self.systems.get_mut(&id) else {
                continue;
            };
            if !reg.is_due(now) {
                continue;
            }
            let subscriber = &mut reg.subscriber;
            match isolated(|| subscriber.on_update(scroll_y)) {
                Ok(()) => reg.last_update = Some(now),
                Err(err) => self.observer.subscriber_failed(&id, &err),
            }
        }

        self.total_frame_time += started.elapsed();
        self.frame_count += 1;
    }

    /// Fire the scroll-end signal if the quiet window has elapsed.
    pub fn poll_scroll_end(&mut self, now: Instant) -> bool {
        match self.quiet_deadline {
            Some(deadline) if now >= deadline => {}
            _ => return false,
        }
        self.quiet_deadline = None;
        self.scrolling = false;
        self.observer.scroll_ended(self.scroll_y);

        let scroll_y = self.scroll_y;
        for id in self.dispatch_order() {
            let Some(reg) = self.systems.get_mut(&id) else {
                continue;
            };
            let subscriber = &mut reg.subscriber;
            if let Err(err) = isolated(|| subscriber.on_scroll_end(scroll_y)) {
                self.observer.subscriber_failed(&id, &err);
            }
        }
        true
    }

    /// Ids of enabled subscribers, highest priority first, ties in
    /// registration order.
    fn dispatch_order(&self) -> Vec<String> {
        let mut order: Vec<(&String, &Registration)> =
            self.systems.iter().filter(|(_, reg)| reg.enabled).collect();
        order.sort_by(|(_, a), (_, b)| b.priority.cmp(&a.priority).then(a.seq.cmp(&b.seq)));
        order.into_iter().map(|(id, _)| id.clone()).collect()
    }

    // ── queries ────────────────────────────────────────────────

    /// Offset seen by the most recent dispatch (cached, not re-queried).
    pub fn current_scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// True from the first notification until the quiet window after the
    /// last one has been observed by [`Self::poll_scroll_end`].
    pub fn is_currently_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Earliest instant at which the host should poll again.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.quiet_deadline
    }

    pub fn performance_stats(&self) -> PerformanceStats {
        let average_frame_time = match u32::try_from(self.frame_count) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total_frame_time / n,
            Err(_) => Duration::from_secs_f64(
                self.total_frame_time.as_secs_f64() / self.frame_count as f64,
            ),
        };
        PerformanceStats {
            average_frame_time,
            frame_count: self.frame_count,
            subscriber_count: self.systems.len(),
        }
    }
}
