//! Row-level smooth scroll with exponential ease-out.
//!
//! Key presses move the scroll *target*; each tick the rendered offset
//! closes a fixed fraction of the remaining distance, so the page glides
//! and decelerates instead of jumping.  Every intermediate offset is a real
//! scroll position and goes through the coordinator like any other.

/// Pixel-offset smooth scroll animator.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    /// Currently rendered offset.
    position: f64,
    /// Where the page is heading.
    target: f64,
    /// Largest valid offset; both position and target stay in `0..=max`.
    max: f64,
    /// Damping: the remaining distance shrinks by `speed` each tick.
    /// Higher speed = faster settle.  Good range: 0.25–0.45 at 60 fps.
    speed: f64,
}

impl SmoothScroll {
    pub fn new(speed: f64) -> Self {
        Self {
            position: 0.0,
            target: 0.0,
            max: 0.0,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    /// Update the scrollable range, pulling position and target inside it.
    pub fn set_max_scroll(&mut self, max: f64) {
        self.max = max.max(0.0);
        self.target = self.target.clamp(0.0, self.max);
        self.position = self.position.clamp(0.0, self.max);
    }

    pub fn scroll_to(&mut self, target: f64) {
        self.target = target.clamp(0.0, self.max);
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.target + delta);
    }

    /// Advance one frame.  Returns `true` if the rendered offset moved.
    pub fn tick(&mut self) -> bool {
        let before = self.position;
        let remaining = self.target - self.position;
        if remaining.abs() < 0.5 {
            self.position = self.target;
        } else {
            self.position += remaining * self.speed;
        }
        self.position != before
    }

    /// Current rendered offset, snapped to whole rows.
    pub fn position(&self) -> f64 {
        self.position.round()
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.position != self.target
    }
}
