//! Sticky phase machine and placement math.
//!
//! Everything here is a pure function of its inputs.  The manager feeds in
//! the scroll offset and an element's geometry, gets a [`Placement`] back,
//! asks the [`StabilityGate`] whether to apply it, and only then turns it
//! into a [`NodeStyle`] for the node adapter.
//!
//! With `desired = header_height + natural_offset`,
//! `sticky_start = container_top - desired` and
//! `bottom_limit = reference_bottom - natural_height`:
//!
//! | phase          | scroll offset `y`                          | top              |
//! |----------------|--------------------------------------------|------------------|
//! | `before`       | `y <= sticky_start`                        | in flow          |
//! | `sticky`       | `sticky_start < y < bottom_limit - desired`| `desired`        |
//! | `bottom-limit` | `bottom_limit - desired <= y <= bottom_limit` | `bottom_limit - y` |
//! | `after`        | `y > bottom_limit`                         | `bottom_limit - y` (negative) |

use std::fmt;

use super::geometry::{Bounds, Size};

/// Stacking order for pinned elements.
pub const PINNED_Z_INDEX: i32 = 10;

// ───────────────────────────────────────── phase ─────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StickyPhase {
    /// Above the sticky region; the element stays in normal flow.
    #[default]
    Before,
    /// Pinned at the desired gap below the header.
    Sticky,
    /// Being pushed up by the bottom of the reference region.
    BottomLimit,
    /// Past the reference region; pushed up and out of view.
    After,
}

impl StickyPhase {
    pub const ALL: [StickyPhase; 4] = [Self::Before, Self::Sticky, Self::BottomLimit, Self::After];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::Sticky => "sticky",
            Self::BottomLimit => "bottom-limit",
            Self::After => "after",
        }
    }

    /// Whether the element is pulled out of flow in this phase.
    pub fn is_pinned(self) -> bool {
        self != Self::Before
    }
}

impl fmt::Display for StickyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───────────────────────────────────────── placement ─────────

/// Everything the phase decision depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseInputs {
    pub scroll_y: f64,
    pub bounds: Bounds,
    pub natural_offset: f64,
    pub header_height: f64,
    pub natural_height: f64,
}

impl PhaseInputs {
    /// Gap between the viewport top and the element while sticking.
    pub fn desired(&self) -> f64 {
        self.header_height + self.natural_offset
    }

    pub fn sticky_start(&self) -> f64 {
        self.bounds.container_top - self.desired()
    }

    pub fn bottom_limit(&self) -> f64 {
        self.bounds.reference_bottom - self.natural_height
    }
}

/// Phase plus the viewport-relative top to pin at (`None` while in flow).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub phase: StickyPhase,
    pub top: Option<f64>,
}

impl Placement {
    pub const IN_FLOW: Self = Self {
        phase: StickyPhase::Before,
        top: None,
    };
}

pub fn compute_placement(inputs: &PhaseInputs) -> Placement {
    let y = inputs.scroll_y;
    let desired = inputs.desired();
    let bottom_limit = inputs.bottom_limit();

    if y <= inputs.sticky_start() {
        Placement::IN_FLOW
    } else if y < bottom_limit - desired {
        Placement {
            phase: StickyPhase::Sticky,
            top: Some(desired),
        }
    } else if y <= bottom_limit {
        Placement {
            phase: StickyPhase::BottomLimit,
            top: Some(bottom_limit - y),
        }
    } else {
        Placement {
            phase: StickyPhase::After,
            top: Some(bottom_limit - y),
        }
    }
}

// ───────────────────────────────────────── element state ─────

/// Per-element phase bookkeeping, written only by the manager's recompute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementState {
    pub phase: StickyPhase,
    /// Last applied top; rendered and compared against by the stability gate.
    pub last_valid_position: Option<f64>,
    /// Whether the last update was applied on a normal-speed cycle.
    pub is_stable: bool,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            phase: StickyPhase::Before,
            last_valid_position: None,
            is_stable: true,
        }
    }
}

impl ElementState {
    /// Record an applied placement.
    pub fn record(&mut self, placement: Placement, rapid: bool) {
        self.phase = placement.phase;
        self.last_valid_position = placement.top;
        self.is_stable = !rapid;
    }
}

// ───────────────────────────────────────── stability ─────────

pub const RAPID_SCROLL_THRESHOLD: f64 = 50.0;
pub const STABILITY_TOLERANCE: f64 = 2.0;

/// Anti-flicker check.
///
/// During a rapid cycle, an element whose previous update was stable holds
/// its current placement when the new one stays in the same phase and
/// moves by less than the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityGate {
    /// Offset delta per cycle above which scrolling counts as rapid.
    pub rapid_threshold: f64,
    /// Largest position change that may be held back.
    pub tolerance: f64,
}

impl Default for StabilityGate {
    fn default() -> Self {
        Self {
            rapid_threshold: RAPID_SCROLL_THRESHOLD,
            tolerance: STABILITY_TOLERANCE,
        }
    }
}

impl StabilityGate {
    pub fn is_rapid(&self, previous_y: f64, scroll_y: f64) -> bool {
        (scroll_y - previous_y).abs() > self.rapid_threshold
    }

    pub fn should_hold(&self, rapid: bool, state: &ElementState, next: &Placement) -> bool {
        if !rapid || !state.is_stable || next.phase != state.phase {
            return false;
        }
        let delta = match (state.last_valid_position, next.top) {
            (Some(prev), Some(top)) => (top - prev).abs(),
            (None, None) => 0.0,
            _ => return false,
        };
        delta < self.tolerance
    }
}

// ───────────────────────────────────────── styles ────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Positioning {
    /// Normal document flow; surrounding layout decides placement.
    #[default]
    Flow,
    /// Pinned relative to the viewport.
    Fixed,
}

/// The inline positioning a node carries.  The sticky manager is the only
/// writer for registered nodes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeStyle {
    pub positioning: Positioning,
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: Option<i32>,
    /// Hint that `top` changes every frame.
    pub will_change_top: bool,
}

impl NodeStyle {
    /// Base style installed on registration: in flow, natural size.
    pub fn base() -> Self {
        Self {
            will_change_top: true,
            ..Self::default()
        }
    }
}

/// Minimum box a pinned element is allowed to shrink to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeFloor {
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for SizeFloor {
    fn default() -> Self {
        Self {
            min_width: 1.0,
            min_height: 1.0,
        }
    }
}

/// Turn a placement into the style to apply.
///
/// `parent_left` is the document-relative x of the element's original
/// parent; it is only needed for pinned phases.
pub fn layout_style(placement: &Placement, parent_left: f64, natural: Size, floor: SizeFloor) -> NodeStyle {
    let Some(top) = placement.top else {
        return NodeStyle::base();
    };
    let size = natural.at_least(floor.min_width, floor.min_height);
    NodeStyle {
        positioning: Positioning::Fixed,
        top: Some(top),
        left: Some(parent_left),
        width: Some(size.width),
        height: Some(size.height),
        z_index: Some(PINNED_Z_INDEX),
        will_change_top: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sidebar(scroll_y: f64) -> PhaseInputs {
        PhaseInputs {
            scroll_y,
            bounds: Bounds::new(1000.0, 3000.0, 2500.0),
            natural_offset: 80.0,
            header_height: 80.0,
            natural_height: 400.0,
        }
    }

    #[test]
    fn derived_geometry() {
        let inputs = sidebar(0.0);
        assert_eq!(inputs.desired(), 160.0);
        assert_eq!(inputs.sticky_start(), 840.0);
        assert_eq!(inputs.bottom_limit(), 2100.0);
    }

    #[test]
    fn exact_boundaries_follow_the_inequalities() {
        // y == sticky_start is still before.
        assert_eq!(compute_placement(&sidebar(840.0)), Placement::IN_FLOW);

        let just_after = compute_placement(&sidebar(840.5));
        assert_eq!(just_after.phase, StickyPhase::Sticky);
        assert_eq!(just_after.top, Some(160.0));

        // bottom_limit - desired opens bottom-limit.
        let at_limit_start = compute_placement(&sidebar(1940.0));
        assert_eq!(at_limit_start.phase, StickyPhase::BottomLimit);
        assert_eq!(at_limit_start.top, Some(160.0));

        let at_limit = compute_placement(&sidebar(2100.0));
        assert_eq!(at_limit.phase, StickyPhase::BottomLimit);
        assert_eq!(at_limit.top, Some(0.0));

        let after = compute_placement(&sidebar(2200.0));
        assert_eq!(after.phase, StickyPhase::After);
        assert_eq!(after.top, Some(-100.0));
    }

    #[test]
    fn phase_names() {
        let names: Vec<_> = StickyPhase::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["before", "sticky", "bottom-limit", "after"]);
    }

    #[test]
    fn gate_holds_small_same_phase_moves_while_rapid() {
        let gate = StabilityGate::default();
        let state = ElementState {
            phase: StickyPhase::BottomLimit,
            last_valid_position: Some(50.0),
            is_stable: true,
        };
        let next = Placement {
            phase: StickyPhase::BottomLimit,
            top: Some(51.5),
        };
        assert!(gate.should_hold(true, &state, &next));
        assert!(!gate.should_hold(false, &state, &next));

        let far = Placement { top: Some(53.0), ..next };
        assert!(!gate.should_hold(true, &state, &far));

        let other_phase = Placement {
            phase: StickyPhase::After,
            ..next
        };
        assert!(!gate.should_hold(true, &state, &other_phase));

        let unstable = ElementState {
            is_stable: false,
            ..state
        };
        assert!(!gate.should_hold(true, &unstable, &next));
    }

    #[test]
    fn rapid_means_strictly_above_threshold() {
        let gate = StabilityGate::default();
        assert!(!gate.is_rapid(100.0, 150.0));
        assert!(gate.is_rapid(100.0, 150.5));
        assert!(gate.is_rapid(150.5, 100.0));
    }

    #[test]
    fn pinned_style_clamps_size_and_keeps_parent_left() {
        let placement = Placement {
            phase: StickyPhase::Sticky,
            top: Some(160.0),
        };
        let style = layout_style(&placement, 640.0, Size::new(0.0, 400.0), SizeFloor::default());
        assert_eq!(style.positioning, Positioning::Fixed);
        assert_eq!(style.top, Some(160.0));
        assert_eq!(style.left, Some(640.0));
        assert_eq!(style.width, Some(1.0));
        assert_eq!(style.height, Some(400.0));
    }

    #[test]
    fn in_flow_style_clears_size() {
        let style = layout_style(&Placement::IN_FLOW, 640.0, Size::new(300.0, 400.0), SizeFloor::default());
        assert_eq!(style, NodeStyle::base());
        assert!(style.width.is_none() && style.height.is_none());
    }
}
