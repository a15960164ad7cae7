//! Sticky element manager.
//!
//! Owns every registered sticky node and, on each permitted scroll update,
//! recomputes its phase and pinned position from cached bounds.  Nodes are
//! reached only through [`StickyNode`], so the whole manager runs without a
//! rendering surface.
//!
//! Faults (detached nodes, unresolvable geometry) are absorbed per element
//! and reported to the [`EngineObserver`]; one bad element never stops the
//! others from updating.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::coordinator::{ScrollCoordinator, ScrollSubscriber, SubscriberOptions};
use super::error::StickyError;
use super::geometry::{calculate_bounds, Bounds, LayoutNode, Size};
use super::observer::{EngineObserver, TracingObserver};
use super::phase::{
    compute_placement, layout_style, ElementState, NodeStyle, PhaseInputs, SizeFloor,
    StabilityGate, StickyPhase,
};

/// Subscriber id the manager registers under.
pub const STICKY_MANAGER_ID: &str = "sticky-manager";
pub const STICKY_MANAGER_PRIORITY: i32 = 10;

// ───────────────────────────────────────── host adapters ─────

/// Adapter over a visual node the manager positions.
///
/// `document_rect` (from [`LayoutNode`]) reports the node's own box; the
/// remaining lookups resolve the nodes its geometry is derived from.
pub trait StickyNode: LayoutNode {
    /// Whether the node is still part of the visual tree.
    fn is_attached(&self) -> bool;

    /// The node's natural box size, measured while it is in flow.
    fn natural_size(&self) -> Option<Size> {
        self.document_rect().map(|rect| rect.size())
    }

    /// Current inline positioning.
    fn style(&self) -> NodeStyle;

    fn apply_style(&mut self, style: &NodeStyle);

    /// The node's original parent; its x position anchors pinned placement.
    fn parent(&self) -> Option<&dyn LayoutNode>;

    /// Container whose top starts the sticky region.
    fn container(&self) -> Option<&dyn LayoutNode> {
        None
    }

    /// Region whose bottom the node may not travel past.
    fn reference(&self) -> Option<&dyn LayoutNode> {
        None
    }
}

/// Locates the fixed header landmark and reports its height.
pub trait HeaderProbe {
    fn header_height(&self) -> Option<f64>;
}

/// A fixed, known header height.
impl HeaderProbe for f64 {
    fn header_height(&self) -> Option<f64> {
        Some(*self)
    }
}

// ───────────────────────────────────────── config ────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickyConfig {
    pub gate: StabilityGate,
    pub floor: SizeFloor,
}

// ───────────────────────────────────────── records ───────────

struct StickyRecord<N> {
    node: N,
    bounds: Bounds,
    natural_offset: f64,
    /// Captured once at registration.
    natural_size: Size,
    is_active: bool,
    /// Style the node carried before registration; restored on removal.
    restore: NodeStyle,
    state: ElementState,
}

/// Per-cycle context shared by every element's recompute.
struct Pass<'a> {
    scroll_y: f64,
    rapid: bool,
    /// Whether the stability gate may hold placements back.
    allow_hold: bool,
    header_height: f64,
    config: &'a StickyConfig,
    observer: &'a dyn EngineObserver,
}

impl<'a> Pass<'a> {
    /// A pass that applies exact placements with no stability holds.
    fn settling(
        scroll_y: f64,
        header_height: f64,
        config: &'a StickyConfig,
        observer: &'a dyn EngineObserver,
    ) -> Self {
        Self {
            scroll_y,
            rapid: false,
            allow_hold: false,
            header_height,
            config,
            observer,
        }
    }

    fn run<N: StickyNode>(&self, id: &str, record: &mut StickyRecord<N>) {
        if let Err(err) = self.recompute(id, record) {
            self.observer.element_skipped(&err);
        }
    }

    fn recompute<N: StickyNode>(&self, id: &str, record: &mut StickyRecord<N>) -> Result<(), StickyError> {
        if !record.node.is_attached() {
            return Err(StickyError::DetachedElement(id.to_string()));
        }

        let placement = compute_placement(&PhaseInputs {
            scroll_y: self.scroll_y,
            bounds: record.bounds,
            natural_offset: record.natural_offset,
            header_height: self.header_height,
            natural_height: record.natural_size.height,
        });

        if self.allow_hold && self.config.gate.should_hold(self.rapid, &record.state, &placement) {
            self.observer.placement_suppressed(id, placement.phase, self.scroll_y);
            return Ok(());
        }

        let parent_left = if placement.phase.is_pinned() {
            record
                .node
                .parent()
                .and_then(|parent| parent.document_rect())
                .map(|rect| rect.left())
                .ok_or_else(|| StickyError::missing(id, "parent node"))?
        } else {
            0.0
        };

        let style = layout_style(&placement, parent_left, record.natural_size, self.config.floor);
        record.node.apply_style(&style);
        record.state.record(placement, self.rapid);
        self.observer.placement_applied(id, placement.phase, placement.top, self.scroll_y);
        Ok(())
    }
}

// ───────────────────────────────────────── manager ───────────

pub struct StickyManager<N> {
    elements: HashMap<String, StickyRecord<N>>,
    header: Box<dyn HeaderProbe>,
    header_height: f64,
    config: StickyConfig,
    observer: Rc<dyn EngineObserver>,
    /// Offset of the previous update; rapid-scroll detection compares
    /// against it.
    scroll_y: f64,
}

impl<N: StickyNode> StickyManager<N> {
    pub fn new(header: impl HeaderProbe + 'static, config: StickyConfig) -> Self {
        Self::with_observer(header, config, Rc::new(TracingObserver))
    }

    pub fn with_observer(
        header: impl HeaderProbe + 'static,
        config: StickyConfig,
        observer: Rc<dyn EngineObserver>,
    ) -> Self {
        let mut manager = Self {
            elements: HashMap::new(),
            header: Box::new(header),
            header_height: 0.0,
            config,
            observer,
            scroll_y: 0.0,
        };
        manager.detect_header();
        manager
    }

    /// Register a shared manager with the coordinator.
    pub fn attach(manager: &Rc<RefCell<Self>>, coordinator: &mut ScrollCoordinator)
    where
        N: 'static,
    {
        let options = SubscriberOptions {
            priority: STICKY_MANAGER_PRIORITY,
            ..coordinator.config().defaults
        };
        coordinator.register_system(STICKY_MANAGER_ID, Rc::clone(manager), options);
    }

    // ── registration ────────────────────────────────────────────

    /// Take ownership of `node` and start positioning it.
    ///
    /// The natural size is measured before base styles go on, and the
    /// element is placed immediately for the last observed offset.  If `id`
    /// was already registered, the previous node is restored and returned.
    pub fn add_element(
        &mut self,
        id: impl Into<String>,
        mut node: N,
        bounds: Bounds,
        natural_offset: f64,
    ) -> Option<N> {
        let id = id.into();
        let replaced = self.remove_element(&id);

        let restore = node.style();
        let natural_size = node.natural_size().unwrap_or_else(|| {
            self.observer
                .element_skipped(&StickyError::missing(&id, "natural size"));
            Size::default()
        });
        node.apply_style(&NodeStyle::base());

        let mut record = StickyRecord {
            node,
            bounds,
            natural_offset,
            natural_size,
            is_active: true,
            restore,
            state: ElementState::default(),
        };
        Pass::settling(self.scroll_y, self.header_height, &self.config, &*self.observer)
            .run(&id, &mut record);
        self.elements.insert(id, record);
        replaced
    }

    /// Restore the node's pre-registration style and hand it back.
    /// `None` when nothing is registered under `id`.
    pub fn remove_element(&mut self, id: &str) -> Option<N> {
        let mut record = self.elements.remove(id)?;
        record.node.apply_style(&record.restore);
        Some(record.node)
    }

    /// Toggle the `is_active` gate.  A deactivated element goes back in
    /// flow; a reactivated one is placed right away.
    pub fn set_element_active(&mut self, id: &str, active: bool) -> bool {
        let pass = Pass::settling(self.scroll_y, self.header_height, &self.config, &*self.observer);
        let Some(record) = self.elements.get_mut(id) else {
            return false;
        };
        if record.is_active == active {
            return true;
        }
        record.is_active = active;
        if active {
            pass.run(id, record);
        } else {
            record.node.apply_style(&NodeStyle::base());
            record.state = ElementState::default();
        }
        true
    }

    // ── recompute ──────────────────────────────────────────────

    /// Recompute every active element for `scroll_y`.
    pub fn update(&mut self, scroll_y: f64) {
        let rapid = self.config.gate.is_rapid(self.scroll_y, scroll_y);
        self.scroll_y = scroll_y;
        let pass = Pass {
            scroll_y,
            rapid,
            allow_hold: true,
            header_height: self.header_height,
            config: &self.config,
            observer: &*self.observer,
        };
        for (id, record) in self.elements.iter_mut().filter(|(_, r)| r.is_active) {
            pass.run(id, record);
        }
    }

    /// Re-detect the header, recapture every active element's bounds from
    /// its container and reference nodes, then place everything without
    /// stability holds.  Call after layout-affecting changes.
    pub fn refresh_bounds(&mut self) {
        self.detect_header();

        let observer = &*self.observer;
        for (id, record) in self.elements.iter_mut().filter(|(_, r)| r.is_active) {
            match resolve_bounds(id, &record.node) {
                Ok(bounds) => record.bounds = bounds,
                Err(err) => observer.element_skipped(&err),
            }
        }
        self.settle();
    }

    /// Place every active element at the exact position for the last
    /// observed offset, ignoring the stability gate.
    pub fn settle(&mut self) {
        let pass = Pass::settling(self.scroll_y, self.header_height, &self.config, &*self.observer);
        for (id, record) in self.elements.iter_mut().filter(|(_, r)| r.is_active) {
            pass.run(id, record);
        }
    }

    fn detect_header(&mut self) {
        match self.header.header_height() {
            Some(height) => self.header_height = height,
            None => self.observer.header_not_found(self.header_height),
        }
    }

    // ── recovery ───────────────────────────────────────────────

    /// Clear applied styles and rewind the phase to `before`.
    pub fn reset_element(&mut self, id: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(record) => {
                reset_record(record);
                true
            }
            None => false,
        }
    }

    pub fn reset_all_elements(&mut self) {
        self.elements.values_mut().for_each(reset_record);
    }

    // ── queries ────────────────────────────────────────────────

    pub fn phase(&self, id: &str) -> Option<StickyPhase> {
        self.elements.get(id).map(|r| r.state.phase)
    }

    pub fn state(&self, id: &str) -> Option<ElementState> {
        self.elements.get(id).map(|r| r.state)
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.elements.get(id).map(|r| &r.node)
    }

    pub fn bounds(&self, id: &str) -> Option<Bounds> {
        self.elements.get(id).map(|r| r.bounds)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|r| r.is_active)
    }

    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn header_height(&self) -> f64 {
        self.header_height
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn reset_record<N: StickyNode>(record: &mut StickyRecord<N>) {
    record.node.apply_style(&NodeStyle::base());
    record.state = ElementState::default();
}

fn resolve_bounds<N: StickyNode>(id: &str, node: &N) -> Result<Bounds, StickyError> {
    if !node.is_attached() {
        return Err(StickyError::DetachedElement(id.to_string()));
    }
    let container = node
        .container()
        .ok_or_else(|| StickyError::missing(id, "container node"))?;
    let reference = node
        .reference()
        .ok_or_else(|| StickyError::missing(id, "reference node"))?;
    calculate_bounds(container, reference)
        .ok_or_else(|| StickyError::missing(id, "container or reference layout"))
}

impl<N: StickyNode> ScrollSubscriber for StickyManager<N> {
    fn on_update(&mut self, scroll_y: f64) -> anyhow::Result<()> {
        self.update(scroll_y);
        Ok(())
    }

    /// Positions held back during the burst snap to their exact values.
    fn on_scroll_end(&mut self, _scroll_y: f64) -> anyhow::Result<()> {
        self.settle();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::core::geometry::DocRect;
    use crate::core::phase::Positioning;

    /// In-memory node with shared, mutable geometry.
    struct FakeNode {
        rect: DocRect,
        parent: Option<DocRect>,
        container: Rc<Cell<Option<DocRect>>>,
        reference: Option<DocRect>,
        attached: Rc<Cell<bool>>,
        style: NodeStyle,
        writes: Rc<Cell<u32>>,
    }

    impl FakeNode {
        fn sidebar() -> Self {
            Self {
                rect: DocRect::new(640.0, 1000.0, 300.0, 400.0),
                parent: Some(DocRect::new(620.0, 1000.0, 340.0, 2000.0)),
                container: Rc::new(Cell::new(Some(DocRect::new(0.0, 1000.0, 960.0, 2000.0)))),
                reference: Some(DocRect::new(0.0, 1000.0, 960.0, 1500.0)),
                attached: Rc::new(Cell::new(true)),
                style: NodeStyle::default(),
                writes: Rc::new(Cell::new(0)),
            }
        }
    }

    impl LayoutNode for FakeNode {
        fn document_rect(&self) -> Option<DocRect> {
            self.attached.get().then_some(self.rect)
        }
    }

    impl StickyNode for FakeNode {
        fn is_attached(&self) -> bool {
            self.attached.get()
        }

        fn style(&self) -> NodeStyle {
            self.style
        }

        fn apply_style(&mut self, style: &NodeStyle) {
            self.style = *style;
            self.writes.set(self.writes.get() + 1);
        }

        fn parent(&self) -> Option<&dyn LayoutNode> {
            self.parent.as_ref().map(|p| p as &dyn LayoutNode)
        }

        fn container(&self) -> Option<&dyn LayoutNode> {
            Some(&*self.container)
        }

        fn reference(&self) -> Option<&dyn LayoutNode> {
            self.reference.as_ref().map(|r| r as &dyn LayoutNode)
        }
    }

    impl LayoutNode for Cell<Option<DocRect>> {
        fn document_rect(&self) -> Option<DocRect> {
            self.get()
        }
    }

    #[derive(Default)]
    struct Recorder {
        skipped: RefCell<Vec<String>>,
        held: Cell<u32>,
        header_missing: Cell<u32>,
    }

    impl EngineObserver for Recorder {
        fn element_skipped(&self, error: &StickyError) {
            self.skipped.borrow_mut().push(error.to_string());
        }

        fn placement_suppressed(&self, _id: &str, _phase: StickyPhase, _scroll_y: f64) {
            self.held.set(self.held.get() + 1);
        }

        fn header_not_found(&self, _kept_height: f64) {
            self.header_missing.set(self.header_missing.get() + 1);
        }
    }

    struct SwitchableHeader(Rc<Cell<Option<f64>>>);

    impl HeaderProbe for SwitchableHeader {
        fn header_height(&self) -> Option<f64> {
            self.0.get()
        }
    }

    const BOUNDS: Bounds = Bounds {
        container_top: 1000.0,
        container_bottom: 3000.0,
        reference_bottom: 2500.0,
    };

    fn manager() -> (StickyManager<FakeNode>, Rc<Recorder>) {
        let recorder = Rc::new(Recorder::default());
        let manager = StickyManager::with_observer(80.0, StickyConfig::default(), recorder.clone());
        (manager, recorder)
    }

    #[test]
    fn add_places_immediately_for_last_offset() {
        let (mut m, _) = manager();
        m.update(1200.0);
        m.add_element("sidebar", FakeNode::sidebar(), BOUNDS, 80.0);

        assert_eq!(m.phase("sidebar"), Some(StickyPhase::Sticky));
        let style = m.node("sidebar").unwrap().style();
        assert_eq!(style.positioning, Positioning::Fixed);
        assert_eq!(style.top, Some(160.0));
        assert_eq!(style.left, Some(620.0));
        assert_eq!(style.width, Some(300.0));
        assert_eq!(style.height, Some(400.0));
    }

    #[test]
    fn remove_restores_original_style_and_is_idempotent() {
        let (mut m, _) = manager();
        let mut node = FakeNode::sidebar();
        node.style.z_index = Some(3);
        m.add_element("sidebar", node, BOUNDS, 80.0);
        m.update(1500.0);

        let node = m.remove_element("sidebar").unwrap();
        assert_eq!(node.style.z_index, Some(3));
        assert_eq!(node.style.positioning, Positioning::Flow);
        assert!(m.remove_element("sidebar").is_none());
        assert!(m.is_empty());
    }

    #[test]
    fn re_adding_an_id_returns_the_previous_node() {
        let (mut m, _) = manager();
        assert!(m.add_element("a", FakeNode::sidebar(), BOUNDS, 80.0).is_none());
        let old = m.add_element("a", FakeNode::sidebar(), BOUNDS, 80.0);
        assert_eq!(old.map(|n| n.style), Some(NodeStyle::default()));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn detached_element_is_skipped_without_touching_others() {
        let (mut m, recorder) = manager();
        let gone = FakeNode::sidebar();
        let attached = Rc::clone(&gone.attached);
        m.add_element("gone", gone, BOUNDS, 80.0);
        m.add_element("ok", FakeNode::sidebar(), BOUNDS, 80.0);

        attached.set(false);
        m.update(1200.0);

        assert_eq!(m.phase("gone"), Some(StickyPhase::Before));
        assert_eq!(m.phase("ok"), Some(StickyPhase::Sticky));
        let skipped = recorder.skipped.borrow();
        assert_eq!(skipped.len(), 1);
        assert!(skipped[0].contains("gone"));
    }

    #[test]
    fn missing_parent_skips_pinning() {
        let (mut m, recorder) = manager();
        let mut node = FakeNode::sidebar();
        node.parent = None;
        m.add_element("orphan", node, BOUNDS, 80.0);

        m.update(10.0);
        assert!(recorder.skipped.borrow().is_empty());
        m.update(40.0);
        m.update(1200.0);
        assert_eq!(m.phase("orphan"), Some(StickyPhase::Before));
        assert!(recorder.skipped.borrow()[0].contains("parent node"));
    }

    #[test]
    fn inactive_elements_are_not_recomputed() {
        let (mut m, _) = manager();
        let node = FakeNode::sidebar();
        let writes = Rc::clone(&node.writes);
        m.add_element("sidebar", node, BOUNDS, 80.0);
        assert!(m.set_element_active("sidebar", false));
        let before = writes.get();

        m.update(1200.0);
        assert_eq!(writes.get(), before);
        assert_eq!(m.phase("sidebar"), Some(StickyPhase::Before));

        assert!(m.set_element_active("sidebar", true));
        assert_eq!(m.phase("sidebar"), Some(StickyPhase::Sticky));
        assert!(!m.set_element_active("missing", true));
    }

    fn tight_gate() -> StickyConfig {
        StickyConfig {
            gate: StabilityGate {
                rapid_threshold: 5.0,
                tolerance: 10.0,
            },
            ..StickyConfig::default()
        }
    }

    #[test]
    fn rapid_move_within_tolerance_keeps_style_identical() {
        let recorder = Rc::new(Recorder::default());
        let mut m = StickyManager::with_observer(80.0, tight_gate(), recorder.clone());
        let node = FakeNode::sidebar();
        let writes = Rc::clone(&node.writes);
        m.add_element("sidebar", node, BOUNDS, 80.0);

        m.update(2000.0);
        m.update(2004.0);
        let state = m.state("sidebar").unwrap();
        assert_eq!(state.phase, StickyPhase::BottomLimit);
        assert!(state.is_stable);
        let applied = m.node("sidebar").unwrap().style();
        let writes_before = writes.get();

        // 6px jump is rapid; the 6px position change is within tolerance.
        m.update(2010.0);
        assert_eq!(m.node("sidebar").unwrap().style(), applied);
        assert_eq!(writes.get(), writes_before);
        assert_eq!(recorder.held.get(), 1);
        assert_eq!(m.state("sidebar").unwrap().last_valid_position, Some(96.0));
    }

    #[test]
    fn rapid_scroll_inside_sticky_phase_is_held() {
        let (mut m, recorder) = manager();
        m.add_element("sidebar", FakeNode::sidebar(), BOUNDS, 80.0);
        for y in (900..=1000).step_by(20) {
            m.update(y as f64);
        }
        assert!(m.state("sidebar").unwrap().is_stable);

        m.update(1300.0);
        assert_eq!(recorder.held.get(), 1);
        assert_eq!(m.node("sidebar").unwrap().style().top, Some(160.0));
        assert!(m.state("sidebar").unwrap().is_stable);
    }

    #[test]
    fn rapid_change_clears_stability_until_a_normal_cycle() {
        let (mut m, recorder) = manager();
        m.add_element("sidebar", FakeNode::sidebar(), BOUNDS, 80.0);
        m.update(1000.0);
        m.update(1010.0);
        assert!(m.state("sidebar").unwrap().is_stable);

        // Rapid and the phase changes: applied, stability cleared.
        m.update(2000.0);
        let state = m.state("sidebar").unwrap();
        assert_eq!(state.phase, StickyPhase::BottomLimit);
        assert_eq!(state.last_valid_position, Some(100.0));
        assert!(!state.is_stable);

        // Rapid cycles after an unstable one are never held.
        m.update(1900.0);
        m.update(1800.0);
        assert_eq!(recorder.held.get(), 0);
        assert!(!m.state("sidebar").unwrap().is_stable);

        m.update(1810.0);
        assert!(m.state("sidebar").unwrap().is_stable);
    }

    #[test]
    fn scroll_end_settles_held_positions() {
        let mut m = StickyManager::new(80.0, tight_gate());
        m.add_element("sidebar", FakeNode::sidebar(), BOUNDS, 80.0);
        m.update(2000.0);
        m.update(2004.0);
        m.update(2010.0);
        assert_eq!(m.node("sidebar").unwrap().style().top, Some(96.0));

        m.on_scroll_end(2010.0).unwrap();
        assert_eq!(m.node("sidebar").unwrap().style().top, Some(90.0));
        assert_eq!(m.state("sidebar").unwrap().last_valid_position, Some(90.0));
    }

    #[test]
    fn reset_rewinds_to_before() {
        let (mut m, _) = manager();
        m.add_element("a", FakeNode::sidebar(), BOUNDS, 80.0);
        m.add_element("b", FakeNode::sidebar(), BOUNDS, 80.0);
        m.update(1200.0);

        assert!(m.reset_element("a"));
        assert_eq!(m.phase("a"), Some(StickyPhase::Before));
        assert_eq!(m.node("a").unwrap().style(), NodeStyle::base());
        assert_eq!(m.phase("b"), Some(StickyPhase::Sticky));

        m.reset_all_elements();
        assert_eq!(m.phase("b"), Some(StickyPhase::Before));
        assert!(!m.reset_element("missing"));
    }

    #[test]
    fn refresh_recaptures_bounds_and_header() {
        let header = Rc::new(Cell::new(Some(80.0)));
        let mut m: StickyManager<FakeNode> =
            StickyManager::new(SwitchableHeader(Rc::clone(&header)), StickyConfig::default());
        let node = FakeNode::sidebar();
        let container = Rc::clone(&node.container);
        m.add_element("sidebar", node, BOUNDS, 80.0);
        m.update(900.0);
        assert_eq!(m.phase("sidebar"), Some(StickyPhase::Sticky));

        // Content above grew by 200px and the header shrank.
        container.set(Some(DocRect::new(0.0, 1200.0, 960.0, 2000.0)));
        header.set(Some(40.0));
        m.refresh_bounds();

        assert_eq!(m.header_height(), 40.0);
        assert_eq!(m.bounds("sidebar").unwrap().container_top, 1200.0);
        assert_eq!(m.phase("sidebar"), Some(StickyPhase::Before));
    }

    #[test]
    fn refresh_keeps_old_values_when_lookups_fail() {
        let header = Rc::new(Cell::new(Some(80.0)));
        let recorder = Rc::new(Recorder::default());
        let mut m = StickyManager::with_observer(
            SwitchableHeader(Rc::clone(&header)),
            StickyConfig::default(),
            recorder.clone(),
        );
        let node = FakeNode::sidebar();
        let container = Rc::clone(&node.container);
        m.add_element("sidebar", node, BOUNDS, 80.0);

        container.set(None);
        header.set(None);
        m.refresh_bounds();

        assert_eq!(m.header_height(), 80.0);
        assert_eq!(m.bounds("sidebar"), Some(BOUNDS));
        assert_eq!(recorder.header_missing.get(), 1);
        assert!(recorder.skipped.borrow()[0].contains("container or reference layout"));
    }
}
