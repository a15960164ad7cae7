//! Document-space geometry shared by the sticky manager and its hosts.
//!
//! All coordinates are absolute document pixels (y grows downward, 0 is the
//! top of the scrollable document), independent of the current scroll
//! offset.

/// Axis-aligned rectangle in document space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DocRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

/// Box size of a node, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp each dimension to at least the given floor.  A mis-measured
    /// zero-size node must never collapse out of view.
    pub fn at_least(self, min_width: f64, min_height: f64) -> Self {
        Self {
            width: self.width.max(min_width),
            height: self.height.max(min_height),
        }
    }
}

/// The vertical region a sticky element is allowed to operate in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Top of the element's container; sticking starts relative to this.
    pub container_top: f64,
    /// Bottom of the element's container.
    pub container_bottom: f64,
    /// Bottom of the reference region; the element's bottom edge never
    /// travels past it.
    pub reference_bottom: f64,
}

impl Bounds {
    pub fn new(container_top: f64, container_bottom: f64, reference_bottom: f64) -> Self {
        Self {
            container_top,
            container_bottom,
            reference_bottom,
        }
    }
}

/// Anything whose document-space box can be looked up.
///
/// Returns `None` when the node is detached or its layout is unavailable.
pub trait LayoutNode {
    fn document_rect(&self) -> Option<DocRect>;
}

impl LayoutNode for DocRect {
    fn document_rect(&self) -> Option<DocRect> {
        Some(*self)
    }
}

/// Capture the bounds defined by a container and a reference node.
///
/// Pure: reads both rects at the time of the call and touches no state.
/// `None` if either node has no layout.
pub fn calculate_bounds(container: &dyn LayoutNode, reference: &dyn LayoutNode) -> Option<Bounds> {
    let container = container.document_rect()?;
    let reference = reference.document_rect()?;
    Some(Bounds {
        container_top: container.top(),
        container_bottom: container.bottom(),
        reference_bottom: reference.bottom(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Detached;

    impl LayoutNode for Detached {
        fn document_rect(&self) -> Option<DocRect> {
            None
        }
    }

    #[test]
    fn bounds_come_from_container_and_reference_edges() {
        let container = DocRect::new(0.0, 1000.0, 300.0, 2000.0);
        let reference = DocRect::new(0.0, 1200.0, 300.0, 1300.0);
        let bounds = calculate_bounds(&container, &reference).unwrap();
        assert_eq!(bounds, Bounds::new(1000.0, 3000.0, 2500.0));
    }

    #[test]
    fn missing_layout_yields_none() {
        let container = DocRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(calculate_bounds(&container, &Detached).is_none());
        assert!(calculate_bounds(&Detached, &container).is_none());
    }

    #[test]
    fn size_floors_apply_per_axis() {
        let size = Size::new(0.0, 35.0).at_least(1.0, 1.0);
        assert_eq!(size, Size::new(1.0, 35.0));
    }
}
