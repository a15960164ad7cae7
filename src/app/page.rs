//! Storefront product page laid out in terminal cells.
//!
//! One cell row is one document pixel.  The layout is shared between the
//! renderer and the sticky node adapters through `Rc<RefCell<_>>`; the
//! adapters only read geometry from it, while their inline style lives in
//! the node itself and is written solely by the sticky manager.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::geometry::{Bounds, DocRect, LayoutNode};
use crate::core::phase::NodeStyle;
use crate::core::sticky::{HeaderProbe, StickyNode};

pub type SharedLayout = Rc<RefCell<PageLayout>>;

pub const SIDEBAR_ID: &str = "order-summary";
pub const REVIEWS_HEADING_ID: &str = "reviews-heading";

/// Longest product list the page lays out; the whole document must fit in
/// `u16` rows.
pub const MAX_PRODUCTS: usize = 2000;

const HERO_HEIGHT: u16 = 9;
const SECTION_GAP: u16 = 2;
const PRODUCT_ROWS: u16 = 5;
const SIDEBAR_HEIGHT: u16 = 11;
const REVIEW_ROWS: u16 = 4;
const REVIEWS_HEADING_HEIGHT: u16 = 2;
const FOOTER_HEIGHT: u16 = 6;
const SIDEBAR_MIN_WIDTH: u16 = 24;

/// Named regions of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Hero,
    /// Product section; contains the details column and the sidebar column.
    Products,
    /// Product list; its bottom limits the order summary.
    Details,
    /// Right-hand column; parent of the order summary.
    SidebarColumn,
    Sidebar,
    Reviews,
    ReviewsHeading,
    Footer,
}

/// One product line in the details column.
#[derive(Debug, Clone)]
pub struct Product {
    pub name: String,
    pub price_cents: u32,
    pub blurb: &'static str,
}

const BLURBS: &[&str] = &[
    "Hand-finished, ships in two days.",
    "Limited run. Free returns within 30 days.",
    "Bestseller this month.",
    "Recycled materials, plastic-free packaging.",
    "Pairs well with the rest of the collection.",
];

const NAMES: &[&str] = &[
    "Linen Throw", "Ceramic Mug", "Oak Tray", "Wool Blanket", "Brass Lamp",
    "Stoneware Bowl", "Canvas Tote", "Glass Carafe", "Cotton Apron", "Walnut Board",
];

/// Document geometry for the current terminal width.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub width: u16,
    /// Height of the fixed header chrome overlaying the viewport top.
    pub header_height: u16,
    pub products: Vec<Product>,
    pub review_count: u16,
}

impl PageLayout {
    /// Lay out `product_count` products, capped at [`MAX_PRODUCTS`].
    pub fn new(width: u16, header_height: u16, product_count: usize) -> Self {
        let products = (0..product_count.min(MAX_PRODUCTS))
            .map(|i| Product {
                name: format!("{} #{}", NAMES[i % NAMES.len()], i + 1),
                price_cents: 1200 + ((i % 9000) as u32 * 737) % 9000,
                blurb: BLURBS[i % BLURBS.len()],
            })
            .collect();
        Self {
            width,
            header_height,
            products,
            review_count: 12,
        }
    }

    pub fn shared(self) -> SharedLayout {
        Rc::new(RefCell::new(self))
    }

    fn products_top(&self) -> u16 {
        HERO_HEIGHT + SECTION_GAP
    }

    fn details_height(&self) -> u16 {
        u16::try_from(self.products.len())
            .unwrap_or(u16::MAX)
            .saturating_mul(PRODUCT_ROWS)
            .max(SIDEBAR_HEIGHT)
    }

    fn sidebar_width(&self) -> u16 {
        (self.width / 3).max(SIDEBAR_MIN_WIDTH).min(self.width)
    }

    fn details_width(&self) -> u16 {
        self.width.saturating_sub(self.sidebar_width() + 1)
    }

    fn reviews_top(&self) -> u16 {
        self.products_top()
            .saturating_add(self.details_height())
            .saturating_add(SECTION_GAP)
    }

    fn reviews_height(&self) -> u16 {
        self.review_count
            .saturating_mul(REVIEW_ROWS)
            .saturating_add(REVIEWS_HEADING_HEIGHT)
    }

    /// Total document height.
    pub fn height(&self) -> u16 {
        self.footer_top().saturating_add(FOOTER_HEIGHT)
    }

    fn footer_top(&self) -> u16 {
        self.reviews_top()
            .saturating_add(self.reviews_height())
            .saturating_add(SECTION_GAP)
    }

    /// Largest scroll offset for a viewport of `viewport_height` rows.
    pub fn max_scroll(&self, viewport_height: u16) -> f64 {
        f64::from(self.height().saturating_sub(viewport_height))
    }

    pub fn rect(&self, slot: Slot) -> DocRect {
        let w = f64::from(self.width);
        match slot {
            Slot::Hero => DocRect::new(0.0, 0.0, w, f64::from(HERO_HEIGHT)),
            Slot::Products => DocRect::new(
                0.0,
                f64::from(self.products_top()),
                w,
                f64::from(self.details_height()),
            ),
            Slot::Details => DocRect::new(
                0.0,
                f64::from(self.products_top()),
                f64::from(self.details_width()),
                f64::from(self.details_height()),
            ),
            Slot::SidebarColumn => DocRect::new(
                f64::from(self.details_width() + 1),
                f64::from(self.products_top()),
                f64::from(self.sidebar_width()),
                f64::from(self.details_height()),
            ),
            Slot::Sidebar => DocRect::new(
                f64::from(self.details_width() + 1),
                f64::from(self.products_top()),
                f64::from(self.sidebar_width()),
                f64::from(SIDEBAR_HEIGHT),
            ),
            Slot::Reviews => DocRect::new(
                0.0,
                f64::from(self.reviews_top()),
                w,
                f64::from(self.reviews_height()),
            ),
            Slot::ReviewsHeading => DocRect::new(
                0.0,
                f64::from(self.reviews_top()),
                w,
                f64::from(REVIEWS_HEADING_HEIGHT),
            ),
            Slot::Footer => DocRect::new(
                0.0,
                f64::from(self.footer_top()),
                w,
                f64::from(FOOTER_HEIGHT),
            ),
        }
    }

    /// Document row of each product's first line.
    pub fn product_top(&self, index: usize) -> f64 {
        f64::from(self.products_top()) + (index as f64) * f64::from(PRODUCT_ROWS)
    }

    pub fn review_top(&self, index: u16) -> f64 {
        f64::from(self.reviews_top())
            + f64::from(REVIEWS_HEADING_HEIGHT)
            + f64::from(index) * f64::from(REVIEW_ROWS)
    }

    pub fn subtotal_cents(&self) -> u32 {
        self.products.iter().take(3).map(|p| p.price_cents).sum()
    }
}

// ───────────────────────────────────────── adapters ──────────

/// A live view of one layout slot.
pub struct Region {
    layout: SharedLayout,
    slot: Slot,
}

impl Region {
    pub fn new(layout: &SharedLayout, slot: Slot) -> Self {
        Self {
            layout: Rc::clone(layout),
            slot,
        }
    }
}

impl LayoutNode for Region {
    fn document_rect(&self) -> Option<DocRect> {
        self.layout.try_borrow().ok().map(|layout| layout.rect(self.slot))
    }
}

/// A sticky element on the page.
pub struct PageNode {
    own: Region,
    parent: Region,
    container: Region,
    reference: Region,
    style: NodeStyle,
}

impl PageNode {
    /// The order summary: sticks inside the product section and is pushed
    /// out by the bottom of the product list.
    pub fn order_summary(layout: &SharedLayout) -> Self {
        Self {
            own: Region::new(layout, Slot::Sidebar),
            parent: Region::new(layout, Slot::SidebarColumn),
            container: Region::new(layout, Slot::Products),
            reference: Region::new(layout, Slot::Details),
            style: NodeStyle::default(),
        }
    }

    /// The reviews heading: sticks for the length of the reviews section.
    pub fn reviews_heading(layout: &SharedLayout) -> Self {
        Self {
            own: Region::new(layout, Slot::ReviewsHeading),
            parent: Region::new(layout, Slot::Reviews),
            container: Region::new(layout, Slot::Reviews),
            reference: Region::new(layout, Slot::Reviews),
            style: NodeStyle::default(),
        }
    }

    pub fn slot(&self) -> Slot {
        self.own.slot
    }

    /// Bounds for registration, captured from the current layout.
    pub fn initial_bounds(&self) -> Option<Bounds> {
        crate::core::geometry::calculate_bounds(&self.container, &self.reference)
    }
}

impl LayoutNode for PageNode {
    fn document_rect(&self) -> Option<DocRect> {
        self.own.document_rect()
    }
}

impl StickyNode for PageNode {
    fn is_attached(&self) -> bool {
        self.own.document_rect().is_some()
    }

    fn style(&self) -> NodeStyle {
        self.style
    }

    fn apply_style(&mut self, style: &NodeStyle) {
        self.style = *style;
    }

    fn parent(&self) -> Option<&dyn LayoutNode> {
        Some(&self.parent)
    }

    fn container(&self) -> Option<&dyn LayoutNode> {
        Some(&self.container)
    }

    fn reference(&self) -> Option<&dyn LayoutNode> {
        Some(&self.reference)
    }
}

/// Looks the header landmark up in the layout.  A zero-height header is
/// not rendered at all, so there is nothing to find.
pub struct HeaderLandmark(pub SharedLayout);

impl HeaderProbe for HeaderLandmark {
    fn header_height(&self) -> Option<f64> {
        let layout = self.0.try_borrow().ok()?;
        (layout.header_height > 0).then(|| f64::from(layout.header_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidebar_bounds_follow_the_product_section() {
        let layout = PageLayout::new(120, 3, 10).shared();
        let node = PageNode::order_summary(&layout);
        let bounds = node.initial_bounds().unwrap();
        let l = layout.borrow();
        assert_eq!(bounds.container_top, l.rect(Slot::Products).top());
        assert_eq!(bounds.reference_bottom, l.rect(Slot::Details).bottom());
        assert_eq!(bounds.reference_bottom - bounds.container_top, 50.0);
    }

    #[test]
    fn sidebar_sits_right_of_details() {
        let layout = PageLayout::new(90, 3, 4);
        let details = layout.rect(Slot::Details);
        let sidebar = layout.rect(Slot::Sidebar);
        assert!(sidebar.left() > details.left() + details.width - 1.0);
        assert!(sidebar.left() + sidebar.width <= 90.0);
        assert_eq!(layout.rect(Slot::SidebarColumn).left(), sidebar.left());
    }

    #[test]
    fn oversized_product_counts_are_capped() {
        let layout = PageLayout::new(80, 3, 65_536);
        assert_eq!(layout.products.len(), MAX_PRODUCTS);
        let details = layout.rect(Slot::Details);
        assert_eq!(details.height, (MAX_PRODUCTS * 5) as f64);
        assert!(layout.rect(Slot::Reviews).top() > details.bottom());
        assert_eq!(
            layout.rect(Slot::Footer).bottom(),
            f64::from(layout.height())
        );
        assert_eq!(PageLayout::new(80, 3, 20_000).height(), layout.height());
    }

    #[test]
    fn short_product_lists_still_fit_the_sidebar() {
        let layout = PageLayout::new(80, 3, 1);
        assert!(layout.rect(Slot::Details).height >= layout.rect(Slot::Sidebar).height);
    }

    #[test]
    fn hidden_header_is_not_found() {
        let layout = PageLayout::new(80, 3, 4).shared();
        let probe = HeaderLandmark(Rc::clone(&layout));
        assert_eq!(probe.header_height(), Some(3.0));
        layout.borrow_mut().header_height = 0;
        assert_eq!(probe.header_height(), None);
    }
}
