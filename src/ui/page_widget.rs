//! Renders the storefront page at the current scroll offset.
//!
//! Drawing order matters: document content first, then sticky elements
//! (in flow at their document position, or fixed at the viewport-relative
//! top the manager applied), then the header chrome over everything.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::page::{PageLayout, PageNode, Slot, REVIEWS_HEADING_ID, SIDEBAR_ID};
use crate::core::geometry::LayoutNode;
use crate::core::phase::Positioning;
use crate::core::sticky::{StickyManager, StickyNode};

use super::theme::Theme;

const REVIEWERS: &[(&str, &str, u8)] = &[
    ("Ana", "Exactly as pictured, arrived early.", 5),
    ("Bo", "Good value. The colour is a bit darker in person.", 4),
    ("Chidi", "Bought a second one as a gift.", 5),
    ("Dana", "Packaging was excessive but the item is lovely.", 4),
    ("Eli", "Took three weeks to ship.", 3),
];

pub struct PageView<'a> {
    pub layout: &'a PageLayout,
    pub sticky: &'a StickyManager<PageNode>,
    /// Offset the page is rendered at.
    pub scroll_y: f64,
    /// Reading progress in `0.0..=1.0`, shown in the header.
    pub progress: f64,
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let canvas = Canvas {
            area,
            scroll_y: self.scroll_y,
        };

        self.render_hero(&canvas, buf);
        self.render_products(&canvas, buf);
        self.render_reviews(&canvas, buf);
        self.render_footer(&canvas, buf);

        // In-flow elements first so pinned ones cover them.
        let mut ids: Vec<&str> = self.sticky.element_ids().collect();
        ids.sort_unstable();
        let (pinned, in_flow): (Vec<&str>, Vec<&str>) = ids.into_iter().partition(|id| {
            self.sticky
                .node(id)
                .is_some_and(|n| n.style().positioning == Positioning::Fixed)
        });
        for id in in_flow.into_iter().chain(pinned) {
            self.render_sticky(&canvas, buf, id);
        }

        self.render_header(area, buf);
    }
}

impl PageView<'_> {
    fn render_hero(&self, canvas: &Canvas, buf: &mut Buffer) {
        let rect = self.layout.rect(Slot::Hero);
        let lines = vec![
            Line::raw(""),
            Line::from(Span::styled("  Autumn Home Collection", Theme::hero_style())),
            Line::from(Span::styled(
                "  Small-batch goods for slower evenings.",
                Theme::muted_style(),
            )),
            Line::raw(""),
            Line::raw(format!("  {} pieces in this collection.", self.layout.products.len())),
            Line::raw("  Scroll down; the order summary follows you."),
            Line::raw(""),
            Line::from(Span::styled(rule(rect.width), Theme::muted_style())),
        ];
        canvas.blit(buf, rect.y, rect.x, rect.width, lines);
    }

    fn render_products(&self, canvas: &Canvas, buf: &mut Buffer) {
        let details = self.layout.rect(Slot::Details);
        let width = details.width as usize;
        for (i, product) in self.layout.products.iter().enumerate() {
            let price = format_price(product.price_cents);
            let name_width = width.saturating_sub(price.len() + 3);
            let lines = vec![
                Line::from(vec![
                    Span::styled(format!("  {:<name_width$}", product.name), Theme::product_style()),
                    Span::styled(price, Theme::price_style()),
                ]),
                Line::from(Span::styled(format!("  {}", product.blurb), Theme::muted_style())),
                Line::raw(format!("  {}", stars(4 + (i % 2) as u8))),
                Line::raw(""),
                Line::from(Span::styled(dotted(details.width), Theme::muted_style())),
            ];
            canvas.blit(buf, self.layout.product_top(i), details.x, details.width, lines);
        }
    }

    fn render_reviews(&self, canvas: &Canvas, buf: &mut Buffer) {
        let reviews = self.layout.rect(Slot::Reviews);
        for i in 0..self.layout.review_count {
            let (who, text, score) = REVIEWERS[i as usize % REVIEWERS.len()];
            let lines = vec![
                Line::from(Span::styled(format!("  “{text}”"), Theme::review_style())),
                Line::raw(format!("  {}  {who}", stars(score))),
                Line::raw(""),
                Line::from(Span::styled(dotted(reviews.width), Theme::muted_style())),
            ];
            canvas.blit(buf, self.layout.review_top(i), reviews.x, reviews.width, lines);
        }
    }

    fn render_footer(&self, canvas: &Canvas, buf: &mut Buffer) {
        let rect = self.layout.rect(Slot::Footer);
        let width = rect.width as usize;
        let lines = [
            "",
            "  Storefront · Shipping · Returns · Contact",
            "  Prices include VAT.",
            "",
            "  End of page.",
            "",
        ]
        .into_iter()
        .map(|text| Line::from(Span::styled(pad(text, width), Theme::footer_style())))
        .collect();
        canvas.blit(buf, rect.y, rect.x, rect.width, lines);
    }

    fn render_sticky(&self, canvas: &Canvas, buf: &mut Buffer, id: &str) {
        let Some(node) = self.sticky.node(id) else {
            return;
        };
        let Some(rect) = node.document_rect() else {
            return;
        };
        let pinned = self.sticky.phase(id).is_some_and(|p| p.is_pinned());
        let style = node.style();

        // Fixed elements sit at a viewport-relative top; the canvas works in
        // document rows, so shift by the offset.
        let (top, left, width) = match (style.positioning, style.top) {
            (Positioning::Fixed, Some(top)) => (
                top + self.scroll_y,
                style.left.unwrap_or(rect.x),
                style.width.unwrap_or(rect.width),
            ),
            _ => (rect.y, rect.x, rect.width),
        };

        let lines = match id {
            SIDEBAR_ID => self.summary_lines(width, pinned),
            REVIEWS_HEADING_ID => self.heading_lines(width, pinned),
            _ => return,
        };
        canvas.blit(buf, top, left, width, lines);
    }

    fn summary_lines(&self, width: f64, pinned: bool) -> Vec<Line<'static>> {
        let inner = (width as usize).saturating_sub(4);
        let mut body: Vec<String> = vec![String::new()];
        for product in self.layout.products.iter().take(3) {
            let price = format_price(product.price_cents);
            let name_width = inner.saturating_sub(price.len() + 1);
            let name: String = product.name.chars().take(name_width).collect();
            body.push(format!("{name:<name_width$} {price}"));
        }
        body.resize(4, String::new());
        body.push("─".repeat(inner));
        body.push(two_column("Subtotal", &format_price(self.layout.subtotal_cents()), inner));
        body.push(two_column("Shipping", "Free", inner));
        body.push(String::new());
        body.push(format!("{:^inner$}", "[ Checkout ]"));

        boxed(" Order Summary ", &body, width as usize, Theme::summary_border_style(pinned))
    }

    fn heading_lines(&self, width: f64, pinned: bool) -> Vec<Line<'static>> {
        let width = width as usize;
        let title = format!("  ★ Customer Reviews ({})", self.layout.review_count);
        vec![
            Line::from(Span::styled(pad(&title, width), Theme::heading_style(pinned))),
            Line::from(Span::styled("═".repeat(width), Theme::heading_style(pinned))),
        ]
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let height = self.layout.header_height.min(area.height);
        if height == 0 {
            return;
        }
        let width = area.width as usize;
        let style = Theme::header_style();
        let percent = (self.progress * 100.0).round();

        for row in 0..height {
            let text = match row {
                0 if height == 1 => format!(" Storefront  {percent:>3}% read"),
                0 => " Storefront   Home  Shop  Journal  About".to_string(),
                r if r == height - 1 => progress_bar(self.progress, width),
                _ => String::new(),
            };
            let line = Line::from(Span::styled(pad(&text, width), style));
            buf.set_line(area.x, area.y + row, &line, area.width);
        }
    }
}

// ───────────────────────────────────────── helpers ───────────

/// The viewport as a window onto document rows.
struct Canvas {
    area: Rect,
    scroll_y: f64,
}

impl Canvas {
    /// Draw `lines` starting at document row `doc_top`, clipped to the
    /// viewport on every side.
    fn blit(&self, buf: &mut Buffer, doc_top: f64, left: f64, width: f64, lines: Vec<Line<'_>>) {
        let left = left.max(0.0) as u16;
        if left >= self.area.width {
            return;
        }
        let width = (width.max(0.0) as u16).min(self.area.width - left);
        let first_row = (doc_top - self.scroll_y).round() as i64;

        for (i, line) in lines.into_iter().enumerate() {
            let row = first_row + i as i64;
            if row < 0 {
                continue;
            }
            if row >= i64::from(self.area.height) {
                break;
            }
            buf.set_line(self.area.x + left, self.area.y + row as u16, &line, width);
        }
    }
}

fn boxed(title: &str, body: &[String], width: usize, border: Style) -> Vec<Line<'static>> {
    let inner = width.saturating_sub(2);
    let title: String = title.chars().take(inner).collect();
    let fill = inner.saturating_sub(title.chars().count());

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(Line::from(Span::styled(
        format!("╭{title}{}╮", "─".repeat(fill)),
        border,
    )));
    for text in body {
        lines.push(Line::from(vec![
            Span::styled("│ ", border),
            Span::raw(pad(text, inner.saturating_sub(2))),
            Span::styled(" │", border),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!("╰{}╯", "─".repeat(inner)),
        border,
    )));
    lines
}

/// Pad or truncate to exactly `width` characters.
fn pad(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

fn two_column(left: &str, right: &str, width: usize) -> String {
    let gap = width.saturating_sub(right.chars().count());
    format!("{left:<gap$}{right}")
}

fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "━".repeat(filled), "─".repeat(width - filled))
}

fn rule(width: f64) -> String {
    "─".repeat(width.max(0.0) as usize)
}

fn dotted(width: f64) -> String {
    format!("  {}", "┄".repeat((width.max(0.0) as usize).saturating_sub(4)))
}

fn stars(score: u8) -> String {
    let score = usize::from(score.min(5));
    format!("{}{}", "★".repeat(score), "☆".repeat(5 - score))
}

pub fn format_price(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sticky::StickyConfig;
    use crate::app::page::HeaderLandmark;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn manager(layout: &crate::app::page::SharedLayout) -> StickyManager<PageNode> {
        let mut sticky =
            StickyManager::new(HeaderLandmark(std::rc::Rc::clone(layout)), StickyConfig::default());
        let node = PageNode::order_summary(layout);
        let bounds = node.initial_bounds().unwrap();
        sticky.add_element(SIDEBAR_ID, node, bounds, 1.0);
        sticky
    }

    #[test]
    fn pinned_summary_renders_below_the_header() {
        let layout = PageLayout::new(90, 3, 10).shared();
        let mut sticky = manager(&layout);
        sticky.update(20.0);

        let area = Rect::new(0, 0, 90, 24);
        let mut buf = Buffer::empty(area);
        let l = layout.borrow();
        PageView {
            layout: &l,
            sticky: &sticky,
            scroll_y: 20.0,
            progress: 0.2,
        }
        .render(area, &mut buf);

        // header 3 + offset 1
        assert!(row_text(&buf, 4).contains("Order Summary"));
        assert!(row_text(&buf, 0).contains("Storefront"));
    }

    #[test]
    fn in_flow_summary_scrolls_with_the_page() {
        let layout = PageLayout::new(90, 3, 10).shared();
        let sticky = manager(&layout);

        let area = Rect::new(0, 0, 90, 30);
        let mut buf = Buffer::empty(area);
        let l = layout.borrow();
        PageView {
            layout: &l,
            sticky: &sticky,
            scroll_y: 0.0,
            progress: 0.0,
        }
        .render(area, &mut buf);

        let top = l.rect(Slot::Sidebar).y as u16;
        assert!(row_text(&buf, top).contains("Order Summary"));
    }

    #[test]
    fn helpers_fit_their_width() {
        assert_eq!(pad("abc", 5), "abc  ");
        assert_eq!(pad("abcdef", 3), "abc");
        assert_eq!(progress_bar(0.5, 10).chars().count(), 10);
        assert_eq!(format_price(1234), "$12.34");
        assert_eq!(stars(3), "★★★☆☆");
    }
}
