//! Diagnostics overlay: coordinator statistics, per-element sticky state
//! and the current key bindings.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::page::PageNode;
use crate::config::{Action, AppConfig};
use crate::core::coordinator::ScrollCoordinator;
use crate::core::sticky::StickyManager;

pub struct DiagnosticsPopup<'a> {
    pub coordinator: &'a ScrollCoordinator,
    pub sticky: &'a StickyManager<PageNode>,
    pub config: &'a AppConfig,
}

impl Widget for DiagnosticsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let stats = self.coordinator.performance_stats();
        let mut ids: Vec<&str> = self.sticky.element_ids().collect();
        ids.sort_unstable();

        // stats rows + element rows + action rows + blanks/headings + border
        let height = 6 + ids.len() as u16 + Action::ALL.len() as u16 + 8;
        let popup = centered_fixed(58, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Diagnostics ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let heading = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let value = Style::default().fg(Color::Yellow);

        let row = |label: &str, v: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<16}"), dim),
                Span::styled(v, value),
            ])
        };

        let mut lines = vec![Line::raw("")];
        lines.push(row("frames", stats.frame_count.to_string()));
        lines.push(row(
            "avg frame",
            format!("{:.3} ms", stats.average_frame_time.as_secs_f64() * 1000.0),
        ));
        lines.push(row("subscribers", stats.subscriber_count.to_string()));
        lines.push(row(
            "scroll y",
            format!(
                "{:.0}{}",
                self.coordinator.current_scroll_y(),
                if self.coordinator.is_currently_scrolling() { " (scrolling)" } else { "" },
            ),
        ));
        lines.push(row("header", format!("{:.0}", self.sticky.header_height())));

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("  Sticky elements", heading)));
        for id in ids {
            let Some(state) = self.sticky.state(id) else {
                continue;
            };
            let top = state
                .last_valid_position
                .map_or_else(|| "flow".to_string(), |t| format!("top {t:.0}"));
            let mut flags = Vec::new();
            if !self.sticky.is_active(id) {
                flags.push("inactive");
            }
            if !state.is_stable {
                flags.push("rapid");
            }
            lines.push(row(
                id,
                format!("{:<13}{:<9}{}", state.phase.as_str(), top, flags.join(" ")),
            ));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("  Controls", heading)));
        for &action in Action::ALL {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<22}", action.label()), Style::default().fg(Color::White)),
                Span::styled(self.config.display_bindings(action), value),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("  Esc: close", dim)));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
