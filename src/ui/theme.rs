//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central palette; change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── page content ───────────────────────────────────────────
    pub fn hero_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn product_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn price_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn review_style() -> Style {
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn footer_style() -> Style {
        Style::default().bg(Color::Black).fg(Color::Gray)
    }

    // ── sticky elements ────────────────────────────────────────
    pub fn summary_border_style(pinned: bool) -> Style {
        if pinned {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    pub fn heading_style(pinned: bool) -> Style {
        let base = Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD);
        if pinned {
            base.bg(Color::Black)
        } else {
            base
        }
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn header_style() -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
