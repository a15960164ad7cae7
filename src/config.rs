//! User configuration: engine tunables and demo keybindings.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/sticky-scroll/config.toml`
//! (default `~/.config/sticky-scroll/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::coordinator::{CoordinatorConfig, SubscriberOptions};
use crate::core::phase::StabilityGate;
use crate::core::sticky::StickyConfig;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    RefreshBounds,
    ResetSticky,
    ToggleSticky,
    CycleHeader,
    ToggleDiagnostics,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help overlay).
    pub const ALL: &[Action] = &[
        Action::LineUp,
        Action::LineDown,
        Action::PageUp,
        Action::PageDown,
        Action::Top,
        Action::Bottom,
        Action::RefreshBounds,
        Action::ResetSticky,
        Action::ToggleSticky,
        Action::CycleHeader,
        Action::ToggleDiagnostics,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::LineUp => "Scroll Up",
            Action::LineDown => "Scroll Down",
            Action::PageUp => "Page Up",
            Action::PageDown => "Page Down",
            Action::Top => "Top of Page",
            Action::Bottom => "Bottom of Page",
            Action::RefreshBounds => "Refresh Bounds",
            Action::ResetSticky => "Reset Sticky",
            Action::ToggleSticky => "Toggle Sticky",
            Action::CycleHeader => "Header Size",
            Action::ToggleDiagnostics => "Diagnostics",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::LineUp => "line_up",
            Action::LineDown => "line_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::RefreshBounds => "refresh_bounds",
            Action::ResetSticky => "reset_sticky",
            Action::ToggleSticky => "toggle_sticky",
            Action::CycleHeader => "cycle_header",
            Action::ToggleDiagnostics => "toggle_diagnostics",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"↓"`, `"Ctrl+c"`, `"PgDn"`).
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        };
        format!("{}{key}", self.modifier_prefix())
    }

    /// Serialise to config-file format (e.g. `"Down"`, `"Ctrl+c"`).
    fn to_config_string(&self) -> String {
        let key = match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        };
        format!("{}{key}", self.modifier_prefix())
    }

    /// Parse a key string like `"Ctrl+c"`, `"PageDown"`, `"j"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Quiet window before the scroll-end signal fires.
    pub scroll_end_quiet_ms: u64,
    /// Scroll delta per frame above which the stability check kicks in.
    pub rapid_scroll_threshold_px: f64,
    /// Largest held-back position change during rapid scrolling.
    pub stability_tolerance_px: f64,
    pub default_priority: i32,
    pub default_throttle_ms: u64,
    /// Damping of the smooth-scroll animator (0.05–0.95).
    pub smooth_scroll_speed: f64,
    /// Animation frame interval of the demo loop.
    pub frame_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            scroll_end_quiet_ms: 150,
            rapid_scroll_threshold_px: 50.0,
            stability_tolerance_px: 2.0,
            default_priority: 5,
            default_throttle_ms: 8,
            smooth_scroll_speed: 0.35,
            frame_interval_ms: 16,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(LineUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(LineDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('b'), n)]);
        m.insert(
            Action::PageDown,
            vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)],
        );
        m.insert(Top, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(Bottom, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), KeyModifiers::SHIFT)]);
        m.insert(RefreshBounds, vec![KeyBind::new(Char('r'), n)]);
        m.insert(ResetSticky, vec![KeyBind::new(Char('x'), n)]);
        m.insert(ToggleSticky, vec![KeyBind::new(Char('s'), n)]);
        m.insert(CycleHeader, vec![KeyBind::new(Char('h'), n)]);
        m.insert(ToggleDiagnostics, vec![KeyBind::new(Char('d'), n), KeyBind::new(F(2), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action that matches a key event.  With several matches the
    /// binding with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"↓/j"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: refresh | {}: reset | {}: diagnostics | {}: quit",
            self.short_binding(Action::LineUp),
            self.short_binding(Action::LineDown),
            self.short_binding(Action::RefreshBounds),
            self.short_binding(Action::ResetSticky),
            self.short_binding(Action::ToggleDiagnostics),
            self.short_binding(Action::Quit),
        )
    }

    // ── engine configs ──────────────────────────────────────────

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            scroll_end_quiet: Duration::from_millis(self.scroll_end_quiet_ms),
            defaults: SubscriberOptions {
                priority: self.default_priority,
                throttle: Duration::from_millis(self.default_throttle_ms),
                enabled: true,
            },
        }
    }

    pub fn sticky_config(&self) -> StickyConfig {
        StickyConfig {
            gate: StabilityGate {
                rapid_threshold: self.rapid_scroll_threshold_px,
                tolerance: self.stability_tolerance_px,
            },
            ..StickyConfig::default()
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), "cannot read config: {err}");
                }
                Self::default()
            }
        }
    }

    /// Persist current config to disk, returning the path written.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(path)
    }

    /// Parse the config text.  Unknown keys and malformed values are
    /// ignored; anything missing keeps its default.
    pub fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Engine settings.
            match key {
                "scroll_end_quiet_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.scroll_end_quiet_ms = v.clamp(16, 2000);
                    }
                    continue;
                }
                "rapid_scroll_threshold_px" => {
                    if let Ok(v) = value.parse::<f64>() {
                        if v.is_finite() && v >= 0.0 {
                            config.rapid_scroll_threshold_px = v;
                        }
                    }
                    continue;
                }
                "stability_tolerance_px" => {
                    if let Ok(v) = value.parse::<f64>() {
                        if v.is_finite() && v >= 0.0 {
                            config.stability_tolerance_px = v;
                        }
                    }
                    continue;
                }
                "default_priority" => {
                    if let Ok(v) = value.parse::<i32>() {
                        config.default_priority = v;
                    }
                    continue;
                }
                "default_throttle_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.default_throttle_ms = v.min(1000);
                    }
                    continue;
                }
                "smooth_scroll_speed" => {
                    if let Ok(v) = value.parse::<f64>() {
                        if v.is_finite() {
                            config.smooth_scroll_speed = v.clamp(0.05, 0.95);
                        }
                    }
                    continue;
                }
                "frame_interval_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.frame_interval_ms = v.clamp(4, 100);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    pub fn serialise(&self) -> String {
        let mut lines = vec![
            "# sticky-scroll configuration".to_string(),
            String::new(),
            "# Engine".to_string(),
            format!("scroll_end_quiet_ms = {}", self.scroll_end_quiet_ms),
            format!("rapid_scroll_threshold_px = {}", self.rapid_scroll_threshold_px),
            format!("stability_tolerance_px = {}", self.stability_tolerance_px),
            format!("default_priority = {}", self.default_priority),
            format!("default_throttle_ms = {}", self.default_throttle_ms),
            String::new(),
            "# Demo".to_string(),
            format!("smooth_scroll_speed = {}", self.smooth_scroll_speed),
            format!("frame_interval_ms = {}", self.frame_interval_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/sticky-scroll/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("sticky-scroll").join("config.toml")
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventKind;

    use super::*;

    #[test]
    fn defaults_match_engine_constants() {
        let config = AppConfig::default();
        assert_eq!(config.coordinator_config(), CoordinatorConfig::default());
        assert_eq!(config.sticky_config(), StickyConfig::default());
    }

    #[test]
    fn serialised_config_parses_back() {
        let mut config = AppConfig {
            scroll_end_quiet_ms: 300,
            stability_tolerance_px: 4.5,
            ..AppConfig::default()
        };
        config
            .bindings
            .insert(Action::Quit, vec![KeyBind::new(KeyCode::Char('c'), KeyModifiers::CONTROL)]);
        assert_eq!(AppConfig::parse(&config.serialise()), config);
    }

    #[test]
    fn bad_values_are_ignored_or_clamped() {
        let config = AppConfig::parse(
            "scroll_end_quiet_ms = 5\n\
             rapid_scroll_threshold_px = -3\n\
             default_throttle_ms = lots\n\
             quit = Hyper+q\n\
             nonsense",
        );
        assert_eq!(config.scroll_end_quiet_ms, 16);
        assert_eq!(config.rapid_scroll_threshold_px, 50.0);
        assert_eq!(config.default_throttle_ms, 8);
        assert_eq!(config.bindings, AppConfig::default_bindings());
    }

    #[test]
    fn key_matching_prefers_more_modifiers() {
        let mut config = AppConfig::default();
        config.bindings.insert(
            Action::ResetSticky,
            vec![KeyBind::new(KeyCode::Char('r'), KeyModifiers::CONTROL)],
        );
        let plain = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        let ctrl = KeyEvent::new_with_kind(KeyCode::Char('r'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(config.match_key(plain), Some(Action::RefreshBounds));
        assert_eq!(config.match_key(ctrl), Some(Action::ResetSticky));
    }

    #[test]
    fn uppercase_binding_keeps_its_case() {
        assert_eq!(
            KeyBind::parse("Shift+G"),
            Some(KeyBind::new(KeyCode::Char('G'), KeyModifiers::SHIFT))
        );
    }
}
