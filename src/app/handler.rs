//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::config::Action;

use super::state::AppState;

/// Rows scrolled per mouse-wheel notch.
const WHEEL_STEP: f64 = 3.0;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Ctrl+c always quits, regardless of bindings.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    // Esc closes the diagnostics overlay before it can mean anything else.
    if state.show_diagnostics && key.code == KeyCode::Esc {
        state.show_diagnostics = false;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    state.status_message = None;

    match action {
        Action::LineUp => state.scroll.scroll_by(-1.0),
        Action::LineDown => state.scroll.scroll_by(1.0),
        Action::PageUp => {
            let step = state.page_step();
            state.scroll.scroll_by(-step);
        }
        Action::PageDown => {
            let step = state.page_step();
            state.scroll.scroll_by(step);
        }
        Action::Top => state.scroll.scroll_to(0.0),
        Action::Bottom => state.scroll_to_bottom(),
        Action::RefreshBounds => state.refresh_bounds(),
        Action::ResetSticky => state.reset_sticky(),
        Action::ToggleSticky => state.toggle_sidebar(),
        Action::CycleHeader => state.cycle_header(),
        Action::ToggleDiagnostics => state.show_diagnostics = !state.show_diagnostics,
        Action::Quit => state.should_quit = true,
    }
}

/// Process a mouse event.  Only the wheel does anything on the page.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => state.scroll.scroll_by(WHEEL_STEP),
        MouseEventKind::ScrollUp => state.scroll.scroll_by(-WHEEL_STEP),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::page::PageLayout;
    use crate::config::AppConfig;

    fn state() -> AppState {
        AppState::new(AppConfig::default(), PageLayout::new(100, 3, 10).shared(), 1.0, 30)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn page_down_moves_the_target_by_a_screen() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::PageDown));
        assert_eq!(state.scroll.target(), 26.0);
        handle_key(&mut state, press(KeyCode::Up));
        assert_eq!(state.scroll.target(), 25.0);
    }

    #[test]
    fn escape_closes_diagnostics_before_quitting() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::Char('d')));
        assert!(state.show_diagnostics);
        handle_key(&mut state, press(KeyCode::Esc));
        assert!(!state.show_diagnostics);
        assert!(!state.should_quit);
        handle_key(&mut state, press(KeyCode::Esc));
        assert!(state.should_quit);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut state = state();
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
    }

    #[test]
    fn toggle_key_deactivates_the_summary() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::Char('s')));
        assert!(!state.sidebar_enabled);
        assert!(state.status_message.is_some());
    }
}
