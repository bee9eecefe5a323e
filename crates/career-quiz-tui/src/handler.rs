use std::sync::Arc;

use anyhow::Result;
use career_quiz_core::{Action, Region, ViewState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::app::App;
use crate::tui::AppEvent;

/// What a key press means in the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Submit,
    Reveal,
    Grade(bool),
    Retry,
    Insert(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    ListDown,
    ListUp,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent, tx: &UnboundedSender<AppEvent>) -> Result<()> {
    match event {
        AppEvent::Key(key) => {
            if let Some(action) = key_action(&app.view, key) {
                apply_key_action(app, action, tx);
            }
        }
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Reply(reply) => {
            app.controller.complete(reply, &mut app.view);
            app.sync_lists();
        }
    }
    Ok(())
}

/// Map a key press to an action. Quiz keys only fire while their control
/// region is visible.
pub fn key_action(view: &ViewState, key: KeyEvent) -> Option<KeyAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(KeyAction::Quit);
    }

    if view.is_visible(Region::StartView) {
        return match key.code {
            KeyCode::Esc => Some(KeyAction::Quit),
            KeyCode::Enter => Some(KeyAction::Submit),
            KeyCode::Backspace => Some(KeyAction::Backspace),
            KeyCode::Delete => Some(KeyAction::Delete),
            KeyCode::Left => Some(KeyAction::CursorLeft),
            KeyCode::Right => Some(KeyAction::CursorRight),
            KeyCode::Home => Some(KeyAction::CursorHome),
            KeyCode::End => Some(KeyAction::CursorEnd),
            KeyCode::Char(c) => Some(KeyAction::Insert(c)),
            _ => None,
        };
    }

    let control = |region: Region, action: KeyAction| view.is_visible(region).then_some(action);

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(KeyAction::ListDown),
        KeyCode::Char('k') | KeyCode::Up => Some(KeyAction::ListUp),
        KeyCode::Char('r') | KeyCode::Char(' ') => control(Region::RevealControl, KeyAction::Reveal),
        KeyCode::Char('y') => control(Region::CorrectControl, KeyAction::Grade(true)),
        KeyCode::Char('n') => control(Region::IncorrectControl, KeyAction::Grade(false)),
        KeyCode::Char('t') => control(Region::RetryControl, KeyAction::Retry),
        _ => None,
    }
}

fn apply_key_action(app: &mut App, action: KeyAction, tx: &UnboundedSender<AppEvent>) {
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::Submit => {
            let career = app.career_input.clone();
            dispatch(app, Action::Begin(career), tx);
        }
        KeyAction::Reveal => dispatch(app, Action::Reveal, tx),
        KeyAction::Grade(correct) => dispatch(app, Action::Grade(correct), tx),
        KeyAction::Retry => dispatch(app, Action::Retry, tx),
        KeyAction::Insert(c) => {
            let byte_pos = char_to_byte_index(&app.career_input, app.career_cursor);
            app.career_input.insert(byte_pos, c);
            app.career_cursor += 1;
        }
        KeyAction::Backspace => {
            if app.career_cursor > 0 {
                app.career_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.career_input, app.career_cursor);
                app.career_input.remove(byte_pos);
            }
        }
        KeyAction::Delete => {
            let char_count = app.career_input.chars().count();
            if app.career_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.career_input, app.career_cursor);
                app.career_input.remove(byte_pos);
            }
        }
        KeyAction::CursorLeft => {
            app.career_cursor = app.career_cursor.saturating_sub(1);
        }
        KeyAction::CursorRight => {
            let char_count = app.career_input.chars().count();
            app.career_cursor = (app.career_cursor + 1).min(char_count);
        }
        KeyAction::CursorHome => app.career_cursor = 0,
        KeyAction::CursorEnd => app.career_cursor = app.career_input.chars().count(),
        KeyAction::ListDown => app.list_down(),
        KeyAction::ListUp => app.list_up(),
    }
}

/// Apply the synchronous half of `action` and run the request on a
/// background task. The reply comes back through the event channel.
fn dispatch(app: &mut App, action: Action, tx: &UnboundedSender<AppEvent>) {
    let name = action.name();
    match app.controller.start(action, &mut app.view) {
        Ok(pending) => {
            let service = Arc::clone(&app.service);
            let tx = tx.clone();
            tokio::spawn(async move {
                let reply = pending.send(service.as_ref()).await;
                let _ = tx.send(AppEvent::Reply(reply));
            });
        }
        Err(e) => debug!(action = name, error = %e, "action not applied"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use career_quiz_core::View;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn question_view() -> ViewState {
        let mut view = ViewState::new();
        view.hide(Region::StartView);
        view.show(Region::QuestionView);
        view
    }

    #[test]
    fn start_view_keys_edit_input() {
        let view = ViewState::new();
        assert_eq!(key_action(&view, press(KeyCode::Char('q'))), Some(KeyAction::Insert('q')));
        assert_eq!(key_action(&view, press(KeyCode::Enter)), Some(KeyAction::Submit));
        assert_eq!(key_action(&view, press(KeyCode::Esc)), Some(KeyAction::Quit));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_action(&ViewState::new(), ctrl_c), Some(KeyAction::Quit));
        assert_eq!(key_action(&question_view(), ctrl_c), Some(KeyAction::Quit));
    }

    #[test]
    fn quiz_keys_follow_visible_controls() {
        let mut view = question_view();
        assert_eq!(key_action(&view, press(KeyCode::Char('r'))), None);
        assert_eq!(key_action(&view, press(KeyCode::Char('t'))), None);

        view.show(Region::RevealControl);
        view.show(Region::CorrectControl);
        view.show(Region::IncorrectControl);
        assert_eq!(key_action(&view, press(KeyCode::Char('r'))), Some(KeyAction::Reveal));
        assert_eq!(key_action(&view, press(KeyCode::Char('y'))), Some(KeyAction::Grade(true)));
        assert_eq!(key_action(&view, press(KeyCode::Char('n'))), Some(KeyAction::Grade(false)));
        assert_eq!(key_action(&view, press(KeyCode::Char('t'))), None);

        view.hide(Region::RevealControl);
        view.show(Region::RetryControl);
        assert_eq!(key_action(&view, press(KeyCode::Char('r'))), None);
        assert_eq!(key_action(&view, press(KeyCode::Char('t'))), Some(KeyAction::Retry));
    }

    #[test]
    fn utf8_cursor_index() {
        assert_eq!(char_to_byte_index("café", 3), 3);
        assert_eq!(char_to_byte_index("café", 4), 5);
        assert_eq!(char_to_byte_index("", 2), 0);
    }
}
