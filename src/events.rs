//! Key event translation.
//!
//! Maps raw key presses to [`Intent`]s according to what is on screen: the
//! confirmation prompt, a list filter being typed, or plain navigation. The
//! mouse wheel moves like the arrow keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, Intent};

/// Translate a key press into the intent it expresses right now.
pub fn key_to_intent(app: &App, key: KeyEvent) -> Intent {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return Intent::ForceQuit;
    }

    if app.confirm.is_open() {
        return confirm_key(key);
    }

    if app.is_filter_editing() && !app.loading {
        return filter_key(key, ctrl);
    }

    match key.code {
        KeyCode::Char('k') if ctrl => Intent::RequestApply,
        KeyCode::Char('q') => Intent::Quit,
        KeyCode::Char('?') => Intent::ToggleHelp,
        KeyCode::Char('/') => Intent::StartFilter,
        KeyCode::Char('r') => Intent::Refresh,
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Intent::Select,
        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => Intent::Back,
        KeyCode::Char('j') | KeyCode::Down => Intent::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Intent::MoveUp,
        KeyCode::PageDown => Intent::PageDown,
        KeyCode::PageUp => Intent::PageUp,
        KeyCode::Char('d') if ctrl => Intent::PageDown,
        KeyCode::Char('u') if ctrl => Intent::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Intent::Top,
        KeyCode::Char('G') | KeyCode::End => Intent::Bottom,
        _ => Intent::Unbound,
    }
}

/// Wheel scrolling, outside of popups. Other mouse events carry no intent.
pub fn mouse_to_intent(app: &App, mouse: MouseEvent) -> Option<Intent> {
    if app.confirm.is_open() || app.show_help {
        return None;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(Intent::MoveUp),
        MouseEventKind::ScrollDown => Some(Intent::MoveDown),
        _ => None,
    }
}

fn confirm_key(key: KeyEvent) -> Intent {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Intent::Confirm,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Intent::Cancel,
        _ => Intent::Unbound,
    }
}

fn filter_key(key: KeyEvent, ctrl: bool) -> Intent {
    match key.code {
        KeyCode::Esc => Intent::Cancel,
        KeyCode::Enter => Intent::AcceptFilter,
        KeyCode::Backspace => Intent::FilterBackspace,
        KeyCode::Up => Intent::MoveUp,
        KeyCode::Down => Intent::MoveDown,
        KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            Intent::FilterChar(ch)
        }
        _ => Intent::Unbound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::PendingAction;
    use crate::app::Message;
    use crate::loader::TaskResult;
    use crate::stash::parse_stash_list;

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn app() -> App {
        let mut app = App::new();
        app.start();
        app.update(Message::Completed(TaskResult::Stashes(Ok(parse_stash_list(
            "stash@{0}: On main: fix bug",
        )))));
        app
    }

    #[test]
    fn navigation_keys() {
        let app = app();
        assert_eq!(key_to_intent(&app, key(KeyCode::Enter)), Intent::Select);
        assert_eq!(key_to_intent(&app, key(KeyCode::Esc)), Intent::Back);
        assert_eq!(key_to_intent(&app, key(KeyCode::Char('j'))), Intent::MoveDown);
        assert_eq!(key_to_intent(&app, key(KeyCode::Char('q'))), Intent::Quit);
        assert_eq!(key_to_intent(&app, ctrl('k')), Intent::RequestApply);
        assert_eq!(key_to_intent(&app, ctrl('c')), Intent::ForceQuit);
        assert_eq!(key_to_intent(&app, key(KeyCode::Char('x'))), Intent::Unbound);
    }

    #[test]
    fn prompt_keys() {
        let mut app = app();
        let entry = app.stashes.items()[0].clone();
        app.confirm.open(PendingAction::whole_stash(&entry));

        assert_eq!(key_to_intent(&app, key(KeyCode::Char('y'))), Intent::Confirm);
        assert_eq!(key_to_intent(&app, key(KeyCode::Char('Y'))), Intent::Confirm);
        // Enter drills in elsewhere; it must not restore anything here.
        assert_eq!(key_to_intent(&app, key(KeyCode::Enter)), Intent::Unbound);
        assert_eq!(key_to_intent(&app, key(KeyCode::Char('n'))), Intent::Cancel);
        assert_eq!(key_to_intent(&app, key(KeyCode::Esc)), Intent::Cancel);
        assert_eq!(key_to_intent(&app, key(KeyCode::Char('q'))), Intent::Unbound);
    }

    #[test]
    fn filter_takes_text() {
        let mut app = app();
        app.update(Message::Intent(Intent::StartFilter));

        assert_eq!(
            key_to_intent(&app, key(KeyCode::Char('q'))),
            Intent::FilterChar('q')
        );
        assert_eq!(key_to_intent(&app, key(KeyCode::Enter)), Intent::AcceptFilter);
        assert_eq!(key_to_intent(&app, key(KeyCode::Esc)), Intent::Cancel);
        assert_eq!(key_to_intent(&app, ctrl('c')), Intent::ForceQuit);
    }

    #[test]
    fn wheel_moves_the_selection() {
        let mut app = app();
        assert_eq!(
            mouse_to_intent(&app, mouse(MouseEventKind::ScrollDown)),
            Some(Intent::MoveDown)
        );
        assert_eq!(
            mouse_to_intent(&app, mouse(MouseEventKind::ScrollUp)),
            Some(Intent::MoveUp)
        );
        assert_eq!(mouse_to_intent(&app, mouse(MouseEventKind::Moved)), None);

        app.update(Message::Intent(Intent::ToggleHelp));
        assert_eq!(mouse_to_intent(&app, mouse(MouseEventKind::ScrollDown)), None);
        app.update(Message::Intent(Intent::Unbound));

        let entry = app.stashes.items()[0].clone();
        app.confirm.open(PendingAction::whole_stash(&entry));
        assert_eq!(mouse_to_intent(&app, mouse(MouseEventKind::ScrollDown)), None);
    }

    #[test]
    fn wheel_scrolls_the_diff_and_respects_loading() {
        let mut app = app();
        app.update(Message::Intent(Intent::Select));
        assert!(app.loading);
        let intent = mouse_to_intent(&app, mouse(MouseEventKind::ScrollDown)).unwrap();
        app.update(Message::Intent(intent));
        assert!(app.loading);
        assert_eq!(app.view, crate::app::View::StashList);

        app.update(Message::Completed(TaskResult::Files {
            stash_ref: "stash@{0}".to_string(),
            result: Ok(crate::stash::parse_file_list("M\0a.txt")),
        }));
        app.update(Message::Intent(Intent::Select));
        let text: Vec<String> = (0..60).map(|i| format!("+line {i}")).collect();
        app.update(Message::Completed(TaskResult::Diff {
            file: "a.txt".to_string(),
            result: Ok(text.join("\n")),
        }));
        assert_eq!(app.diff_scroll, 0);

        let intent = mouse_to_intent(&app, mouse(MouseEventKind::ScrollDown)).unwrap();
        app.update(Message::Intent(intent));
        assert_eq!(app.diff_scroll, 1);
    }
}
