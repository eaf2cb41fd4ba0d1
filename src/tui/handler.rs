use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Section;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    NextSection,
    PrevSection,
    GoTo(Section),
    ToggleTheme,
    ShowHelp,
    HideHelp,
    MoveUp,
    MoveDown,
    /// Enter: summarize, evaluate, or expand the selected record.
    Submit,
    DeleteRecord,
    ClearInputs,
    OpenModelPage,
    CopySummary,
    // Text input actions
    EditPrimary,
    EditReference,
    EditCandidate,
    InputChar(char),
    InputNewline,
    InputBackspace,
    StopEditing,
    Paste(String),
}

pub fn handle_key_event(key: KeyEvent, editing: bool, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    // Text input mode
    if editing {
        return match (key.code, key.modifiers) {
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => Some(AppAction::Submit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),
            (KeyCode::Esc, _) => Some(AppAction::StopEditing),
            (KeyCode::Enter, _) => Some(AppAction::InputNewline),
            (KeyCode::Backspace, _) => Some(AppAction::InputBackspace),
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
                Some(AppAction::InputChar(c))
            }
            _ => None,
        };
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Tab, _) => Some(AppAction::NextSection),
        (KeyCode::BackTab, _) => Some(AppAction::PrevSection),
        (KeyCode::Char('1'), _) => Some(AppAction::GoTo(Section::Summarize)),
        (KeyCode::Char('2'), _) => Some(AppAction::GoTo(Section::History)),
        (KeyCode::Char('3'), _) => Some(AppAction::GoTo(Section::Evaluate)),
        (KeyCode::Char('4'), _) => Some(AppAction::GoTo(Section::ModelInfo)),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),

        (KeyCode::Enter, _) => Some(AppAction::Submit),

        (KeyCode::Char('i'), _) => Some(AppAction::EditPrimary),
        (KeyCode::Char('r'), _) => Some(AppAction::EditReference),
        (KeyCode::Char('c'), _) => Some(AppAction::EditCandidate),
        (KeyCode::Char('d'), _) => Some(AppAction::DeleteRecord),
        (KeyCode::Char('x'), _) => Some(AppAction::ClearInputs),
        (KeyCode::Char('o'), _) => Some(AppAction::OpenModelPage),
        (KeyCode::Char('y'), _) => Some(AppAction::CopySummary),
        (KeyCode::Char('t'), _) => Some(AppAction::ToggleTheme),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn help_swallows_any_key() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), false, true),
            Some(AppAction::HideHelp)
        );
    }

    #[test]
    fn normal_mode_bindings() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), false, false), Some(AppAction::Quit));
        assert_eq!(handle_key_event(ctrl('c'), false, false), Some(AppAction::Quit));
        assert_eq!(
            handle_key_event(key(KeyCode::Char('c')), false, false),
            Some(AppAction::EditCandidate)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('3')), false, false),
            Some(AppAction::GoTo(Section::Evaluate))
        );
        assert_eq!(handle_key_event(key(KeyCode::Enter), false, false), Some(AppAction::Submit));
        assert_eq!(
            handle_key_event(key(KeyCode::Char('y')), false, false),
            Some(AppAction::CopySummary)
        );
        assert_eq!(handle_key_event(key(KeyCode::F(1)), false, false), None);
    }

    #[test]
    fn editing_mode_types_text() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), true, false),
            Some(AppAction::InputChar('q'))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('ก')), true, false),
            Some(AppAction::InputChar('ก'))
        );
        assert_eq!(handle_key_event(key(KeyCode::Enter), true, false), Some(AppAction::InputNewline));
        assert_eq!(handle_key_event(key(KeyCode::Esc), true, false), Some(AppAction::StopEditing));
        assert_eq!(handle_key_event(ctrl('s'), true, false), Some(AppAction::Submit));
        assert_eq!(
            handle_key_event(key(KeyCode::Char('y')), true, false),
            Some(AppAction::InputChar('y'))
        );
        assert_eq!(handle_key_event(ctrl('x'), true, false), None);
    }
}
