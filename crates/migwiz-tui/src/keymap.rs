use crossterm::event::{KeyCode, KeyEvent};

pub(crate) fn is_back(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
}

pub(crate) fn is_confirm(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter)
}

pub(crate) fn is_up(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up)
}

pub(crate) fn is_down(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down)
}

pub(crate) fn is_field_switch(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Tab | KeyCode::BackTab)
}

pub(crate) fn is_toggle(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(' '))
}

pub(crate) fn is_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{is_back, is_confirm, is_down, is_field_switch, is_quit, is_toggle, is_up};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrow_keys_match_contract() {
        assert!(is_up(key(KeyCode::Up)));
        assert!(is_down(key(KeyCode::Down)));
        assert!(!is_up(key(KeyCode::Down)));
    }

    #[test]
    fn field_switch_matches_tab_in_both_directions() {
        assert!(is_field_switch(key(KeyCode::Tab)));
        assert!(is_field_switch(key(KeyCode::BackTab)));
        assert!(!is_field_switch(key(KeyCode::Enter)));
    }

    #[test]
    fn confirm_back_toggle_and_quit_match_contract() {
        assert!(is_confirm(key(KeyCode::Enter)));
        assert!(is_back(key(KeyCode::Esc)));
        assert!(is_toggle(key(KeyCode::Char(' '))));
        assert!(is_quit(key(KeyCode::Char('q'))));
        assert!(!is_back(key(KeyCode::Enter)));
    }
}
