//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::KeyCode;

use super::actions::{Action, Effect};
use super::state::{App, AppMode};

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, key: KeyCode) -> Option<Action> {
    match mode {
        AppMode::Normal => match key {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::Char('r') => Some(Action::Retry),
            KeyCode::Enter => Some(Action::Submit),
            _ => None,
        },
        // 弹窗中字母用于过滤，只用方向键移动
        AppMode::Picking(_) => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Up => Some(Action::MoveUp),
            KeyCode::Down => Some(Action::MoveDown),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::Alert(_) => match key {
            KeyCode::Enter | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

/// 处理按键事件
pub fn handle_key_event(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match get_action(&app.mode, key) {
        Some(action) => app.dispatch(action),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::state::{Alert, Dropdown};

    #[test]
    fn test_letters_filter_while_picking() {
        let picking = AppMode::Picking(Dropdown::SubRegion);
        assert_eq!(get_action(&picking, KeyCode::Char('j')), Some(Action::Input('j')));
        assert_eq!(get_action(&AppMode::Normal, KeyCode::Char('j')), Some(Action::FocusNext));
    }

    #[test]
    fn test_alert_only_dismisses() {
        let alert = AppMode::Alert(Alert::selection_incomplete());
        assert_eq!(get_action(&alert, KeyCode::Enter), Some(Action::Cancel));
        assert_eq!(get_action(&alert, KeyCode::Char('q')), None);
    }
}
