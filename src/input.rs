use crate::model::Scene;
use crate::sim::PlayerAction;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_action(scene: &Scene, ev: InputEvent) -> Option<PlayerAction> {
    if ev.mods.contains(KeyModifiers::CONTROL) && ev.key == KeyCode::Char('c') {
        return Some(PlayerAction::Quit);
    }

    match scene {
        Scene::EditUsername => match ev.key {
            KeyCode::Enter | KeyCode::Esc => Some(PlayerAction::UsernameDone),
            KeyCode::Backspace => Some(PlayerAction::UsernameBackspace),
            KeyCode::Char(ch) => Some(PlayerAction::UsernameChar(ch)),
            _ => None,
        },
        Scene::LoginReport(_) => Some(PlayerAction::Back),
        Scene::Help => match ev.key {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                Some(PlayerAction::HelpToggle)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(PlayerAction::Quit),
            _ => None,
        },
        Scene::Main => {
            let coarse = ev.mods.contains(KeyModifiers::SHIFT);
            match ev.key {
                KeyCode::Up | KeyCode::Char('k') => Some(PlayerAction::SelectParam(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(PlayerAction::SelectParam(1)),
                KeyCode::Left => Some(PlayerAction::Nudge(if coarse { -10 } else { -1 })),
                KeyCode::Right => Some(PlayerAction::Nudge(if coarse { 10 } else { 1 })),
                KeyCode::Char('[') => Some(PlayerAction::Nudge(-10)),
                KeyCode::Char(']') => Some(PlayerAction::Nudge(10)),
                KeyCode::Char(' ') | KeyCode::Enter => Some(PlayerAction::Launch),
                KeyCode::Char('c') | KeyCode::Char('C') => Some(PlayerAction::Clear),
                KeyCode::Char('v') | KeyCode::Char('V') => Some(PlayerAction::TogglePassword),
                KeyCode::Char('l') | KeyCode::Char('L') => Some(PlayerAction::Login),
                KeyCode::Char('u') | KeyCode::Char('U') => Some(PlayerAction::EditUsername),
                KeyCode::Char('h') | KeyCode::Char('H') => Some(PlayerAction::HelpToggle),
                KeyCode::Char('q') | KeyCode::Char('Q') => Some(PlayerAction::Quit),
                KeyCode::Esc => Some(PlayerAction::Back),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent {
            key: code,
            mods: KeyModifiers::NONE,
        }
    }

    #[test]
    fn main_scene_bindings() {
        let s = Scene::Main;
        assert_eq!(map_event_to_action(&s, key(KeyCode::Char(' '))), Some(PlayerAction::Launch));
        assert_eq!(map_event_to_action(&s, key(KeyCode::Right)), Some(PlayerAction::Nudge(1)));
        let shifted = InputEvent {
            key: KeyCode::Left,
            mods: KeyModifiers::SHIFT,
        };
        assert_eq!(map_event_to_action(&s, shifted), Some(PlayerAction::Nudge(-10)));
        assert_eq!(map_event_to_action(&s, key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn username_editing_captures_letters() {
        let s = Scene::EditUsername;
        assert_eq!(
            map_event_to_action(&s, key(KeyCode::Char('q'))),
            Some(PlayerAction::UsernameChar('q'))
        );
        assert_eq!(map_event_to_action(&s, key(KeyCode::Enter)), Some(PlayerAction::UsernameDone));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let ev = InputEvent {
            key: KeyCode::Char('c'),
            mods: KeyModifiers::CONTROL,
        };
        assert_eq!(map_event_to_action(&Scene::EditUsername, ev), Some(PlayerAction::Quit));
    }
}
