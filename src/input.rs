//! Input handler: turns discrete key presses into player actions.

use crossterm::event::KeyCode;

use crate::compute::{fire_missile, move_player_left, move_player_right, player_shoot};
use crate::entities::{GameStatus, Session};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    FireBullet,
    FireMissile,
}

/// Default key map: arrows move, `A` shoots, space launches a missile.
pub fn action_for_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::FireBullet),
        KeyCode::Char(' ') => Some(Action::FireMissile),
        _ => None,
    }
}

/// Apply one action.  Outside a running game every action is ignored.
pub fn apply(state: &Session, action: Action) -> Session {
    if state.status != GameStatus::Running {
        return state.clone();
    }
    match action {
        Action::MoveLeft => move_player_left(state),
        Action::MoveRight => move_player_right(state),
        Action::FireBullet => player_shoot(state),
        Action::FireMissile => fire_missile(state),
    }
}
