use std::str::FromStr;

use thiserror::Error;

/// A movement or look action. Input backends map keys to these; the
/// controller never sees raw input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    LookLeft,
    LookRight,
    LookUp,
    LookDown,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::LookLeft,
        Action::LookRight,
        Action::LookUp,
        Action::LookDown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::MoveForward => "forward",
            Action::MoveBackward => "backward",
            Action::MoveLeft => "left",
            Action::MoveRight => "right",
            Action::MoveUp => "up",
            Action::MoveDown => "down",
            Action::LookLeft => "look_left",
            Action::LookRight => "look_right",
            Action::LookUp => "look_up",
            Action::LookDown => "look_down",
        }
    }

    /// Desktop key for this action: WASD plus E/Q for vertical movement and
    /// the arrow keys for looking.
    pub fn default_key(self) -> &'static str {
        match self {
            Action::MoveForward => "w",
            Action::MoveBackward => "s",
            Action::MoveLeft => "a",
            Action::MoveRight => "d",
            Action::MoveUp => "e",
            Action::MoveDown => "q",
            Action::LookLeft => "arrow_left",
            Action::LookRight => "arrow_right",
            Action::LookUp => "arrow_up",
            Action::LookDown => "arrow_down",
        }
    }

    /// Action bound to `key` in the default layout.
    pub fn from_key(key: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.default_key() == key)
    }

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// The set of actions held during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet(u16);

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, action: Action) -> Self {
        self.insert(action);
        self
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.contains(*a))
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::new();
        for action in iter {
            set.insert(action);
        }
        set
    }
}
