//! Keyboard input routing
//!
//! Translates raw key names (as reported by `KeyboardEvent.key`) into closed
//! [`Command`] values, filters them through the active game's [`KeyProfile`],
//! and buffers the latest one until the next tick samples it.

use serde::{Deserialize, Serialize};

/// Grid / paddle direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit grid step (dcol, drow), rows grow downward
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True if moving `self` right after `heading` would fold back onto the body
    pub fn reverses(self, heading: Direction) -> bool {
        self == heading.opposite()
    }
}

/// Player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Arrow keys
    Move(Direction),
    /// Space bar (hard drop)
    Action,
    /// Pick a board cell (0-based, row-major)
    Select(u8),
    /// Idle -> Running
    Start,
    /// GameOver -> Idle -> Running
    Restart,
}

impl Command {
    /// Map a `KeyboardEvent.key` value to a command
    pub fn from_key(key: &str) -> Option<Command> {
        let cmd = match key {
            "ArrowUp" => Command::Move(Direction::Up),
            "ArrowDown" => Command::Move(Direction::Down),
            "ArrowLeft" => Command::Move(Direction::Left),
            "ArrowRight" => Command::Move(Direction::Right),
            " " | "Spacebar" => Command::Action,
            "Enter" => Command::Start,
            "r" | "R" => Command::Restart,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c @ '1'..='9'), None) => Command::Select(c as u8 - b'1'),
                    _ => return None,
                }
            }
        };
        Some(cmd)
    }

    /// Keys the browser would otherwise use to scroll the page
    pub fn is_navigation(self) -> bool {
        matches!(self, Command::Move(_) | Command::Action)
    }
}

/// Which commands a game listens to. Lifecycle commands are always accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyProfile {
    pub horizontal: bool,
    pub vertical: bool,
    pub action: bool,
    pub cells: bool,
}

impl KeyProfile {
    pub const ARROWS: KeyProfile = KeyProfile {
        horizontal: true,
        vertical: true,
        action: false,
        cells: false,
    };
    pub const ARROWS_AND_ACTION: KeyProfile = KeyProfile {
        horizontal: true,
        vertical: true,
        action: true,
        cells: false,
    };
    pub const VERTICAL: KeyProfile = KeyProfile {
        horizontal: false,
        vertical: true,
        action: false,
        cells: false,
    };
    pub const HORIZONTAL: KeyProfile = KeyProfile {
        horizontal: true,
        vertical: false,
        action: false,
        cells: false,
    };
    pub const CELLS: KeyProfile = KeyProfile {
        horizontal: false,
        vertical: false,
        action: false,
        cells: true,
    };

    pub fn accepts(&self, cmd: Command) -> bool {
        match cmd {
            Command::Move(d) if d.is_horizontal() => self.horizontal,
            Command::Move(_) => self.vertical,
            Command::Action => self.action,
            Command::Select(_) => self.cells,
            Command::Start | Command::Restart => true,
        }
    }
}

/// When a game wants its commands delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputTiming {
    /// Applied as soon as the key arrives (still serialized with ticks)
    Immediate,
    /// Buffered; the most recent one is applied when the next tick fires
    PerTick,
}

/// What happened to a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a key this game cares about; leave default handling alone
    Ignored,
    /// Recognized but not recorded (e.g. would reverse into the body)
    Rejected { prevent_default: bool },
    /// Recorded as the latest command
    Consumed { command: Command, prevent_default: bool },
}

impl KeyOutcome {
    pub fn prevent_default(&self) -> bool {
        match self {
            KeyOutcome::Ignored => false,
            KeyOutcome::Rejected { prevent_default } | KeyOutcome::Consumed { prevent_default, .. } => {
                *prevent_default
            }
        }
    }
}

/// Per-session input router
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    profile: KeyProfile,
    latest: Option<Command>,
    heading: Option<Direction>,
}

impl InputRouter {
    pub fn new(profile: KeyProfile) -> Self {
        Self {
            profile,
            latest: None,
            heading: None,
        }
    }

    /// Handle a raw key name
    pub fn on_key(&mut self, key: &str) -> KeyOutcome {
        match Command::from_key(key) {
            Some(cmd) => self.on_command(cmd),
            None => KeyOutcome::Ignored,
        }
    }

    /// Handle an already-decoded command (pointer clicks, tests)
    pub fn on_command(&mut self, cmd: Command) -> KeyOutcome {
        if !self.profile.accepts(cmd) {
            return KeyOutcome::Ignored;
        }
        let prevent_default = cmd.is_navigation();
        if let (Command::Move(dir), Some(heading)) = (cmd, self.heading) {
            if dir.reverses(heading) {
                return KeyOutcome::Rejected { prevent_default };
            }
        }
        self.latest = Some(cmd);
        KeyOutcome::Consumed {
            command: cmd,
            prevent_default,
        }
    }

    /// Most recent command since the last call, if any
    pub fn take(&mut self) -> Option<Command> {
        self.latest.take()
    }

    /// Set the direction the grid actor last moved in. `None` disables the guard.
    pub fn guard_reversal(&mut self, heading: Option<Direction>) {
        self.heading = heading;
    }

    /// Drop anything buffered and forget the heading
    pub fn clear(&mut self) {
        self.latest = None;
        self.heading = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Command::from_key("ArrowLeft"), Some(Command::Move(Direction::Left)));
        assert_eq!(Command::from_key(" "), Some(Command::Action));
        assert_eq!(Command::from_key("1"), Some(Command::Select(0)));
        assert_eq!(Command::from_key("9"), Some(Command::Select(8)));
        assert_eq!(Command::from_key("0"), None);
        assert_eq!(Command::from_key("19"), None);
        assert_eq!(Command::from_key("Tab"), None);
        assert_eq!(Command::from_key("R"), Some(Command::Restart));
    }

    #[test]
    fn test_unrecognized_keys_are_ignored() {
        let mut router = InputRouter::new(KeyProfile::VERTICAL);
        assert_eq!(router.on_key("q"), KeyOutcome::Ignored);
        assert_eq!(router.on_key("ArrowLeft"), KeyOutcome::Ignored);
        assert_eq!(router.take(), None);
    }

    #[test]
    fn test_latest_command_wins() {
        let mut router = InputRouter::new(KeyProfile::ARROWS);
        router.on_key("ArrowUp");
        router.on_key("ArrowLeft");
        assert_eq!(router.take(), Some(Command::Move(Direction::Left)));
        assert_eq!(router.take(), None);
    }

    #[test]
    fn test_navigation_keys_prevent_default() {
        let mut router = InputRouter::new(KeyProfile::ARROWS_AND_ACTION);
        assert!(router.on_key("ArrowDown").prevent_default());
        assert!(router.on_key(" ").prevent_default());
        assert!(!router.on_key("Enter").prevent_default());
        assert!(!router.on_key("x").prevent_default());
    }

    #[test]
    fn test_reversal_guard() {
        let mut router = InputRouter::new(KeyProfile::ARROWS);
        router.guard_reversal(Some(Direction::Right));

        let outcome = router.on_key("ArrowLeft");
        assert_eq!(outcome, KeyOutcome::Rejected { prevent_default: true });
        assert_eq!(router.take(), None);

        router.on_key("ArrowUp");
        assert_eq!(router.take(), Some(Command::Move(Direction::Up)));

        router.guard_reversal(None);
        router.on_key("ArrowLeft");
        assert_eq!(router.take(), Some(Command::Move(Direction::Left)));
    }

    #[test]
    fn test_cells_profile() {
        let mut router = InputRouter::new(KeyProfile::CELLS);
        assert_eq!(
            router.on_key("5"),
            KeyOutcome::Consumed {
                command: Command::Select(4),
                prevent_default: false
            }
        );
        assert_eq!(router.on_key("ArrowUp"), KeyOutcome::Ignored);
    }
}
