//! Input normalization
//!
//! Keyboard keys, pointer taps and touch-control buttons all become an
//! `Intent` before reaching a game, so every source shares one code path.

use crate::games::GameKind;

/// Cardinal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Grid step as (column, row); rows grow downward
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Discrete player intent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Move(Direction),
    /// Flap, shoot, hard drop
    Primary,
    Rotate,
    /// Start from ready/gameover (Enter)
    Confirm,
    Pause,
    Restart,
    /// Directional key released
    Halt,
    /// Pointer pressed at a world x coordinate
    PointerDown { x: f32 },
    /// Pointer moved to a world x coordinate
    PointerMove { x: f32 },
}

impl Intent {
    /// Intent named by a touch-control button (`data-intent`)
    pub fn from_name(name: &str) -> Option<Self> {
        let intent = match name.trim().to_ascii_lowercase().as_str() {
            "left" => Intent::Move(Direction::Left),
            "right" => Intent::Move(Direction::Right),
            "up" => Intent::Move(Direction::Up),
            "down" => Intent::Move(Direction::Down),
            "primary" => Intent::Primary,
            "rotate" => Intent::Rotate,
            "confirm" => Intent::Confirm,
            "pause" => Intent::Pause,
            "restart" => Intent::Restart,
            _ => return None,
        };
        Some(intent)
    }
}

/// Normalize a `KeyboardEvent.key` value for table lookup
pub fn normalize_key(key: &str) -> String {
    match key {
        "Spacebar" => " ".to_string(),
        other => other.to_lowercase(),
    }
}

type KeyTable = &'static [(&'static str, Intent)];

const LEFT: Intent = Intent::Move(Direction::Left);
const RIGHT: Intent = Intent::Move(Direction::Right);
const UP: Intent = Intent::Move(Direction::Up);
const DOWN: Intent = Intent::Move(Direction::Down);

const FLAPPY_KEYS: KeyTable = &[
    (" ", Intent::Primary),
    ("arrowup", Intent::Primary),
    ("enter", Intent::Confirm),
    ("p", Intent::Pause),
    ("r", Intent::Restart),
];

const STEER_KEYS: KeyTable = &[
    ("arrowleft", LEFT),
    ("a", LEFT),
    ("arrowright", RIGHT),
    ("d", RIGHT),
    ("enter", Intent::Confirm),
    ("p", Intent::Pause),
    ("r", Intent::Restart),
];

const HOOPS_KEYS: KeyTable = FLAPPY_KEYS;

const SNAKE_KEYS: KeyTable = &[
    ("arrowup", UP),
    ("w", UP),
    ("arrowdown", DOWN),
    ("s", DOWN),
    ("arrowleft", LEFT),
    ("a", LEFT),
    ("arrowright", RIGHT),
    ("d", RIGHT),
    (" ", Intent::Confirm),
    ("enter", Intent::Confirm),
    ("p", Intent::Pause),
    ("r", Intent::Restart),
];

const TETRIS_KEYS: KeyTable = &[
    ("arrowleft", LEFT),
    ("a", LEFT),
    ("arrowright", RIGHT),
    ("d", RIGHT),
    ("arrowdown", DOWN),
    ("s", DOWN),
    ("arrowup", Intent::Rotate),
    ("w", Intent::Rotate),
    (" ", Intent::Primary),
    ("enter", Intent::Confirm),
    ("p", Intent::Pause),
    ("r", Intent::Restart),
];

const STEER_RELEASE: KeyTable = &[
    ("arrowleft", Intent::Halt),
    ("a", Intent::Halt),
    ("arrowright", Intent::Halt),
    ("d", Intent::Halt),
];

/// Static keydown table for a game
pub fn keymap(kind: GameKind) -> KeyTable {
    match kind {
        GameKind::Flappy => FLAPPY_KEYS,
        GameKind::Meteor | GameKind::Dodger => STEER_KEYS,
        GameKind::Hoops => HOOPS_KEYS,
        GameKind::Snake => SNAKE_KEYS,
        GameKind::Tetris => TETRIS_KEYS,
    }
}

/// Keyup table; only the paddle game reacts to releases
pub fn release_map(kind: GameKind) -> KeyTable {
    match kind {
        GameKind::Meteor => STEER_RELEASE,
        _ => &[],
    }
}

fn lookup(table: KeyTable, key: &str) -> Option<Intent> {
    let key = normalize_key(key);
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, intent)| *intent)
}

/// Intent for a keydown, if the game binds the key
pub fn key_down(kind: GameKind, key: &str) -> Option<Intent> {
    lookup(keymap(kind), key)
}

/// Intent for a keyup, if the game binds the key
pub fn key_up(kind: GameKind, key: &str) -> Option<Intent> {
    lookup(release_map(kind), key)
}

/// Queue of buffered directions, drained one tick at a time.
///
/// A direction is accepted only if it turns relative to the last buffered
/// (or current) heading: no repeats, no reversals, at most `CAPACITY` deep.
#[derive(Debug, Clone, Default)]
pub struct DirectionQueue {
    pending: Vec<Direction>,
}

impl DirectionQueue {
    pub const CAPACITY: usize = 2;

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Buffer `next`; returns false if rejected
    pub fn push(&mut self, current: Direction, next: Direction) -> bool {
        let reference = self.pending.last().copied().unwrap_or(current);
        if next == reference || next == reference.opposite() {
            return false;
        }
        if self.pending.len() >= Self::CAPACITY {
            return false;
        }
        self.pending.push(next);
        true
    }

    /// Pop buffered directions until one is a legal turn from `current`
    pub fn drain(&mut self, current: Direction) -> Direction {
        while !self.pending.is_empty() {
            let next = self.pending.remove(0);
            if next != current && next != current.opposite() {
                return next;
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    #[test]
    fn test_key_lookup_is_case_insensitive() {
        assert_eq!(key_down(GameKind::Snake, "ArrowUp"), Some(UP));
        assert_eq!(key_down(GameKind::Snake, "W"), Some(UP));
        assert_eq!(key_down(GameKind::Tetris, "ArrowUp"), Some(Intent::Rotate));
        assert_eq!(key_down(GameKind::Flappy, " "), Some(Intent::Primary));
        assert_eq!(key_down(GameKind::Flappy, "q"), None);
    }

    #[test]
    fn test_release_only_for_paddle() {
        assert_eq!(key_up(GameKind::Meteor, "ArrowLeft"), Some(Intent::Halt));
        assert_eq!(key_up(GameKind::Dodger, "ArrowLeft"), None);
    }

    #[test]
    fn test_intent_names() {
        assert_eq!(Intent::from_name("Left"), Some(LEFT));
        assert_eq!(Intent::from_name("restart"), Some(Intent::Restart));
        assert_eq!(Intent::from_name("jump"), None);
    }

    #[test]
    fn test_queue_rejects_reversal_and_repeat() {
        let mut queue = DirectionQueue::default();
        assert!(!queue.push(Direction::Right, Direction::Left));
        assert!(!queue.push(Direction::Right, Direction::Right));
        assert!(queue.push(Direction::Right, Direction::Up));
        // Relative to the buffered Up now
        assert!(!queue.push(Direction::Right, Direction::Down));
        assert!(queue.push(Direction::Right, Direction::Left));
        assert!(!queue.push(Direction::Right, Direction::Up));
        assert_eq!(queue.len(), DirectionQueue::CAPACITY);
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = DirectionQueue::default();
        queue.push(Direction::Right, Direction::Up);
        queue.push(Direction::Right, Direction::Left);
        assert_eq!(queue.drain(Direction::Right), Direction::Up);
        assert_eq!(queue.drain(Direction::Up), Direction::Left);
        assert_eq!(queue.drain(Direction::Left), Direction::Left);
    }

    proptest! {
        #[test]
        fn prop_applied_direction_never_reverses(
            start in any_direction(),
            inputs in prop::collection::vec(prop::collection::vec(any_direction(), 0..4), 1..30),
        ) {
            let mut queue = DirectionQueue::default();
            let mut current = start;
            for burst in inputs {
                for dir in burst {
                    queue.push(current, dir);
                }
                let applied = queue.drain(current);
                prop_assert_ne!(applied, current.opposite());
                current = applied;
            }
        }
    }
}
