/// Actors: Player and Pursuer share a position record; everything else
/// about them is separate. Movement lives in `movement.rs` as free
/// functions, one per variant.

use std::time::{Duration, Instant};

use super::cell::Cell;

/// How long a power pellet keeps pursuers frightened.
pub const POWER_UP_DURATION: Duration = Duration::from_secs(10);

/// Requested move for the next tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbour order used wherever all four directions are scanned.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (Δrow, Δcol)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Grid position. Only the tick algorithm moves actors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Actor {
    pub row: i32,
    pub col: i32,
}

impl Actor {
    pub fn new(row: i32, col: i32) -> Self {
        Actor { row, col }
    }

    pub fn same_cell(&self, other: &Actor) -> bool {
        self.row == other.row && self.col == other.col
    }
}

/// Power-up window. Expiry is measured in wall-clock time from
/// activation, never in ticks.
#[derive(Clone, Copy, Debug, Default)]
pub struct PowerUp {
    activated_at: Option<Instant>,
}

impl PowerUp {
    pub fn is_active(&self) -> bool {
        self.activated_at.is_some()
    }

    /// Start (or restart) the window at `now`.
    pub fn activate(&mut self, now: Instant) {
        self.activated_at = Some(now);
    }

    pub fn clear(&mut self) {
        self.activated_at = None;
    }

    /// Time left at `now`, zero when inactive or elapsed.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.activated_at {
            Some(start) => POWER_UP_DURATION.saturating_sub(now.saturating_duration_since(start)),
            None => Duration::ZERO,
        }
    }

    /// Whole seconds left, counted down from the full duration.
    pub fn seconds_left(&self, now: Instant) -> u64 {
        match self.activated_at {
            Some(start) => POWER_UP_DURATION
                .as_secs()
                .saturating_sub(now.saturating_duration_since(start).as_secs()),
            None => 0,
        }
    }

    /// Deactivate if the window has run out. Returns true on the tick
    /// it expires.
    pub fn decay(&mut self, now: Instant) -> bool {
        if self.is_active() && self.remaining(now).is_zero() {
            self.activated_at = None;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Actor,
    /// Consumed by the next move attempt, successful or not.
    pub pending: Option<Direction>,
    pub score: u32,
    pub power: PowerUp,
}

impl Player {
    pub fn new(row: i32, col: i32) -> Self {
        Player {
            pos: Actor::new(row, col),
            pending: None,
            score: 0,
            power: PowerUp::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Pursuer {
    pub id: usize,
    pub pos: Actor,
    /// Kind of the occupied cell as it was when this pursuer arrived.
    pub underneath: Cell,
}

impl Pursuer {
    pub fn new(id: usize, row: i32, col: i32, underneath: Cell) -> Self {
        Pursuer { id, pos: Actor::new(row, col), underneath }
    }
}
