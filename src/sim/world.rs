/// WorldState: the complete state of one game session.
///
/// ## Phases
///
///   NotStarted ──start──▶ Running ──caught──▶ GameOver
///                            │  ▲
///                            │  └─ level cleared, level < MAX (advance)
///                            ├──── last level cleared ──▶ Victory
///                            └──── quit ──▶ Quit
///
/// `start_new_game` from any phase other than `Running` clears level and
/// score. The in-game level advance is its own transition and never
/// clears them.

use crate::domain::actor::{Actor, Player, Pursuer};
use crate::domain::grid::{self, Grid, COLS, ROWS};

pub const MAX_LEVELS: u32 = 5;
/// Level L spawns `BASE_PURSUERS + L` pursuers.
pub const BASE_PURSUERS: u32 = 2;
/// Pursuers move when the tick counter is a multiple of this.
pub const PURSUER_MOVE_DELAY: u64 = 2;
pub const CAPTURE_SCORE: u32 = 200;
pub const RESPAWN_ATTEMPTS: u32 = 50;

/// Pursuer spawn anchor and respawn point (top-right corner).
pub const PURSUER_CORNER: (i32, i32) = (1, COLS - 2);
/// Used when no staggered pursuer spawn is open.
pub const FALLBACK_PURSUER_SPAWN: (i32, i32) = (1, 1);
/// Used when the grid centre is walled.
pub const FALLBACK_PLAYER_SPAWN: (i32, i32) = (1, 1);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    NotStarted,
    Running,
    GameOver,
    Victory,
    Quit,
}

#[derive(Clone, Debug)]
pub struct WorldState {
    pub grid: Grid,
    pub player: Player,
    pub pursuers: Vec<Pursuer>,
    pub phase: Phase,
    pub level: u32,
    /// Reset to 0 each level; gates pursuer cadence.
    pub tick: u64,
    pub player_spawn: Actor,
}

// ── Construction ──

impl WorldState {
    pub fn new() -> Self {
        let spawn = player_spawn();
        WorldState {
            grid: Grid::new(),
            player: Player::new(spawn.row, spawn.col),
            pursuers: vec![],
            phase: Phase::NotStarted,
            level: 1,
            tick: 0,
            player_spawn: spawn,
        }
    }

    pub fn is_running(&self) -> bool { self.phase == Phase::Running }
    pub fn is_game_over(&self) -> bool { self.phase == Phase::GameOver }
    pub fn is_victory(&self) -> bool { self.phase == Phase::Victory }
}

impl Default for WorldState {
    fn default() -> Self {
        WorldState::new()
    }
}

/// Grid centre, unless the layout walls it.
pub fn player_spawn() -> Actor {
    let (r, c) = (ROWS / 2, COLS / 2);
    if grid::is_layout_wall(r, c) {
        Actor::new(FALLBACK_PLAYER_SPAWN.0, FALLBACK_PLAYER_SPAWN.1)
    } else {
        Actor::new(r, c)
    }
}

// ── Transitions ──

impl WorldState {
    /// Begin a fresh game, or restart the current one if already running.
    pub fn start_new_game(&mut self) {
        if self.phase != Phase::Running {
            self.level = 1;
            self.player.score = 0;
        }
        self.phase = Phase::Running;
        self.reset_level();
    }

    /// Running{level} → Running{level + 1}. Score carries over.
    pub fn advance_level(&mut self) {
        self.level += 1;
        self.reset_level();
    }

    pub fn quit(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Quit;
        }
    }

    /// Lay the maze out again and put every actor back at its spawn.
    fn reset_level(&mut self) {
        let spawn = self.player_spawn;
        self.grid.reset(spawn.row, spawn.col);
        self.player.pos = spawn;
        self.player.pending = None;
        self.player.power.clear();
        self.spawn_pursuers();
        self.tick = 0;
    }

    /// Staggered two-row pattern leftward from the corner; walled slots
    /// are skipped, so the count can fall short of `BASE_PURSUERS + level`.
    fn spawn_pursuers(&mut self) {
        self.pursuers.clear();
        let count = BASE_PURSUERS + self.level;
        for i in 0..count as i32 {
            let r = PURSUER_CORNER.0 + i % 2;
            let c = PURSUER_CORNER.1 - i / 2;
            if !self.grid.is_wall(r, c) {
                let id = self.pursuers.len();
                self.pursuers.push(Pursuer::new(id, r, c, self.grid.cell_kind(r, c)));
            }
        }
        if self.pursuers.is_empty() {
            let (r, c) = FALLBACK_PURSUER_SPAWN;
            self.pursuers.push(Pursuer::new(0, r, c, self.grid.cell_kind(r, c)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::PURSUER_HOUSE;

    #[test]
    fn new_world_waits_for_start() {
        let w = WorldState::new();
        assert_eq!(w.phase, Phase::NotStarted);
        assert!(!w.is_running());
        assert_eq!(w.level, 1);
        assert_eq!(w.player_spawn, Actor::new(ROWS / 2, COLS / 2));
        assert!(PURSUER_HOUSE.contains(&(w.player_spawn.row, w.player_spawn.col)));
    }

    #[test]
    fn start_lays_out_level_one() {
        let mut w = WorldState::new();
        w.start_new_game();
        assert!(w.is_running());
        assert_eq!(w.grid.pellets_remaining(), 220);
        assert_eq!(w.player.pos, w.player_spawn);
        assert_eq!(w.tick, 0);
        // three slots, none walled at level 1
        let cells: Vec<(i32, i32)> = w.pursuers.iter().map(|p| (p.pos.row, p.pos.col)).collect();
        assert_eq!(cells, vec![(1, 17), (2, 17), (1, 16)]);
        for (i, p) in w.pursuers.iter().enumerate() {
            assert_eq!(p.id, i);
            assert_eq!(p.underneath, w.grid.cell_kind(p.pos.row, p.pos.col));
        }
    }

    #[test]
    fn walled_spawn_slots_are_skipped() {
        let mut w = WorldState::new();
        w.start_new_game();
        w.advance_level(); // 4 slots; (2,16) is a wall
        assert_eq!(w.level, 2);
        assert_eq!(w.pursuers.len(), 3);
        assert!(w.pursuers.iter().all(|p| !w.grid.is_wall(p.pos.row, p.pos.col)));

        w.advance_level(); // 5 slots, one walled
        assert_eq!(w.pursuers.len(), 4);
    }

    #[test]
    fn restart_while_running_keeps_score_and_level() {
        let mut w = WorldState::new();
        w.start_new_game();
        w.advance_level();
        w.player.score = 55;
        w.start_new_game();
        assert_eq!(w.level, 2);
        assert_eq!(w.player.score, 55);
    }

    #[test]
    fn start_after_game_over_clears_progress() {
        let mut w = WorldState::new();
        w.start_new_game();
        w.advance_level();
        w.player.score = 300;
        w.phase = Phase::GameOver;
        w.start_new_game();
        assert_eq!(w.level, 1);
        assert_eq!(w.player.score, 0);
        assert!(w.is_running());
    }

    #[test]
    fn quit_only_stops_a_running_game() {
        let mut w = WorldState::new();
        w.quit();
        assert_eq!(w.phase, Phase::NotStarted);
        w.start_new_game();
        w.quit();
        assert_eq!(w.phase, Phase::Quit);
        assert!(!w.is_running());

        w.player.score = 9;
        w.start_new_game();
        assert_eq!(w.player.score, 0);
    }
}
