/// Session: the one object the front-end talks to.
///
/// Owns the world and the RNG that drives frightened wandering and
/// respawn probes. Commands mutate, queries read; nothing here blocks,
/// and each session is exclusively owned by its caller.

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::domain::actor::{Actor, Direction, Pursuer};
use crate::domain::cell::Cell;
use super::event::GameEvent;
use super::step;
use super::world::{Phase, WorldState, MAX_LEVELS};

pub struct Session {
    world: WorldState,
    rng: SmallRng,
}

impl Session {
    /// A fixed seed replays frightened moves and respawns exactly.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_entropy(),
        };
        Session { world: WorldState::new(), rng }
    }
}

// ── Commands ──

impl Session {
    pub fn start_new_game(&mut self) {
        let fresh = self.world.phase != Phase::Running;
        self.world.start_new_game();
        info!(level = self.world.level, fresh, "game started");
    }

    /// Advance one tick using the system clock.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Vec<GameEvent> {
        let events = step::step(&mut self.world, now, &mut self.rng);
        for event in &events {
            self.log_event(event);
        }
        events
    }

    /// Queue a direction for the next tick. A call that returns before
    /// `tick` starts is observed by that tick.
    pub fn set_player_direction(&mut self, dir: Direction) {
        self.world.player.pending = Some(dir);
    }

    pub fn quit(&mut self) {
        self.world.quit();
        info!(score = self.world.player.score, "session quit");
    }

    fn log_event(&self, event: &GameEvent) {
        let score = self.world.player.score;
        match event {
            GameEvent::PelletEaten { row, col } => trace!(row, col, score, "pellet"),
            GameEvent::PowerUpActivated => debug!("power-up on"),
            GameEvent::PowerUpExpired => debug!("power-up off"),
            GameEvent::PursuerCaptured { id } => debug!(id, score, "pursuer captured"),
            GameEvent::PlayerCaught { id } => info!(id, score, level = self.world.level, "game over"),
            GameEvent::LevelCleared { level } => info!(level, score, "level cleared"),
            GameEvent::Victory => info!(score, "victory"),
        }
    }
}

// ── Queries ──

impl Session {
    pub fn rows(&self) -> i32 { self.world.grid.rows() }
    pub fn cols(&self) -> i32 { self.world.grid.cols() }

    pub fn cell_kind(&self, r: i32, c: i32) -> Cell {
        self.world.grid.cell_kind(r, c)
    }

    pub fn has_pellet_at(&self, r: i32, c: i32) -> bool {
        self.world.grid.has_pellet_at(r, c)
    }

    pub fn pellets_remaining(&self) -> usize {
        self.world.grid.pellets_remaining()
    }

    pub fn player_pos(&self) -> Actor { self.world.player.pos }
    pub fn score(&self) -> u32 { self.world.player.score }
    pub fn power_up_active(&self) -> bool { self.world.player.power.is_active() }

    pub fn power_up_seconds_left(&self) -> u64 {
        self.power_up_seconds_left_at(Instant::now())
    }

    pub fn power_up_seconds_left_at(&self, now: Instant) -> u64 {
        self.world.player.power.seconds_left(now)
    }

    pub fn pursuers(&self) -> &[Pursuer] { &self.world.pursuers }

    pub fn phase(&self) -> Phase { self.world.phase }
    pub fn is_running(&self) -> bool { self.world.is_running() }
    pub fn is_game_over(&self) -> bool { self.world.is_game_over() }
    pub fn is_victory(&self) -> bool { self.world.is_victory() }
    pub fn level(&self) -> u32 { self.world.level }
    pub fn max_levels(&self) -> u32 { MAX_LEVELS }
}
