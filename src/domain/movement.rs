/// Movement — one free function per actor variant.
///
/// ### Player
/// ┌──────────────────────────────┬─────────────────────────────┐
/// │ Condition                     │ Result                      │
/// ├──────────────────────────────┼─────────────────────────────┤
/// │ no pending direction          │ nothing                     │
/// │ candidate is a wall           │ dropped, nothing mutated    │
/// │ candidate is a tunnel mouth   │ lands on the opposite edge  │
/// │ candidate is a power pellet   │ power-up on, cell → Empty   │
/// │ candidate has a pellet flag   │ consumed, score +1          │
/// │                               │ (power pellets included)    │
/// │ any attempt                   │ pending direction cleared   │
/// └──────────────────────────────┴─────────────────────────────┘
///
/// ### Pursuer
/// Leaving a cell writes back what was under the pursuer; arriving records
/// the new cell's kind. Pursuers never eat.

use std::time::Instant;

use super::actor::{Actor, Player, Pursuer};
use super::cell::Cell;
use super::grid::Grid;

pub const PELLET_SCORE: u32 = 1;

/// What a player move attempt did.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PlayerStep {
    pub moved: bool,
    pub ate_pellet: bool,
    pub powered_up: bool,
}

pub fn advance_player(grid: &mut Grid, player: &mut Player, now: Instant) -> PlayerStep {
    let dir = match player.pending.take() {
        Some(d) => d,
        None => return PlayerStep::default(),
    };

    let (dr, dc) = dir.delta();
    let (r, c) = grid.wrap(player.pos.row + dr, player.pos.col + dc);
    if grid.is_wall(r, c) {
        return PlayerStep::default();
    }

    let mut step = PlayerStep { moved: true, ..PlayerStep::default() };

    let kind = grid.cell_kind(r, c);
    // Power pellets carry the pellet flag too, so they also score.
    if grid.consume_pellet_at(r, c) {
        player.score += PELLET_SCORE;
        step.ate_pellet = true;
    }
    if kind == Cell::PowerPellet {
        player.power.activate(now);
        grid.set_cell(r, c, Cell::Empty);
        step.powered_up = true;
    }

    player.pos = Actor::new(r, c);
    step
}

/// Move `pursuer` to `dest`, restoring the cell it leaves.
pub fn advance_pursuer(grid: &mut Grid, pursuer: &mut Pursuer, dest: Actor) {
    grid.restore_cell(pursuer.pos.row, pursuer.pos.col, pursuer.underneath);
    pursuer.pos = dest;
    pursuer.underneath = grid.cell_kind(dest.row, dest.col);
}
