/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Power-up decay (wall clock)
///   2. Player movement
///   3. Level-clear check (advance, or victory which ends the tick)
///   4. Pursuer movement, every `PURSUER_MOVE_DELAY` ticks
///   5. Collision / capture, first match wins
///
/// Time and randomness come in as arguments, so a seeded RNG and a
/// hand-built `Instant` replay a game exactly.
///
/// Direction input is read from `player.pending`. A setter that returned
/// before `step` was called is seen by that step; nothing stronger is
/// promised.

use std::time::Instant;

use rand::Rng;

use crate::domain::actor::Actor;
use crate::domain::cell::Cell;
use crate::domain::movement;
use crate::domain::pursuit;
use super::event::GameEvent;
use super::world::{
    Phase, WorldState, CAPTURE_SCORE, MAX_LEVELS, PURSUER_CORNER, PURSUER_MOVE_DELAY,
    RESPAWN_ATTEMPTS,
};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step<R: Rng + ?Sized>(world: &mut WorldState, now: Instant, rng: &mut R) -> Vec<GameEvent> {
    if world.phase != Phase::Running { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();

    resolve_power_decay(world, now, &mut events);
    resolve_player_movement(world, now, &mut events);
    if resolve_level_clear(world, &mut events) == Phase::Victory { return events; }

    world.tick += 1;
    if world.tick % PURSUER_MOVE_DELAY == 0 {
        resolve_pursuer_movement(world, rng);
    }
    resolve_collisions(world, rng, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn resolve_power_decay(world: &mut WorldState, now: Instant, events: &mut Vec<GameEvent>) {
    if world.player.power.decay(now) {
        events.push(GameEvent::PowerUpExpired);
    }
}

fn resolve_player_movement(world: &mut WorldState, now: Instant, events: &mut Vec<GameEvent>) {
    let moved = movement::advance_player(&mut world.grid, &mut world.player, now);
    if !moved.moved { return; }
    if moved.ate_pellet {
        let pos = world.player.pos;
        events.push(GameEvent::PelletEaten { row: pos.row, col: pos.col });
    }
    if moved.powered_up {
        events.push(GameEvent::PowerUpActivated);
    }
}

// ══════════════════════════════════════════════════════════════
// Level progression
// ══════════════════════════════════════════════════════════════

/// Advance on a cleared board, or win on the last level. An advance keeps
/// the tick going on the fresh layout; returns the resulting phase.
fn resolve_level_clear(world: &mut WorldState, events: &mut Vec<GameEvent>) -> Phase {
    if world.grid.pellets_remaining() > 0 { return world.phase; }

    events.push(GameEvent::LevelCleared { level: world.level });
    if world.level < MAX_LEVELS {
        world.advance_level();
    } else {
        world.phase = Phase::Victory;
        events.push(GameEvent::Victory);
    }
    world.phase
}

// ══════════════════════════════════════════════════════════════
// Pursuers
// ══════════════════════════════════════════════════════════════

fn resolve_pursuer_movement<R: Rng + ?Sized>(world: &mut WorldState, rng: &mut R) {
    let frightened = world.player.power.is_active();
    let target = world.player.pos;
    for pursuer in world.pursuers.iter_mut() {
        let dest = pursuit::choose_destination(&world.grid, pursuer.pos, target, frightened, rng);
        movement::advance_pursuer(&mut world.grid, pursuer, dest);
    }
}

// ══════════════════════════════════════════════════════════════
// Collision
// ══════════════════════════════════════════════════════════════

/// Only the first pursuer (in id order) on the player's cell is resolved.
fn resolve_collisions<R: Rng + ?Sized>(world: &mut WorldState, rng: &mut R, events: &mut Vec<GameEvent>) {
    let hit = world.pursuers.iter().position(|p| p.pos.same_cell(&world.player.pos));
    let idx = match hit { Some(i) => i, None => return };
    let id = world.pursuers[idx].id;

    if world.player.power.is_active() {
        world.player.score += CAPTURE_SCORE;
        respawn_pursuer(world, idx, rng);
        events.push(GameEvent::PursuerCaptured { id });
    } else {
        world.phase = Phase::GameOver;
        events.push(GameEvent::PlayerCaught { id });
    }
}

/// Send a captured pursuer home: the corner if open, else up to
/// `RESPAWN_ATTEMPTS` random open cells away from the player, else the
/// player's spawn over an `Empty` cell.
fn respawn_pursuer<R: Rng + ?Sized>(world: &mut WorldState, idx: usize, rng: &mut R) {
    let dest = respawn_point(world, rng);
    let pursuer = &mut world.pursuers[idx];
    match dest {
        Some(dest) => movement::advance_pursuer(&mut world.grid, pursuer, dest),
        None => {
            world.grid.restore_cell(pursuer.pos.row, pursuer.pos.col, pursuer.underneath);
            pursuer.pos = world.player_spawn;
            pursuer.underneath = Cell::Empty;
        }
    }
}

fn respawn_point<R: Rng + ?Sized>(world: &WorldState, rng: &mut R) -> Option<Actor> {
    let (r, c) = PURSUER_CORNER;
    if !world.grid.is_wall(r, c) {
        return Some(Actor::new(r, c));
    }
    for _ in 0..RESPAWN_ATTEMPTS {
        let r = rng.gen_range(0..world.grid.rows());
        let c = rng.gen_range(0..world.grid.cols());
        let spot = Actor::new(r, c);
        if !world.grid.is_wall(r, c) && !spot.same_cell(&world.player.pos) {
            return Some(spot);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::{Direction, Pursuer};
    use crate::domain::grid::{COLS, ROWS};
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn running() -> WorldState {
        let mut w = WorldState::new();
        w.start_new_game();
        w
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0x5eed)
    }

    /// One pursuer sitting on the player's cell.
    fn on_player(w: &mut WorldState) {
        let p = w.player.pos;
        w.pursuers = vec![Pursuer::new(0, p.row, p.col, w.grid.cell_kind(p.row, p.col))];
    }

    fn eat_everything(w: &mut WorldState) {
        for r in 0..ROWS {
            for c in 0..COLS {
                w.grid.consume_pellet_at(r, c);
            }
        }
        assert_eq!(w.grid.pellets_remaining(), 0);
    }

    #[test]
    fn idle_before_start() {
        let mut w = WorldState::new();
        w.player.pending = Some(Direction::Up);
        assert!(step(&mut w, Instant::now(), &mut rng()).is_empty());
        assert_eq!(w.tick, 0);
        assert_eq!(w.player.pending, Some(Direction::Up));
    }

    #[test]
    fn pursuers_move_every_other_tick() {
        let mut w = running();
        let mut r = rng();
        let start: Vec<Actor> = w.pursuers.iter().map(|p| p.pos).collect();

        step(&mut w, Instant::now(), &mut r);
        let after_one: Vec<Actor> = w.pursuers.iter().map(|p| p.pos).collect();
        assert_eq!(start, after_one);

        step(&mut w, Instant::now(), &mut r);
        let after_two: Vec<Actor> = w.pursuers.iter().map(|p| p.pos).collect();
        assert_ne!(start, after_two);
        assert_eq!(w.tick, 2);
    }

    #[test]
    fn walking_up_from_spawn_reaches_pellets() {
        let mut w = running();
        let mut r = rng();
        let now = Instant::now();

        // spawn's left/right neighbours are house walls; (8,9) is the cleared house cell
        w.player.pending = Some(Direction::Up);
        step(&mut w, now, &mut r);
        assert_eq!(w.player.pos, Actor::new(8, 9));
        assert_eq!(w.player.score, 0);

        w.player.pending = Some(Direction::Up);
        let events = step(&mut w, now, &mut r);
        assert_eq!(w.player.pos, Actor::new(7, 9));
        assert_eq!(w.player.score, 1);
        assert!(events.contains(&GameEvent::PelletEaten { row: 7, col: 9 }));

        w.player.pending = Some(Direction::Right);
        step(&mut w, now, &mut r);
        assert_eq!(w.player.pos, Actor::new(7, 10));
        assert_eq!(w.player.score, 2);
    }

    #[test]
    fn capture_with_power_scores_and_keeps_power() {
        let mut w = running();
        let now = Instant::now();
        w.player.power.activate(now);
        on_player(&mut w);

        let events = step(&mut w, now, &mut rng());
        assert_eq!(w.player.score, CAPTURE_SCORE);
        assert!(w.player.power.is_active());
        assert_eq!(w.player.power.seconds_left(now), 10);
        assert_eq!(w.pursuers[0].pos, Actor::new(PURSUER_CORNER.0, PURSUER_CORNER.1));
        assert!(w.is_running());
        assert_eq!(events, vec![GameEvent::PursuerCaptured { id: 0 }]);
    }

    #[test]
    fn first_match_wins() {
        let mut w = running();
        let now = Instant::now();
        w.player.power.activate(now);
        let p = w.player.pos;
        let under = w.grid.cell_kind(p.row, p.col);
        w.pursuers = vec![
            Pursuer::new(0, p.row, p.col, under),
            Pursuer::new(1, p.row, p.col, under),
        ];

        step(&mut w, now, &mut rng());
        assert_eq!(w.player.score, CAPTURE_SCORE);
        assert_ne!(w.pursuers[0].pos, p);
        assert_eq!(w.pursuers[1].pos, p);
    }

    #[test]
    fn caught_without_power_ends_game() {
        let mut w = running();
        on_player(&mut w);

        let events = step(&mut w, Instant::now(), &mut rng());
        assert!(w.is_game_over());
        assert!(!w.is_running());
        assert_eq!(events, vec![GameEvent::PlayerCaught { id: 0 }]);

        let pos = w.player.pos;
        let score = w.player.score;
        w.player.pending = Some(Direction::Up);
        assert!(step(&mut w, Instant::now(), &mut rng()).is_empty());
        assert_eq!(w.player.pos, pos);
        assert_eq!(w.player.score, score);
    }

    #[test]
    fn power_expires_on_wall_clock() {
        let mut w = running();
        let t0 = Instant::now();
        w.player.power.activate(t0);
        on_player(&mut w);

        let events = step(&mut w, t0 + Duration::from_secs(10), &mut rng());
        assert!(events.contains(&GameEvent::PowerUpExpired));
        assert!(w.is_game_over());
    }

    #[test]
    fn cleared_level_advances_and_keeps_score() {
        let mut w = running();
        w.player.score = 137;
        eat_everything(&mut w);

        let events = step(&mut w, Instant::now(), &mut rng());
        assert_eq!(events, vec![GameEvent::LevelCleared { level: 1 }]);
        assert_eq!(w.level, 2);
        assert_eq!(w.player.score, 137);
        assert_eq!(w.grid.pellets_remaining(), 220);
        assert_eq!(w.player.pos, w.player_spawn);
        assert!(w.is_running());
    }

    #[test]
    fn level_advance_tick_counts_toward_pursuer_cadence() {
        let mut w = running();
        let mut r = rng();
        eat_everything(&mut w);

        step(&mut w, Instant::now(), &mut r);
        assert_eq!(w.level, 2);
        assert_eq!(w.tick, 1);
        let spawned: Vec<Actor> = w.pursuers.iter().map(|p| p.pos).collect();

        // first tick of the new level is the second counted tick
        step(&mut w, Instant::now(), &mut r);
        assert_eq!(w.tick, 2);
        let moved: Vec<Actor> = w.pursuers.iter().map(|p| p.pos).collect();
        assert_ne!(spawned, moved);
    }

    #[test]
    fn last_level_is_victory() {
        let mut w = running();
        w.level = MAX_LEVELS;
        eat_everything(&mut w);
        let mut r = rng();

        let events = step(&mut w, Instant::now(), &mut r);
        assert!(events.contains(&GameEvent::Victory));
        assert!(w.is_victory());
        assert!(!w.is_running());

        let player = w.player.pos;
        let pursuers: Vec<Actor> = w.pursuers.iter().map(|p| p.pos).collect();
        w.player.pending = Some(Direction::Up);
        for _ in 0..4 {
            step(&mut w, Instant::now(), &mut r);
        }
        assert_eq!(w.player.pos, player);
        assert_eq!(w.pursuers.iter().map(|p| p.pos).collect::<Vec<_>>(), pursuers);
    }

    #[test]
    fn capture_restores_what_the_pursuer_covered() {
        let now = Instant::now();
        for (r, c, kind) in [(7, 9, Cell::Pellet), (3, 1, Cell::PowerPellet)] {
            let mut w = running();
            w.player.power.activate(now);
            w.player.pos = Actor::new(r, c);
            w.pursuers = vec![Pursuer::new(0, r, c, kind)];
            let before = w.grid.pellets_remaining();

            step(&mut w, now, &mut rng());
            assert_eq!(w.pursuers[0].pos, Actor::new(PURSUER_CORNER.0, PURSUER_CORNER.1));
            assert_eq!(w.grid.cell_kind(r, c), kind);
            assert!(w.grid.has_pellet_at(r, c));
            assert_eq!(w.grid.pellets_remaining(), before);
        }
    }

    #[test]
    fn respawn_avoids_walls_and_player_when_corner_is_walled() {
        let mut w = running();
        let now = Instant::now();
        w.player.power.activate(now);
        w.grid.set_cell(PURSUER_CORNER.0, PURSUER_CORNER.1, Cell::Wall);
        on_player(&mut w);

        step(&mut w, now, &mut rng());
        let p = w.pursuers[0].pos;
        assert!(!w.grid.is_wall(p.row, p.col));
        assert_ne!(p, w.player.pos);
        assert_eq!(w.pursuers[0].underneath, w.grid.cell_kind(p.row, p.col));
    }

    #[test]
    fn respawn_falls_back_to_player_spawn() {
        let mut w = running();
        let now = Instant::now();
        w.player.power.activate(now);
        w.grid.set_cell(PURSUER_CORNER.0, PURSUER_CORNER.1, Cell::Wall);
        // every random probe lands on (0, 0), a border wall
        let mut stuck = StepRng::new(0, 0);
        w.player.pos = Actor::new(1, 1);
        on_player(&mut w);

        step(&mut w, now, &mut stuck);
        assert_eq!(w.pursuers[0].pos, w.player_spawn);
        assert_eq!(w.pursuers[0].underneath, Cell::Empty);
    }

    #[test]
    fn pursuer_path_keeps_pellets() {
        let mut w = running();
        let mut r = rng();
        let before = w.grid.pellets_remaining();
        for _ in 0..40 {
            step(&mut w, Instant::now(), &mut r);
            if !w.is_running() { break; }
        }
        // the player never moved, so no pellet may have gone
        assert_eq!(w.grid.pellets_remaining(), before);
        let kinds = (0..ROWS)
            .flat_map(|r| (0..COLS).map(move |c| (r, c)))
            .filter(|&(r, c)| w.grid.cell_kind(r, c) == Cell::Pellet)
            .count();
        assert_eq!(kinds + 4, before);
    }
}
