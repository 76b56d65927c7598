/// Pursuer AI — picks the next cell for one pursuer.
///
/// Two modes, selected by the player's power-up:
///   1. **Chase** — greedy step toward the player with axis priority.
///      The larger-or-equal column offset wins; on a wall the other axis
///      is tried; if both are blocked the pursuer stays. No path search,
///      so a pursuer can jam against a corner.
///   2. **Frightened** — uniform choice among the open neighbours in
///      `Direction::ALL` order. Memoryless; no bias away from the player.
///
/// Both modes only choose. Applying the move (and restoring the covered
/// cell) is `movement::advance_pursuer`.

use rand::seq::SliceRandom;
use rand::Rng;

use super::actor::{Actor, Direction};
use super::grid::Grid;

pub fn choose_destination<R: Rng + ?Sized>(
    grid: &Grid,
    from: Actor,
    target: Actor,
    frightened: bool,
    rng: &mut R,
) -> Actor {
    if frightened {
        frightened_destination(grid, from, rng)
    } else {
        chase_destination(grid, from, target)
    }
}

// ── Chase mode ──

pub fn chase_destination(grid: &Grid, from: Actor, target: Actor) -> Actor {
    let row_delta = (target.row - from.row).signum();
    let col_delta = (target.col - from.col).signum();

    let (first, second) = if col_delta.abs() >= row_delta.abs() {
        ((0, col_delta), (row_delta, 0))
    } else {
        ((row_delta, 0), (0, col_delta))
    };

    step_to(grid, from, first)
        .or_else(|| step_to(grid, from, second))
        .unwrap_or(from)
}

// ── Frightened mode ──

pub fn frightened_destination<R: Rng + ?Sized>(grid: &Grid, from: Actor, rng: &mut R) -> Actor {
    let open: Vec<Actor> = Direction::ALL
        .iter()
        .filter_map(|d| step_to(grid, from, d.delta()))
        .collect();
    open.choose(rng).copied().unwrap_or(from)
}

// ── Shared helpers ──

/// Neighbour of `from` by `delta`, with the tunnel applied, or None on a wall.
fn step_to(grid: &Grid, from: Actor, (dr, dc): (i32, i32)) -> Option<Actor> {
    let r = from.row + dr;
    let c = from.col + dc;
    if grid.is_wall(r, c) { return None; }
    let (r, c) = grid.wrap(r, c);
    Some(Actor::new(r, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{COLS, ROWS, WRAP_ROW};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn grid() -> Grid {
        let mut g = Grid::new();
        g.reset(ROWS / 2, COLS / 2);
        g
    }

    #[test]
    fn chase_prefers_column_on_tie() {
        let g = grid();
        // open corridor along row 1 and column 1
        let next = chase_destination(&g, Actor::new(1, 1), Actor::new(3, 3));
        assert_eq!(next, Actor::new(1, 2));
    }

    #[test]
    fn chase_takes_row_when_column_aligned() {
        let g = grid();
        let next = chase_destination(&g, Actor::new(1, 1), Actor::new(5, 1));
        assert_eq!(next, Actor::new(2, 1));
    }

    #[test]
    fn chase_falls_back_to_other_axis() {
        let g = grid();
        // col first hits the wall at (3,2), row move goes down
        let next = chase_destination(&g, Actor::new(3, 1), Actor::new(4, 3));
        assert_eq!(next, Actor::new(4, 1));
    }

    #[test]
    fn chase_stays_when_boxed_in() {
        let g = grid();
        // same row: column move is walled, row delta is zero
        let next = chase_destination(&g, Actor::new(3, 1), Actor::new(3, 5));
        assert_eq!(next, Actor::new(3, 1));
    }

    #[test]
    fn chase_row_first_blocked_stays() {
        let g = grid();
        // column-aligned, so the row goes first; (4,3) is walled and the
        // column fallback has a zero delta
        let next = chase_destination(&g, Actor::new(3, 3), Actor::new(9, 3));
        assert_eq!(next, Actor::new(3, 3));
    }

    #[test]
    fn chase_row_first_when_open() {
        let g = grid();
        let next = chase_destination(&g, Actor::new(5, 3), Actor::new(9, 3));
        assert_eq!(next, Actor::new(6, 3));
    }

    #[test]
    fn chase_on_target_stays() {
        let g = grid();
        let here = Actor::new(7, 7);
        assert_eq!(chase_destination(&g, here, here), here);
    }

    #[test]
    fn frightened_only_picks_open_neighbours() {
        let g = grid();
        let mut rng = SmallRng::seed_from_u64(7);
        let from = Actor::new(3, 1); // up (2,1) + down (4,1) open; left wall; right wall
        for _ in 0..50 {
            let next = frightened_destination(&g, from, &mut rng);
            assert!(next == Actor::new(2, 1) || next == Actor::new(4, 1), "{next:?}");
        }
    }

    #[test]
    fn frightened_is_seed_deterministic() {
        let g = grid();
        let mut a = SmallRng::seed_from_u64(99);
        let mut b = SmallRng::seed_from_u64(99);
        let from = Actor::new(7, 7);
        for _ in 0..20 {
            assert_eq!(
                frightened_destination(&g, from, &mut a),
                frightened_destination(&g, from, &mut b),
            );
        }
    }

    #[test]
    fn frightened_uses_tunnel() {
        let g = grid();
        let mut rng = SmallRng::seed_from_u64(1);
        let from = Actor::new(WRAP_ROW, 0);
        let mut saw_wrap = false;
        for _ in 0..64 {
            let next = frightened_destination(&g, from, &mut rng);
            assert!(next.col >= 0 && next.col < COLS);
            if next == Actor::new(WRAP_ROW, COLS - 1) { saw_wrap = true; }
        }
        assert!(saw_wrap);
    }

    #[test]
    fn choose_destination_switches_on_mode() {
        let g = grid();
        let mut rng = SmallRng::seed_from_u64(3);
        let chased = choose_destination(&g, Actor::new(1, 1), Actor::new(1, 6), false, &mut rng);
        assert_eq!(chased, Actor::new(1, 2));
    }
}
