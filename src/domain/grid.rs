/// Grid: the maze, its cell kinds and pellet bookkeeping.
///
/// ## Two layers
///
///   - `cells`       — the displayed kind of every cell.
///   - `has_pellet`  — authoritative pellet presence.
///
/// `has_pellet[r][c]` implies `cells[r][c]` is `Pellet` or `PowerPellet`.
/// `pellets_remaining` always equals the number of set `has_pellet` flags.
///
/// ## Wrap corridor
///
/// On `WRAP_ROW` the outer wall is open at both ends. The coordinates one
/// step beyond those openings (col -1 and col COLS) read as `Empty` and are
/// remapped to the opposite edge by `wrap()`. Every other out-of-bounds
/// coordinate reads as `Wall`.
///
/// The layout is a compiled-in constant; `reset` is fully deterministic.

use super::cell::Cell;

pub const ROWS: i32 = 19;
pub const COLS: i32 = 19;
pub const WRAP_ROW: i32 = ROWS / 2;

/// Cells forced to `Empty` on every reset (centre column of the house).
pub const PURSUER_HOUSE: [(i32, i32); 3] = [
    (ROWS / 2 - 1, COLS / 2),
    (ROWS / 2, COLS / 2),
    (ROWS / 2 + 1, COLS / 2),
];

/// Power pellets near the four corners. Only stamped over a `Pellet`.
pub const POWER_PELLETS: [(i32, i32); 4] = [
    (3, 1),
    (3, COLS - 2),
    (ROWS - 4, 1),
    (ROWS - 4, COLS - 2),
];

/// Internal maze walls as (row, col).
const OBSTACLES: &[(i32, i32)] = &[
    // house sides
    (8, 8), (8, 10),
    (9, 8), (9, 10),
    (10, 8), (10, 10),

    // top horizontals
    (4, 2), (4, 3), (4, 4), (4, 5), (4, 6), (4, 7),
    (4, 11), (4, 12), (4, 13), (4, 14), (4, 15), (4, 16),
    (6, 4), (6, 5), (6, 13), (6, 14),

    // bottom horizontals
    (14, 2), (14, 3), (14, 4), (14, 5), (14, 6), (14, 7),
    (14, 11), (14, 12), (14, 13), (14, 14), (14, 15), (14, 16),
    (12, 4), (12, 5), (12, 13), (12, 14),

    // outer verticals
    (2, 2), (3, 2), (5, 2),
    (2, 16), (3, 16), (5, 16),
    (13, 2), (15, 2), (16, 2),
    (13, 16), (15, 16), (16, 16),

    // inner verticals
    (2, 7), (3, 7), (5, 7),
    (2, 11), (3, 11), (5, 11),
    (13, 7), (15, 7), (16, 7),
    (13, 11), (15, 11), (16, 11),

    // mid blocks
    (9, 4), (9, 5),
    (9, 13), (9, 14),
];

#[derive(Clone, Debug)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    has_pellet: Vec<Vec<bool>>,
    pellets_remaining: usize,
}

// ── Construction / reset ──

impl Grid {
    /// An all-empty grid. Call `reset` before playing on it.
    pub fn new() -> Self {
        Grid {
            cells: vec![vec![Cell::Empty; COLS as usize]; ROWS as usize],
            has_pellet: vec![vec![false; COLS as usize]; ROWS as usize],
            pellets_remaining: 0,
        }
    }

    pub fn rows(&self) -> i32 { ROWS }
    pub fn cols(&self) -> i32 { COLS }

    /// Rebuild the maze for a new level.
    ///
    /// Order matters: pellets are counted before the power pellets are
    /// stamped, and stamping only converts cells that already hold a pellet.
    pub fn reset(&mut self, spawn_row: i32, spawn_col: i32) {
        for r in 0..ROWS as usize {
            self.cells[r].fill(Cell::Pellet);
            self.has_pellet[r].fill(true);
        }

        for c in 0..COLS {
            self.stamp(0, c, Cell::Wall);
            self.stamp(ROWS - 1, c, Cell::Wall);
        }
        for r in 0..ROWS {
            self.stamp(r, 0, Cell::Wall);
            self.stamp(r, COLS - 1, Cell::Wall);
        }
        self.stamp(WRAP_ROW, 0, Cell::Empty);
        self.stamp(WRAP_ROW, COLS - 1, Cell::Empty);

        for &(r, c) in OBSTACLES {
            self.stamp(r, c, Cell::Wall);
        }

        self.stamp(spawn_row, spawn_col, Cell::Empty);
        for &(r, c) in &PURSUER_HOUSE {
            self.stamp(r, c, Cell::Empty);
        }

        self.pellets_remaining = self.cells.iter()
            .flatten()
            .filter(|&&cell| cell == Cell::Pellet)
            .count();

        for &(r, c) in &POWER_PELLETS {
            if self.cell_kind(r, c) == Cell::Pellet {
                self.set_cell(r, c, Cell::PowerPellet);
            }
        }
    }

    /// Write a non-consumable kind and drop the pellet flag with it.
    fn stamp(&mut self, r: i32, c: i32, kind: Cell) {
        if let Some((ri, ci)) = index(r, c) {
            self.cells[ri][ci] = kind;
            self.has_pellet[ri][ci] = false;
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new()
    }
}

// ── Queries ──

impl Grid {
    /// Kind at (r, c). Out of bounds is `Wall`, except the two tunnel
    /// mouths just outside the wrap row, which are `Empty`.
    pub fn cell_kind(&self, r: i32, c: i32) -> Cell {
        match index(r, c) {
            Some((ri, ci)) => self.cells[ri][ci],
            None if is_tunnel_mouth(r, c) => Cell::Empty,
            None => Cell::Wall,
        }
    }

    pub fn is_wall(&self, r: i32, c: i32) -> bool {
        if is_tunnel_mouth(r, c) { return false; }
        self.cell_kind(r, c).is_wall()
    }

    pub fn has_pellet_at(&self, r: i32, c: i32) -> bool {
        index(r, c).is_some_and(|(ri, ci)| self.has_pellet[ri][ci])
    }

    /// O(1): maintained by `reset` and `consume_pellet_at`.
    pub fn pellets_remaining(&self) -> usize {
        self.pellets_remaining
    }

    /// Remap a tunnel mouth to the opposite edge. Other coordinates
    /// pass through unchanged.
    pub fn wrap(&self, r: i32, c: i32) -> (i32, i32) {
        if r == WRAP_ROW && c < 0 {
            (r, COLS - 1)
        } else if r == WRAP_ROW && c >= COLS {
            (r, 0)
        } else {
            (r, c)
        }
    }
}

// ── Mutation ──

impl Grid {
    /// Set the displayed kind. Out-of-bounds writes are ignored.
    /// The pellet flag is left alone; a non-consumable kind clears it
    /// so the flag never outlives its kind.
    pub fn set_cell(&mut self, r: i32, c: i32, kind: Cell) {
        if let Some((ri, ci)) = index(r, c) {
            if !kind.is_consumable() && self.has_pellet[ri][ci] {
                self.has_pellet[ri][ci] = false;
                self.pellets_remaining -= 1;
            }
            self.cells[ri][ci] = kind;
        }
    }

    /// Eat the pellet at (r, c). Returns whether one was there.
    pub fn consume_pellet_at(&mut self, r: i32, c: i32) -> bool {
        match index(r, c) {
            Some((ri, ci)) if self.has_pellet[ri][ci] => {
                self.has_pellet[ri][ci] = false;
                self.cells[ri][ci] = Cell::Empty;
                self.pellets_remaining -= 1;
                true
            }
            _ => false,
        }
    }

    /// Put back what a pursuer covered. A pellet eaten while covered
    /// stays eaten: consumable kinds without a flag come back `Empty`.
    pub fn restore_cell(&mut self, r: i32, c: i32, kind: Cell) {
        if kind.is_consumable() && !self.has_pellet_at(r, c) {
            self.set_cell(r, c, Cell::Empty);
        } else {
            self.set_cell(r, c, kind);
        }
    }
}

// ── Helpers ──

/// Is (r, c) walled by the fixed layout alone (border or obstacle list)?
/// Independent of any reset, so spawn points can be checked up front.
pub fn is_layout_wall(r: i32, c: i32) -> bool {
    if index(r, c).is_none() { return !is_tunnel_mouth(r, c); }
    let border = r == 0 || r == ROWS - 1 || c == 0 || c == COLS - 1;
    let opening = r == WRAP_ROW && (c == 0 || c == COLS - 1);
    (border && !opening) || OBSTACLES.contains(&(r, c))
}

fn index(r: i32, c: i32) -> Option<(usize, usize)> {
    if (0..ROWS).contains(&r) && (0..COLS).contains(&c) {
        Some((r as usize, c as usize))
    } else {
        None
    }
}

fn is_tunnel_mouth(r: i32, c: i32) -> bool {
    r == WRAP_ROW && (c == -1 || c == COLS)
}
