/// Cell kinds and their properties.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Pellet,      // +1 score
    PowerPellet, // starts the power-up window
}

impl Cell {
    /// Does this cell block movement?
    pub fn is_wall(self) -> bool {
        matches!(self, Cell::Wall)
    }

    /// Can this kind carry a pellet flag?
    pub fn is_consumable(self) -> bool {
        matches!(self, Cell::Pellet | Cell::PowerPellet)
    }
}
