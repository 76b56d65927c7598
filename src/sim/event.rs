/// Events emitted during a simulation step.
/// The front-end logs them; the simulation never reads them back.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PelletEaten { row: i32, col: i32 },
    PowerUpActivated,
    PowerUpExpired,
    PursuerCaptured { id: usize },
    PlayerCaught { id: usize },
    LevelCleared { level: u32 },
    Victory,
}
