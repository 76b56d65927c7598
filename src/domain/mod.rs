pub mod actor;
pub mod cell;
pub mod grid;
pub mod movement;
pub mod pursuit;
