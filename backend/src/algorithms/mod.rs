//! Pure scheduling algorithms over the program grid.

pub mod conflicts;
pub mod grid;

pub use conflicts::{conflicting_program_ids, detect_conflicts, detect_conflicts_excluding};
pub use grid::{weekly_grid, GridDay, WeeklyGrid};
