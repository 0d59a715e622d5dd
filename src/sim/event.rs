/// Events emitted during a frame step.
/// The game loop consumes these for logging.

use crate::domain::cell::Cell;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// The grid scrolled up by `count` rows this frame.
    RowsShifted { count: u32 },
    /// Horizontal movement was stopped by a solid cell.
    PlayerBlocked { row: i64, col: i64, cell: Cell },
    /// The player scrolled off the top of the screen. Fires once.
    PlayerLeftView,
}
