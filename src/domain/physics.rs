/// Horizontal collision: probe-then-snap against the grid.
///
/// ## Model
///
/// After a tentative move, the grid cell under the player's leading edge is
/// probed at two heights:
///   - feet: the bottom pixel row of the player (`y - 1`)
///   - head: the top pixel row of the player (`y - height`)
///
/// If either probe lands in a solid cell (`Wall`, `Glass`, `PowerUpInGlass`)
/// the player snaps to the near boundary of that cell:
///   - moving left  → `x = (col + 1) * cell_width`
///   - moving right → `x = col * cell_width - width`
///
/// There is no vertical collision; the player never moves vertically on its own.
///
/// ## Sub-steps
///
/// A single probe can tunnel through a cell when the displacement exceeds the
/// cell width (e.g. after a long frame stall). Moves are split into sub-steps
/// of at most half a cell, stopping at the first contact. For normal frame
/// times this is exactly one step.

use super::cell::Cell;
use super::grid::Grid;
use super::player::{MoveDir, Player};

/// Offset from the feet edge to the first pixel row inside the player.
const FEET_INSET: f32 = 1.0;

/// An obstacle the player ran into this frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Contact {
    pub row: i64,
    pub col: i64,
    pub cell: Cell,
}

/// Probe the two leading-edge points for a solid cell. Feet are checked first.
pub fn probe_leading_edge(player: &Player, dir: MoveDir, grid: &Grid) -> Option<Contact> {
    let edge_x = match dir {
        MoveDir::Left => player.x,
        MoveDir::Right => player.right(),
    };
    [player.y - FEET_INSET, player.top()]
        .into_iter()
        .find_map(|probe_y| {
            let (row, col) = grid.cell_index_px(edge_x, probe_y);
            let cell = grid.get(row, col);
            cell.is_solid().then_some(Contact { row, col, cell })
        })
}

/// Move the player `dx` pixels (non-negative) in `dir`, resolving collisions.
/// Returns the obstacle that stopped the move, if any.
pub fn move_horizontal(player: &mut Player, dir: MoveDir, dx: f32, grid: &Grid) -> Option<Contact> {
    if dx <= 0.0 {
        return None;
    }

    let max_step = grid.cell_width() / 2.0;
    let mut remaining = dx;
    while remaining > 0.0 {
        let step = remaining.min(max_step);
        remaining -= step;

        match dir {
            MoveDir::Left => player.x -= step,
            MoveDir::Right => player.x += step,
        }

        if let Some(contact) = probe_leading_edge(player, dir, grid) {
            player.x = match dir {
                MoveDir::Left => (contact.col + 1) as f32 * grid.cell_width(),
                MoveDir::Right => contact.col as f32 * grid.cell_width() - player.width,
            };
            return Some(contact);
        }
    }
    None
}
