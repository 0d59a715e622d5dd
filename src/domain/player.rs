/// The player block and the per-frame input that drives it.

/// Horizontal movement direction (continuous while key held).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
}

/// Frame input after key resolution.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    pub movement: Option<MoveDir>,
}

impl FrameInput {
    /// Left and right held together cancel out.
    pub fn from_keys(left: bool, right: bool) -> Self {
        let movement = match (left, right) {
            (true, false) => Some(MoveDir::Left),
            (false, true) => Some(MoveDir::Right),
            _ => None,
        };
        FrameInput { movement }
    }
}

/// Player position in pixel space.
///
/// `x` is the left edge, `y` the feet (bottom edge, exclusive). The box
/// spans `[x, x + width) × [y - height, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Player {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Player { x, y, width, height }
    }

    pub fn top(&self) -> f32 {
        self.y - self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Follow the grid up by `rows` shifts so the player keeps its place in the level.
    pub fn track_shift(&mut self, rows: u32, cell_height: f32) {
        self.y -= rows as f32 * cell_height;
    }
}
