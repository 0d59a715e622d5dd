/// Platform seam: everything the game core needs from the outside world.
///
/// The core draws through [`Canvas`], reads keys through [`InputSource`]
/// and time through [`Clock`]. Terminal implementations live in the
/// submodules; tests use in-memory ones.

pub mod controls;
pub mod gamepad;
pub mod input;
pub mod renderer;

use std::io;
use std::time::Instant;

/// 24-bit colour.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Brighten every channel by `amount`, saturating at 255.
    pub fn lighten(self, amount: u8) -> Self {
        Rgb {
            r: self.r.saturating_add(amount),
            g: self.g.saturating_add(amount),
            b: self.b.saturating_add(amount),
        }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb { r, g, b }
    }
}

/// Logical keys the game reacts to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Key {
    Left,
    Right,
}

/// Drawing surface in game pixel space.
pub trait Canvas {
    fn clear(&mut self, color: Rgb);
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb);
    fn present(&mut self) -> io::Result<()>;
}

/// Per-frame input snapshot.
pub trait InputSource {
    /// Collect pending events. Call once per frame before querying.
    fn poll(&mut self);
    fn close_requested(&self) -> bool;
    fn is_key_down(&self, key: Key) -> bool;
}

/// Monotonic time since the session started.
pub trait Clock {
    fn elapsed_millis(&self) -> u64;
    fn elapsed_seconds(&self) -> f64;
}

pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        MonotonicClock { start: Instant::now() }
    }
}

impl Clock for MonotonicClock {
    fn elapsed_millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn elapsed_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
