/// GameState: everything a running session owns.
///
/// Created once at startup and passed by reference through `step` and
/// `scene::draw`. There is no restart: the session lasts until quit.
///
/// ## Coordinates
///
/// Pixel space, origin at the top-left of grid row 0. The scroll offset is
/// applied only when drawing; `player.y` is in grid space and drops by one
/// cell height per grid shift so the player stays put in the level.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::domain::grid::Grid;
use crate::domain::player::Player;
use crate::ui::Clock;
use super::scroll::{ScrollClock, ScrollState, WrapPolicy};

/// One clock reading shared by everything in a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    pub millis: u64,
    pub seconds: f64,
}

impl FrameTime {
    pub fn sample<C: Clock + ?Sized>(clock: &C) -> Self {
        FrameTime { millis: clock.elapsed_millis(), seconds: clock.elapsed_seconds() }
    }

    #[cfg(test)]
    pub fn from_millis(millis: u64) -> Self {
        FrameTime { millis, seconds: millis as f64 / 1000.0 }
    }
}

pub struct GameState {
    pub grid: Grid,
    pub player: Player,
    pub scroll: ScrollState,
    pub scroll_clock: ScrollClock,
    pub wrap_policy: WrapPolicy,
    pub rng: Pcg32,
    pub seed: u64,
    pub ms_per_pixel: f32,
    /// Clock reading of the previous frame, for movement deltas.
    pub last_millis: u64,
    /// Set once the player has scrolled off the top.
    pub player_left_view: bool,
}

impl GameState {
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::new(&config.grid, config.weights, &mut rng);
        let player = spawn_player(config);
        Self::with_parts(config, grid, player, rng, seed)
    }

    /// Assemble a state around an existing grid and player (custom layouts, tests).
    pub fn with_parts(config: &GameConfig, grid: Grid, player: Player, rng: Pcg32, seed: u64) -> Self {
        let wrap_policy = if config.scroll.catch_up { WrapPolicy::CatchUp } else { WrapPolicy::Collapse };
        GameState {
            scroll_clock: ScrollClock::new(config.scroll.period_secs, config.grid.cell_height),
            grid,
            player,
            scroll: ScrollState::default(),
            wrap_policy,
            rng,
            seed,
            ms_per_pixel: config.player.ms_per_pixel,
            last_millis: 0,
            player_left_view: false,
        }
    }
}

/// Player box is a third of a cell wide and half a cell tall, standing
/// on top of the spawn row.
pub fn spawn_player(config: &GameConfig) -> Player {
    let cw = config.grid.cell_width;
    let ch = config.grid.cell_height;
    Player::new(
        (config.player.spawn_col as u32 * cw) as f32,
        (config.grid.spawn_row as u32 * ch) as f32,
        (cw / 3) as f32,
        (ch / 2) as f32,
    )
}
