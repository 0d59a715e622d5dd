/// Entry point and game loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::time::Duration;

use config::GameConfig;
use domain::player::FrameInput;
use sim::event::GameEvent;
use sim::scene;
use sim::state::{FrameTime, GameState};
use sim::step;
use ui::controls::Controls;
use ui::renderer::TermRenderer;
use ui::{Clock, InputSource, Key, MonotonicClock};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    logging::init();
    let config = GameConfig::load();

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut state = GameState::new(&config, seed);
    log::info!(
        "starting: seed={} grid={}x{} cell={}x{}",
        state.seed,
        state.grid.width(),
        state.grid.visible_rows(),
        state.grid.cell_width(),
        state.grid.cell_height()
    );
    let mut renderer = TermRenderer::new(&config.grid, &config.display);
    let mut controls = Controls::new(&config.gamepad);

    match renderer.init() {
        Ok(reports_release) => controls.keyboard.honor_release = reports_release,
        Err(e) => {
            eprintln!("Terminal init failed: {e}");
            return;
        }
    }

    let clock = MonotonicClock::start();
    let result = game_loop(&mut state, &mut renderer, &mut controls, &clock, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!("Deep Drop: {} rows scrolled (seed {})", state.scroll.rows_scrolled, state.seed);
}

fn game_loop(
    state: &mut GameState,
    renderer: &mut TermRenderer,
    input: &mut impl InputSource,
    clock: &impl Clock,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        input.poll();
        if input.close_requested() {
            log::info!("quit requested");
            break;
        }

        let frame_input = FrameInput::from_keys(input.is_key_down(Key::Left), input.is_key_down(Key::Right));
        let time = FrameTime::sample(clock);
        for event in step::step(state, frame_input, time) {
            match event {
                GameEvent::PlayerLeftView => log::info!("player left the top of the view"),
                GameEvent::PlayerBlocked { row, col, cell } if cell.has_power_up() => {
                    log::debug!("blocked by sealed power-up at ({row}, {col})")
                }
                other => log::debug!("{other:?}"),
            }
        }

        scene::draw(state, &config.palette, renderer, time.millis)?;
        std::thread::sleep(FRAME_SLEEP);
    }
    Ok(())
}
