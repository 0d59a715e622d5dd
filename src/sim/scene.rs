/// Frame composition: turns a `GameState` into rectangles on a `Canvas`.
///
/// Every non-empty cell is drawn at `(col * cw, row * ch - offset)`; the
/// empty background is the clear colour. Free power-ups are a centred
/// third-size square that blinks lighter every `BLINK_MS`.

use std::io;

use crate::config::Palette;
use crate::domain::cell::Cell;
use crate::ui::{Canvas, Rgb};
use super::state::GameState;

const BLINK_MS: u64 = 250;
const BLINK_LIGHTEN: u8 = 32;

/// Fill colour of a cell, `None` for empty cells (not drawn).
pub fn cell_color(cell: Cell, palette: &Palette) -> Option<Rgb> {
    match cell {
        Cell::Empty => None,
        Cell::Wall => Some(palette.wall),
        Cell::Glass => Some(palette.glass),
        Cell::PowerUp => Some(palette.power_up),
        Cell::PowerUpInGlass => Some(palette.glass_power_up),
    }
}

pub fn draw<C: Canvas + ?Sized>(
    state: &GameState,
    palette: &Palette,
    canvas: &mut C,
    elapsed_millis: u64,
) -> io::Result<()> {
    let cw = state.grid.cell_width() as i32;
    let ch = state.grid.cell_height() as i32;
    let offset = state.scroll.offset as i32;
    let blink_on = (elapsed_millis / BLINK_MS) % 2 == 1;

    canvas.clear(palette.background);

    for row in 0..state.grid.height() {
        for (col, &cell) in state.grid.row(row).iter().enumerate() {
            let Some(color) = cell_color(cell, palette) else { continue };
            let left = col as i32 * cw;
            let top = row as i32 * ch - offset;
            if cell == Cell::PowerUp {
                let color = if blink_on { color.lighten(BLINK_LIGHTEN) } else { color };
                canvas.draw_rect(left + cw / 3, top + ch / 3, cw / 3, ch / 3, color);
            } else {
                canvas.draw_rect(left, top, cw, ch, color);
            }
        }
    }

    let p = &state.player;
    canvas.draw_rect(
        p.x.round() as i32,
        (p.top().round() as i32) - offset,
        p.width as i32,
        p.height as i32,
        palette.player,
    );

    canvas.present()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::generator::{LineGenerator, Weights};
    use crate::domain::grid::Grid;
    use crate::domain::player::Player;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[derive(Default)]
    struct Recorder {
        cleared: Option<Rgb>,
        rects: Vec<(i32, i32, i32, i32, Rgb)>,
        presented: bool,
    }

    impl Canvas for Recorder {
        fn clear(&mut self, color: Rgb) {
            self.cleared = Some(color);
            self.rects.clear();
        }
        fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
            self.rects.push((x, y, w, h, color));
        }
        fn present(&mut self) -> io::Result<()> {
            self.presented = true;
            Ok(())
        }
    }

    fn small_state(offset: u32) -> GameState {
        let config = GameConfig::default();
        let rows = vec![
            vec![Cell::Wall, Cell::Empty, Cell::Wall],
            vec![Cell::Wall, Cell::PowerUp, Cell::Wall],
            vec![Cell::Wall, Cell::Glass, Cell::Wall],
        ];
        let grid = Grid::from_rows(rows, 40, 40, LineGenerator::new(Weights::default(), 1..2));
        let player = Player::new(41.0, 40.0, 13.0, 20.0);
        let mut state = GameState::with_parts(&config, grid, player, Pcg32::seed_from_u64(0), 0);
        state.scroll.offset = offset;
        state
    }

    #[test]
    fn palette_mapping() {
        let p = Palette::default();
        assert_eq!(cell_color(Cell::Empty, &p), None);
        assert_eq!(cell_color(Cell::Wall, &p), Some(Rgb::new(0, 0, 0)));
        assert_eq!(cell_color(Cell::PowerUpInGlass, &p), Some(Rgb::new(128, 128, 192)));
    }

    #[test]
    fn draws_cells_offset_by_scroll() {
        let palette = Palette::default();
        let state = small_state(10);
        let mut canvas = Recorder::default();
        draw(&state, &palette, &mut canvas, 0).unwrap();

        assert_eq!(canvas.cleared, Some(palette.background));
        assert!(canvas.presented);
        assert!(canvas.rects.contains(&(0, -10, 40, 40, palette.wall)));
        assert!(canvas.rects.contains(&(40, 70, 40, 40, palette.glass)));
        // 6 walls + power-up + glass + player
        assert_eq!(canvas.rects.len(), 9);
    }

    #[test]
    fn power_up_is_small_and_blinks() {
        let palette = Palette::default();
        let state = small_state(0);

        let mut canvas = Recorder::default();
        draw(&state, &palette, &mut canvas, 100).unwrap();
        assert!(canvas.rects.contains(&(53, 53, 13, 13, palette.power_up)));

        draw(&state, &palette, &mut canvas, 300).unwrap();
        assert!(canvas.rects.contains(&(53, 53, 13, 13, palette.power_up.lighten(32))));
    }

    #[test]
    fn player_drawn_last_above_feet() {
        let palette = Palette::default();
        let state = small_state(5);
        let mut canvas = Recorder::default();
        draw(&state, &palette, &mut canvas, 0).unwrap();
        assert_eq!(canvas.rects.last(), Some(&(41, 15, 13, 20, palette.player)));
    }
}
