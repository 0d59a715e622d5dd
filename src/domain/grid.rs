/// Grid: the scrolling level.
///
/// ## Layout
///
/// `height()` = visible rows + 1. The extra row at the bottom is a buffer
/// that scrolls into view while the next row is still being revealed.
///
/// Rows live in a `VecDeque`, so `shift_up` is a pop-front + push-back
/// and the popped row's allocation is recycled for the new bottom row.
///
/// ## Invariants
///   - Column 0 and column `width - 1` are `Wall` in every row.
///   - Row 0 starts as a solid ceiling; it is never regenerated and
///     disappears once scrolled past.
///   - Pixel ↔ cell arithmetic happens here and nowhere else.

use std::collections::VecDeque;

use rand::Rng;

use crate::config::GridConfig;
use super::cell::Cell;
use super::generator::{centered_span, LineGenerator, Weights};

#[derive(Clone, Debug)]
pub struct Grid {
    rows: VecDeque<Vec<Cell>>,
    width: usize,
    cell_width: f32,
    cell_height: f32,
    generator: LineGenerator,
}

/// A row with only its boundary walls set.
fn bounded_row(width: usize) -> Vec<Cell> {
    let mut row = vec![Cell::Empty; width];
    set_boundaries(&mut row);
    row
}

fn set_boundaries(row: &mut [Cell]) {
    if let Some(first) = row.first_mut() { *first = Cell::Wall; }
    if let Some(last) = row.last_mut() { *last = Cell::Wall; }
}

impl Grid {
    /// Build the starting level: ceiling, side walls, optional spawn
    /// platform with its hole, keep-clear shaft and random rows below.
    pub fn new<R: Rng + ?Sized>(layout: &GridConfig, weights: Weights, rng: &mut R) -> Self {
        let width = layout.width;
        let total_rows = layout.height + 1;
        let hole = centered_span(width, layout.spawn_hole_width);
        let generator = LineGenerator::new(weights, hole.clone());

        let mut rows: VecDeque<Vec<Cell>> = (0..total_rows).map(|_| bounded_row(width)).collect();
        rows[0].fill(Cell::Wall);

        // Open air between the ceiling and the spawn row in both modes.
        let spawn_row = layout.spawn_row.min(total_rows - 1).max(1);
        let platform = layout.platform_row();
        let first_random = match platform {
            Some(platform_row) => {
                for (x, cell) in rows[platform_row].iter_mut().enumerate() {
                    *cell = if hole.contains(&x) { Cell::Empty } else { Cell::Wall };
                }
                platform_row + 1
            }
            None => spawn_row,
        };

        for y in first_random..total_rows {
            let keep_clear = platform.is_some() && y < first_random + layout.keep_clear_rows;
            generator.fill(&mut rows[y], keep_clear, rng);
        }

        Grid {
            rows,
            width,
            cell_width: layout.cell_width as f32,
            cell_height: layout.cell_height as f32,
            generator,
        }
    }

    /// Build a grid from explicit rows (hand-authored layouts, tests).
    /// Boundary walls are enforced; short rows are padded with `Empty`.
    #[allow(dead_code)]
    pub fn from_rows(
        rows: Vec<Vec<Cell>>,
        cell_width: u32,
        cell_height: u32,
        generator: LineGenerator,
    ) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                set_boundaries(&mut row);
                row
            })
            .collect();
        Grid {
            rows,
            width,
            cell_width: cell_width as f32,
            cell_height: cell_height as f32,
            generator,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Total rows including the bottom buffer row.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn visible_rows(&self) -> usize {
        self.height().saturating_sub(1)
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Cell at (row, col). Callers are responsible for bounds.
    #[inline]
    pub fn cell_at(&self, row: usize, col: usize) -> Cell {
        self.rows[row][col]
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        &self.rows[row]
    }

    #[cfg(test)]
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Bounds-tolerant lookup.
    /// The side walls extend forever: boundary columns and anything beyond
    /// them read as `Wall`. Interior cells above the ceiling or below the
    /// buffer row read as `Empty`.
    pub fn get(&self, row: i64, col: i64) -> Cell {
        let last_col = self.width as i64 - 1;
        if col <= 0 || col >= last_col {
            return Cell::Wall;
        }
        if row < 0 || row >= self.rows.len() as i64 {
            return Cell::Empty;
        }
        self.cell_at(row as usize, col as usize)
    }

    /// (row, col) of the cell containing pixel (x, y).
    #[inline]
    pub fn cell_index_px(&self, x: f32, y: f32) -> (i64, i64) {
        (
            (y / self.cell_height).floor() as i64,
            (x / self.cell_width).floor() as i64,
        )
    }

    /// Cell containing pixel (x, y).
    #[inline]
    pub fn cell_at_px(&self, x: f32, y: f32) -> Cell {
        let (row, col) = self.cell_index_px(x, y);
        self.get(row, col)
    }

    /// Scroll the level up by one row: discard row 0, append a fresh bottom row.
    pub fn shift_up<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut row = match self.rows.pop_front() {
            Some(row) => row,
            None => return,
        };
        set_boundaries(&mut row);
        self.generator.fill(&mut row, false, rng);
        self.rows.push_back(row);
    }
}
