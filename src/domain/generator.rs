/// Line generator: produces one fresh row of level cells.
///
/// ## Band mapping
///
/// One uniform draw in `[0, ROLL_RANGE)` per interior cell, mapped through
/// ordered cumulative bands:
///
/// ```text
///   0 ........ wall ........ wall+glass ... +power_up ... +glass_power_up ... 1000
///   |  Wall    |   Glass     |   PowerUp    | PowerUpInGlass |     Empty       |
/// ```
///
/// First matching band wins, so the order is part of the semantics.
/// If the weights add up to more than `ROLL_RANGE` the later bands are
/// truncated and `Empty` is never drawn.

use std::ops::Range;

use rand::Rng;

use super::cell::Cell;

/// Size of the roll space. Weights are expressed per this many draws.
pub const ROLL_RANGE: u32 = 1000;

/// Per-mille weights of each non-empty cell type.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Weights {
    pub wall: u32,
    pub glass: u32,
    pub power_up: u32,
    pub glass_power_up: u32,
}

impl Weights {
    pub fn total(&self) -> u32 {
        self.wall
            .saturating_add(self.glass)
            .saturating_add(self.power_up)
            .saturating_add(self.glass_power_up)
    }

    /// Do the weights leave no room for `Empty`?
    pub fn is_over_budget(&self) -> bool {
        self.total() > ROLL_RANGE
    }
}

impl Default for Weights {
    fn default() -> Self {
        Weights { wall: 200, glass: 100, power_up: 5, glass_power_up: 2 }
    }
}

/// Map a roll to a cell type. Pure function of its two inputs.
pub fn pick_cell(roll: u32, weights: &Weights) -> Cell {
    let mut edge = weights.wall;
    if roll < edge { return Cell::Wall; }
    edge = edge.saturating_add(weights.glass);
    if roll < edge { return Cell::Glass; }
    edge = edge.saturating_add(weights.power_up);
    if roll < edge { return Cell::PowerUp; }
    edge = edge.saturating_add(weights.glass_power_up);
    if roll < edge { return Cell::PowerUpInGlass; }
    Cell::Empty
}

/// Column span of `span_width` cells centred in a row of `width` cells.
pub fn centered_span(width: usize, span_width: usize) -> Range<usize> {
    let span_width = span_width.min(width.saturating_sub(2));
    let start = (width - span_width) / 2;
    start..start + span_width
}

#[derive(Clone, Debug)]
pub struct LineGenerator {
    pub weights: Weights,
    /// Columns forced empty on keep-clear rows (the drop shaft under the spawn hole).
    pub clear_span: Range<usize>,
}

impl LineGenerator {
    pub fn new(weights: Weights, clear_span: Range<usize>) -> Self {
        LineGenerator { weights, clear_span }
    }

    /// Fill the interior of `row`. Columns 0 and `len - 1` are left untouched;
    /// boundary walls are the grid's job.
    pub fn fill<R: Rng + ?Sized>(&self, row: &mut [Cell], keep_clear: bool, rng: &mut R) {
        let width = row.len();
        if width < 3 { return; }

        for (x, cell) in row.iter_mut().enumerate().take(width - 1).skip(1) {
            if keep_clear && self.clear_span.contains(&x) {
                *cell = Cell::Empty;
                continue;
            }
            let roll = rng.random_range(0..ROLL_RANGE);
            *cell = pick_cell(roll, &self.weights);
        }
    }
}
