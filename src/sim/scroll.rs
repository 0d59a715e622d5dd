/// Scroll clock: derives the scroll position from elapsed time.
///
/// The scroll is a sawtooth recomputed every frame from the session clock,
/// never accumulated, so it cannot drift:
///
/// ```text
///   total  = round(elapsed / period * cell_height)
///   offset = total % cell_height     (pixels, 0..cell_height)
///   rows   = total / cell_height     (whole rows scrolled since start)
/// ```
///
/// A wrap (`offset < last_offset`) means a whole row went by and the grid
/// has to shift.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollClock {
    period_secs: f64,
    cell_height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollSample {
    pub offset: u32,
    pub rows: u64,
}

/// What to do when more than one row scrolled by since the previous frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapPolicy {
    /// At most one shift per frame, only when the offset wrapped.
    Collapse,
    /// One shift per whole row scrolled since the previous frame.
    CatchUp,
}

impl ScrollClock {
    pub fn new(period_secs: f64, cell_height: u32) -> Self {
        ScrollClock { period_secs, cell_height: cell_height.max(1) }
    }

    pub fn sample(&self, elapsed_secs: f64) -> ScrollSample {
        let ch = u64::from(self.cell_height);
        let total = (elapsed_secs.max(0.0) / self.period_secs * ch as f64).round() as u64;
        ScrollSample { offset: (total % ch) as u32, rows: total / ch }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: u32,
    pub last_offset: u32,
    pub rows_scrolled: u64,
}

impl ScrollState {
    /// Move to `elapsed_secs` and return how many grid shifts to apply.
    pub fn advance(&mut self, clock: &ScrollClock, elapsed_secs: f64, policy: WrapPolicy) -> u32 {
        let sample = clock.sample(elapsed_secs);
        self.last_offset = self.offset;
        self.offset = sample.offset;

        let missed = sample.rows.saturating_sub(self.rows_scrolled);
        self.rows_scrolled = self.rows_scrolled.max(sample.rows);

        match policy {
            WrapPolicy::Collapse => u32::from(self.wrapped()),
            WrapPolicy::CatchUp => u32::try_from(missed).unwrap_or(u32::MAX),
        }
    }

    /// Did the offset wrap on the last `advance`?
    pub fn wrapped(&self) -> bool {
        self.offset < self.last_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn clock() -> ScrollClock {
        ScrollClock::new(1.5, 40)
    }

    #[test]
    fn sawtooth_values() {
        let c = clock();
        assert_eq!(c.sample(0.0), ScrollSample { offset: 0, rows: 0 });
        assert_eq!(c.sample(0.75), ScrollSample { offset: 20, rows: 0 });
        assert_eq!(c.sample(1.47), ScrollSample { offset: 39, rows: 0 });
        assert_eq!(c.sample(1.5), ScrollSample { offset: 0, rows: 1 });
        assert_eq!(c.sample(3.0 + 0.375), ScrollSample { offset: 10, rows: 2 });
    }

    #[test]
    fn rounding_wraps_slightly_early() {
        // round(39.73) = 40 → already the next row.
        assert_eq!(clock().sample(1.49), ScrollSample { offset: 0, rows: 1 });
    }

    #[test]
    fn negative_time_is_start() {
        assert_eq!(clock().sample(-3.0), ScrollSample { offset: 0, rows: 0 });
    }

    #[test]
    fn wrap_triggers_single_shift() {
        let c = clock();
        let mut s = ScrollState::default();
        assert_eq!(s.advance(&c, 1.40, WrapPolicy::CatchUp), 0);
        assert!(!s.wrapped());
        assert_eq!(s.advance(&c, 1.52, WrapPolicy::CatchUp), 1);
        assert!(s.wrapped());
        assert_eq!(s.advance(&c, 1.60, WrapPolicy::CatchUp), 0);
    }

    #[test]
    fn stall_catch_up_applies_every_row() {
        let c = clock();
        let mut s = ScrollState::default();
        s.advance(&c, 0.1, WrapPolicy::CatchUp);
        assert_eq!(s.advance(&c, 4.6, WrapPolicy::CatchUp), 3);
        assert_eq!(s.rows_scrolled, 3);
        assert_eq!(s.offset, 3);
    }

    #[test]
    fn stall_collapse_follows_offset_only() {
        let c = clock();
        let mut s = ScrollState::default();
        s.advance(&c, 0.1, WrapPolicy::Collapse); // offset 3
        // Three rows later the offset is 3 again: no wrap seen, no shift.
        assert_eq!(s.advance(&c, 4.6, WrapPolicy::Collapse), 0);
        // Row 4 begins: offset falls from 3 to 1.
        assert_eq!(s.advance(&c, 6.04, WrapPolicy::Collapse), 1);
    }

    proptest! {
        #[test]
        fn prop_offset_in_range(elapsed in 0.0f64..100_000.0, period in 0.05f64..10.0, ch in 1u32..200) {
            let sample = ScrollClock::new(period, ch).sample(elapsed);
            prop_assert!(sample.offset < ch);
        }

        #[test]
        fn prop_shift_exactly_on_wrap(gaps in proptest::collection::vec(0.001f64..0.5, 1..400)) {
            // Frames well under one period apart: both policies agree with
            // the offset comparison.
            let c = clock();
            let mut catch_up = ScrollState::default();
            let mut collapse = ScrollState::default();
            let mut t = 0.0;
            for gap in gaps {
                t += gap;
                let a = catch_up.advance(&c, t, WrapPolicy::CatchUp);
                let b = collapse.advance(&c, t, WrapPolicy::Collapse);
                prop_assert_eq!(a, u32::from(catch_up.wrapped()));
                prop_assert_eq!(a, b);
            }
        }
    }
}
