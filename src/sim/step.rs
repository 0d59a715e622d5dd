/// The step function: advances the game by one frame.
///
/// Processing order:
///   1. Scroll update (time → offset, number of rows to shift)
///   2. Grid shifts + player tracking
///   3. Horizontal movement with collision
///   4. View check
///
/// Every shift completes before movement reads the grid, so collision
/// always sees the grid that will be drawn this frame.

use crate::domain::physics;
use crate::domain::player::FrameInput;
use super::event::GameEvent;
use super::state::{FrameTime, GameState};

pub fn step(state: &mut GameState, input: FrameInput, time: FrameTime) -> Vec<GameEvent> {
    let mut events = Vec::new();

    resolve_scroll(state, time.seconds, &mut events);
    resolve_movement(state, input, time.millis, &mut events);
    resolve_view(state, &mut events);

    events
}

fn resolve_scroll(state: &mut GameState, seconds: f64, events: &mut Vec<GameEvent>) {
    let shifts = state.scroll.advance(&state.scroll_clock, seconds, state.wrap_policy);
    if shifts == 0 {
        return;
    }
    for _ in 0..shifts {
        state.grid.shift_up(&mut state.rng);
    }
    state.player.track_shift(shifts, state.grid.cell_height());
    events.push(GameEvent::RowsShifted { count: shifts });
}

/// Constant speed while a direction is held: `elapsed ms / ms_per_pixel`.
fn resolve_movement(state: &mut GameState, input: FrameInput, millis: u64, events: &mut Vec<GameEvent>) {
    let elapsed = millis.saturating_sub(state.last_millis);
    state.last_millis = millis;

    let dir = match input.movement {
        Some(d) => d,
        None => return,
    };
    let dx = elapsed as f32 / state.ms_per_pixel;
    if let Some(contact) = physics::move_horizontal(&mut state.player, dir, dx, &state.grid) {
        events.push(GameEvent::PlayerBlocked { row: contact.row, col: contact.col, cell: contact.cell });
    }
}

/// The player is drawn at `y - offset`; once its feet are above the top
/// edge it is gone for good (there is no vertical movement to bring it back).
fn resolve_view(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.player_left_view {
        return;
    }
    if state.player.y - (state.scroll.offset as f32) <= 0.0 {
        state.player_left_view = true;
        events.push(GameEvent::PlayerLeftView);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::cell::Cell;
    use crate::domain::player::MoveDir;

    fn state(seed: u64) -> GameState {
        GameState::new(&GameConfig::default(), seed)
    }

    fn moving(dir: MoveDir) -> FrameInput {
        FrameInput { movement: Some(dir) }
    }

    #[test]
    fn idle_frame_changes_nothing() {
        let mut s = state(1);
        let before = s.player.clone();
        let events = step(&mut s, FrameInput::default(), FrameTime::from_millis(16));
        assert!(events.is_empty());
        assert_eq!(s.player, before);
        assert_eq!(s.last_millis, 16);
    }

    #[test]
    fn movement_speed_is_time_based() {
        let mut s = state(2);
        step(&mut s, FrameInput::default(), FrameTime::from_millis(100));
        step(&mut s, moving(MoveDir::Right), FrameTime::from_millis(150));
        // 50ms at 5ms/px = 10px.
        assert_eq!(s.player.x, 130.0);
        step(&mut s, moving(MoveDir::Left), FrameTime::from_millis(175));
        assert_eq!(s.player.x, 125.0);
    }

    #[test]
    fn both_keys_cancel() {
        let mut s = state(3);
        step(&mut s, FrameInput::from_keys(true, true), FrameTime::from_millis(200));
        assert_eq!(s.player.x, 120.0);
    }

    #[test]
    fn left_boundary_wall_stops_player() {
        let mut s = state(4);
        s.player.x = 45.0;
        let events = step(&mut s, moving(MoveDir::Left), FrameTime::from_millis(100));
        assert_eq!(s.player.x, 40.0);
        assert_eq!(events, vec![GameEvent::PlayerBlocked { row: 5, col: 0, cell: Cell::Wall }]);

        // Keeps pushing: stays flush with the wall.
        step(&mut s, moving(MoveDir::Left), FrameTime::from_millis(400));
        assert_eq!(s.player.x, 40.0);
    }

    #[test]
    fn wrap_shifts_grid_and_player() {
        let mut s = state(5);
        step(&mut s, FrameInput::default(), FrameTime::from_millis(1400));
        let row_one = s.grid.row(1).to_vec();

        let events = step(&mut s, FrameInput::default(), FrameTime::from_millis(1520));
        assert_eq!(events, vec![GameEvent::RowsShifted { count: 1 }]);
        assert_eq!(s.grid.row(0), row_one.as_slice());
        assert_eq!(s.player.y, 200.0);
        // Still standing on the platform, now one row higher.
        assert_eq!(s.grid.cell_at_px(s.player.x, s.player.y), Cell::Wall);
    }

    #[test]
    fn shift_happens_before_collision() {
        let mut s = state(6);
        s.player.x = 45.0;
        step(&mut s, FrameInput::default(), FrameTime::from_millis(1400));
        let events = step(&mut s, moving(MoveDir::Left), FrameTime::from_millis(1520));
        // The contact row is already in shifted coordinates.
        assert_eq!(
            events,
            vec![
                GameEvent::RowsShifted { count: 1 },
                GameEvent::PlayerBlocked { row: 4, col: 0, cell: Cell::Wall },
            ]
        );
        assert_eq!(s.player.x, 40.0);
    }

    #[test]
    fn long_stall_catches_up() {
        let mut s = state(7);
        let events = step(&mut s, FrameInput::default(), FrameTime::from_millis(4600));
        assert_eq!(events, vec![GameEvent::RowsShifted { count: 3 }]);
        assert_eq!(s.player.y, 120.0);
    }

    #[test]
    fn player_leaving_view_is_reported_once() {
        let mut s = state(8);
        // Spawn row 6: gone after six rows plus a little.
        let events = step(&mut s, FrameInput::default(), FrameTime::from_millis(9100));
        assert!(events.contains(&GameEvent::PlayerLeftView));
        let events = step(&mut s, FrameInput::default(), FrameTime::from_millis(9200));
        assert!(!events.contains(&GameEvent::PlayerLeftView));
    }
}
