/// Keyboard state tracker.
///
/// Terminals report key presses, not key state. To get "is Left held?"
/// we remember when each key last pressed or repeated:
///   - With keyboard enhancement, explicit Release events end a hold.
///     A lost Release (focus change) still expires after `LOST_RELEASE_TIMEOUT`.
///   - Without it, a key counts as released after `HOLD_TIMEOUT` of silence
///     (auto-repeat keeps refreshing it while held).
///
/// Quit: Ctrl+C, Esc or `q`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::Key;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// Silence limit when Release events are reported. Repeat events refresh
/// a held key well within this.
const LOST_RELEASE_TIMEOUT: Duration = Duration::from_millis(1000);

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A'), KeyCode::Char('h')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D'), KeyCode::Char('l')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Latched once a quit key is seen; never cleared.
    quit: bool,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            quit: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before simulation.
    pub fn drain_events(&mut self) {
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.handle_key(key, Instant::now());
            }
        }
        self.expire(Instant::now());
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if is_quit(&key) {
            self.quit = true;
            return;
        }
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            // Unreliable without enhancement; timeout handles it.
            KeyEventKind::Release => {}
            _ => {
                self.last_active.insert(key.code, now);
            }
        }
    }

    /// Drop keys that have gone silent for too long.
    fn expire(&mut self, now: Instant) {
        let timeout = if self.honor_release { LOST_RELEASE_TIMEOUT } else { HOLD_TIMEOUT };
        self.last_active.retain(|_, t| now.duration_since(*t) < timeout);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Is any key bound to `key` currently held?
    pub fn key_held(&self, key: Key) -> bool {
        let codes = match key {
            Key::Left => KEYS_LEFT,
            Key::Right => KEYS_RIGHT,
        };
        codes.iter().any(|c| self.last_active.contains_key(c))
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}
