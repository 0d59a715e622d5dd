/// Cell types of the level grid.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Wall,           // Solid, never breaks
    Glass,          // Solid, breakable
    PowerUp,        // Pickup floating in open space
    PowerUpInGlass, // Pickup sealed inside glass (solid)
}

impl Cell {
    /// Does this cell block movement?
    pub fn is_solid(self) -> bool {
        matches!(self, Cell::Wall | Cell::Glass | Cell::PowerUpInGlass)
    }

    /// Does this cell carry a power-up (free or sealed)?
    pub fn has_power_up(self) -> bool {
        matches!(self, Cell::PowerUp | Cell::PowerUpInGlass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_cells() {
        assert!(Cell::Wall.is_solid());
        assert!(Cell::Glass.is_solid());
        assert!(Cell::PowerUpInGlass.is_solid());
        assert!(!Cell::Empty.is_solid());
        assert!(!Cell::PowerUp.is_solid());
    }

    #[test]
    fn free_power_up_is_passable() {
        assert!(!Cell::PowerUp.is_solid());
        assert!(Cell::PowerUp.has_power_up());
        assert!(Cell::PowerUpInGlass.has_power_up());
        assert!(!Cell::Glass.has_power_up());
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(Cell::default(), Cell::Empty);
    }
}
