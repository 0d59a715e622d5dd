/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// Defaults reproduce the classic layout: a 15×15 visible grid of 40px
/// cells, a spawn platform on row 6 with a 3-cell hole, one row scrolled
/// every 1.5s.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::generator::Weights;
use crate::ui::Rgb;

// ── Public Config Structs ──

#[derive(Clone, Debug, Default)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub scroll: ScrollConfig,
    pub weights: Weights,
    pub player: PlayerConfig,
    pub palette: Palette,
    pub display: DisplayConfig,
    pub gamepad: GamepadConfig,
    /// Level seed. `None` = fresh random seed each run.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub width: usize,
    /// Visible rows. The grid holds one more (the scroll buffer row).
    pub height: usize,
    pub spawn_platform: bool,
    pub spawn_row: usize,
    pub spawn_hole_width: usize,
    /// Rows under the platform kept clear below the hole.
    pub keep_clear_rows: usize,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl GridConfig {
    /// Row of the spawn platform, if the layout has a usable one.
    pub fn platform_row(&self) -> Option<usize> {
        (self.spawn_platform && self.spawn_row >= 1 && self.spawn_row <= self.height)
            .then_some(self.spawn_row)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            width: default_grid_width(),
            height: default_grid_height(),
            spawn_platform: true,
            spawn_row: default_spawn_row(),
            spawn_hole_width: default_hole_width(),
            keep_clear_rows: default_keep_clear(),
            cell_width: default_cell_size(),
            cell_height: default_cell_size(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollConfig {
    pub period_secs: f64,
    /// Apply every missed row after a stall instead of collapsing them into one.
    pub catch_up: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig { period_secs: default_period(), catch_up: true }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    /// Milliseconds per pixel of horizontal travel.
    pub ms_per_pixel: f32,
    pub spawn_col: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig { ms_per_pixel: default_ms_per_pixel(), spawn_col: default_spawn_col() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub wall: Rgb,
    pub glass: Rgb,
    pub power_up: Rgb,
    pub glass_power_up: Rgb,
    pub player: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: default_background().into(),
            wall: default_wall_color().into(),
            glass: default_glass_color().into(),
            power_up: default_power_up_color().into(),
            glass_power_up: default_glass_power_up_color().into(),
            player: default_player_color().into(),
        }
    }
}

/// Terminal cells used to draw one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    pub cols_per_cell: u16,
    pub rows_per_cell: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig { cols_per_cell: default_cols_per_cell(), rows_per_cell: default_rows_per_cell() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub quit: Vec<String>,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        GamepadConfig { quit: default_quit() }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    scroll: TomlScroll,
    #[serde(default)]
    weights: TomlWeights,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    colors: TomlColors,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_grid_width")]
    width: usize,
    #[serde(default = "default_grid_height")]
    height: usize,
    #[serde(default = "default_true")]
    spawn_platform: bool,
    #[serde(default = "default_spawn_row")]
    spawn_row: usize,
    #[serde(default = "default_hole_width")]
    spawn_hole_width: usize,
    #[serde(default = "default_keep_clear")]
    keep_clear_rows: usize,
    #[serde(default = "default_cell_size")]
    cell_width: u32,
    #[serde(default = "default_cell_size")]
    cell_height: u32,
}

#[derive(Deserialize, Debug)]
struct TomlScroll {
    #[serde(default = "default_period")]
    period_secs: f64,
    #[serde(default = "default_true")]
    catch_up: bool,
}

#[derive(Deserialize, Debug)]
struct TomlWeights {
    #[serde(default = "default_wall_weight")]
    wall: u32,
    #[serde(default = "default_glass_weight")]
    glass: u32,
    #[serde(default = "default_power_up_weight")]
    power_up: u32,
    #[serde(default = "default_glass_power_up_weight")]
    glass_power_up: u32,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_ms_per_pixel")]
    ms_per_pixel: f32,
    #[serde(default = "default_spawn_col")]
    spawn_col: usize,
}

#[derive(Deserialize, Debug)]
struct TomlColors {
    #[serde(default = "default_background")]
    background: [u8; 3],
    #[serde(default = "default_wall_color")]
    wall: [u8; 3],
    #[serde(default = "default_glass_color")]
    glass: [u8; 3],
    #[serde(default = "default_power_up_color")]
    power_up: [u8; 3],
    #[serde(default = "default_glass_power_up_color")]
    glass_power_up: [u8; 3],
    #[serde(default = "default_player_color")]
    player: [u8; 3],
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_cols_per_cell")]
    cols_per_cell: u16,
    #[serde(default = "default_rows_per_cell")]
    rows_per_cell: u16,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_true() -> bool { true }
fn default_grid_width() -> usize { 15 }
fn default_grid_height() -> usize { 15 }
fn default_spawn_row() -> usize { 6 }
fn default_hole_width() -> usize { 3 }
fn default_keep_clear() -> usize { 3 }
fn default_cell_size() -> u32 { 40 }      // 600px screen / 15 cells
fn default_period() -> f64 { 1.5 }        // seconds per scrolled row
fn default_wall_weight() -> u32 { 200 }   // per mille
fn default_glass_weight() -> u32 { 100 }
fn default_power_up_weight() -> u32 { 5 }
fn default_glass_power_up_weight() -> u32 { 2 }
fn default_ms_per_pixel() -> f32 { 5.0 }
fn default_spawn_col() -> usize { 3 }
fn default_background() -> [u8; 3] { [128, 192, 255] }
fn default_wall_color() -> [u8; 3] { [0, 0, 0] }
fn default_glass_color() -> [u8; 3] { [32, 128, 192] }
fn default_power_up_color() -> [u8; 3] { [255, 32, 64] }
fn default_glass_power_up_color() -> [u8; 3] { [128, 128, 192] }
fn default_player_color() -> [u8; 3] { [64, 32, 0] }
fn default_cols_per_cell() -> u16 { 4 }
fn default_rows_per_cell() -> u16 { 2 }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid {
            width: default_grid_width(),
            height: default_grid_height(),
            spawn_platform: default_true(),
            spawn_row: default_spawn_row(),
            spawn_hole_width: default_hole_width(),
            keep_clear_rows: default_keep_clear(),
            cell_width: default_cell_size(),
            cell_height: default_cell_size(),
        }
    }
}

impl Default for TomlScroll {
    fn default() -> Self {
        TomlScroll { period_secs: default_period(), catch_up: default_true() }
    }
}

impl Default for TomlWeights {
    fn default() -> Self {
        TomlWeights {
            wall: default_wall_weight(),
            glass: default_glass_weight(),
            power_up: default_power_up_weight(),
            glass_power_up: default_glass_power_up_weight(),
        }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer { ms_per_pixel: default_ms_per_pixel(), spawn_col: default_spawn_col() }
    }
}

impl Default for TomlColors {
    fn default() -> Self {
        TomlColors {
            background: default_background(),
            wall: default_wall_color(),
            glass: default_glass_color(),
            power_up: default_power_up_color(),
            glass_power_up: default_glass_power_up_color(),
            player: default_player_color(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { cols_per_cell: default_cols_per_cell(), rows_per_cell: default_rows_per_cell() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { quit: default_quit() }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            grid: GridConfig {
                width: t.grid.width,
                height: t.grid.height,
                spawn_platform: t.grid.spawn_platform,
                spawn_row: t.grid.spawn_row,
                spawn_hole_width: t.grid.spawn_hole_width,
                keep_clear_rows: t.grid.keep_clear_rows,
                cell_width: t.grid.cell_width,
                cell_height: t.grid.cell_height,
            },
            scroll: ScrollConfig {
                period_secs: t.scroll.period_secs,
                catch_up: t.scroll.catch_up,
            },
            weights: Weights {
                wall: t.weights.wall,
                glass: t.weights.glass,
                power_up: t.weights.power_up,
                glass_power_up: t.weights.glass_power_up,
            },
            player: PlayerConfig {
                ms_per_pixel: t.player.ms_per_pixel,
                spawn_col: t.player.spawn_col,
            },
            palette: Palette {
                background: t.colors.background.into(),
                wall: t.colors.wall.into(),
                glass: t.colors.glass.into(),
                power_up: t.colors.power_up.into(),
                glass_power_up: t.colors.glass_power_up.into(),
                player: t.colors.player.into(),
            },
            display: DisplayConfig {
                cols_per_cell: t.display.cols_per_cell,
                rows_per_cell: t.display.rows_per_cell,
            },
            gamepad: GamepadConfig { quit: t.gamepad.quit },
            seed: t.seed,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`, then sanitize it.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let mut config = load_toml(&candidate_dirs());
        for warning in config.sanitize() {
            log::warn!("config: {warning}");
        }
        config
    }

    /// Parse a config document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from)
    }

    /// Repair values the game cannot run with. Returns one message per
    /// adjustment. Over-budget weights are reported but kept: they are
    /// well defined (later bands are truncated).
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        let grid = &mut self.grid;

        if grid.width < 3 {
            warnings.push(format!("grid.width {} too small, using 3", grid.width));
            grid.width = 3;
        }
        if grid.height == 0 {
            warnings.push("grid.height 0, using 1".to_string());
            grid.height = 1;
        }
        if grid.cell_width == 0 || grid.cell_height == 0 {
            warnings.push("zero cell size, using defaults".to_string());
            grid.cell_width = default_cell_size();
            grid.cell_height = default_cell_size();
        }
        if grid.spawn_row == 0 || grid.spawn_row > grid.height {
            let row = grid.spawn_row.clamp(1, grid.height);
            warnings.push(format!("grid.spawn_row {} outside rows 1..={}, using {row}", grid.spawn_row, grid.height));
            grid.spawn_row = row;
        }
        if grid.spawn_hole_width > grid.width - 2 {
            warnings.push(format!(
                "grid.spawn_hole_width {} wider than the interior, using {}",
                grid.spawn_hole_width, grid.width - 2,
            ));
            grid.spawn_hole_width = grid.width - 2;
        }

        if !(self.scroll.period_secs.is_finite() && self.scroll.period_secs > 0.0) {
            warnings.push(format!("scroll.period_secs {} invalid, using {}", self.scroll.period_secs, default_period()));
            self.scroll.period_secs = default_period();
        }

        if !(self.player.ms_per_pixel.is_finite() && self.player.ms_per_pixel > 0.0) {
            warnings.push(format!("player.ms_per_pixel {} invalid, using {}", self.player.ms_per_pixel, default_ms_per_pixel()));
            self.player.ms_per_pixel = default_ms_per_pixel();
        }
        let last_interior = self.grid.width - 2;
        if self.player.spawn_col < 1 || self.player.spawn_col > last_interior {
            let col = self.player.spawn_col.clamp(1, last_interior);
            warnings.push(format!("player.spawn_col {} outside the walls, using {col}", self.player.spawn_col));
            self.player.spawn_col = col;
        }

        if self.display.cols_per_cell == 0 || self.display.rows_per_cell == 0 {
            warnings.push("display cell size 0, using 1".to_string());
            self.display.cols_per_cell = self.display.cols_per_cell.max(1);
            self.display.rows_per_cell = self.display.rows_per_cell.max(1);
        }

        if self.weights.is_over_budget() {
            warnings.push(format!(
                "weights add up to {} (> 1000): later bands are truncated and no empty cells are generated",
                self.weights.total(),
            ));
        }

        warnings
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/deepdrop)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/deepdrop");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/deepdrop");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First readable config.toml in `search_dirs` wins. A file that fails to
/// parse stops the search and yields defaults.
fn load_toml(search_dirs: &[PathBuf]) -> GameConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match GameConfig::from_toml_str(&text) {
                Ok(cfg) => {
                    log::info!("loaded {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    log::warn!("{} parse error: {e}; using default settings", path.display());
                    return GameConfig::default();
                }
            },
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
            }
        }
    }
    GameConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.grid, GridConfig::default());
        assert_eq!(cfg.scroll, ScrollConfig::default());
        assert_eq!(cfg.weights, Weights::default());
        assert_eq!(cfg.palette, Palette::default());
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "seed = 42\n[grid]\nwidth = 21\n[weights]\nglass = 50\n[colors]\nwall = [10, 20, 30]\n",
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.grid.width, 21);
        assert_eq!(cfg.grid.height, 15);
        assert_eq!(cfg.weights.glass, 50);
        assert_eq!(cfg.weights.wall, 200);
        assert_eq!(cfg.palette.wall, Rgb::new(10, 20, 30));
        assert_eq!(cfg.palette.background, Rgb::new(128, 192, 255));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::from_toml_str("[grid]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn defaults_need_no_repair() {
        let mut cfg = GameConfig::default();
        assert!(cfg.sanitize().is_empty());
    }

    #[test]
    fn sanitize_repairs_impossible_layouts() {
        let mut cfg = GameConfig::default();
        cfg.grid.width = 1;
        cfg.grid.spawn_row = 40;
        cfg.scroll.period_secs = 0.0;
        cfg.player.spawn_col = 9;
        let warnings = cfg.sanitize();
        assert_eq!(cfg.grid.width, 3);
        assert_eq!(cfg.grid.spawn_row, 15);
        assert_eq!(cfg.grid.platform_row(), Some(15));
        assert_eq!(cfg.grid.spawn_hole_width, 1);
        assert_eq!(cfg.scroll.period_secs, 1.5);
        assert_eq!(cfg.player.spawn_col, 1);
        assert!(warnings.len() >= 4);
    }

    #[test]
    fn over_budget_weights_warn_but_are_kept() {
        let mut cfg = GameConfig::default();
        cfg.weights.wall = 950;
        let warnings = cfg.sanitize();
        assert_eq!(warnings.len(), 1);
        assert_eq!(cfg.weights.wall, 950);
    }

    /// Fresh scratch directory under the system temp dir.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("deepdrop-config-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = scratch_dir("malformed");
        std::fs::write(dir.join("config.toml"), "[grid]\nwidth = \"wide\"\n").unwrap();

        let cfg = load_toml(&[dir.clone()]);
        assert_eq!(cfg.grid, GridConfig::default());
        assert_eq!(cfg.seed, None);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn first_directory_with_a_file_wins() {
        let empty = scratch_dir("order-empty");
        let first = scratch_dir("order-first");
        let second = scratch_dir("order-second");
        std::fs::write(first.join("config.toml"), "seed = 1\n[grid]\nwidth = 9\n").unwrap();
        std::fs::write(second.join("config.toml"), "seed = 2\n").unwrap();

        let cfg = load_toml(&[empty.clone(), first.clone(), second.clone()]);
        assert_eq!(cfg.seed, Some(1));
        assert_eq!(cfg.grid.width, 9);

        let cfg = load_toml(&[empty.clone(), second.clone(), first.clone()]);
        assert_eq!(cfg.seed, Some(2));
        assert_eq!(cfg.grid.width, 15);

        for dir in [empty, first, second] {
            std::fs::remove_dir_all(&dir).unwrap();
        }
    }

    #[test]
    fn no_file_anywhere_gives_defaults() {
        let dir = scratch_dir("none");
        let cfg = load_toml(&[dir.clone()]);
        assert_eq!(cfg.scroll, ScrollConfig::default());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn platform_row_bounds() {
        let mut g = GridConfig::default();
        assert_eq!(g.platform_row(), Some(6));
        g.spawn_row = 0;
        assert_eq!(g.platform_row(), None);
        g.spawn_row = 15;
        assert_eq!(g.platform_row(), Some(15));
        g.spawn_platform = false;
        assert_eq!(g.platform_row(), None);
    }
}
