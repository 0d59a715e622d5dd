/// Terminal `Canvas`: double-buffered, diff-based half-block renderer.
///
/// How it works:
///   1. `clear` / `draw_rect` rasterise game-pixel rectangles into a dot
///      buffer. One terminal cell holds two dots stacked vertically.
///   2. `present` turns each dot pair into a `▀` cell (fg = upper dot,
///      bg = lower dot) in the `front` buffer, plus a help line.
///   3. Each cell is compared with the `back` buffer (previous frame) and
///      only changed cells are emitted, batched with `queue!`, flushed once.
///   4. Front becomes the next back.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::{DisplayConfig, GridConfig};

use super::{Canvas, Rgb};

const HALF_BLOCK: char = '▀';
const HELP: &str = " ←/→ move   q/Esc quit";
const HELP_FG: Rgb = Rgb::new(140, 140, 140);
const HELP_BG: Rgb = Rgb::new(0, 0, 0);

fn term_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

// ── Dots: game pixels scaled down to terminal resolution ──

/// Dot raster. `scale_x` / `scale_y` convert game pixels to dots.
pub struct DotBuffer {
    width: usize,
    height: usize,
    scale_x: f32,
    scale_y: f32,
    dots: Vec<Rgb>,
}

impl DotBuffer {
    pub fn new(width: usize, height: usize, scale_x: f32, scale_y: f32) -> Self {
        DotBuffer { width, height, scale_x, scale_y, dots: vec![Rgb::default(); width * height] }
    }

    fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.dots = vec![Rgb::default(); width * height];
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.dots.fill(color);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.dots[y * self.width + x])
    }

    /// Map a pixel span to a dot span. Non-empty spans cover at least one dot.
    fn span(start: i32, len: i32, scale: f32) -> (i32, i32) {
        let a = (start as f32 * scale).round() as i32;
        let mut b = ((start + len) as f32 * scale).round() as i32;
        if len > 0 && b <= a {
            b = a + 1;
        }
        (a, b)
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        let (x0, x1) = Self::span(x, w, self.scale_x);
        let (y0, y1) = Self::span(y, h, self.scale_y);
        let x0 = x0.clamp(0, self.width as i32) as usize;
        let x1 = x1.clamp(0, self.width as i32) as usize;
        let y0 = y0.clamp(0, self.height as i32) as usize;
        let y1 = y1.clamp(0, self.height as i32) as usize;
        for row in y0..y1 {
            self.dots[row * self.width + x0..row * self.width + x1].fill(color);
        }
    }
}

// ── Terminal cells ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct TermCell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

impl TermCell {
    fn dots(upper: Rgb, lower: Rgb) -> Self {
        // Uniform cells print as a space; fewer glyph changes in the diff.
        if upper == lower {
            TermCell { ch: ' ', fg: upper, bg: lower }
        } else {
            TermCell { ch: HALF_BLOCK, fg: upper, bg: lower }
        }
    }

    fn text(ch: char) -> Self {
        TermCell { ch, fg: HELP_FG, bg: HELP_BG }
    }
}

// ── Renderer ──

pub struct TermRenderer {
    writer: BufWriter<io::Stdout>,
    dots: DotBuffer,
    front: Vec<TermCell>,
    /// Previous frame; `None` forces a repaint of that cell.
    back: Vec<Option<TermCell>>,
    term_w: usize,
    term_h: usize,
    /// Playfield size in terminal cells.
    field_cols: usize,
    field_rows: usize,
    needs_clear: bool,
    enhanced_keys: bool,
}

impl TermRenderer {
    pub fn new(grid: &GridConfig, display: &DisplayConfig) -> Self {
        let cols = display.cols_per_cell as usize;
        let rows = display.rows_per_cell as usize;
        let scale_x = cols as f32 / grid.cell_width as f32;
        let scale_y = (rows * 2) as f32 / grid.cell_height as f32;
        TermRenderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            dots: DotBuffer::new(0, 0, scale_x, scale_y),
            front: Vec::new(),
            back: Vec::new(),
            term_w: 0,
            term_h: 0,
            field_cols: grid.width * cols,
            field_rows: grid.height * rows,
            needs_clear: true,
            enhanced_keys: false,
        }
    }

    /// Enter raw mode / alternate screen. Returns whether the terminal
    /// reports key release events.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }
        log::debug!("keyboard enhancement: {}", self.enhanced_keys);

        self.sync_size();
        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Pick up terminal resizes. Dots cover the playfield clipped to the terminal.
    fn sync_size(&mut self) {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if tw == self.term_w && th == self.term_h {
            return;
        }
        log::debug!("terminal size {tw}x{th}");
        self.term_w = tw;
        self.term_h = th;
        let cols = self.field_cols.min(tw);
        let rows = self.field_rows.min(th);
        self.dots.resize(cols, rows * 2);
        self.front = vec![TermCell::text(' '); tw * th];
        self.back = vec![None; tw * th];
        self.needs_clear = true;
    }

    /// Build the front buffer from the dot raster and the help line.
    fn compose(&mut self) {
        let blank = TermCell::text(' ');
        self.front.fill(blank);
        let rows = self.dots.height / 2;
        for y in 0..rows {
            for x in 0..self.dots.width {
                let upper = self.dots.get(x, y * 2).unwrap_or_default();
                let lower = self.dots.get(x, y * 2 + 1).unwrap_or_default();
                self.front[y * self.term_w + x] = TermCell::dots(upper, lower);
            }
        }
        let help_row = rows + 1;
        if help_row < self.term_h {
            for (x, ch) in HELP.chars().take(self.term_w).enumerate() {
                self.front[help_row * self.term_w + x] = TermCell::text(ch);
            }
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg: Option<Rgb> = None;
        let mut last_bg: Option<Rgb> = None;
        let mut cursor_at: Option<(usize, usize)> = None;

        for y in 0..self.term_h {
            for x in 0..self.term_w {
                let idx = y * self.term_w + x;
                let cell = self.front[idx];
                if self.back[idx] == Some(cell) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if last_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(term_color(cell.fg)))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.writer, SetBackgroundColor(term_color(cell.bg)))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

impl Canvas for TermRenderer {
    fn clear(&mut self, color: Rgb) {
        self.sync_size();
        self.dots.fill(color);
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        self.dots.draw_rect(x, y, w, h, color);
    }

    fn present(&mut self) -> io::Result<()> {
        if self.needs_clear {
            queue!(self.writer, ResetColor, Clear(ClearType::All))?;
            self.back.fill(None);
            self.needs_clear = false;
        }
        self.compose();
        self.flush_diff()?;
        for (back, front) in self.back.iter_mut().zip(&self.front) {
            *back = Some(*front);
        }
        Ok(())
    }
}
