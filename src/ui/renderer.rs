/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of ScreenCell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Every maze cell is two terminal columns wide so the board looks square.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::cell::Cell;
use crate::sim::session::Session;
use crate::sim::world::Phase;

// ── ScreenCell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct ScreenCell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl ScreenCell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// inter-row gap on VTE terminals matches the cell colour.
    const BASE_BG: Color = Color::Rgb { r: 12, g: 12, b: 24 };

    const BLANK: ScreenCell = ScreenCell { ch: ' ', fg: Color::White, bg: ScreenCell::BASE_BG };

    /// Sentinel that differs from any real cell; forces a full repaint.
    const INVALID: ScreenCell = ScreenCell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        ScreenCell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of ScreenCells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<ScreenCell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![ScreenCell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![ScreenCell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(ScreenCell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: ScreenCell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> ScreenCell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            ScreenCell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, ScreenCell::new(ch, fg, bg));
        }
    }

    /// Fill one maze cell (two columns).
    fn put_tile(&mut self, col: usize, row: usize, glyph: [char; 2], fg: Color, bg: Color) {
        self.set(col, row, ScreenCell::new(glyph[0], fg, bg));
        self.set(col + 1, row, ScreenCell::new(glyph[1], fg, bg));
    }
}

// ── Layout / palette ──

const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
/// Left margin, one maze cell wide, so the tunnel mouths have room.
const MAP_COL: usize = CELL_W;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const WALL_BG: Color = Color::Rgb { r: 30, g: 50, b: 170 };
const PELLET_FG: Color = Color::Rgb { r: 230, g: 200, b: 160 };
const POWER_FG: Color = Color::Rgb { r: 255, g: 240, b: 120 };
const PLAYER_FG: Color = Color::Rgb { r: 255, g: 230, b: 0 };
const FRIGHTENED_FG: Color = Color::Rgb { r: 70, g: 110, b: 255 };

/// Pursuer colours by id; wraps past the fourth.
const PURSUER_FG: [Color; 4] = [
    Color::Rgb { r: 255, g: 40, b: 40 },
    Color::Rgb { r: 255, g: 150, b: 200 },
    Color::Rgb { r: 0, g: 220, b: 220 },
    Color::Rgb { r: 255, g: 160, b: 40 },
];

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(ScreenCell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(ScreenCell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &Session) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(ScreenCell::INVALID);
            queue!(self.writer, SetBackgroundColor(ScreenCell::BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_phase != Some(session.phase()) {
            self.back.cells.fill(ScreenCell::INVALID);
            queue!(self.writer, SetBackgroundColor(ScreenCell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(session.phase());
        }

        self.front.clear();
        self.compose_hud(session);
        self.compose_maze(session);
        self.compose_actors(session);
        self.compose_help(session);

        if session.is_game_over() {
            self.compose_banner(session, "GAME  OVER", Color::Rgb { r: 255, g: 60, b: 60 });
        } else if session.is_victory() {
            self.compose_banner(session, "YOU  WIN!", Color::Rgb { r: 80, g: 255, b: 80 });
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = ScreenCell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        // Explicit base colours; ResetColor would fall back to the terminal default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(ScreenCell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, s: &Session) {
        let power = if s.power_up_active() {
            format!("POWER {:>2}s", s.power_up_seconds_left())
        } else {
            String::new()
        };
        let hud = format!(
            " Score:{:<6}  Level {}/{}  Pellets:{:<4} {} ",
            s.score(), s.level(), s.max_levels(), s.pellets_remaining(), power,
        );
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, ScreenCell::new(' ', Color::White, HUD_BG));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_maze(&mut self, s: &Session) {
        for r in 0..s.rows() {
            let row = MAP_ROW + r as usize;
            for c in 0..s.cols() {
                let col = MAP_COL + c as usize * CELL_W;
                match s.cell_kind(r, c) {
                    Cell::Wall => self.front.put_tile(col, row, [' ', ' '], Color::White, WALL_BG),
                    Cell::PowerPellet if s.has_pellet_at(r, c) => {
                        self.front.put_tile(col, row, ['●', ' '], POWER_FG, Color::Reset)
                    }
                    Cell::Pellet if s.has_pellet_at(r, c) => {
                        self.front.put_tile(col, row, ['·', ' '], PELLET_FG, Color::Reset)
                    }
                    _ => {}
                }
            }
        }
    }

    fn compose_actors(&mut self, s: &Session) {
        let frightened = s.power_up_active();
        for p in s.pursuers() {
            let fg = if frightened { FRIGHTENED_FG } else { PURSUER_FG[p.id % PURSUER_FG.len()] };
            if let Some((col, row)) = screen_pos(p.pos.row, p.pos.col) {
                self.front.put_tile(col, row, ['◆', ' '], fg, Color::Reset);
            }
        }

        // Player last so it stays visible when caught.
        let me = s.player_pos();
        if let Some((col, row)) = screen_pos(me.row, me.col) {
            self.front.put_tile(col, row, ['@', ' '], PLAYER_FG, Color::Reset);
        }
    }

    fn compose_help(&mut self, s: &Session) {
        let row = MAP_ROW + s.rows() as usize + 1;
        let help = " Arrows/WASD: Move   N/Enter: New game   Q/Esc: Quit";
        self.front.put_str(0, row, help, Color::DarkGrey, Color::Reset);
    }

    /// Centered box over the maze with the final score.
    fn compose_banner(&mut self, s: &Session, title: &str, fg: Color) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let box_w = 28;
        let map_w = s.cols() as usize * CELL_W;
        let x0 = MAP_COL + map_w.saturating_sub(box_w) / 2;
        let y0 = MAP_ROW + (s.rows() as usize).saturating_sub(5) / 2;

        for y in y0..y0 + 5 {
            for x in x0..x0 + box_w {
                self.front.set(x, y, ScreenCell::new(' ', Color::White, dim));
            }
        }

        let center = |text: &str| x0 + box_w.saturating_sub(text.chars().count()) / 2;
        let score = format!("Final score: {}", s.score());
        let hint = "N: Play again  Q: Quit";
        self.front.put_str(center(title), y0 + 1, title, fg, dim);
        self.front.put_str(center(&score), y0 + 2, &score, Color::White, dim);
        self.front.put_str(center(hint), y0 + 3, hint, Color::DarkGrey, dim);
    }
}

/// Screen position for a maze coordinate; tunnel mouths one cell outside
/// the border still land in the margin.
fn screen_pos(r: i32, c: i32) -> Option<(usize, usize)> {
    let col = MAP_COL as i32 + c * CELL_W as i32;
    if r < 0 || col < 0 {
        return None;
    }
    Some((col as usize, MAP_ROW + r as usize))
}
