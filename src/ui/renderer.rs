/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (grid of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::board::{tile_value, SIZE};
use crate::sim::session::{GameSession, Phase};
use crate::ui::theme::Scheme;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Color::Reset,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: '\0',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell { ch, fg, bg });
            cx += 1;
        }
    }
}

// ── Layout ──

/// Terminal columns per board cell.
const CELL_W: usize = 7;
/// Terminal rows per board cell.
const CELL_H: usize = 3;

const HUD_ROW: usize = 0;
const GRID_ROW: usize = 2;
const HELP_ROW: usize = GRID_ROW + SIZE * CELL_H + 1;
const STATUS_ROW: usize = HELP_ROW + 1;

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

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

    /// Draw the session plus the shell's status line (confirmation
    /// prompt or game-over hint; empty for none).
    pub fn render(&mut self, session: &GameSession, status: &str, scheme: Scheme) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, Clear(ClearType::All))?;
        }

        self.front.clear();
        self.compose_hud(session);
        self.compose_grid(session, scheme);
        self.compose_help();
        self.compose_status(session, status);
        if session.phase == Phase::GameOver {
            self.compose_game_over_banner();
        }

        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Frame composition ──

    fn compose_hud(&mut self, session: &GameSession) {
        let best = tile_value(session.board.highest_level());
        let hud = format!("2048   {} pts   best {}", session.score, best);
        self.front.put_str(1, HUD_ROW, &hud, Color::White, Color::Reset);
    }

    fn compose_grid(&mut self, session: &GameSession, scheme: Scheme) {
        for by in 0..SIZE {
            for bx in 0..SIZE {
                let level = session.board.level(bx, by);
                let (fg, bg) = scheme.colors(level);
                let label = if level == 0 {
                    "   ·   ".to_string()
                } else {
                    format!("{:^7}", tile_value(level))
                };

                let x0 = 1 + bx * CELL_W;
                let y0 = GRID_ROW + by * CELL_H;
                // Padding rows above and below the value fill out the tile block
                self.front.put_str(x0, y0, "       ", fg, bg);
                self.front.put_str(x0, y0 + 1, &label, fg, bg);
                self.front.put_str(x0, y0 + 2, "       ", fg, bg);
            }
        }
    }

    fn compose_help(&mut self) {
        self.front.put_str(
            1,
            HELP_ROW,
            "←↑↓→ / wasd  move    r restart    q quit",
            Color::DarkGrey,
            Color::Reset,
        );
    }

    fn compose_status(&mut self, session: &GameSession, status: &str) {
        if !status.is_empty() {
            self.front.put_str(1, STATUS_ROW, status, Color::Yellow, Color::Reset);
        } else if session.phase == Phase::GameOver {
            self.front.put_str(
                1,
                STATUS_ROW,
                "r: new game    q / enter: quit",
                Color::Yellow,
                Color::Reset,
            );
        }
    }

    fn compose_game_over_banner(&mut self) {
        let banner = "  GAME OVER  ";
        let grid_w = SIZE * CELL_W;
        let x = 1 + (grid_w.saturating_sub(banner.len())) / 2;
        let y = GRID_ROW + (SIZE * CELL_H) / 2;
        self.front.put_str(x, y, banner, Color::White, Color::Red);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Color::Reset;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Color::Reset),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                // Position cursor unless we're continuing a run
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;

                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}
