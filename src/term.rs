use crate::render::{DrawOp, Style};
use crate::view::DisplayConfig;
use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Cell {
    pub(crate) const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Color::Black, bold: false };
}

/// Row-major grid of cells.
pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        let cells = vec![Cell::BLANK; usize::from(w) * usize::from(h)];
        Self { w, h, cells }
    }

    fn idx(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.w) + usize::from(x)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }

    /// Off-grid writes are dropped.
    pub(crate) fn put(&mut self, x: i32, y: i32, c: Cell) {
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }

    fn put_str(&mut self, x: i32, y: i32, s: &str, pen: Pen) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x.saturating_add(i as i32), y, pen.cell(ch));
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Replays a frame's draw operations in order.
    pub(crate) fn apply(&mut self, ops: &[DrawOp], display: DisplayConfig) {
        for op in ops {
            match op {
                DrawOp::HorizontalLine { row, ch, style } => {
                    let pen = Pen::for_style(*style, display);
                    for x in 0..i32::from(self.w) {
                        self.put(x, *row, pen.cell(*ch));
                    }
                }
                DrawOp::VerticalLine { col, ch, style } => {
                    let pen = Pen::for_style(*style, display);
                    for y in 0..i32::from(self.h) {
                        self.put(*col, y, pen.cell(*ch));
                    }
                }
                DrawOp::Glyph { row, col, ch, style } => {
                    self.put(*col, *row, Pen::for_style(*style, display).cell(*ch));
                }
                DrawOp::Text { row, col, text, style } => {
                    let pen = Pen::for_style(*style, display);
                    if *style == Style::Status {
                        // the status bar owns its whole row
                        for x in 0..i32::from(self.w) {
                            self.put(x, *row, pen.cell(' '));
                        }
                    }
                    self.put_str(*col, *row, text, pen);
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pen {
    fg: Color,
    bg: Color,
    bold: bool,
}

impl Pen {
    fn for_style(style: Style, display: DisplayConfig) -> Self {
        let plain = Pen { fg: Color::White, bg: Color::Black, bold: false };
        let inverted = Pen { fg: Color::Black, bg: Color::White, bold: true };
        if !display.color {
            return match style {
                Style::Highlight(_) | Style::Status => inverted,
                _ => plain,
            };
        }
        match style {
            Style::Axis => Pen { fg: Color::DarkGrey, ..plain },
            Style::Label => Pen { fg: Color::Grey, ..plain },
            Style::Body(b) => Pen { fg: b.color(), bold: true, ..plain },
            Style::Highlight(b) => Pen { bg: b.color(), ..inverted },
            Style::Panel => Pen { bg: Color::DarkBlue, ..plain },
            Style::Status => Pen { fg: Color::Black, bg: Color::Grey, bold: false },
        }
    }

    fn cell(self, ch: char) -> Cell {
        Cell { ch, fg: self.fg, bg: self.bg, bold: self.bold }
    }
}

/// The real screen: what was last shown, plus the frame being composed.
pub(crate) struct Terminal {
    out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    shown: CellBuffer,
    pub(crate) frame: CellBuffer,
    /// Forces a full repaint on the next present.
    dirty: bool,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide, DisableLineWrap)?;
        let (cols, rows) = terminal::size()?;
        Ok(Self::sized(out, cols, rows))
    }

    fn sized(out: io::Stdout, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            shown: CellBuffer::new(cols, rows),
            frame: CellBuffer::new(cols, rows),
            dirty: true,
        }
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        execute!(
            self.out,
            SetAttribute(Attribute::Reset),
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Reallocates both buffers when the window changed size.
    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (cols, rows) = terminal::size()?;
        if (cols, rows) == (self.cols, self.rows) {
            return Ok(false);
        }
        let out = std::mem::replace(&mut self.out, io::stdout());
        *self = Self::sized(out, cols, rows);
        Ok(true)
    }

    /// Writes the cells that differ from what is on screen, or everything
    /// after a resize.
    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        let full = std::mem::take(&mut self.dirty);
        queue!(self.out, BeginSynchronizedUpdate)?;
        if full {
            queue!(self.out, ResetColor, Clear(ClearType::All))?;
        }

        let mut pen: Option<(Color, Color, bool)> = None;
        let width = usize::from(self.cols);
        let changed = self.frame.cells.iter().zip(&self.shown.cells).enumerate();
        for (i, (c, _)) in changed.filter(|(_, (c, old))| full || c != old) {
            // both indices fit: the buffers are cols x rows of u16
            let (x, y) = ((i % width) as u16, (i / width) as u16);
            queue!(self.out, cursor::MoveTo(x, y))?;

            let want = (c.fg, c.bg, c.bold);
            if pen.map(|p| p.2) != Some(c.bold) {
                let attr = if c.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                queue!(self.out, SetAttribute(attr))?;
            }
            if pen.map(|p| p.0) != Some(c.fg) {
                queue!(self.out, SetForegroundColor(c.fg))?;
            }
            if pen.map(|p| p.1) != Some(c.bg) {
                queue!(self.out, SetBackgroundColor(c.bg))?;
            }
            pen = Some(want);
            queue!(self.out, Print(c.ch))?;
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.shown.cells.copy_from_slice(&self.frame.cells);
        Ok(())
    }
}
