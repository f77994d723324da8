use std::io;

use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

use crate::apple::Apple;
use crate::config::{Palette, Rgb};
use crate::grid::Cell;
use crate::snake::Snake;

const GLYPH_FILL: &str = "█";
const GLYPH_EDGE: &str = "▌";

impl From<Rgb> for Color {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        Color::Rgb(r, g, b)
    }
}

/// Sink for the frame the game loop emits every tick.
pub trait Renderer {
    /// Starts a new frame filled with `background`.
    fn clear(&mut self, background: Rgb);

    /// Paints one board cell. Later calls paint over earlier ones.
    fn draw_cell(&mut self, position: Cell, size: u16, fill: Rgb, border: Rgb);

    /// Shows the frame built since the last [`Renderer::clear`].
    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One recorded renderer call.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DrawCommand {
    Clear {
        background: Rgb,
    },
    Cell {
        position: Cell,
        size: u16,
        fill: Rgb,
        border: Rgb,
    },
}

/// Fill and border colors of a drawable.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CellColors {
    pub fill: Rgb,
    pub border: Rgb,
}

/// Everything the game puts on screen.
#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    SnakeBody(&'a Snake),
    Apple(&'a Apple),
}

impl Drawable<'_> {
    /// Cells in paint order. The snake is listed tail first so its head is
    /// painted last.
    #[must_use]
    pub fn cells(&self) -> Vec<Cell> {
        match self {
            Self::SnakeBody(snake) => snake.segments().rev().copied().collect(),
            Self::Apple(apple) => vec![apple.position],
        }
    }

    #[must_use]
    pub fn colors(&self, palette: &Palette) -> CellColors {
        let fill = match self {
            Self::SnakeBody(_) => palette.snake,
            Self::Apple(apple) => apple.color,
        };
        CellColors {
            fill,
            border: palette.border,
        }
    }

    /// Sends every cell of this drawable to `renderer`.
    pub fn emit<D: Renderer + ?Sized>(&self, palette: &Palette, size: u16, renderer: &mut D) {
        let CellColors { fill, border } = self.colors(palette);
        for cell in self.cells() {
            renderer.draw_cell(cell, size, fill, border);
        }
    }
}

/// Keeps every call for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
    pub presented: usize,
}

impl RecordingRenderer {
    /// Commands issued since the most recent clear.
    #[must_use]
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, DrawCommand::Clear { .. }))
            .unwrap_or(0);
        &self.commands[start..]
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, background: Rgb) {
        self.commands.push(DrawCommand::Clear { background });
    }

    fn draw_cell(&mut self, position: Cell, size: u16, fill: Rgb, border: Rgb) {
        self.commands.push(DrawCommand::Cell {
            position,
            size,
            fill,
            border,
        });
    }

    fn present(&mut self) -> io::Result<()> {
        self.presented += 1;
        Ok(())
    }
}

/// Paints frames onto a ratatui terminal.
///
/// A board cell spans `size` columns and one row. Its last column is a half
/// block over the border color, so neighbouring cells stay distinguishable.
/// A one-column cell is only that half block.
#[derive(Debug)]
pub struct TerminalRenderer<'t, B: Backend> {
    terminal: &'t mut Terminal<B>,
    background: Rgb,
    cells: Vec<DrawCommand>,
}

impl<'t, B: Backend> TerminalRenderer<'t, B> {
    pub fn new(terminal: &'t mut Terminal<B>) -> Self {
        Self {
            terminal,
            background: Rgb::BLACK,
            cells: Vec::new(),
        }
    }
}

impl<B: Backend> Renderer for TerminalRenderer<'_, B> {
    fn clear(&mut self, background: Rgb) {
        self.background = background;
        self.cells.clear();
    }

    fn draw_cell(&mut self, position: Cell, size: u16, fill: Rgb, border: Rgb) {
        self.cells.push(DrawCommand::Cell {
            position,
            size,
            fill,
            border,
        });
    }

    fn present(&mut self) -> io::Result<()> {
        let background = self.background;
        let cells = &self.cells;
        self.terminal.draw(|frame| {
            let area = frame.area();
            let buffer = frame.buffer_mut();
            buffer.set_style(area, Style::new().bg(background.into()));
            for command in cells {
                if let DrawCommand::Cell {
                    position,
                    size,
                    fill,
                    border,
                } = *command
                {
                    paint_cell(buffer, area, position, size, fill, border);
                }
            }
        })?;
        Ok(())
    }
}

fn paint_cell(buffer: &mut Buffer, area: Rect, position: Cell, size: u16, fill: Rgb, border: Rgb) {
    let Some((left, top)) = cell_origin(area, position, size) else {
        return;
    };

    for column in 0..size {
        let Some(x) = left.checked_add(column) else {
            return;
        };
        if x >= area.right() {
            return;
        }
        let Some(terminal_cell) = buffer.cell_mut((x, top)) else {
            continue;
        };

        if column == size - 1 {
            terminal_cell
                .set_symbol(GLYPH_EDGE)
                .set_style(Style::new().fg(fill.into()).bg(border.into()));
        } else {
            terminal_cell
                .set_symbol(GLYPH_FILL)
                .set_style(Style::new().fg(fill.into()));
        }
    }
}

fn cell_origin(area: Rect, position: Cell, size: u16) -> Option<(u16, u16)> {
    let column = u16::try_from(position.x).ok()?.checked_mul(size)?;
    let row = u16::try_from(position.y).ok()?;

    let x = area.x.checked_add(column)?;
    let y = area.y.checked_add(row)?;
    if x >= area.right() || y >= area.bottom() {
        return None;
    }

    Some((x, y))
}
