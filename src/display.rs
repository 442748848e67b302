/// Terminal render adapter — all terminal drawing lives here.
///
/// The core draws on an 800×600 logical surface; this adapter scales every
/// primitive down to character cells, collects the frame in a cell buffer
/// and writes it out row by row on `present`.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use word_shooter::entities::{Rgb, FIELD_HEIGHT, FIELD_WIDTH};
use word_shooter::ports::{is_wide, Align, GlyphMetrics, Paint, Point, Renderer, TextMetrics};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_STATUS: Color = Color::DarkGrey;

/// Anything fainter than this is not drawn at all.
const MIN_ALPHA: f32 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Cell {
    Empty,
    Glyph(char, Rgb),
    /// Right half of a double-width glyph.
    Continuation,
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    metrics: GlyphMetrics,
    status_line: Option<String>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_size(out, cols, rows))
    }

    pub fn with_size(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            cells: vec![Cell::Empty; cols as usize * rows as usize],
            metrics: GlyphMetrics::default(),
            status_line: None,
        }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::Empty; cols as usize * rows as usize];
    }

    /// One line of plain text on the bottom row, drawn over the frame.
    pub fn set_status_line(&mut self, line: Option<String>) {
        self.status_line = line;
    }

    fn to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        let col = (x / FIELD_WIDTH * self.cols as f32).floor() as i32;
        let row = (y / FIELD_HEIGHT * self.rows as f32).floor() as i32;
        (col, row)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, color: Rgb) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        let wide = is_wide(ch) && col + 1 < self.cols as i32;
        self.release(idx);
        if wide {
            self.release(idx + 1);
        }
        self.cells[idx] = Cell::Glyph(ch, color);
        if wide {
            self.cells[idx + 1] = Cell::Continuation;
        }
    }

    /// Blank the other half of a wide glyph about to be overwritten at `idx`.
    fn release(&mut self, idx: usize) {
        let cols = self.cols as usize;
        match self.cells[idx] {
            Cell::Continuation if idx % cols > 0 => self.cells[idx - 1] = Cell::Empty,
            Cell::Glyph(c, _) if is_wide(c) && (idx + 1) % cols != 0 => {
                if self.cells[idx + 1] == Cell::Continuation {
                    self.cells[idx + 1] = Cell::Empty;
                }
            }
            _ => {}
        }
    }
}

fn shade(paint: Paint) -> Rgb {
    let Rgb(r, g, b) = paint.color;
    let scale = |c: u8| (c as f32 * paint.alpha).round() as u8;
    Rgb(scale(r), scale(g), scale(b))
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

impl<W: Write> TextMetrics for TerminalRenderer<W> {
    fn text_width(&self, text: &str) -> f32 {
        self.metrics.text_width(text)
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        if paint.alpha < MIN_ALPHA {
            return;
        }
        let (c0, r0) = self.to_cell(x, y);
        let (c1, r1) = self.to_cell(x + w, y + h);
        let color = shade(paint);
        for row in r0..=r1.max(r0) {
            for col in c0..=c1.max(c0) {
                self.put(col, row, '█', color);
            }
        }
    }

    fn fill_triangle(&mut self, points: [Point; 3], paint: Paint) {
        if paint.alpha < MIN_ALPHA {
            return;
        }
        // A whole ship spans only a few cells; one glyph at the centroid is
        // the most a triangle gets.
        let cx = (points[0].x + points[1].x + points[2].x) / 3.0;
        let cy = (points[0].y + points[1].y + points[2].y) / 3.0;
        let ch = if points[0].y == points[1].y && points[2].y < points[0].y {
            '▲'
        } else if cx < points[0].x {
            '◢'
        } else {
            '◣'
        };
        let (col, row) = self.to_cell(cx, cy);
        self.put(col, row, ch, shade(paint));
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: Paint) {
        if paint.alpha < MIN_ALPHA {
            return;
        }
        let ch = match (radius, paint.alpha) {
            (r, _) if r >= 2.5 => '*',
            (_, a) if a >= 0.6 => '·',
            _ => '.',
        };
        let (col, row) = self.to_cell(center.x, center.y);
        self.put(col, row, ch, shade(paint));
    }

    fn text(&mut self, at: Point, text: &str, _size: f32, align: Align, paint: Paint) {
        let width_cells: i32 = text.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum();
        // Labels sit on their baseline; the glyph row is the one just above.
        let (mut col, row) = self.to_cell(at.x, at.y - 1.0);
        if align == Align::Center {
            col -= width_cells / 2;
        }
        let color = shade(paint);
        for ch in text.chars() {
            self.put(col, row, ch, color);
            col += if is_wide(ch) { 2 } else { 1 };
        }
    }

    fn present(&mut self) -> std::io::Result<()> {
        // Every cell is rewritten, so there is no full-screen clear here.
        let cols = self.cols as usize;
        for row in 0..self.rows as usize {
            let line = &self.cells[row * cols..(row + 1) * cols];
            let mut current: Option<Rgb> = None;
            self.out.queue(cursor::MoveTo(0, row as u16))?;
            for cell in line {
                match *cell {
                    Cell::Empty => {
                        self.out.queue(Print(' '))?;
                    }
                    Cell::Glyph(ch, color) => {
                        if current != Some(color) {
                            self.out.queue(style::SetForegroundColor(to_color(color)))?;
                            current = Some(color);
                        }
                        self.out.queue(Print(ch))?;
                    }
                    Cell::Continuation => {}
                }
            }
        }

        if let Some(line) = &self.status_line {
            self.out.queue(cursor::MoveTo(1, self.rows.saturating_sub(1)))?;
            self.out.queue(style::SetForegroundColor(C_STATUS))?;
            self.out.queue(Print(line))?;
        }

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = Rgb(255, 255, 255);

    fn row(r: &TerminalRenderer<Vec<u8>>) -> &[Cell] {
        &r.cells[..r.cols as usize]
    }

    #[test]
    fn narrow_over_left_half_clears_continuation() {
        let mut r = TerminalRenderer::with_size(Vec::new(), 6, 2);
        r.put(1, 0, '书', WHITE);
        r.put(1, 0, 'a', WHITE);
        assert_eq!(row(&r)[1], Cell::Glyph('a', WHITE));
        assert_eq!(row(&r)[2], Cell::Empty);
    }

    #[test]
    fn narrow_over_right_half_clears_wide_glyph() {
        let mut r = TerminalRenderer::with_size(Vec::new(), 6, 2);
        r.put(1, 0, '书', WHITE);
        r.put(2, 0, 'a', WHITE);
        assert_eq!(row(&r)[1], Cell::Empty);
        assert_eq!(row(&r)[2], Cell::Glyph('a', WHITE));
    }

    #[test]
    fn wide_over_shifted_wide_leaves_no_orphans() {
        let mut r = TerminalRenderer::with_size(Vec::new(), 6, 2);
        r.put(1, 0, '书', WHITE);
        r.put(3, 0, '猫', WHITE);
        r.put(2, 0, '鸟', WHITE);
        assert_eq!(
            row(&r),
            &[
                Cell::Empty,
                Cell::Empty,
                Cell::Glyph('鸟', WHITE),
                Cell::Continuation,
                Cell::Empty,
                Cell::Empty,
            ]
        );
    }

    #[test]
    fn wide_glyph_at_row_end_does_not_touch_next_row() {
        let mut r = TerminalRenderer::with_size(Vec::new(), 4, 2);
        r.put(0, 1, 'x', WHITE);
        r.put(3, 0, '书', WHITE);
        r.put(3, 0, 'a', WHITE);
        assert_eq!(r.cells[4], Cell::Glyph('x', WHITE));
    }
}
