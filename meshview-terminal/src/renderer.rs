/// Half-block presenter: shows a rasterizer color buffer in the terminal
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;

/// Upper half block. Foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '\u{2580}';

/// Vertical pixels per terminal cell
pub const PIXELS_PER_CELL: usize = 2;

/// Maps a `width * height * 3` float buffer (row 0 at the bottom) onto
/// `columns x rows` terminal cells, two pixels per cell.
pub struct HalfBlockRenderer {
    columns: usize,
    rows: usize,
}

impl HalfBlockRenderer {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.columns = columns;
        self.rows = rows;
    }

    /// Pixel dimensions of the buffer this renderer expects.
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.columns, self.rows * PIXELS_PER_CELL)
    }

    /// Top and bottom pixel colors of the cell at (`column`, `row`), rows
    /// counted from the top of the screen. Missing pixels read as black.
    pub fn cell(&self, buffer: &[f32], column: usize, row: usize) -> (Color, Color) {
        let (width, height) = self.pixel_size();
        let pixel = |y: usize| {
            let i = (column + y * width) * 3;
            match buffer.get(i..i + 3) {
                Some(rgb) => {
                    let (r, g, b) = meshview_core::Color::rgb(rgb[0], rgb[1], rgb[2]).to_rgb8();
                    Color::Rgb { r, g, b }
                }
                None => Color::Black,
            }
        };
        match height.checked_sub(1 + row * PIXELS_PER_CELL) {
            Some(top) if top >= 1 => (pixel(top), pixel(top - 1)),
            _ => (Color::Black, Color::Black),
        }
    }

    pub fn draw<W: Write>(&self, buffer: &[f32], writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<(Color, Color)> = None;
        for row in 0..self.rows {
            for column in 0..self.columns {
                let colors = self.cell(buffer, column, row);
                // Only emit escape codes when the colors change
                if current != Some(colors) {
                    writer.queue(SetForegroundColor(colors.0))?;
                    writer.queue(SetBackgroundColor(colors.1))?;
                    current = Some(colors);
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
            if row + 1 < self.rows {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_size() {
        let renderer = HalfBlockRenderer::new(80, 24);
        assert_eq!(renderer.pixel_size(), (80, 48));
    }

    #[test]
    fn test_bottom_row_of_buffer_is_bottom_of_screen() {
        let renderer = HalfBlockRenderer::new(2, 2);
        let (width, height) = renderer.pixel_size();
        let mut buffer = vec![0.0; width * height * 3];
        // pixel (1, 0): bottom row of the buffer
        buffer[3..6].copy_from_slice(&[1.0, 0.0, 0.0]);
        // pixel (0, 3): top row of the buffer
        let top = 3 * width * 3;
        buffer[top..top + 3].copy_from_slice(&[0.0, 0.0, 1.0]);

        let red = Color::Rgb { r: 255, g: 0, b: 0 };
        let blue = Color::Rgb { r: 0, g: 0, b: 255 };
        let black = Color::Rgb { r: 0, g: 0, b: 0 };
        assert_eq!(renderer.cell(&buffer, 1, 1), (black, red));
        assert_eq!(renderer.cell(&buffer, 0, 0), (blue, black));
    }

    #[test]
    fn test_short_buffer_reads_black() {
        let renderer = HalfBlockRenderer::new(4, 4);
        assert_eq!(renderer.cell(&[], 3, 3), (Color::Black, Color::Black));
    }

    #[test]
    fn test_draw_emits_one_block_per_cell() {
        let renderer = HalfBlockRenderer::new(3, 2);
        let (width, height) = renderer.pixel_size();
        let buffer = vec![0.5; width * height * 3];
        let mut out = Vec::new();
        renderer.draw(&buffer, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
    }
}
