use textwrap::wrap;

use super::canvas::Canvas;
use super::colors::Rgb;
use super::geometry::{Position, Rectangle};
use super::tuxel::Tuxel;

/// A rectangular window onto a `Canvas`. All writes are clipped to the rectangle, and to the
/// inside of the border once one has been drawn.
pub(crate) struct DrawBuffer<'a> {
    canvas: &'a mut Canvas,
    rectangle: Rectangle,
    border: bool,
}

impl<'a> DrawBuffer<'a> {
    pub(super) fn new(canvas: &'a mut Canvas, rectangle: Rectangle) -> Self {
        Self {
            canvas,
            rectangle,
            border: false,
        }
    }

    /// The drawable area in canvas coordinates.
    fn inner(&self) -> Rectangle {
        if self.border {
            self.rectangle.shrink_by(1, 1)
        } else {
            self.rectangle.clone()
        }
    }

    fn get_tuxel_mut(&mut self, pos: Position) -> Option<&mut Tuxel> {
        let (x, y) = self.rectangle.relative_idx(&pos);
        if x >= self.rectangle.width() || y >= self.rectangle.height() {
            return None;
        }
        self.canvas
            .tuxel_mut(self.rectangle.x() + x, self.rectangle.y() + y)
    }

    fn for_each_tuxel(&mut self, rect: &Rectangle, mut f: impl FnMut(&mut Tuxel)) {
        for y in rect.y()..rect.y() + rect.height() {
            for x in rect.x()..rect.x() + rect.width() {
                if let Some(tuxel) = self.canvas.tuxel_mut(x, y) {
                    f(tuxel);
                }
            }
        }
    }

    /// Write `s` starting at column `x` of canvas row `y`, stopping at the inner right edge.
    fn write_line(&mut self, x: usize, y: usize, s: &str) {
        let inner = self.inner();
        let (x_extent, _) = inner.extents();
        for (offset, c) in s.chars().enumerate() {
            if x + offset >= x_extent {
                // can't write more than width of buffer
                break;
            }
            if let Some(tuxel) = self.canvas.tuxel_mut(x + offset, y) {
                tuxel.set_content(c);
            }
        }
    }

    pub(crate) fn set_colors(&mut self, background: Rgb, foreground: Rgb) {
        let rect = self.rectangle.clone();
        self.for_each_tuxel(&rect, |tuxel| {
            tuxel.set_bgcolor(background);
            tuxel.set_fgcolor(foreground);
        });
    }

    pub(crate) fn fill(&mut self, c: char) {
        let inner = self.inner();
        self.for_each_tuxel(&inner, |tuxel| tuxel.set_content(c));
    }

    pub(crate) fn draw_border(&mut self) {
        let box_corner = boxy::Char::upper_left(boxy::Weight::Doubled);
        let box_horizontal = boxy::Char::horizontal(boxy::Weight::Doubled);
        let box_vertical = boxy::Char::vertical(boxy::Weight::Doubled);
        let (width, height) = (self.rectangle.width(), self.rectangle.height());
        if width < 2 || height < 2 {
            // can only draw a border around at least two rows and columns
            return;
        }

        let corners: [(Position, char); 4] = [
            (Position::TopLeft, box_corner.clone().into()),
            (Position::TopRight, box_corner.clone().rotate_cw(1).into()),
            (Position::BottomRight, box_corner.clone().rotate_cw(2).into()),
            (Position::BottomLeft, box_corner.clone().rotate_ccw(1).into()),
        ];
        for (pos, c) in corners {
            if let Some(tuxel) = self.get_tuxel_mut(pos) {
                tuxel.set_content(c);
            }
        }

        let horizontal: char = box_horizontal.into();
        for x in 1..width - 1 {
            for y in [0, height - 1] {
                if let Some(tuxel) = self.get_tuxel_mut(Position::Idx(x, y)) {
                    tuxel.set_content(horizontal);
                }
            }
        }

        let vertical: char = box_vertical.into();
        for y in 1..height - 1 {
            for x in [0, width - 1] {
                if let Some(tuxel) = self.get_tuxel_mut(Position::Idx(x, y)) {
                    tuxel.set_content(vertical);
                }
            }
        }

        self.border = true;
    }

    pub(crate) fn write_left(&mut self, s: &str) {
        let inner = self.inner();
        let y = inner.y() + inner.height() / 2;
        self.write_line(inner.x(), y, s);
    }

    pub(crate) fn write_right(&mut self, s: &str) {
        let inner = self.inner();
        let y = inner.y() + inner.height() / 2;
        let len = s.chars().count().min(inner.width());
        let x = inner.x() + inner.width() - len;
        self.write_line(x, y, s);
    }

    pub(crate) fn write_center(&mut self, s: &str) {
        let inner = self.inner();
        let y = inner.y() + inner.height() / 2;
        self.write_centered_line(&inner, y, s);
    }

    fn write_centered_line(&mut self, inner: &Rectangle, y: usize, s: &str) {
        let len = s.chars().count();
        let x_offset = inner.width().saturating_sub(len) / 2;
        self.write_line(inner.x() + x_offset, y, s);
    }

    /// Wrap `s` to the buffer width and write it centered both ways. Lines that don't fit
    /// vertically are dropped from the bottom.
    pub(crate) fn write_wrapped(&mut self, s: &str) {
        let inner = self.inner();
        if inner.width() == 0 || inner.height() == 0 {
            return;
        }
        let lines = wrap(s, inner.width());
        let y_offset = inner.height().saturating_sub(lines.len()) / 2;
        for (idx, line) in lines.iter().take(inner.height()).enumerate() {
            self.write_centered_line(&inner, inner.y() + y_offset + idx, line);
        }
    }
}
