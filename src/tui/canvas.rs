use super::drawbuffer::DrawBuffer;
use super::error::Result;
use super::geometry::{Bounds2D, Idx, Rectangle};
use super::tuxel::Tuxel;

/// A 2d grid of `Tuxel`s that gets drawn on through `DrawBuffer`s and handed to a `Renderer`.
pub(crate) struct Canvas {
    grid: Vec<Vec<Tuxel>>,
    rectangle: Rectangle,
}

impl Canvas {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        let rectangle = Rectangle(Idx(0, 0), Bounds2D(width, height));
        let grid = vec![vec![Tuxel::default(); width]; height];
        Self { grid, rectangle }
    }

    /// Borrow the given rectangle of the canvas for drawing. Fails if the rectangle does not fit.
    pub(crate) fn get_draw_buffer(&mut self, r: Rectangle) -> Result<DrawBuffer<'_>> {
        self.rectangle.contains_or_err(&r)?;
        Ok(DrawBuffer::new(self, r))
    }

    /// Borrow the entire canvas for drawing.
    pub(crate) fn get_layer(&mut self) -> DrawBuffer<'_> {
        let r = self.rectangle.clone();
        DrawBuffer::new(self, r)
    }

    pub(crate) fn dimensions(&self) -> (usize, usize) {
        (self.rectangle.width(), self.rectangle.height())
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &[Tuxel]> {
        self.grid.iter().map(|row| row.as_slice())
    }

    pub(super) fn tuxel_mut(&mut self, x: usize, y: usize) -> Option<&mut Tuxel> {
        self.grid.get_mut(y).and_then(|row| row.get_mut(x))
    }
}

impl std::fmt::Display for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.grid {
            let line = row.iter().map(|t| t.content()).collect::<String>();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    fn rectangle(x: usize, y: usize, width: usize, height: usize) -> Rectangle {
        Rectangle(Idx(x, y), Bounds2D(width, height))
    }

    #[rstest]
    #[case::base((5, 5))]
    #[case::realistic((274, 75))]
    fn canvas_size(#[case] dims: (usize, usize)) {
        let canvas = Canvas::new(dims.0, dims.1);
        assert_eq!(canvas.dimensions(), dims);
        assert_eq!(canvas.rows().count(), dims.1);
        for row in canvas.rows() {
            assert_eq!(row.len(), dims.0);
        }
    }

    #[rstest]
    #[case::base((5, 5), rectangle(0, 0, 5, 5))]
    #[case::realistic((274, 75), rectangle(0, 0, 274, 75))]
    #[case::realistic_smaller_buffer((274, 75), rectangle(10, 10, 10, 10))]
    fn validate_get_draw_buffer(
        #[case] canvas_dims: (usize, usize),
        #[case] rect: Rectangle,
    ) -> Result<()> {
        let mut canvas = Canvas::new(canvas_dims.0, canvas_dims.1);
        let mut buffer = canvas.get_draw_buffer(rect.clone())?;
        buffer.fill('x');
        let filled = canvas
            .rows()
            .flatten()
            .filter(|tuxel| tuxel.content() == 'x')
            .count();
        assert_eq!(filled, rect.width() * rect.height());
        Ok(())
    }

    #[rstest]
    #[case::too_wide((5, 5), rectangle(1, 0, 5, 5))]
    #[case::too_tall((5, 5), rectangle(0, 3, 1, 3))]
    fn draw_buffer_out_of_bounds(#[case] canvas_dims: (usize, usize), #[case] rect: Rectangle) {
        let mut canvas = Canvas::new(canvas_dims.0, canvas_dims.1);
        assert!(canvas.get_draw_buffer(rect).is_err());
    }
}
