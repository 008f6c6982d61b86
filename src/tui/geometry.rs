use super::error::{InnerError, Result};

/// Idx encapsulates the x and y coordinates of a Tuxel-based shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Idx(pub usize, pub usize);

impl Idx {
    #[inline(always)]
    pub(crate) fn x(&self) -> usize {
        self.0
    }

    #[inline(always)]
    pub(crate) fn y(&self) -> usize {
        self.1
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Bounds2D(pub usize, pub usize);

impl Bounds2D {
    #[inline(always)]
    pub(crate) fn width(&self) -> usize {
        self.0
    }

    #[inline(always)]
    pub(crate) fn height(&self) -> usize {
        self.1
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Rectangle(pub Idx, pub Bounds2D);

impl Rectangle {
    #[inline(always)]
    pub(crate) fn width(&self) -> usize {
        self.1.width()
    }

    #[inline(always)]
    pub(crate) fn height(&self) -> usize {
        self.1.height()
    }

    #[inline(always)]
    pub(crate) fn x(&self) -> usize {
        self.0.x()
    }

    #[inline(always)]
    pub(crate) fn y(&self) -> usize {
        self.0.y()
    }

    #[inline(always)]
    pub(crate) fn relative_idx(&self, pos: &Position) -> (usize, usize) {
        match pos {
            Position::TopLeft => (0, 0),
            Position::TopRight => (self.width() - 1, 0),
            Position::BottomLeft => (0, self.height() - 1),
            Position::BottomRight => (self.width() - 1, self.height() - 1),
            Position::Idx(x, y) => (*x, *y),
        }
    }

    /// The first column and row past the rectangle.
    #[inline(always)]
    pub(crate) fn extents(&self) -> (usize, usize) {
        (self.x() + self.width(), self.y() + self.height())
    }

    /// Check that `other` fits entirely inside this rectangle.
    pub(crate) fn contains_or_err(&self, other: &Rectangle) -> Result<()> {
        let (x_extent, y_extent) = other.extents();
        if other.x() < self.x() || x_extent > self.x() + self.width() {
            return Err(InnerError::OutOfBoundsX(x_extent).into());
        }
        if other.y() < self.y() || y_extent > self.y() + self.height() {
            return Err(InnerError::OutOfBoundsY(y_extent).into());
        }
        Ok(())
    }

    /// Shrink the rectangle on every side, keeping its center.
    pub(crate) fn shrink_by(&self, x: usize, y: usize) -> Rectangle {
        Rectangle(
            Idx(self.x() + x, self.y() + y),
            Bounds2D(
                self.width().saturating_sub(2 * x),
                self.height().saturating_sub(2 * y),
            ),
        )
    }
}

pub(crate) enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Idx(usize, usize),
}
