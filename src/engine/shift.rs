use super::board::{Board, Card, Score};

/// Direction represents the direction indicated by the player.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Direction {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub(crate) const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Number of counter-clockwise quarter turns that make this direction point left.
    fn turns(&self) -> usize {
        match self {
            Self::Left => 0,
            Self::Up => 1,
            Self::Right => 2,
            Self::Down => 3,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        };
        write!(f, "{}", s)
    }
}

/// The outcome of sliding a single row to the left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RowShift<const N: usize> {
    pub(crate) row: [Card; N],
    pub(crate) score: Score,
    pub(crate) moved: bool,
}

/// Slide every tile in the row to the left, combining equal neighbours.
///
/// A tile produced by a combination is never combined again during the same slide, so
/// `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]` rather than `[8, 0, 0, 0]`.
pub(crate) fn slide_row<const N: usize>(row: &[Card; N]) -> RowShift<N> {
    let mut cards = row.iter().copied().filter(|card| *card != 0).peekable();
    let mut slid = [0; N];
    let mut score = 0;
    for slot in slid.iter_mut() {
        let Some(card) = cards.next() else {
            break;
        };
        if cards.next_if_eq(&card).is_some() {
            *slot = card + card;
            score += card + card;
        } else {
            *slot = card;
        }
    }
    RowShift {
        row: slid,
        score,
        moved: slid != *row,
    }
}

/// The outcome of shifting a whole board. `board` does not yet include the tile that gets added
/// after a successful move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shift<const N: usize = 4> {
    pub(crate) board: Board<N>,
    pub(crate) score_increase: Score,
    pub(crate) changed: bool,
}

impl<const N: usize> Board<N> {
    /// Rotate the board counter-clockwise by the given number of quarter turns.
    pub(crate) fn rotate(&self, turns: usize) -> Self {
        let mut slots = *self.rows();
        for _ in 0..turns % 4 {
            let prev = slots;
            for (row, cards) in slots.iter_mut().enumerate() {
                for (col, card) in cards.iter_mut().enumerate() {
                    *card = prev[col][N - 1 - row];
                }
            }
        }
        Board::from_rows(slots)
    }

    /// Shift the board in the given direction.
    ///
    /// The board is turned so that the direction points left, each row is slid on its own, and
    /// the result is turned back. When nothing moves the returned board is identical to this one
    /// and the score increase is zero.
    pub(crate) fn shift(&self, direction: Direction) -> Shift<N> {
        let turns = direction.turns();
        let rotated = self.rotate(turns);

        let mut slots = [[0; N]; N];
        let mut score_increase = 0;
        let mut changed = false;
        for (slid, row) in slots.iter_mut().zip(rotated.rows().iter()) {
            let shifted = slide_row(row);
            *slid = shifted.row;
            score_increase += shifted.score;
            changed |= shifted.moved;
        }

        if !changed {
            return Shift {
                board: *self,
                score_increase: 0,
                changed,
            };
        }

        Shift {
            board: Board::from_rows(slots).rotate((4 - turns) % 4),
            score_increase,
            changed,
        }
    }
}
