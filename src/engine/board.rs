use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

pub(crate) type Card = u32;

pub(crate) type Score = u32;

/// Reaching a tile of this value wins the game.
pub(crate) const WINNING_TILE: Card = 128;

/// Largest card a restored board may hold. Merges on a board of such cards stay well inside
/// `Card`.
pub(crate) const MAX_TILE: Card = 1 << 20;

const NEW_CARD_CHOICES: [Card; 2] = [2, 4];
const NEW_CARD_WEIGHTS: [u8; 2] = [9, 1];

/// Idx addresses a single slot on a board by row and column.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct Idx(pub(crate) usize, pub(crate) usize);

impl std::fmt::Display for Idx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "idx({0},{1})", self.0, self.1)
    }
}

impl Idx {
    pub(crate) fn row(&self) -> usize {
        self.0
    }

    pub(crate) fn col(&self) -> usize {
        self.1
    }
}

/// Board is an N x N grid of cards where 0 marks an empty slot.
///
/// Boards are plain values: every operation that changes a board hands back a new one and leaves
/// the receiver untouched.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Board<const N: usize = 4> {
    slots: [[Card; N]; N],
}

impl<const N: usize> Default for Board<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> std::fmt::Display for Board<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.slots {
            let cells = row
                .iter()
                .map(|card| format!("{card:>5}"))
                .collect::<Vec<_>>()
                .join("");
            writeln!(f, "{}", cells)?;
        }
        Ok(())
    }
}

impl<const N: usize> Board<N> {
    pub(crate) const fn empty() -> Self {
        Self {
            slots: [[0; N]; N],
        }
    }

    pub(crate) const fn from_rows(slots: [[Card; N]; N]) -> Self {
        Self { slots }
    }

    /// Initialize a board with two random tiles, the way every new game starts.
    pub(crate) fn seeded<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::empty().with_random_tile(rng).with_random_tile(rng)
    }

    pub(crate) fn rows(&self) -> &[[Card; N]; N] {
        &self.slots
    }

    pub(crate) fn get(&self, idx: &Idx) -> Card {
        *self
            .slots
            .get(idx.row())
            .and_then(|row| row.get(idx.col()))
            .unwrap_or_else(|| panic!("{idx} is outside a {N}x{N} board"))
    }

    fn set(&mut self, idx: &Idx, value: Card) {
        self.slots[idx.row()][idx.col()] = value;
    }

    /// All empty slots in row-major order.
    pub(crate) fn empty_positions(&self) -> Vec<Idx> {
        self.slots
            .iter()
            .enumerate()
            .flat_map(|(row, cards)| {
                cards
                    .iter()
                    .enumerate()
                    .filter(|(_, card)| **card == 0)
                    .map(move |(col, _)| Idx(row, col))
            })
            .collect()
    }

    /// Returns a copy of this board with one empty slot, picked uniformly, holding a new 2 (nine
    /// times out of ten) or 4. A full board comes back unchanged.
    pub(crate) fn with_random_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let empty = self.empty_positions();
        let Some(idx) = empty.choose(rng) else {
            return *self;
        };
        let weights =
            WeightedIndex::new(NEW_CARD_WEIGHTS).expect("NEW_CARD_WEIGHTS should never be empty");
        let value = NEW_CARD_CHOICES[weights.sample(rng)];
        log::trace!("placing new tile {} at {}", value, idx);

        let mut board = *self;
        board.set(idx, value);
        board
    }

    pub(crate) fn tile_count(&self) -> usize {
        self.slots.iter().flatten().filter(|card| **card != 0).count()
    }

    pub(crate) fn max_tile(&self) -> Card {
        self.slots.iter().flatten().copied().max().unwrap_or(0)
    }

    pub(crate) fn has_winning_tile(&self) -> bool {
        self.slots.iter().flatten().any(|card| *card == WINNING_TILE)
    }

    /// A board is over once it is full and no two horizontally or vertically adjacent slots hold
    /// the same card, ie no shift in any direction could change it.
    pub(crate) fn is_game_over(&self) -> bool {
        if self.slots.iter().flatten().any(|card| *card == 0) {
            return false;
        }
        for (row, cards) in self.slots.iter().enumerate() {
            for (col, card) in cards.iter().enumerate() {
                if col + 1 < N && cards[col + 1] == *card {
                    return false;
                }
                if row + 1 < N && self.slots[row + 1][col] == *card {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rstest::*;

    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn empty_board_is_all_zeros() {
        let board: Board = Board::empty();
        assert_eq!(board.rows(), &[[0; 4]; 4]);
        assert_eq!(board.empty_positions().len(), 16);
        assert_eq!(board.tile_count(), 0);
    }

    #[test]
    fn empty_positions_are_row_major() {
        let board = Board::from_rows([[2, 0, 2, 2], [2, 2, 2, 2], [0, 2, 2, 0], [2, 2, 2, 2]]);
        assert_eq!(
            board.empty_positions(),
            vec![Idx(0, 1), Idx(2, 0), Idx(2, 3)]
        );
    }

    #[test]
    fn empty_positions_of_full_board() {
        let board = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(board.empty_positions().is_empty());
    }

    #[test]
    fn random_tile_on_full_board_is_noop() {
        let mut rng = rng();
        let board = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(board.with_random_tile(&mut rng), board);
    }

    #[test]
    fn random_tile_fills_exactly_one_empty_slot() {
        let mut rng = rng();
        let board = Board::from_rows([[2, 0, 0, 4], [0, 8, 0, 0], [0, 0, 0, 0], [16, 0, 0, 2]]);
        for _ in 0..100 {
            let placed = board.with_random_tile(&mut rng);
            let changed = (0..4)
                .flat_map(|row| (0..4).map(move |col| Idx(row, col)))
                .filter(|idx| placed.get(idx) != board.get(idx))
                .collect::<Vec<_>>();
            assert_eq!(changed.len(), 1);
            assert_eq!(board.get(&changed[0]), 0);
            assert!(matches!(placed.get(&changed[0]), 2 | 4));
        }
        // the source board is a value and stays as it was
        assert_eq!(board.tile_count(), 5);
    }

    #[test]
    fn random_tile_is_mostly_twos() {
        let mut rng = rng();
        let board: Board = Board::empty();
        let fours = (0..1000)
            .map(|_| board.with_random_tile(&mut rng).max_tile())
            .filter(|card| *card == 4)
            .count();
        assert!((40..=160).contains(&fours), "saw {fours} fours");
    }

    #[test]
    fn seeded_board_has_two_tiles() {
        let mut rng = rng();
        for _ in 0..50 {
            let board: Board = Board::seeded(&mut rng);
            assert_eq!(board.tile_count(), 2);
            assert!(board
                .rows()
                .iter()
                .flatten()
                .all(|card| matches!(card, 0 | 2 | 4)));
        }
    }

    #[rstest]
    #[case::empty([[0; 4]; 4], false)]
    #[case::just_below([[64, 32, 0, 0], [0; 4], [0; 4], [0; 4]], false)]
    #[case::corner([[0; 4], [0; 4], [0; 4], [0, 0, 0, 128]], true)]
    #[case::beyond_threshold([[256, 0, 0, 0], [0; 4], [0; 4], [0; 4]], false)]
    fn winning_tile(#[case] rows: [[Card; 4]; 4], #[case] expected: bool) {
        assert_eq!(Board::from_rows(rows).has_winning_tile(), expected);
    }

    #[rstest]
    #[case::has_empty_slot([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 0, 4], [4, 2, 4, 2]], false)]
    #[case::checkerboard([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]], true)]
    #[case::horizontal_pair([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 2, 8]], false)]
    #[case::vertical_pair([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 8], [4, 2, 4, 8]], false)]
    #[case::last_column_vertical([[2, 4, 2, 16], [4, 2, 4, 16], [2, 4, 2, 4], [4, 2, 4, 2]], false)]
    #[case::bottom_row_horizontal([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [8, 8, 4, 2]], false)]
    #[case::distinct([[2, 4, 8, 16], [32, 64, 128, 256], [2, 4, 8, 16], [32, 64, 128, 256]], true)]
    fn game_over(#[case] rows: [[Card; 4]; 4], #[case] expected: bool) {
        assert_eq!(Board::from_rows(rows).is_game_over(), expected);
    }

    #[test]
    fn generalizes_beyond_four() {
        let board = Board::from_rows([[2, 4, 2], [4, 2, 4], [2, 4, 2]]);
        assert!(board.empty_positions().is_empty());
        assert!(board.is_game_over());
        assert!(Board::<5>::empty().empty_positions().len() == 25);
    }
}
