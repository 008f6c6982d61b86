use rand::RngCore;

use super::board::{Board, Score};
use super::shift::Direction;

/// A saved board and the score that went with it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Snapshot {
    pub(crate) board: Board,
    pub(crate) score: Score,
}

/// GameState is everything a session needs to resume: the current board and score, the terminal
/// flags, and the undo history.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct GameState {
    pub(crate) board: Board,
    pub(crate) score: Score,
    pub(crate) game_over: bool,
    pub(crate) has_won: bool,
    /// Undo history, oldest first; the next undo pops from the back.
    pub(crate) history: Vec<Snapshot>,
}

impl GameState {
    /// A fresh session: two random tiles, no score and no history.
    pub(crate) fn new(rng: &mut dyn RngCore) -> Self {
        Self {
            board: Board::seeded(rng),
            ..Default::default()
        }
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            score: self.score,
        }
    }

    /// Undo history ordered the other way round, most recent first.
    pub(crate) fn previous_states(&self) -> impl Iterator<Item = &Snapshot> {
        self.history.iter().rev()
    }

    pub(crate) fn is_terminal(&self) -> bool {
        self.game_over || self.has_won
    }
}

/// The actions a player can take.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Action {
    Move(Direction),
    NewGame,
    Undo,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Move(direction) => write!(f, "move {}", direction),
            Self::NewGame => write!(f, "new game"),
            Self::Undo => write!(f, "undo"),
        }
    }
}

/// Game owns a session's state and the random number generator used to place new tiles. It is
/// the only thing that mutates a GameState.
pub(crate) struct Game {
    rng: Box<dyn RngCore>,
    state: GameState,
    history_limit: Option<usize>,
}

impl Game {
    /// Resume a previously saved or freshly seeded session.
    pub(crate) fn with_state(rng: impl RngCore + 'static, state: GameState) -> Self {
        Self {
            rng: Box::new(rng),
            state,
            history_limit: None,
        }
    }

    /// Keep at most `limit` undo snapshots, dropping the oldest first. Unlimited by default.
    pub(crate) fn history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self.trim_history();
        self
    }

    pub(crate) fn state(&self) -> &GameState {
        &self.state
    }

    pub(crate) fn into_state(self) -> GameState {
        self.state
    }

    /// Apply the action and report whether the state changed.
    pub(crate) fn dispatch(&mut self, action: Action) -> bool {
        let changed = match action {
            Action::Move(direction) => self.shift(direction),
            Action::NewGame => self.new_game(),
            Action::Undo => self.undo(),
        };
        log::debug!(
            "{} -> changed: {}, score: {}, game over: {}, won: {}",
            action,
            changed,
            self.state.score,
            self.state.game_over,
            self.state.has_won,
        );
        changed
    }
}

impl Game {
    fn shift(&mut self, direction: Direction) -> bool {
        if self.state.is_terminal() {
            return false;
        }

        let shift = self.state.board.shift(direction);
        if !shift.changed {
            return false;
        }

        let previous = self.state.snapshot();
        self.state.history.push(previous);
        self.trim_history();

        let board = shift.board.with_random_tile(self.rng.as_mut());
        self.state.board = board;
        self.state.score = self.state.score.saturating_add(shift.score_increase);
        self.state.game_over = board.is_game_over();
        self.state.has_won = self.state.has_won || board.has_winning_tile();
        if self.state.has_won {
            log::info!("winning tile reached with score {}", self.state.score);
        } else if self.state.game_over {
            log::info!("no moves left, final score {}", self.state.score);
        }
        true
    }

    fn new_game(&mut self) -> bool {
        self.state = GameState::new(self.rng.as_mut());
        true
    }

    fn undo(&mut self) -> bool {
        let Some(previous) = self.state.history.pop() else {
            return false;
        };
        self.state.board = previous.board;
        self.state.score = previous.score;
        self.state.game_over = false;
        self.state.has_won = false;
        true
    }

    fn trim_history(&mut self) {
        if let Some(limit) = self.history_limit {
            let excess = self.state.history.len().saturating_sub(limit);
            if excess > 0 {
                let _ = self.state.history.drain(..excess);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rstest::*;

    use super::*;
    use crate::engine::board::{Card, Idx, MAX_TILE};

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn game(rows: [[Card; 4]; 4], score: Score) -> Game {
        let _ = env_logger::builder().is_test(true).try_init();
        let state = GameState {
            board: Board::from_rows(rows),
            score,
            ..Default::default()
        };
        Game::with_state(rng(), state)
    }

    #[test]
    fn new_game_is_seeded() {
        let mut game = game([[2, 4, 8, 16]; 4], 512);
        for _ in 0..20 {
            assert!(game.dispatch(Action::NewGame));
            let state = game.state();
            assert_eq!(state.board.tile_count(), 2);
            assert!(state
                .board
                .rows()
                .iter()
                .flatten()
                .all(|card| matches!(card, 0 | 2 | 4)));
            assert_eq!(state.score, 0);
            assert!(state.history.is_empty());
            assert!(!state.game_over);
            assert!(!state.has_won);
        }
    }

    #[test]
    fn move_adds_tile_score_and_history() {
        let mut game = game([[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 4]], 10);
        assert!(game.dispatch(Action::Move(Direction::Left)));

        let state = game.state();
        assert_eq!(state.score, 14);
        assert_eq!(state.board.get(&Idx(0, 0)), 4);
        assert_eq!(state.board.get(&Idx(3, 0)), 4);
        // two tiles after the merge plus the new one
        assert_eq!(state.board.tile_count(), 3);
        assert_eq!(
            state.history,
            vec![Snapshot {
                board: Board::from_rows([[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 4]]),
                score: 10,
            }]
        );
    }

    #[test]
    fn score_saturates() {
        let mut game = game([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], Score::MAX);
        assert!(game.dispatch(Action::Move(Direction::Left)));
        assert_eq!(game.state().score, Score::MAX);
        assert_eq!(game.state().board.get(&Idx(0, 0)), 4);
    }

    #[test]
    fn largest_restorable_tiles_merge() {
        let mut game = game([[MAX_TILE, MAX_TILE, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
        assert!(game.dispatch(Action::Move(Direction::Left)));
        assert_eq!(game.state().board.get(&Idx(0, 0)), 2 * MAX_TILE);
        assert_eq!(game.state().score, 2 * MAX_TILE);
    }

    #[test]
    fn blocked_move_changes_nothing() {
        let mut game = game([[2, 4, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]], 0);
        let before = game.state().clone();
        assert!(!game.dispatch(Action::Move(Direction::Left)));
        assert!(!game.dispatch(Action::Move(Direction::Up)));
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn undo_restores_previous_snapshot() {
        let rows = [[64, 64, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
        let mut game = game(rows, 100);
        assert!(game.dispatch(Action::Move(Direction::Left)));
        assert!(game.state().has_won);

        assert!(game.dispatch(Action::Undo));
        let state = game.state();
        assert_eq!(state.board, Board::from_rows(rows));
        assert_eq!(state.score, 100);
        assert!(!state.has_won);
        assert!(!state.game_over);
        assert!(state.history.is_empty());
    }

    #[test]
    fn undo_clears_game_over() {
        let rows = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 4]];
        let mut game = game(rows, 0);
        assert!(game.dispatch(Action::Move(Direction::Left)));
        let after = game.state().board;
        // 4,4 merged into an 8 and the new tile filled the gap
        assert_eq!(after.get(&Idx(3, 2)), 8);
        assert_eq!(game.state().game_over, after.is_game_over());

        assert!(game.dispatch(Action::Undo));
        assert!(!game.state().game_over);
        assert_eq!(game.state().board, Board::from_rows(rows));
    }

    #[test]
    fn undo_with_empty_history_is_noop() {
        let mut game = game([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
        let before = game.state().clone();
        assert!(!game.dispatch(Action::Undo));
        assert_eq!(game.state(), &before);
    }

    #[rstest]
    #[case::won(false, true)]
    #[case::over(true, false)]
    fn terminal_state_ignores_moves(#[case] game_over: bool, #[case] has_won: bool) {
        let state = GameState {
            board: Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]),
            game_over,
            has_won,
            ..Default::default()
        };
        let mut game = Game::with_state(rng(), state.clone());
        for direction in Direction::ALL {
            assert!(!game.dispatch(Action::Move(direction)));
        }
        assert_eq!(game.state(), &state);
    }

    #[test]
    fn has_won_is_sticky_until_new_game() {
        let state = GameState {
            board: Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]),
            has_won: true,
            ..Default::default()
        };
        let mut game = Game::with_state(rng(), state);
        assert!(!game.dispatch(Action::Move(Direction::Right)));
        assert!(game.state().has_won);
        assert!(game.dispatch(Action::NewGame));
        assert!(!game.state().has_won);
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut game = game([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
        let mut boards = Vec::new();
        for direction in [Direction::Right, Direction::Down, Direction::Left, Direction::Up] {
            let before = game.state().board;
            if game.dispatch(Action::Move(direction)) {
                boards.push(before);
            }
        }
        let recorded = game
            .state()
            .previous_states()
            .map(|s| s.board)
            .collect::<Vec<_>>();
        boards.reverse();
        assert_eq!(recorded, boards);

        while game.dispatch(Action::Undo) {}
        assert_eq!(
            game.state().board,
            Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]])
        );
    }

    #[test]
    fn history_limit_drops_oldest() {
        let mut game = game([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]], 0).history_limit(Some(2));
        let mut boards = Vec::new();
        for _ in 0..10 {
            for direction in Direction::ALL {
                let before = game.state().board;
                if game.dispatch(Action::Move(direction)) {
                    boards.push(before);
                }
            }
        }
        assert!(boards.len() > 2);
        let kept = game
            .state()
            .history
            .iter()
            .map(|s| s.board)
            .collect::<Vec<_>>();
        assert_eq!(kept, boards[boards.len() - 2..]);
    }
}
