use crate::engine::board::{Board, Idx as BoardIdx};
use crate::engine::game::{Action, Game, GameState};
use crate::engine::store::{persist, Storage};
use crate::error::Result;
use crate::tui::canvas::Canvas;
use crate::tui::colors::{
    TileColors, BANNER_BACKGROUND, BANNER_FOREGROUND, BOARD_BACKGROUND, BOARD_FOREGROUND,
};
use crate::tui::error::{InnerError, Result as TuiResult};
use crate::tui::events::{Event, EventSource, UserInput};
use crate::tui::geometry::{Bounds2D, Idx, Rectangle};
use crate::tui::renderer::Renderer;

/// Generates a tui128 layout with legible numbers.
///
///  tui128: reach 128          ╔════════════╗
///                             ║   score 36 ║
///                             ╚════════════╝
///  ╔══════════════════════════════════════╗
///  ║                                      ║
///  ║  xxxxxxx  xxxxxxx  xxxxxxx  xxxxxxx  ║
///  ║  xxxxxxx  xxxxxxx  xxxxxxx  xxxxxxx  ║
///  ║  xxxxxxx  xxxxxxx  xxxxxxx  xxxxxxx  ║
///  ║                                      ║
///  ║  ...                                 ║
///  ╚══════════════════════════════════════╝
///   arrows/hjkl: move   u: undo   n: new
///            game   q: quit
const BOARD_FIXED_Y_OFFSET: usize = 3;
const BOARD_FIXED_X_OFFSET: usize = 2;
const BOARD_BORDER_WIDTH: usize = 1;
const BOARD_X_PADDING: usize = 2;
const BOARD_Y_PADDING: usize = 1;
const TILE_HEIGHT: usize = 3;
const TILE_WIDTH: usize = 7;
const SCORE_WIDTH: usize = 14;
const HELP_HEIGHT: usize = 2;
const BANNER_WIDTH: usize = 30;
const BANNER_HEIGHT: usize = 7;

const TITLE: &str = "tui128: reach 128";
const HELP: &str = "arrows/hjkl: move   u: undo   n: new game   q: quit";
const WON: &str = "You reached 128! Press n for a new game or u to undo.";
const GAME_OVER: &str = "Game over! Press n for a new game or u to undo.";
const TOO_SMALL: &str = "hey there! the terminal is too small for the board, try resizing it!";

/// Draws a game state onto a canvas.
struct Tui128Board<'a, const N: usize> {
    board: &'a Board<N>,
    colors: &'a TileColors,
}

impl<'a, const N: usize> Tui128Board<'a, N> {
    fn board_rectangle() -> Rectangle {
        Rectangle(
            Idx(BOARD_FIXED_X_OFFSET, BOARD_FIXED_Y_OFFSET),
            Bounds2D(
                2 * BOARD_BORDER_WIDTH + BOARD_X_PADDING + N * (TILE_WIDTH + BOARD_X_PADDING),
                2 * BOARD_BORDER_WIDTH + BOARD_Y_PADDING + N * (TILE_HEIGHT + BOARD_Y_PADDING),
            ),
        )
    }

    fn tile_rectangle(row: usize, col: usize) -> Rectangle {
        let x_offset = BOARD_FIXED_X_OFFSET + BOARD_BORDER_WIDTH + BOARD_X_PADDING;
        let y_offset = BOARD_FIXED_Y_OFFSET + BOARD_BORDER_WIDTH + BOARD_Y_PADDING;
        Rectangle(
            Idx(
                x_offset + (BOARD_X_PADDING + TILE_WIDTH) * col,
                y_offset + (BOARD_Y_PADDING + TILE_HEIGHT) * row,
            ),
            Bounds2D(TILE_WIDTH, TILE_HEIGHT),
        )
    }

    fn help_rectangle() -> Rectangle {
        let board = Self::board_rectangle();
        let (_, y_extent) = board.extents();
        Rectangle(Idx(board.x(), y_extent), Bounds2D(board.width(), HELP_HEIGHT))
    }

    /// The smallest canvas that fits the whole layout.
    fn required_size() -> (usize, usize) {
        let (x_extent, y_extent) = Self::help_rectangle().extents();
        (x_extent + BOARD_FIXED_X_OFFSET, y_extent)
    }

    fn draw(&self, canvas: &mut Canvas, score: u32, banner: Option<&str>) -> TuiResult<()> {
        let (cwidth, cheight) = canvas.dimensions();
        let (min_width, min_height) = Self::required_size();
        if cwidth < min_width || cheight < min_height {
            return Err(InnerError::TerminalTooSmall(min_width, min_height).into());
        }

        let board_rectangle = Self::board_rectangle();

        let mut title = canvas.get_draw_buffer(Rectangle(
            Idx(board_rectangle.x(), 0),
            Bounds2D(board_rectangle.width() - SCORE_WIDTH, BOARD_FIXED_Y_OFFSET),
        ))?;
        title.write_left(TITLE);

        let mut score_box = canvas.get_draw_buffer(Rectangle(
            Idx(
                board_rectangle.x() + board_rectangle.width() - SCORE_WIDTH,
                0,
            ),
            Bounds2D(SCORE_WIDTH, BOARD_FIXED_Y_OFFSET),
        ))?;
        score_box.set_colors(BOARD_FOREGROUND.lighten(0.5), BOARD_BACKGROUND);
        score_box.draw_border();
        score_box.fill(' ');
        score_box.write_right(&format!("score {}", score));

        let mut board = canvas.get_draw_buffer(board_rectangle.clone())?;
        board.set_colors(BOARD_BACKGROUND, BOARD_FOREGROUND);
        board.draw_border();
        board.fill(' ');

        for row in 0..N {
            for col in 0..N {
                let mut slot = canvas.get_draw_buffer(Self::tile_rectangle(row, col))?;
                let card = self.board.get(&BoardIdx(row, col));
                if card == 0 {
                    slot.set_colors(BOARD_BACKGROUND.lighten(0.1), BOARD_FOREGROUND);
                    continue;
                }
                let (background, foreground) = self.colors.for_card(card);
                slot.set_colors(background, foreground);
                slot.fill(' ');
                slot.write_center(&format!("{}", card));
            }
        }

        if let Some(message) = banner {
            let mut banner = canvas.get_draw_buffer(Rectangle(
                Idx(
                    board_rectangle.x() + (board_rectangle.width() - BANNER_WIDTH) / 2,
                    board_rectangle.y() + (board_rectangle.height() - BANNER_HEIGHT) / 2,
                ),
                Bounds2D(BANNER_WIDTH, BANNER_HEIGHT),
            ))?;
            banner.set_colors(BANNER_BACKGROUND, BANNER_FOREGROUND);
            banner.draw_border();
            banner.fill(' ');
            banner.write_wrapped(message);
        }

        let mut help = canvas.get_draw_buffer(Self::help_rectangle())?;
        help.write_wrapped(HELP);

        Ok(())
    }
}

fn banner(state: &GameState) -> Option<&'static str> {
    if state.has_won {
        Some(WON)
    } else if state.game_over {
        Some(GAME_OVER)
    } else {
        None
    }
}

pub(crate) struct Tui128<R: Renderer, E: EventSource> {
    renderer: R,
    event_source: E,
    storage: Box<dyn Storage>,
    game: Game,
    colors: TileColors,
}

impl<R: Renderer, E: EventSource> Tui128<R, E> {
    pub(crate) fn new(game: Game, storage: Box<dyn Storage>, renderer: R, event_source: E) -> Self {
        Self {
            renderer,
            event_source,
            storage,
            game,
            colors: TileColors::default(),
        }
    }

    /// Run consumes the Tui128 instance and takes control of the terminal until the player quits,
    /// returning the final game state.
    pub(crate) fn run(mut self) -> Result<GameState> {
        match self.inner_run() {
            Err(e) => {
                self.renderer.recover();
                Err(e)
            }
            Ok(_) => Ok(self.game.into_state()),
        }
    }

    fn inner_run(&mut self) -> Result<()> {
        // save the restored or freshly seeded game right away
        persist(self.storage.as_mut(), self.game.state())?;

        loop {
            self.draw()?;

            match self.event_source.next_event()? {
                Event::UserInput(UserInput::Action(action)) => self.dispatch(action)?,
                Event::UserInput(UserInput::Quit) => break,
                Event::Resize => self.renderer.clear()?,
            }
        }
        Ok(())
    }
}

impl<R: Renderer, E: EventSource> Tui128<R, E> {
    fn dispatch(&mut self, action: Action) -> Result<()> {
        if self.game.dispatch(action) {
            persist(self.storage.as_mut(), self.game.state())?;
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let (width, height) = self.renderer.size_hint()?;
        let (width, height) = (width as usize, height as usize);
        let state = self.game.state();
        let tui_board = Tui128Board {
            board: &state.board,
            colors: &self.colors,
        };

        let mut canvas = Canvas::new(width, height);
        match tui_board.draw(&mut canvas, state.score, banner(state)) {
            Ok(()) => (),
            Err(e) if e.is_terminal_too_small() => {
                log::debug!("{}", e);
                canvas = Canvas::new(width, height);
                canvas.get_layer().write_wrapped(TOO_SMALL);
            }
            Err(e) => return Err(e.into()),
        }

        self.renderer.render(&canvas)?;
        Ok(())
    }
}
