use std::io::Write;

use crossterm::{
    cursor,
    event::{self, Event as CrossTermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style, terminal, ExecutableCommand, QueueableCommand,
};

use super::canvas::Canvas;
use super::colors::Rgb;
use super::error::Result;
use super::events::{Event, EventSource, UserInput};
use super::renderer::Renderer;
use crate::engine::game::Action;
use crate::engine::shift::Direction;

pub(crate) struct Crossterm<T: Write> {
    w: Box<T>,
    active: bool,
}

impl<T: Write> Crossterm<T> {
    pub(crate) fn new(mut w: Box<T>) -> Result<Self> {
        terminal::enable_raw_mode()?;
        w.execute(terminal::EnterAlternateScreen)?;
        w.execute(cursor::Hide)?;
        Ok(Self { w, active: true })
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.w.execute(style::ResetColor)?;
        self.w.execute(cursor::Show)?;
        self.w.execute(terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl<T: Write> Drop for Crossterm<T> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("failed to restore terminal: {}", e);
        }
    }
}

impl<T: Write> Renderer for Crossterm<T> {
    fn size_hint(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    fn render(&mut self, c: &Canvas) -> Result<()> {
        self.w.queue(terminal::BeginSynchronizedUpdate)?;
        for (y, row) in c.rows().enumerate() {
            self.w.queue(cursor::MoveTo(0, y as u16))?;
            let mut current: (Option<Rgb>, Option<Rgb>) = (None, None);
            self.w.queue(style::ResetColor)?;
            for tuxel in row {
                let colors = tuxel.colors();
                if colors != current {
                    self.queue_colors(colors)?;
                    current = colors;
                }
                self.w.queue(style::Print(tuxel.content()))?;
            }
        }
        self.w.queue(style::ResetColor)?;
        self.w.queue(terminal::EndSynchronizedUpdate)?;
        self.w.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.w.queue(style::ResetColor)?;
        self.w
            .queue(terminal::Clear(terminal::ClearType::All))?;
        self.w.flush()?;
        Ok(())
    }

    fn recover(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("failed to restore terminal: {}", e);
        }
    }
}

impl<T: Write> Crossterm<T> {
    fn queue_colors(&mut self, (fg, bg): (Option<Rgb>, Option<Rgb>)) -> Result<()> {
        self.w.queue(style::ResetColor)?;
        if let Some(fg) = fg {
            self.w.queue(style::SetForegroundColor(fg.into()))?;
        }
        if let Some(bg) = bg {
            self.w.queue(style::SetBackgroundColor(bg.into()))?;
        }
        Ok(())
    }
}

/// Reads keyboard and resize events from the terminal.
#[derive(Default)]
pub(crate) struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    /// Block until the next event that matters to the game.
    fn next_event(&self) -> Result<Event> {
        loop {
            match event::read()? {
                CrossTermEvent::Key(ke) => match handle_key_event(ke) {
                    Some(input) => return Ok(Event::UserInput(input)),
                    None => continue,
                },
                CrossTermEvent::Resize(_, _) => return Ok(Event::Resize),
                _ => continue,
            };
        }
    }
}

fn handle_key_event(ke: KeyEvent) -> Option<UserInput> {
    if ke.kind == KeyEventKind::Release {
        return None;
    }
    let input = match ke.code {
        KeyCode::Char('c') if ke.modifiers.contains(KeyModifiers::CONTROL) => UserInput::Quit,
        KeyCode::Left | KeyCode::Char('h') => UserInput::Action(Action::Move(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') => UserInput::Action(Action::Move(Direction::Right)),
        KeyCode::Up | KeyCode::Char('k') => UserInput::Action(Action::Move(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') => UserInput::Action(Action::Move(Direction::Down)),
        KeyCode::Char('u') => UserInput::Action(Action::Undo),
        KeyCode::Char('n') => UserInput::Action(Action::NewGame),
        KeyCode::Char('q') | KeyCode::Esc => UserInput::Quit,
        _ => return None,
    };
    log::trace!("key {:?} -> {:?}", ke.code, input);
    Some(input)
}
