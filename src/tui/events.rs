use super::error::Result;
use crate::engine::game::Action;

pub(crate) trait EventSource {
    fn next_event(&self) -> Result<Event>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Event {
    UserInput(UserInput),
    Resize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum UserInput {
    Action(Action),
    Quit,
}
