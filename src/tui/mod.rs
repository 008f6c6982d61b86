pub(crate) mod canvas;
pub(crate) mod colors;
pub(crate) mod crossterm;
pub(crate) mod drawbuffer;
pub(crate) mod error;
pub(crate) mod events;
pub(crate) mod geometry;
pub(crate) mod renderer;
pub(crate) mod tuxel;
