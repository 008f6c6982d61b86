pub(crate) mod board;
pub(crate) mod game;
pub(crate) mod shift;
pub(crate) mod store;
