use super::canvas::Canvas;
use super::error::Result;

pub(crate) trait Renderer {
    /// Current size of the output surface as (width, height).
    fn size_hint(&self) -> Result<(u16, u16)>;

    fn render(&mut self, c: &Canvas) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    /// Give the output surface back to the user after a failure.
    fn recover(&mut self) {}
}
