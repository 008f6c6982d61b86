use super::colors::Rgb;

/// A single character cell on the terminal along with its colors.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Tuxel {
    content: char,
    fgcolor: Option<Rgb>,
    bgcolor: Option<Rgb>,
}

impl Default for Tuxel {
    fn default() -> Self {
        Tuxel {
            content: ' ',
            fgcolor: None,
            bgcolor: None,
        }
    }
}

impl Tuxel {
    pub(crate) fn set_content(&mut self, c: char) {
        self.content = c;
    }

    pub(crate) fn set_fgcolor(&mut self, c: Rgb) {
        self.fgcolor = Some(c);
    }

    pub(crate) fn set_bgcolor(&mut self, c: Rgb) {
        self.bgcolor = Some(c);
    }

    pub(crate) fn content(&self) -> char {
        self.content
    }

    /// Returns (foreground, background).
    pub(crate) fn colors(&self) -> (Option<Rgb>, Option<Rgb>) {
        (self.fgcolor, self.bgcolor)
    }
}

impl std::fmt::Display for Tuxel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content())
    }
}
