use std::collections::HashMap;

use palette::{FromColor, LightenAssign, Lch, Srgb};

use crate::engine::board::Card;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Rgb(u8, u8, u8);

impl Rgb {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    #[inline(always)]
    pub(crate) fn r(&self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub(crate) fn g(&self) -> u8 {
        self.1
    }

    #[inline(always)]
    pub(crate) fn b(&self) -> u8 {
        self.2
    }

    pub(crate) fn lighten(&self, amount: f32) -> Rgb {
        let amount = amount.clamp(0.0, 1.0);
        let mut color = Srgb::new(self.0, self.1, self.2).into_format::<f32>();
        color.lighten_assign(amount);
        color.into_format::<u8>().into()
    }
}

impl From<Srgb<u8>> for Rgb {
    fn from(color: Srgb<u8>) -> Rgb {
        Self(color.red, color.green, color.blue)
    }
}

impl From<Lch> for Rgb {
    fn from(lch: Lch) -> Rgb {
        Srgb::<f32>::from_color(lch).into_format::<u8>().into()
    }
}

impl From<Rgb> for crossterm::style::Color {
    fn from(f: Rgb) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: f.r(),
            g: f.g(),
            b: f.b(),
        }
    }
}

pub(crate) const BOARD_BACKGROUND: Rgb = Rgb::new(60, 40, 30);
pub(crate) const BOARD_FOREGROUND: Rgb = Rgb::new(150, 160, 190);
pub(crate) const BANNER_BACKGROUND: Rgb = Rgb::new(25, 25, 35);
pub(crate) const BANNER_FOREGROUND: Rgb = Rgb::new(240, 220, 120);

const UNKNOWN_CARD: (Rgb, Rgb) = (Rgb::new(255, 255, 255), Rgb::new(90, 0, 0));

/// Background and foreground colors for each tile value, spread around the Lch hue wheel.
pub(crate) struct TileColors {
    card_colors: HashMap<Card, (Rgb, Rgb)>,
}

impl Default for TileColors {
    fn default() -> Self {
        let bg_hue = 28.0;
        let fg_hue = bg_hue + 180.0;
        let card_colors = (1..12)
            .map(|i| {
                (
                    2u32.pow(i),
                    Lch::new(80.0, 90.0, bg_hue + i as f32 * 360.0 / 11.0),
                    Lch::new(20.0, 50.0, fg_hue),
                )
            })
            .map(|(card, bg, fg)| (card, (Rgb::from(bg), Rgb::from(fg))))
            .collect();
        Self { card_colors }
    }
}

impl TileColors {
    /// Returns (background, foreground) for the given card.
    pub(crate) fn for_card(&self, card: Card) -> (Rgb, Rgb) {
        self.card_colors
            .get(&card)
            .copied()
            .unwrap_or(UNKNOWN_CARD)
    }
}
