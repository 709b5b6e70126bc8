/// Tile color schemes.
///
/// Each scheme maps a tile level to a (foreground, background) pair of
/// 256-color terminal indices, indexed by level-1 and clamped at the
/// top so levels beyond the table reuse its last entry. Cosmetic only:
/// the engine never sees a scheme.

use crossterm::style::Color;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Scheme {
    #[default]
    Original,
    BlackWhite,
    BlueRed,
}

/// (fg, bg) per level, starting at level 1.
type Palette = [(u8, u8); 16];

const ORIGINAL: Palette = [
    (8, 255), (1, 255), (2, 255), (3, 255),
    (4, 255), (5, 255), (6, 255), (7, 255),
    (9, 0), (10, 0), (11, 0), (12, 0),
    (13, 0), (14, 0), (255, 0), (255, 0),
];

const BLACK_WHITE: Palette = [
    (232, 255), (234, 255), (236, 255), (238, 255),
    (240, 255), (242, 255), (244, 255), (246, 0),
    (248, 0), (249, 0), (250, 0), (251, 0),
    (252, 0), (253, 0), (254, 0), (255, 0),
];

const BLUE_RED: Palette = [
    (235, 255), (63, 255), (57, 255), (93, 255),
    (129, 255), (165, 255), (201, 255), (200, 255),
    (199, 255), (198, 255), (197, 255), (196, 255),
    (196, 255), (196, 255), (196, 255), (196, 255),
];

impl Scheme {
    /// Parse a scheme name; unknown names map to None so callers can
    /// fall back silently.
    pub fn from_name(name: &str) -> Option<Scheme> {
        match name {
            "original" => Some(Scheme::Original),
            "blackwhite" => Some(Scheme::BlackWhite),
            "bluered" => Some(Scheme::BlueRed),
            _ => None,
        }
    }

    fn palette(self) -> &'static Palette {
        match self {
            Scheme::Original => &ORIGINAL,
            Scheme::BlackWhite => &BLACK_WHITE,
            Scheme::BlueRed => &BLUE_RED,
        }
    }

    /// Colors for a tile of the given level. Level 0 (empty) renders
    /// dim on the default background.
    pub fn colors(self, level: u8) -> (Color, Color) {
        if level == 0 {
            return (Color::DarkGrey, Color::Reset);
        }
        let palette = self.palette();
        let idx = (level as usize - 1).min(palette.len() - 1);
        let (fg, bg) = palette[idx];
        (Color::AnsiValue(fg), Color::AnsiValue(bg))
    }
}
