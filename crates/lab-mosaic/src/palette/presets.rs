//! Built-in pixel-art palettes
//!
//! Curated indexed palettes for the quantized output, as published on
//! Lospec. Colors are listed in their published order, which fixes each
//! entry's index.

use std::fmt;
use std::str::FromStr;

use super::error::PaletteError;
use super::palette::Palette;
use crate::color::StdRgb;

/// A named built-in palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetPalette {
    /// ENDESGA 32
    Endesga32,
    /// Apollo, 46 colors
    Apollo,
    /// Resurrect 64
    Resurrect64,
    /// Zughy, 28 colors
    Zughy,
}

impl PresetPalette {
    /// Every preset, in listing order.
    pub const ALL: [PresetPalette; 4] = [
        PresetPalette::Endesga32,
        PresetPalette::Apollo,
        PresetPalette::Resurrect64,
        PresetPalette::Zughy,
    ];

    /// Kebab-case name used in configuration and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            PresetPalette::Endesga32 => "endesga-32",
            PresetPalette::Apollo => "apollo",
            PresetPalette::Resurrect64 => "resurrect-64",
            PresetPalette::Zughy => "zughy",
        }
    }

    /// The preset's colors in sRGB.
    pub fn colors(self) -> &'static [StdRgb] {
        match self {
            PresetPalette::Endesga32 => ENDESGA_32,
            PresetPalette::Apollo => APOLLO,
            PresetPalette::Resurrect64 => RESURRECT_64,
            PresetPalette::Zughy => ZUGHY,
        }
    }

    /// Build a matchable palette from this preset.
    pub fn palette(self) -> Palette {
        // Presets are non-empty constants, so construction cannot fail
        Palette::from_nonempty_srgb(self.colors())
    }
}

impl fmt::Display for PresetPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PresetPalette {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| PaletteError::UnknownPreset(s.to_string()))
    }
}

const fn c(r: u8, g: u8, b: u8) -> StdRgb {
    StdRgb::from_u8(r, g, b)
}

#[rustfmt::skip]
const ENDESGA_32: &[StdRgb] = &[
    c(190, 74, 47), c(215, 118, 67), c(234, 212, 170), c(228, 166, 114),
    c(184, 111, 80), c(115, 62, 57), c(62, 39, 49), c(162, 38, 51),
    c(228, 59, 68), c(247, 118, 34), c(254, 174, 52), c(254, 231, 97),
    c(99, 199, 77), c(62, 137, 72), c(38, 92, 66), c(25, 60, 62),
    c(18, 78, 137), c(0, 153, 219), c(44, 232, 245), c(255, 255, 255),
    c(192, 203, 220), c(139, 155, 180), c(90, 105, 136), c(58, 68, 102),
    c(38, 43, 68), c(24, 20, 37), c(255, 0, 68), c(104, 56, 108),
    c(181, 80, 136), c(246, 117, 122), c(232, 183, 150), c(194, 133, 105),
];

#[rustfmt::skip]
const APOLLO: &[StdRgb] = &[
    c(23, 32, 56), c(37, 58, 94), c(60, 94, 139), c(79, 143, 186),
    c(115, 190, 211), c(164, 221, 219), c(25, 51, 45), c(37, 86, 46),
    c(70, 130, 50), c(117, 167, 67), c(168, 202, 88), c(208, 218, 145),
    c(77, 43, 50), c(122, 72, 65), c(173, 119, 87), c(192, 148, 115),
    c(215, 181, 148), c(231, 213, 179), c(52, 28, 39), c(96, 44, 44),
    c(136, 75, 43), c(190, 119, 43), c(222, 158, 65), c(232, 193, 112),
    c(36, 21, 39), c(65, 29, 49), c(117, 36, 56), c(163, 48, 48),
    c(207, 87, 60), c(218, 134, 62), c(30, 29, 57), c(64, 39, 81),
    c(122, 54, 123), c(162, 62, 140), c(198, 81, 151), c(223, 132, 165),
    c(9, 10, 20), c(16, 20, 31), c(21, 29, 40), c(32, 46, 55),
    c(57, 74, 80), c(87, 114, 119), c(129, 151, 150), c(168, 181, 178),
    c(199, 207, 204), c(235, 237, 233),
];

#[rustfmt::skip]
const RESURRECT_64: &[StdRgb] = &[
    c(46, 34, 47), c(62, 53, 70), c(98, 85, 101), c(150, 108, 108),
    c(171, 148, 122), c(105, 79, 98), c(127, 112, 138), c(155, 171, 178),
    c(199, 220, 208), c(255, 255, 255), c(110, 39, 39), c(179, 56, 49),
    c(234, 79, 54), c(245, 125, 74), c(174, 35, 52), c(232, 59, 59),
    c(251, 107, 29), c(247, 150, 23), c(249, 194, 43), c(122, 48, 69),
    c(158, 69, 57), c(205, 104, 61), c(230, 144, 78), c(251, 185, 84),
    c(76, 62, 36), c(103, 102, 51), c(162, 169, 71), c(213, 224, 75),
    c(251, 255, 134), c(22, 90, 76), c(35, 144, 99), c(30, 188, 115),
    c(145, 219, 105), c(205, 223, 108), c(49, 54, 56), c(55, 78, 74),
    c(84, 126, 100), c(146, 169, 132), c(178, 186, 144), c(11, 94, 101),
    c(11, 138, 143), c(14, 175, 155), c(48, 225, 185), c(143, 248, 226),
    c(50, 51, 83), c(72, 74, 119), c(77, 101, 180), c(77, 155, 230),
    c(143, 211, 255), c(69, 41, 63), c(107, 62, 117), c(144, 94, 169),
    c(168, 132, 243), c(234, 173, 237), c(117, 60, 84), c(162, 75, 111),
    c(207, 101, 127), c(237, 128, 153), c(131, 28, 93), c(195, 36, 84),
    c(240, 79, 120), c(246, 129, 129), c(252, 167, 144), c(253, 203, 176),
];

#[rustfmt::skip]
const ZUGHY: &[StdRgb] = &[
    c(71, 45, 60), c(94, 54, 67), c(122, 68, 74), c(160, 91, 83),
    c(191, 121, 88), c(238, 161, 96), c(244, 204, 161), c(182, 213, 60),
    c(113, 170, 52), c(57, 123, 68), c(60, 89, 86), c(48, 44, 46),
    c(90, 83, 83), c(125, 112, 113), c(160, 147, 142), c(207, 198, 184),
    c(223, 246, 245), c(138, 235, 241), c(40, 204, 223), c(57, 120, 168),
    c(57, 71, 120), c(57, 49, 75), c(86, 64, 100), c(142, 71, 140),
    c(205, 96, 147), c(255, 174, 182), c(244, 180, 27), c(244, 126, 27),
];
