//! Colours for token categories.
//!
//! Tokenisers report a default colour per token type so callers get a
//! sensible scheme without configuring anything. The palette is the
//! Catppuccin Mocha accent set.

/// A 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Catppuccin Mocha palette constants.
pub mod catppuccin {
    use super::Colour;

    pub const MAUVE: Colour = Colour::new(0xcb, 0xa6, 0xf7); // #cba6f7
    pub const BLUE: Colour = Colour::new(0x89, 0xb4, 0xfa); // #89b4fa
    pub const SAPPHIRE: Colour = Colour::new(0x74, 0xc7, 0xec); // #74c7ec
    pub const GREEN: Colour = Colour::new(0xa6, 0xe3, 0xa1); // #a6e3a1
    pub const PEACH: Colour = Colour::new(0xfa, 0xb3, 0x87); // #fab387
    pub const YELLOW: Colour = Colour::new(0xf9, 0xe2, 0xaf); // #f9e2af
    pub const RED: Colour = Colour::new(0xf3, 0x8b, 0xa8); // #f38ba8
    pub const TEAL: Colour = Colour::new(0x94, 0xe2, 0xd5); // #94e2d5
    pub const OVERLAY: Colour = Colour::new(0x6c, 0x70, 0x86); // #6c7086
    pub const TEXT: Colour = Colour::new(0xcd, 0xd6, 0xf4); // #cdd6f4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_construction() {
        let c = Colour::new(0x12, 0x34, 0x56);
        assert_eq!((c.r, c.g, c.b), (0x12, 0x34, 0x56));
        assert_eq!(catppuccin::MAUVE, Colour::new(0xcb, 0xa6, 0xf7));
    }
}
