/// 24-bit color, independent of any rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` literal
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Shift every channel by `amount`, clamped to 0..=255
    pub fn adjust(self, amount: i16) -> Self {
        let shift = |c: u8| (c as i16 + amount).clamp(0, 255) as u8;
        Self::new(shift(self.r), shift(self.g), shift(self.b))
    }
}

/// Color palette applied to the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub snake: Rgb,
    pub food: Rgb,
    pub background: Rgb,
    pub grid: Rgb,
}

pub const THEMES: [Theme; 4] = [
    Theme {
        name: "Classic",
        snake: Rgb::from_hex(0x00ff96),
        food: Rgb::from_hex(0xff0066),
        background: Rgb::from_hex(0x0a0a0a),
        grid: Rgb::from_hex(0x1a1a1a),
    },
    Theme {
        name: "Neon",
        snake: Rgb::from_hex(0x00ffff),
        food: Rgb::from_hex(0xff00ff),
        background: Rgb::from_hex(0x0a0a1a),
        grid: Rgb::from_hex(0x1a1a2a),
    },
    Theme {
        name: "Fire",
        snake: Rgb::from_hex(0xff6600),
        food: Rgb::from_hex(0xffff00),
        background: Rgb::from_hex(0x1a0a0a),
        grid: Rgb::from_hex(0x2a1a1a),
    },
    Theme {
        name: "Ice",
        snake: Rgb::from_hex(0x00ccff),
        food: Rgb::from_hex(0xffffff),
        background: Rgb::from_hex(0x0a0a1a),
        grid: Rgb::from_hex(0x1a1a2a),
    },
];

/// Game-over particles ignore the theme
pub const GAME_OVER_RED: Rgb = Rgb::from_hex(0xff0000);

/// Theme at catalog index `index`, wrapping around the catalog
pub fn theme(index: usize) -> &'static Theme {
    &THEMES[index % THEMES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex(0x00ff96), Rgb::new(0x00, 0xff, 0x96));
        assert_eq!(Rgb::from_hex(0x123456), Rgb::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn test_adjust_clamps() {
        let color = Rgb::new(10, 128, 250);
        assert_eq!(color.adjust(-30), Rgb::new(0, 98, 220));
        assert_eq!(color.adjust(10), Rgb::new(20, 138, 255));
    }

    #[test]
    fn test_theme_wraps() {
        assert_eq!(theme(0).name, "Classic");
        assert_eq!(theme(1).name, "Neon");
        assert_eq!(theme(4).name, "Classic");
        assert_eq!(theme(7).name, "Ice");
    }
}
