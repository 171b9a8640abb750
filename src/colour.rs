use crate::error::DocumentError;
use serde::{Deserialize, Deserializer};

/// A colour, expressed in RGB or CMYK colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Parse a CSS-style hex colour (`#rrggbb`, `rrggbb` or `#rgb`), as used by
    /// branding palettes
    pub fn from_hex(hex: &str) -> Result<Colour, DocumentError> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || DocumentError::InputValidation(format!("`{hex}` is not a hex colour"));
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Colour::new_rgb_bytes(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Ok(Colour::new_rgb_bytes(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Colour::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    pub const SLATE: Colour = Colour::RGB {
        r: 0.122,
        g: 0.161,
        b: 0.216,
    };
    pub const GREY: Colour = Colour::RGB {
        r: 0.420,
        g: 0.447,
        b: 0.502,
    };
    pub const NAVY: Colour = Colour::RGB {
        r: 0.043,
        g: 0.165,
        b: 0.290,
    };
    pub const TEAL: Colour = Colour::RGB {
        r: 0.059,
        g: 0.463,
        b: 0.431,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(
            Colour::from_hex("#ff0000").unwrap(),
            Colour::RGB {
                r: 1.0,
                g: 0.0,
                b: 0.0
            }
        );
        assert_eq!(
            Colour::from_hex("0f0").unwrap(),
            Colour::from_hex("#00ff00").unwrap()
        );
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Colour::from_hex("#12345").is_err());
        assert!(Colour::from_hex("#gg0000").is_err());
        assert!(Colour::from_hex("").is_err());
    }

    #[test]
    fn deserializes_from_json_string() {
        let c: Colour = serde_json::from_str("\"#ffffff\"").unwrap();
        assert_eq!(c, Colour::new_rgb(1.0, 1.0, 1.0));
    }
}
