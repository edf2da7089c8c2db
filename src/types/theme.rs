use serde::{Deserialize, Serialize};

use super::errors::ThemeError;

/// Theme values last reported by the page, kept across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThemeState {
    pub theme_type: Option<String>,
    pub background: Option<String>,
    pub foreground: Option<String>,
}

/// 8-bit RGBA, the color format the web view takes.
pub type Rgba = (u8, u8, u8, u8);

/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(input: &str) -> Result<Rgba, ThemeError> {
    let invalid = || ThemeError::InvalidColor(input.to_string());
    let hex = input.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(hex.chars()) {
                let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                *slot = v * 17;
            }
            Ok((rgb[0], rgb[1], rgb[2], 255))
        }
        6 => Ok((byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?, 255)),
        8 => Ok((
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        )),
        _ => Err(invalid()),
    }
}
