use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Parse `#rrggbb`.
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

// ---------------------------------------------------------------------------
// Country colours
// ---------------------------------------------------------------------------

/// Maps each country to a fixed colour shared by every chart.
#[derive(Debug, Clone)]
pub struct CountryColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CountryColors {
    /// Build from configured `#rrggbb` strings. Unparseable entries are skipped.
    pub fn from_config(colors: &BTreeMap<String, String>) -> Self {
        let mut mapping = BTreeMap::new();
        for (country, hex) in colors {
            match parse_hex(hex) {
                Some(c) => {
                    mapping.insert(country.clone(), c);
                }
                None => log::warn!("Ignoring colour '{hex}' for {country}: expected #rrggbb"),
            }
        }
        CountryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Give palette colours to countries without a configured one.
    pub fn register(&mut self, countries: &[String]) {
        let missing: Vec<&String> = countries
            .iter()
            .filter(|c| !self.mapping.contains_key(*c))
            .collect();
        let palette = generate_palette(missing.len());
        for (country, color) in missing.into_iter().zip(palette) {
            self.mapping.insert(country.clone(), color);
        }
    }

    /// Look up the colour for a country.
    pub fn color_for(&self, country: &str) -> Color32 {
        self.mapping
            .get(country)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!(parse_hex("#1e88e5"), Some(Color32::from_rgb(0x1e, 0x88, 0xe5)));
        assert_eq!(parse_hex("1e88e5"), None);
        assert_eq!(parse_hex("#1e88"), None);
        assert_eq!(parse_hex("#zz88e5"), None);
    }

    #[test]
    fn configured_and_generated_colours() {
        let config = BTreeMap::from([
            ("China".to_string(), "#1e88e5".to_string()),
            ("Japan".to_string(), "bogus".to_string()),
        ]);
        let mut colors = CountryColors::from_config(&config);
        assert_eq!(colors.color_for("China"), Color32::from_rgb(0x1e, 0x88, 0xe5));
        assert_eq!(colors.color_for("Japan"), Color32::GRAY);

        colors.register(&["China".to_string(), "Japan".to_string()]);
        assert_eq!(colors.color_for("China"), Color32::from_rgb(0x1e, 0x88, 0xe5));
        assert_ne!(colors.color_for("Japan"), Color32::GRAY);
    }

    #[test]
    fn palette_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(3).len(), 3);
    }
}
