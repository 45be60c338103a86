//! Brand colors from the `general` sheet
//!
//! Editors pick up to three hex colors; the page needs each as a family of
//! CSS custom properties (darker shade, translucent tint, hero overlay).
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::sheet::ConfigMap;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaletteError {
    #[error("Invalid hex color: '{0}'")]
    InvalidHex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rgb` or `#rrggbb` (the `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(PaletteError::InvalidHex(hex.to_string())),
        };

        let n = u32::from_str_radix(&expanded, 16)
            .map_err(|_| PaletteError::InvalidHex(hex.to_string()))?;

        Ok(Self {
            r: ((n >> 16) & 0xff) as u8,
            g: ((n >> 8) & 0xff) as u8,
            b: (n & 0xff) as u8,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn scaled(self, factor: f64) -> Self {
        let scale = |c: u8| (f64::from(c) * factor).clamp(0.0, 255.0).round() as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    pub fn rgba(self, alpha: f64) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha)
    }
}

/// Scale every channel of `hex` by `factor`, returned as lowercase `#rrggbb`
pub fn adjust_brightness(hex: &str, factor: f64) -> Result<String, PaletteError> {
    Ok(Rgb::from_hex(hex)?.scaled(factor).to_hex())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variants {
    pub base: String,
    pub dark: String,
    pub light: String,
    pub overlay: String,
}

impl Variants {
    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        let rgb = Rgb::from_hex(hex)?;
        Ok(Self {
            base: hex.trim().to_string(),
            dark: rgb.scaled(0.7).to_hex(),
            light: rgb.rgba(0.1),
            overlay: rgb.rgba(0.82),
        })
    }
}

/// CSS custom properties derived from the site-wide config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrandPalette {
    pub properties: Vec<(String, String)>,
}

impl BrandPalette {
    /// Build from `color_primary`, `color_secondary` and `color_tertiary`.
    /// Blank keys are skipped; an unparseable color is logged and skipped.
    pub fn from_config(config: &ConfigMap) -> Self {
        let mut palette = Self::default();

        if let Some(hex) = non_empty(config, "color_primary") {
            match Variants::from_hex(hex) {
                Ok(v) => {
                    palette.set("--clr-primary", v.base);
                    palette.set("--clr-primary-dark", v.dark);
                    palette.set("--clr-primary-light", v.light);
                    palette.set("--clr-hero-overlay", v.overlay);
                }
                Err(e) => warn!("Ignoring color_primary: {}", e),
            }
        }

        if let Some(hex) = non_empty(config, "color_secondary") {
            match adjust_brightness(hex, 0.8) {
                Ok(hover) => {
                    palette.set("--clr-accent", hex.to_string());
                    palette.set("--clr-accent-hover", hover);
                }
                Err(e) => warn!("Ignoring color_secondary: {}", e),
            }
        }

        if let Some(hex) = non_empty(config, "color_tertiary") {
            match Variants::from_hex(hex) {
                Ok(v) => {
                    palette.set("--clr-pink", v.base);
                    palette.set("--clr-pink-dark", v.dark);
                    palette.set("--clr-pink-light", v.light);
                }
                Err(e) => warn!("Ignoring color_tertiary: {}", e),
            }
        }

        palette
    }

    fn set(&mut self, name: &str, value: String) {
        self.properties.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

fn non_empty<'a>(config: &'a ConfigMap, key: &str) -> Option<&'a str> {
    config
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}
