use egui::Color32;
use thiserror::Error;

/// Swatches offered above the canvas
pub const DEFAULT_SWATCHES: [&str; 5] = ["#FFFFFF", "#FFD700", "#00FFFF", "#FF00FF", "#39FF14"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex colour '{0}' (expected #RRGGBB)")]
pub struct ColorParseError(pub String);

/// Parse a `#RRGGBB` colour
pub fn parse_hex_color(hex: &str) -> Result<Color32, ColorParseError> {
    let invalid = || ColorParseError(hex.to_owned());
    // `from_hex` also takes #RGB and #RRGGBBAA; swatches are opaque six-digit colours only
    if hex.strip_prefix('#').is_none_or(|digits| digits.len() != 6) {
        return Err(invalid());
    }
    Color32::from_hex(hex).map_err(|_| invalid())
}

/// A named colour in the palette
#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    pub label: String,
    pub color: Color32,
}

/// Fixed list of colours with exactly one selected
#[derive(Debug, Clone)]
pub struct ColorPalette {
    swatches: Vec<Swatch>,
    selected: usize,
}

impl Default for ColorPalette {
    fn default() -> Self {
        let swatches = DEFAULT_SWATCHES
            .iter()
            .filter_map(|hex| {
                parse_hex_color(hex).ok().map(|color| Swatch {
                    label: (*hex).to_owned(),
                    color,
                })
            })
            .collect();
        Self { swatches, selected: 0 }
    }
}

impl ColorPalette {
    /// Build a palette from hex strings, selecting the first.
    ///
    /// Returns `None` when the list is empty.
    pub fn from_hex<'a>(hexes: impl IntoIterator<Item = &'a str>) -> Result<Option<Self>, ColorParseError> {
        let swatches = hexes
            .into_iter()
            .map(|hex| {
                parse_hex_color(hex).map(|color| Swatch {
                    label: hex.to_owned(),
                    color,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if swatches.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self { swatches, selected: 0 }))
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_color(&self) -> Color32 {
        self.swatches[self.selected].color
    }

    /// Select a swatch by index, returning the new colour if it changed
    pub fn select(&mut self, index: usize) -> Option<Color32> {
        if index >= self.swatches.len() || index == self.selected {
            return None;
        }
        self.selected = index;
        log::info!("Colour selected: {}", self.swatches[index].label);
        Some(self.swatches[index].color)
    }
}
