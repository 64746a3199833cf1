use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Value;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

/// Colour for `value` on a blue→yellow ramp over `[min, max]`.
pub fn ramp(value: f64, min: f64, max: f64) -> Color32 {
    let range = max - min;
    let t = if range.abs() < f64::EPSILON || !range.is_finite() {
        0.5
    } else {
        ((value - min) / range).clamp(0.0, 1.0)
    };
    // 240° (blue) down to 60° (yellow).
    let hue = 240.0 - 180.0 * t as f32;
    hsl_to_color32(hue, 0.7, 0.5)
}

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the categories of a chosen column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Value, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a column's distinct values.
    pub fn new<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let values: std::collections::BTreeSet<&Value> = values.into_iter().collect();
        let palette = generate_palette(values.len());
        let mapping = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &Value) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_color_map_lookup() {
        let values = [Value::from("Hombre"), Value::from("Mujer"), Value::from("Hombre")];
        let cm = ColorMap::new(&values);
        assert_ne!(cm.color_for(&values[0]), cm.color_for(&values[1]));
        assert_eq!(cm.color_for(&Value::Null), Color32::GRAY);
    }

    #[test]
    fn test_ramp_endpoints() {
        assert_ne!(ramp(0.0, 0.0, 1.0), ramp(1.0, 0.0, 1.0));
        assert_eq!(ramp(5.0, 1.0, 1.0), ramp(7.0, 3.0, 3.0));
        assert_eq!(ramp(-3.0, 0.0, 1.0), ramp(0.0, 0.0, 1.0));
    }
}
