//! Per-text configuration.

use serde::{Deserialize, Serialize};

use crate::types::{FontType, Justify};

/// Defaults and layout knobs of a [`Text`](crate::text::Text).
///
/// Loadable from any serde format; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Face used outside styled runs.
    pub font_type: FontType,
    /// Pixel size used outside styled runs.
    pub size: u32,
    /// RGBA color used outside styled runs.
    pub color: [f32; 4],
    pub auto_wrap: bool,
    /// Wrap width; the owning box width when unset.
    pub custom_wrap_width: Option<f32>,
    pub justify: Justify,
    /// Scales each line's ascender when stacking lines. Negative values
    /// clamp to zero; NaN and infinities fall back to 1.
    pub line_height_percentage: f32,
    /// Round line ascenders up and descenders down to even values.
    pub ascender_descender_power_of_two: bool,
    pub auto_grow_vertices: bool,
    /// Minimum quad slots kept when auto-grow is on.
    pub auto_grow_size: usize,
    /// Margin around every glyph quad, in pixels.
    pub padding: f32,
    /// Advance of the space character, overriding the font.
    pub default_space_width: Option<f32>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_type: FontType::Regular,
            size: 16,
            color: [1.0, 1.0, 1.0, 1.0],
            auto_wrap: false,
            custom_wrap_width: None,
            justify: Justify::Left,
            line_height_percentage: 1.0,
            ascender_descender_power_of_two: false,
            auto_grow_vertices: false,
            auto_grow_size: 0,
            padding: 0.0,
            default_space_width: None,
        }
    }
}

/// Usable line-height factor for `percentage`.
pub(crate) fn sanitize_line_height(percentage: f32) -> f32 {
    if percentage.is_finite() {
        percentage.max(0.0)
    } else {
        log::warn!("TextConfig: line height percentage {percentage} is not finite; using 1.0");
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::AtlasConfig;

    #[test]
    fn test_config_defaults() {
        let config = TextConfig::default();
        assert_eq!(config.size, 16);
        assert_eq!(config.line_height_percentage, 1.0);
        assert!(!config.auto_wrap);
        assert_eq!(config.justify, Justify::Left);
    }

    #[test]
    fn test_sanitize_line_height() {
        assert_eq!(sanitize_line_height(1.5), 1.5);
        assert_eq!(sanitize_line_height(-2.0), 0.0);
        assert_eq!(sanitize_line_height(f32::NAN), 1.0);
        assert_eq!(sanitize_line_height(f32::INFINITY), 1.0);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: TextConfig =
            serde_json::from_str(r#"{ "size": 24, "auto_wrap": true, "justify": "Center" }"#).unwrap();
        assert_eq!(config.size, 24);
        assert!(config.auto_wrap);
        assert_eq!(config.justify, Justify::Center);
        assert_eq!(config.font_type, FontType::Regular);
        assert_eq!(config.custom_wrap_width, None);
    }

    #[test]
    fn test_atlas_config_from_json() {
        let config: AtlasConfig =
            serde_json::from_str(r#"{ "width": 512, "vertical_alignment": true }"#).unwrap();
        assert_eq!(config.width, 512);
        assert_eq!(config.height, 2048);
        assert_eq!(config.horizontal_spacing, 1);
        assert!(config.vertical_alignment);
    }
}
