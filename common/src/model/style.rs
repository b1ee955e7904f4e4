//! Style choices offered by the certificate customizer.
//!
//! Every choice is a closed enum with a default, so a `StyleSelection` decoded
//! from a request with missing fields is always complete.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    NotoNaskhArabic,
    Amiri,
    ElMessiri,
    Cairo,
    Tajawal,
}

impl FontFamily {
    /// CSS font stack used by the rendering layer.
    pub fn stack(&self) -> &'static str {
        match self {
            FontFamily::NotoNaskhArabic => "'Noto Naskh Arabic', serif",
            FontFamily::Amiri => "'Amiri', serif",
            FontFamily::ElMessiri => "'El Messiri', sans-serif",
            FontFamily::Cairo => "'Cairo', sans-serif",
            FontFamily::Tajawal => "'Tajawal', sans-serif",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    #[default]
    Blue,
    Green,
    Gold,
    Burgundy,
    Purple,
}

/// Concrete colours of a scheme, as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
}

impl ColorScheme {
    pub fn palette(&self) -> Palette {
        let (primary, secondary, accent, background) = match self {
            ColorScheme::Blue => ("#1e3a8a", "#3b82f6", "#c9a227", "#f8fafc"),
            ColorScheme::Green => ("#14532d", "#16a34a", "#c9a227", "#f7fdf9"),
            ColorScheme::Gold => ("#78350f", "#b45309", "#d4af37", "#fffbeb"),
            ColorScheme::Burgundy => ("#6b0f1a", "#9f1239", "#c9a227", "#fdf7f8"),
            ColorScheme::Purple => ("#3b0764", "#7e22ce", "#c9a227", "#faf5ff"),
        };
        Palette {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            accent: accent.to_string(),
            background: background.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesignVariant {
    #[default]
    Vintage,
    Modern,
    Classic,
    Minimal,
}

/// Frame and ornament attributes of a design variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutAttributes {
    pub border_style: String,
    pub border_width_px: u8,
    pub corner_radius_px: u8,
    pub ornament: String,
    pub seal: bool,
}

impl DesignVariant {
    pub fn layout(&self) -> LayoutAttributes {
        let (border_style, border_width_px, corner_radius_px, ornament, seal) = match self {
            DesignVariant::Vintage => ("double", 12, 4, "corner-flourish", true),
            DesignVariant::Modern => ("solid", 4, 16, "side-band", false),
            DesignVariant::Classic => ("ridge", 10, 0, "laurel", true),
            DesignVariant::Minimal => ("solid", 1, 0, "none", false),
        };
        LayoutAttributes {
            border_style: border_style.to_string(),
            border_width_px,
            corner_radius_px,
            ornament: ornament.to_string(),
            seal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontColor {
    /// Follows the primary colour of the scheme.
    #[default]
    Default,
    Dark,
    Gold,
    Navy,
}

impl FontColor {
    pub fn resolve(&self, palette: &Palette) -> String {
        match self {
            FontColor::Default => palette.primary.clone(),
            FontColor::Dark => "#1f2937".to_string(),
            FontColor::Gold => "#a67c00".to_string(),
            FontColor::Navy => "#0b1f4d".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleSelection {
    pub font_family: FontFamily,
    pub color_scheme: ColorScheme,
    pub design: DesignVariant,
    pub font_color: FontColor,
}

/// Style attributes after resolving a `StyleSelection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub font_stack: String,
    pub palette: Palette,
    pub layout: LayoutAttributes,
    pub text_color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_selection_fills_defaults() {
        let style: StyleSelection = serde_json::from_str(r#"{"colorScheme":"gold"}"#).unwrap();
        assert_eq!(style.color_scheme, ColorScheme::Gold);
        assert_eq!(style.font_family, FontFamily::NotoNaskhArabic);
        assert_eq!(style.design, DesignVariant::Vintage);
        assert_eq!(style.font_color, FontColor::Default);
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(serde_json::from_str::<StyleSelection>(r#"{"design":"baroque"}"#).is_err());
    }

    #[test]
    fn default_font_color_tracks_scheme() {
        let palette = ColorScheme::Green.palette();
        assert_eq!(FontColor::Default.resolve(&palette), palette.primary);
        assert_ne!(FontColor::Navy.resolve(&palette), palette.primary);
    }
}
