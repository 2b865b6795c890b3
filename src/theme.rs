use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStyle {
    Solid,
    Hachure,
    #[serde(rename = "cross-hatch")]
    CrossHatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    Solid,
    Dashed,
    Dotted,
}

/// Current drawing defaults applied to every synthesized shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleContext {
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: FillStyle,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub roughness: f64,
    pub opacity: f64,
    pub rounded: bool,
    pub font_family: String,
    pub font_size: f64,
}

impl StyleContext {
    pub fn whiteboard_default() -> Self {
        Self {
            stroke_color: "#1e1e1e".to_string(),
            background_color: "transparent".to_string(),
            fill_style: FillStyle::Solid,
            stroke_width: 2.0,
            stroke_style: StrokeStyle::Solid,
            roughness: 1.0,
            opacity: 100.0,
            rounded: true,
            font_family: "Excalifont, Segoe UI Emoji".to_string(),
            font_size: 20.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            stroke_color: "#e3e3e8".to_string(),
            background_color: "#343a40".to_string(),
            fill_style: FillStyle::Solid,
            stroke_width: 2.0,
            stroke_style: StrokeStyle::Solid,
            roughness: 0.0,
            opacity: 100.0,
            rounded: true,
            font_family: "Nunito, Segoe UI Emoji".to_string(),
            font_size: 16.0,
        }
    }

    pub fn from_preset(name: &str) -> Option<Self> {
        match name {
            "default" | "light" => Some(Self::whiteboard_default()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }
}

impl Default for StyleContext {
    fn default() -> Self {
        Self::whiteboard_default()
    }
}
