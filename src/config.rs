use crate::theme::{FillStyle, StrokeStyle, StyleContext};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Vertical placement of a node inside its row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAlign {
    /// `row_top + (row_height - node_height) / 2`
    #[default]
    Center,
    /// Flush with the row top.
    Top,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub row_gap: f64,
    pub column_gap: f64,
    pub row_align: RowAlign,
    pub child_min_width: f64,
    pub child_min_height: f64,
    pub child_gap: f64,
    pub label_line_height: f64,
    pub label_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_height: 100.0,
            row_gap: 80.0,
            column_gap: 40.0,
            row_align: RowAlign::Center,
            child_min_width: 120.0,
            child_min_height: 60.0,
            child_gap: 80.0,
            label_line_height: 1.25,
            label_padding: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub style: StyleContext,
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StyleFile {
    preset: Option<String>,
    stroke_color: Option<String>,
    background_color: Option<String>,
    fill_style: Option<FillStyle>,
    stroke_width: Option<f64>,
    stroke_style: Option<StrokeStyle>,
    roughness: Option<f64>,
    opacity: Option<f64>,
    rounded: Option<bool>,
    font_family: Option<String>,
    font_size: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutFile {
    node_width: Option<f64>,
    node_height: Option<f64>,
    row_gap: Option<f64>,
    column_gap: Option<f64>,
    row_align: Option<RowAlign>,
    child_min_width: Option<f64>,
    child_min_height: Option<f64>,
    child_gap: Option<f64>,
    label_line_height: Option<f64>,
    label_padding: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    style: Option<StyleFile>,
    layout: Option<LayoutFile>,
}

/// Loads a JSON5 config file over the defaults. `None` yields defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        debug!("No configuration file given, using defaults");
        return Ok(config);
    };

    info!(path = path.display().to_string(); "Loading configuration");
    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;

    if let Some(style) = parsed.style {
        apply_style(&mut config.style, style)?;
    }
    if let Some(layout) = parsed.layout {
        apply_layout(&mut config.layout, layout);
    }
    Ok(config)
}

fn apply_style(style: &mut StyleContext, file: StyleFile) -> anyhow::Result<()> {
    if let Some(name) = file.preset.as_deref() {
        *style = StyleContext::from_preset(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown style preset: {}", name))?;
    }
    if let Some(v) = file.stroke_color {
        style.stroke_color = v;
    }
    if let Some(v) = file.background_color {
        style.background_color = v;
    }
    if let Some(v) = file.fill_style {
        style.fill_style = v;
    }
    if let Some(v) = file.stroke_width {
        style.stroke_width = v;
    }
    if let Some(v) = file.stroke_style {
        style.stroke_style = v;
    }
    if let Some(v) = file.roughness {
        style.roughness = v;
    }
    if let Some(v) = file.opacity {
        style.opacity = v;
    }
    if let Some(v) = file.rounded {
        style.rounded = v;
    }
    if let Some(v) = file.font_family {
        style.font_family = v;
    }
    if let Some(v) = file.font_size {
        style.font_size = v;
    }
    Ok(())
}

fn apply_layout(layout: &mut LayoutConfig, file: LayoutFile) {
    if let Some(v) = file.node_width {
        layout.node_width = v;
    }
    if let Some(v) = file.node_height {
        layout.node_height = v;
    }
    if let Some(v) = file.row_gap {
        layout.row_gap = v;
    }
    if let Some(v) = file.column_gap {
        layout.column_gap = v;
    }
    if let Some(v) = file.row_align {
        layout.row_align = v;
    }
    if let Some(v) = file.child_min_width {
        layout.child_min_width = v;
    }
    if let Some(v) = file.child_min_height {
        layout.child_min_height = v;
    }
    if let Some(v) = file.child_gap {
        layout.child_gap = v;
    }
    if let Some(v) = file.label_line_height {
        layout.label_line_height = v;
    }
    if let Some(v) = file.label_padding {
        layout.label_padding = v;
    }
}
