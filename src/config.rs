use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureConfig {
    #[serde(default = "FigureConfig::default_width")]
    pub width: u32,
    #[serde(default = "FigureConfig::default_height")]
    pub height: u32,
    #[serde(default = "FigureConfig::default_title_font_size")]
    pub title_font_size: u32,
    #[serde(default = "FigureConfig::default_axis_font_size")]
    pub axis_font_size: u32,
    #[serde(default = "FigureConfig::default_tick_font_size")]
    pub tick_font_size: u32,
    #[serde(default = "FigureConfig::default_legend_font_size")]
    pub legend_font_size: u32,
    #[serde(default = "FigureConfig::default_ticks")]
    pub ticks: usize,
}

impl FigureConfig {
    fn default_width() -> u32 {
        900
    }
    fn default_height() -> u32 {
        900
    }
    fn default_title_font_size() -> u32 {
        20
    }
    fn default_axis_font_size() -> u32 {
        26
    }
    fn default_tick_font_size() -> u32 {
        24
    }
    fn default_legend_font_size() -> u32 {
        20
    }
    fn default_ticks() -> usize {
        6
    }
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            title_font_size: Self::default_title_font_size(),
            axis_font_size: Self::default_axis_font_size(),
            tick_font_size: Self::default_tick_font_size(),
            legend_font_size: Self::default_legend_font_size(),
            ticks: Self::default_ticks(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    #[serde(default = "SheetConfig::default_sheet_name")]
    pub sheet_name: String,
    #[serde(default = "SheetConfig::default_skip_rows")]
    pub skip_rows: u32,
    #[serde(default = "SheetConfig::default_first_column")]
    pub first_column: String,
}

impl SheetConfig {
    fn default_sheet_name() -> String {
        "Consolidated".to_string()
    }
    fn default_skip_rows() -> u32 {
        1
    }
    fn default_first_column() -> String {
        "D".to_string()
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            sheet_name: Self::default_sheet_name(),
            skip_rows: Self::default_skip_rows(),
            first_column: Self::default_first_column(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EllipseConfig {
    /// Standard-deviation multiplier for the confidence region.
    #[serde(default = "EllipseConfig::default_n_std")]
    pub n_std: f64,
    /// Boundary samples per ellipse outline.
    #[serde(default = "EllipseConfig::default_segments")]
    pub segments: usize,
}

impl EllipseConfig {
    fn default_n_std() -> f64 {
        3.0
    }
    fn default_segments() -> usize {
        128
    }
}

impl Default for EllipseConfig {
    fn default() -> Self {
        Self {
            n_std: Self::default_n_std(),
            segments: Self::default_segments(),
        }
    }
}

/// Per-condition styling: scatter points use the face color, the ellipse is
/// filled with face × fill_alpha and outlined in the edge color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionStyle {
    pub label: String,
    pub face: [u8; 3],
    pub edge: [u8; 3],
    #[serde(default = "ConditionStyle::default_fill_alpha")]
    pub fill_alpha: f64,
}

impl ConditionStyle {
    fn default_fill_alpha() -> f64 {
        0.2
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub figure: FigureConfig,
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub ellipse: EllipseConfig,
    #[serde(default = "AppConfig::default_conditions")]
    pub conditions: Vec<ConditionStyle>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            figure: FigureConfig::default(),
            sheet: SheetConfig::default(),
            ellipse: EllipseConfig::default(),
            conditions: Self::default_conditions(),
        }
    }
}

impl AppConfig {
    fn default_conditions() -> Vec<ConditionStyle> {
        vec![
            ConditionStyle {
                label: "0ML".to_string(),
                face: [117, 174, 148],
                edge: [0, 0, 255],
                fill_alpha: 1.0,
            },
            ConditionStyle {
                label: "1ML".to_string(),
                face: [189, 192, 190],
                edge: [255, 255, 255],
                fill_alpha: 0.2,
            },
            ConditionStyle {
                label: "2ML".to_string(),
                face: [178, 87, 81],
                edge: [255, 0, 0],
                fill_alpha: 0.2,
            },
        ]
    }

    pub fn labels(&self) -> Vec<String> {
        self.conditions.iter().map(|c| c.label.clone()).collect()
    }

    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write commented defaults and return them.
        // Array-of-table headers are commented too, so the written file
        // reloads as pure defaults.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                let mut commented = String::new();
                for line in text.lines() {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        commented.push('\n');
                    } else if trimmed.starts_with("[[") {
                        commented.push_str("# ");
                        commented.push_str(line);
                        commented.push('\n');
                    } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
                        commented.push_str(line);
                        commented.push('\n');
                    } else {
                        commented.push_str("# ");
                        commented.push_str(line);
                        commented.push('\n');
                    }
                }
                if let Err(err) = fs::write(path_obj, commented) {
                    eprintln!("Failed to write default config to {path}: {err}");
                }
            }
            Err(err) => {
                eprintln!("Failed to serialize default config: {err}");
            }
        }
        default_cfg
    }
}
