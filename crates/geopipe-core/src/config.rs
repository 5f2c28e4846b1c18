use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// PresetConfig
// ---------------------------------------------------------------------------

/// Parameters baked into the preset actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetConfig {
    /// Degrees moved by the move-* presets.
    #[serde(default = "default_move_distance")]
    pub move_distance: f64,
    #[serde(default = "default_scale_up")]
    pub scale_up_factor: f64,
    #[serde(default = "default_scale_down")]
    pub scale_down_factor: f64,
    /// Property plotted by the elevation-plot preset.
    #[serde(default = "default_plot_field")]
    pub plot_field: String,
}

fn default_move_distance() -> f64 {
    0.1
}

fn default_scale_up() -> f64 {
    1.6
}

fn default_scale_down() -> f64 {
    0.625
}

fn default_plot_field() -> String {
    "ele".to_string()
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            move_distance: default_move_distance(),
            scale_up_factor: default_scale_up(),
            scale_down_factor: default_scale_down(),
            plot_field: default_plot_field(),
        }
    }
}

// ---------------------------------------------------------------------------
// SeriesConfig / SummaryConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Feature property used as the x axis of property plots.
    #[serde(default = "default_time_property")]
    pub time_property: String,
}

fn default_time_property() -> String {
    "time".to_string()
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            time_property: default_time_property(),
        }
    }
}

/// Digits past which an f64 degree carries no information.
pub const MAX_SUMMARY_PRECISION: u8 = 17;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Decimal places in centre-point descriptions.
    #[serde(default = "default_precision")]
    pub precision: u8,
}

fn default_precision() -> u8 {
    3
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub presets: PresetConfig,
    #[serde(default)]
    pub series: SeriesConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            presets: PresetConfig::default(),
            series: SeriesConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Config {
    /// Load `geopipe.yaml` under `root`, or the defaults when there is none.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let presets = &self.presets;

        if !(presets.move_distance.is_finite() && presets.move_distance > 0.0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "presets.move_distance must be a positive number (got {})",
                    presets.move_distance
                ),
            });
        }

        for (name, factor) in [
            ("scale_up_factor", presets.scale_up_factor),
            ("scale_down_factor", presets.scale_down_factor),
        ] {
            if !(factor.is_finite() && factor > 0.0) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("presets.{name} must be a positive number (got {factor})"),
                });
            }
        }

        if presets.scale_up_factor <= 1.0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "presets.scale_up_factor <= 1 does not enlarge the track".to_string(),
            });
        }

        if presets.plot_field.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "presets.plot_field is empty".to_string(),
            });
        }

        if self.series.time_property.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "series.time_property is empty".to_string(),
            });
        }

        if self.summary.precision > MAX_SUMMARY_PRECISION {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "summary.precision={} exceeds the maximum of {MAX_SUMMARY_PRECISION}",
                    self.summary.precision
                ),
            });
        } else if self.summary.precision > 10 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "summary.precision={} (>10 decimals is beyond f64 accuracy for degrees)",
                    self.summary.precision
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
