//! Named action templates.
//!
//! A preset is what a toolbar button adds: a fully formed [`Action`] whose id
//! is still pending. Parameters come from [`PresetConfig`].

use crate::action::Action;
use crate::config::{Config, PresetConfig};
use crate::error::{PipelineError, Result};
use crate::handlers::{Direction, KIND_PROPERTY_PLOT, KIND_SCALE, KIND_SUMMARISE};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub action: Action,
}

pub const PRESET_NAMES: &[&str] = &[
    "move-north",
    "move-east",
    "move-west",
    "move-south",
    "scale-up",
    "scale-down",
    "centre-point",
    "elevation-plot",
];

/// Every preset, in toolbar order.
pub fn presets(config: &Config) -> Vec<Preset> {
    PRESET_NAMES
        .iter()
        .filter_map(|name| {
            build(name, &config.presets).map(|action| Preset { name, action })
        })
        .collect()
}

/// Instantiate the preset called `name`.
pub fn preset(name: &str, config: &Config) -> Result<Action> {
    build(name, &config.presets).ok_or_else(|| PipelineError::UnknownPreset(name.to_string()))
}

fn build(name: &str, cfg: &PresetConfig) -> Option<Action> {
    let action = match name {
        "move-north" => movement(Direction::North, "Move North", cfg.move_distance),
        "move-east" => movement(Direction::East, "Move East", cfg.move_distance),
        "move-west" => movement(Direction::West, "Move West", cfg.move_distance),
        "move-south" => movement(Direction::South, "Move South", cfg.move_distance),
        "scale-up" => Action::new(KIND_SCALE, "Scale Up", json!({ "factor": cfg.scale_up_factor })),
        "scale-down" => Action::new(
            KIND_SCALE,
            "Scale Down",
            json!({ "factor": cfg.scale_down_factor }),
        ),
        "centre-point" => Action::new(KIND_SUMMARISE, "Centre Point", json!({ "operation": "center" })),
        "elevation-plot" => Action::new(
            KIND_PROPERTY_PLOT,
            "Elevation Plot",
            json!({ "field": cfg.plot_field }),
        ),
        _ => return None,
    };
    Some(action)
}

fn movement(direction: Direction, label: &str, distance: f64) -> Action {
    Action::new(
        direction.kind(),
        label,
        json!({ "direction": direction.as_str(), "distance": distance }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionId;

    #[test]
    fn catalogue_is_complete_and_pending() {
        let all = presets(&Config::default());
        assert_eq!(all.len(), PRESET_NAMES.len());
        assert!(all.iter().all(|p| p.action.id == ActionId::PENDING));
        assert!(all.iter().all(|p| p.action.active));
    }

    #[test]
    fn move_north_matches_toolbar_defaults() {
        let action = preset("move-north", &Config::default()).unwrap();
        assert_eq!(action.kind, "move-north");
        assert_eq!(action.label, "Move North");
        assert_eq!(action.version, "1.0");
        assert_eq!(
            action.payload,
            json!({ "direction": "north", "distance": 0.1 })
        );
    }

    #[test]
    fn parameters_follow_config() {
        let mut config = Config::default();
        config.presets.scale_up_factor = 3.0;
        config.presets.plot_field = "hr".to_string();
        assert_eq!(
            preset("scale-up", &config).unwrap().payload,
            json!({ "factor": 3.0 })
        );
        assert_eq!(
            preset("elevation-plot", &config).unwrap().payload,
            json!({ "field": "hr" })
        );
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = preset("rotate", &Config::default()).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownPreset(name) if name == "rotate"));
    }
}
