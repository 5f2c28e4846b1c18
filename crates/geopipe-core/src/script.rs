//! Session scripts: a recorded editing session replayed against an engine.
//!
//! ```yaml
//! data: track.geojson
//! steps:
//!   - add: move-north
//!   - add: { kind: scale, label: Double, payload: { factor: 2.0 } }
//!   - group: { ids: [1, 2], name: Compound A }
//!   - toggle: 3
//! ```

use crate::action::{Action, ActionId};
use crate::config::Config;
use crate::engine::Engine;
use crate::error::{PipelineError, Result};
use crate::paths;
use crate::presets;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    /// Dataset to load, relative to the script's directory.
    #[serde(default)]
    pub data: Option<PathBuf>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Add(AddSpec),
    Remove(ActionId),
    Toggle(ActionId),
    Group { ids: Vec<ActionId>, name: String },
    Ungroup(ActionId),
}

/// Either a preset name or a literal action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AddSpec {
    Preset(String),
    Action(Action),
}

impl AddSpec {
    fn resolve(&self, config: &Config) -> Result<Action> {
        match self {
            AddSpec::Preset(name) => presets::preset(name, config),
            AddSpec::Action(action) => Ok(action.clone()),
        }
    }
}

impl Script {
    pub fn from_yaml(data: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(data)?)
    }

    /// Read a script file, resolving `data` against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let mut script = Self::from_yaml(&data)?;
        let base = path.parent().unwrap_or(Path::new("."));
        script.data = script.data.map(|d| paths::resolve_relative(base, &d));
        Ok(script)
    }

    /// Apply every step in order. The first failing step stops the replay;
    /// steps before it stay applied.
    pub fn apply(&self, engine: &mut Engine, config: &Config) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            apply_step(step, engine, config).map_err(|e| PipelineError::ScriptStep {
                step: index + 1,
                source: Box::new(e),
            })?;
        }
        Ok(())
    }
}

fn apply_step(step: &Step, engine: &mut Engine, config: &Config) -> Result<()> {
    match step {
        Step::Add(add) => {
            let action = add.resolve(config)?;
            let id = engine.add_action(action);
            tracing::info!(%id, "added action");
        }
        Step::Remove(id) => {
            engine.remove_action(*id);
        }
        Step::Toggle(id) => {
            engine.toggle_action_active(*id);
        }
        Step::Group { ids, name } => {
            let id = engine.group_actions(ids, name)?;
            tracing::info!(%id, members = ids.len(), "grouped actions");
        }
        Step::Ungroup(id) => {
            engine.ungroup_action(*id)?;
        }
    }
    Ok(())
}
