use crate::output::{print_json, print_table};
use anyhow::Context;
use geopipe_core::{config::Config, presets};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let presets = presets::presets(&config);

    if json {
        return print_json(&presets);
    }

    let rows: Vec<Vec<String>> = presets
        .iter()
        .map(|p| {
            vec![
                p.name.to_string(),
                p.action.kind.clone(),
                p.action.label.clone(),
                p.action.payload.to_string(),
            ]
        })
        .collect();
    print_table(&["PRESET", "KIND", "LABEL", "PAYLOAD"], &rows);
    Ok(())
}
