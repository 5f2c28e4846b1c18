use crate::output::print_json;
use anyhow::Context;
use geopipe_core::{config::Config, Engine};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let engine = Engine::with_builtins(&config);
    let kinds = engine.registry().kinds();

    if json {
        return print_json(&kinds);
    }
    for kind in kinds {
        println!("{kind}");
    }
    Ok(())
}
