use crate::output::{print_json, print_table};
use anyhow::Context;
use geopipe_core::{
    action::ActionEntry, config::Config, io, outcome::OutcomeMap, script::Script, Engine,
    FeatureCollection,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub fn run(
    root: &Path,
    script_path: &Path,
    data: Option<&Path>,
    out: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let script = Script::load(script_path)
        .with_context(|| format!("failed to read script {}", script_path.display()))?;

    let data_path: PathBuf = data
        .map(Path::to_path_buf)
        .or_else(|| script.data.clone())
        .context("no dataset: pass --data or set `data` in the script")?;
    let raw = std::fs::read_to_string(&data_path)
        .with_context(|| format!("failed to read dataset {}", data_path.display()))?;
    let collection = FeatureCollection::from_json(&raw)
        .with_context(|| format!("failed to parse GeoJSON in {}", data_path.display()))?;

    let mut engine = Engine::with_builtins(&config);
    engine.set_initial_state(collection)?;
    script
        .apply(&mut engine, &config)
        .context("session replay failed")?;

    let state = engine
        .current_state()
        .context("no state derived from the session")?;

    if let Some(out) = out {
        io::write_collection(out, state)
            .with_context(|| format!("failed to write {}", out.display()))?;
    }

    if json {
        #[derive(Serialize)]
        struct RunOutput<'a> {
            dataset: &'a str,
            actions: &'a [ActionEntry],
            outcomes: &'a OutcomeMap,
            state: &'a FeatureCollection,
        }

        return print_json(&RunOutput {
            dataset: engine.dataset_name(),
            actions: engine.actions(),
            outcomes: engine.outcomes(),
            state,
        });
    }

    println!("Dataset: {}", engine.dataset_name());
    println!();
    print_table(
        &["ID", "KIND", "LABEL", "ACTIVE", "OUTCOME"],
        &action_rows(engine.actions(), engine.outcomes()),
    );
    println!();
    println!("State: {} feature(s)", state.features.len());
    if let Some(out) = out {
        println!("Wrote {}", out.display());
    }
    Ok(())
}

fn action_rows(actions: &[ActionEntry], outcomes: &OutcomeMap) -> Vec<Vec<String>> {
    let outcome = |id| {
        outcomes
            .get(&id)
            .map(|o| o.summary())
            .unwrap_or_else(|| "-".to_string())
    };
    let flag = |active: bool| if active { "yes" } else { "no" }.to_string();

    let mut rows = Vec::new();
    for entry in actions {
        match entry {
            ActionEntry::Action(a) => rows.push(vec![
                a.id.to_string(),
                a.kind.clone(),
                a.label.clone(),
                flag(a.active),
                outcome(a.id),
            ]),
            ActionEntry::Composite(c) => {
                let group = &c.group;
                rows.push(vec![
                    group.id.to_string(),
                    entry.kind().to_string(),
                    group.label.clone(),
                    flag(group.active),
                    String::new(),
                ]);
                for item in &group.items {
                    rows.push(vec![
                        item.id.to_string(),
                        item.kind.clone(),
                        format!("  {}", item.label),
                        flag(item.active),
                        outcome(item.id),
                    ]);
                }
            }
        }
    }
    rows
}
