pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod handlers;
pub mod io;
pub mod outcome;
pub mod paths;
pub mod pipeline;
pub mod presets;
pub mod reducer;
pub mod registry;
pub mod script;

pub use action::{Action, ActionEntry, ActionId, CompositeAction};
pub use engine::Engine;
pub use error::{PipelineError, Result};
pub use features::FeatureCollection;
pub use outcome::{Outcome, OutcomeMap};
