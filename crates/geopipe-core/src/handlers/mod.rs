//! Built-in action handlers.
//!
//! Each handler parses its payload into a typed struct. A payload that does
//! not parse is reported and the action is skipped, like an unknown kind.

pub mod movement;
pub mod scale;
pub mod series;
pub mod summary;

pub use movement::{Direction, MoveHandler};
pub use scale::ScaleHandler;
pub use series::PropertyPlotHandler;
pub use summary::SummaryHandler;

use crate::action::Action;
use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::registry::HandlerRegistry;
use serde::de::DeserializeOwned;

pub const KIND_SCALE: &str = "scale";
pub const KIND_SUMMARISE: &str = "summarise";
pub const KIND_PROPERTY_PLOT: &str = "property-plot";

/// Register every built-in handler, parameterized by `config`.
pub fn register_builtins(registry: &mut HandlerRegistry, config: &Config) {
    for direction in Direction::all() {
        registry.register(Box::new(MoveHandler::new(*direction)));
    }
    registry.register(Box::new(ScaleHandler));
    registry.register(Box::new(SummaryHandler::new(config.summary.precision)));
    registry.register(Box::new(PropertyPlotHandler::new(
        config.series.time_property.clone(),
    )));
}

/// Decode `action.payload` as `T`.
pub(crate) fn payload<T: DeserializeOwned>(action: &Action) -> Result<T> {
    T::deserialize(&action.payload).map_err(|e| PipelineError::InvalidPayload {
        kind: action.kind.clone(),
        reason: e.to_string(),
    })
}
