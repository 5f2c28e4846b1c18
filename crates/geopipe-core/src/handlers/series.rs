use super::{payload, KIND_PROPERTY_PLOT};
use crate::action::Action;
use crate::features::Feature;
use crate::outcome::Outcome;
use crate::registry::{Accumulator, ActionHandler};
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct PlotPayload {
    field: String,
}

/// Samples one numeric feature property against the time property.
#[derive(Debug, Clone)]
pub struct PropertyPlotHandler {
    time_property: String,
}

impl PropertyPlotHandler {
    pub fn new(time_property: impl Into<String>) -> Self {
        Self {
            time_property: time_property.into(),
        }
    }

    fn sample(&self, feature: &Feature, field: &str) -> Option<(f64, f64)> {
        let x = feature.property(&self.time_property).and_then(time_value)?;
        let y = feature.property(field).and_then(Value::as_f64)?;
        Some((x, y))
    }
}

/// Numbers are taken as-is; strings must be RFC 3339 and become epoch millis.
fn time_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.timestamp_millis() as f64),
        _ => None,
    }
}

impl ActionHandler for PropertyPlotHandler {
    fn kind(&self) -> &str {
        KIND_PROPERTY_PLOT
    }

    fn handle(&self, acc: Accumulator, action: &Action) -> Accumulator {
        let PlotPayload { field } = match payload(action) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(id = %action.id, error = %e, "plot skipped");
                return acc;
            }
        };
        if acc.state.is_empty() {
            return acc;
        }

        let data: Vec<(f64, f64)> = acc
            .state
            .features
            .iter()
            .filter_map(|f| self.sample(f, &field))
            .collect();
        if data.is_empty() {
            tracing::debug!(id = %action.id, %field, "no plottable samples");
        }
        acc.record(action.id, Outcome::Series { data })
    }
}
