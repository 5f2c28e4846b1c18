use super::{payload, KIND_SUMMARISE};
use crate::action::Action;
use crate::config::MAX_SUMMARY_PRECISION;
use crate::outcome::Outcome;
use crate::registry::{Accumulator, ActionHandler};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Operation {
    Center,
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    operation: Operation,
}

/// Describes the dataset without changing it.
#[derive(Debug, Clone, Copy)]
pub struct SummaryHandler {
    precision: usize,
}

impl SummaryHandler {
    /// `precision` is capped at [`MAX_SUMMARY_PRECISION`] decimal places.
    pub fn new(precision: u8) -> Self {
        Self {
            precision: usize::from(precision.min(MAX_SUMMARY_PRECISION)),
        }
    }
}

impl ActionHandler for SummaryHandler {
    fn kind(&self) -> &str {
        KIND_SUMMARISE
    }

    fn handle(&self, acc: Accumulator, action: &Action) -> Accumulator {
        let SummaryPayload { operation } = match payload(action) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(id = %action.id, error = %e, "summary skipped");
                return acc;
            }
        };
        let Some((west, south, east, north)) = acc.state.bounds() else {
            return acc;
        };

        let description = match operation {
            Operation::Center => {
                let lat = (south + north) / 2.0;
                let lng = (west + east) / 2.0;
                let p = self.precision;
                format!("Centre Point: [{lat:.p$}, {lng:.p$}]")
            }
        };
        acc.record(action.id, Outcome::simple(description))
    }
}
