use crate::action::ActionId;
use crate::features::FeatureCollection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What one action produced when it was folded. Kept beside the main state,
/// never fed back into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Outcome {
    #[serde(rename = "SimpleOutcome")]
    Simple { description: String },
    #[serde(rename = "SpatialOutcome")]
    Spatial { after: FeatureCollection },
    /// Ordered `(x, y)` samples, e.g. elevation over time.
    #[serde(rename = "Array2dOutcome")]
    Series { data: Vec<(f64, f64)> },
}

impl Outcome {
    pub fn simple(description: impl Into<String>) -> Self {
        Outcome::Simple {
            description: description.into(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Outcome::Simple { .. } => "SimpleOutcome",
            Outcome::Spatial { .. } => "SpatialOutcome",
            Outcome::Series { .. } => "Array2dOutcome",
        }
    }

    /// One-line summary for listings.
    pub fn summary(&self) -> String {
        match self {
            Outcome::Simple { description } => description.clone(),
            Outcome::Spatial { after } => format!("{} feature(s) after", after.features.len()),
            Outcome::Series { data } => format!("{} sample(s)", data.len()),
        }
    }
}

/// Outcomes keyed by the id of the action that wrote them. Ordered so that
/// two folds of the same list compare and serialize identically.
pub type OutcomeMap = BTreeMap<ActionId, Outcome>;
