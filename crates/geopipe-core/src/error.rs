use crate::action::ActionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no initial state set: load a dataset before folding actions")]
    MissingInitialState,

    #[error("initial state is already set and cannot be replaced")]
    InitialStateAlreadySet,

    #[error("action not found: {0}")]
    ActionNotFound(ActionId),

    #[error("action {0} is not a composite action")]
    InvalidUngroupTarget(ActionId),

    #[error("cannot group an empty selection")]
    EmptySelection,

    #[error("selected actions are not contiguous in the action list: {0:?}")]
    NonContiguousSelection(Vec<ActionId>),

    #[error("composite action {0} cannot be nested inside another group")]
    NestedComposite(ActionId),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("invalid payload for '{kind}': {reason}")]
    InvalidPayload { kind: String, reason: String },

    #[error("script step {step} failed")]
    ScriptStep {
        step: usize,
        #[source]
        source: Box<PipelineError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
