//! Action data model.
//!
//! An [`Action`] is one replayable transformation request: a `kind` tag that
//! selects its handler plus an opaque JSON payload for that handler. A
//! [`CompositeAction`] groups leaf actions so they can be toggled, moved and
//! removed as one entry while the children keep their own ids and flags.
//! [`ActionEntry`] is what actually sits in the pipeline's list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dispatch tag of composite actions.
pub const KIND_COMPOSITE: &str = "composite";

fn default_version() -> String {
    "1.0".to_string()
}

fn default_active() -> bool {
    true
}

// ---------------------------------------------------------------------------
// ActionId
// ---------------------------------------------------------------------------

/// Engine-assigned identity. `ActionId::PENDING` marks an action that has not
/// been added to a pipeline yet; real ids start at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub u64);

impl ActionId {
    pub const PENDING: ActionId = ActionId(0);

    pub fn is_pending(self) -> bool {
        self == Self::PENDING
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pending() {
            f.write_str("pending")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default = "pending_id")]
    pub id: ActionId,
    pub kind: String,
    pub label: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub payload: serde_json::Value,
}

fn pending_id() -> ActionId {
    ActionId::PENDING
}

impl Action {
    pub fn new(
        kind: impl Into<String>,
        label: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: ActionId::PENDING,
            kind: kind.into(),
            label: label.into(),
            version: default_version(),
            active: true,
            payload,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

// ---------------------------------------------------------------------------
// CompositeAction
// ---------------------------------------------------------------------------

/// A named group of leaf actions. Items are `Action`, not `ActionEntry`, so
/// groups cannot nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeAction {
    #[serde(default = "pending_id")]
    pub id: ActionId,
    pub label: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_active")]
    pub active: bool,
    pub items: Vec<Action>,
}

impl CompositeAction {
    pub fn new(label: impl Into<String>, items: Vec<Action>) -> Self {
        Self {
            id: ActionId::PENDING,
            label: label.into(),
            version: default_version(),
            active: true,
            items,
        }
    }

    pub fn item(&self, id: ActionId) -> Option<&Action> {
        self.items.iter().find(|a| a.id == id)
    }

    fn item_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.items.iter_mut().find(|a| a.id == id)
    }
}

// ---------------------------------------------------------------------------
// ActionEntry
// ---------------------------------------------------------------------------

/// A top-level pipeline entry. Serialized with the dispatch tag inline, so a
/// composite reads as `{ "kind": "composite", "items": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionEntry {
    Composite(CompositeEntry),
    Action(Action),
}

/// Wire form of a composite: the `CompositeAction` plus its fixed kind tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeEntry {
    pub kind: CompositeKind,
    #[serde(flatten)]
    pub group: CompositeAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKind {
    Composite,
}

impl From<Action> for ActionEntry {
    fn from(action: Action) -> Self {
        ActionEntry::Action(action)
    }
}

impl From<CompositeAction> for ActionEntry {
    fn from(group: CompositeAction) -> Self {
        ActionEntry::Composite(CompositeEntry {
            kind: CompositeKind::Composite,
            group,
        })
    }
}

impl ActionEntry {
    pub fn id(&self) -> ActionId {
        match self {
            ActionEntry::Action(a) => a.id,
            ActionEntry::Composite(c) => c.group.id,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            ActionEntry::Action(a) => &a.kind,
            ActionEntry::Composite(_) => KIND_COMPOSITE,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ActionEntry::Action(a) => &a.label,
            ActionEntry::Composite(c) => &c.group.label,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            ActionEntry::Action(a) => a.active,
            ActionEntry::Composite(c) => c.group.active,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, ActionEntry::Composite(_))
    }

    pub fn as_action(&self) -> Option<&Action> {
        match self {
            ActionEntry::Action(a) => Some(a),
            ActionEntry::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeAction> {
        match self {
            ActionEntry::Composite(c) => Some(&c.group),
            ActionEntry::Action(_) => None,
        }
    }

    pub(crate) fn set_id(&mut self, id: ActionId) {
        match self {
            ActionEntry::Action(a) => a.id = id,
            ActionEntry::Composite(c) => c.group.id = id,
        }
    }

    pub(crate) fn toggle_active(&mut self) {
        match self {
            ActionEntry::Action(a) => a.active = !a.active,
            ActionEntry::Composite(c) => c.group.active = !c.group.active,
        }
    }

    /// Toggle this entry or, for a composite, one of its items.
    pub(crate) fn toggle_nested(&mut self, id: ActionId) -> bool {
        if self.id() == id {
            self.toggle_active();
            return true;
        }
        match self {
            ActionEntry::Composite(c) => match c.group.item_mut(id) {
                Some(item) => {
                    item.active = !item.active;
                    true
                }
                None => false,
            },
            ActionEntry::Action(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
