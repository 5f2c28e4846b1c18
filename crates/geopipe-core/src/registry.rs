//! Handler registry: maps an action `kind` to the function that applies it.
//!
//! The composite handler is built in and always answers for `"composite"`;
//! every other kind is registered by the application at startup. Lookup is
//! first-match, so a second registration for the same kind is logged and
//! never used.

use crate::action::{Action, ActionEntry, ActionId, CompositeAction, KIND_COMPOSITE};
use crate::features::FeatureCollection;
use crate::outcome::{Outcome, OutcomeMap};

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Value threaded through a fold: the state so far plus every outcome
/// written by the actions already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    pub state: FeatureCollection,
    pub outcomes: OutcomeMap,
}

impl Accumulator {
    pub fn new(state: FeatureCollection) -> Self {
        Self {
            state,
            outcomes: OutcomeMap::new(),
        }
    }

    /// Replace the state and record the outcome of `id` in one step.
    pub fn with(mut self, state: FeatureCollection, id: ActionId, outcome: Outcome) -> Self {
        self.state = state;
        self.outcomes.insert(id, outcome);
        self
    }

    /// Record an outcome without touching the state.
    pub fn record(mut self, id: ActionId, outcome: Outcome) -> Self {
        self.outcomes.insert(id, outcome);
        self
    }
}

// ---------------------------------------------------------------------------
// ActionHandler
// ---------------------------------------------------------------------------

/// Applies one action kind. Implementations must be pure: the result depends
/// only on `acc` and `action`, the input state is never modified in place,
/// and exactly one outcome is written under `action.id` (none when there was
/// nothing to operate on).
pub trait ActionHandler {
    fn kind(&self) -> &str;

    fn handle(&self, acc: Accumulator, action: &Action) -> Accumulator;
}

// ---------------------------------------------------------------------------
// CompositeHandler
// ---------------------------------------------------------------------------

/// Folds the active items of a group through the registry. Writes no outcome
/// of its own; each child records its own.
#[derive(Debug, Default)]
pub struct CompositeHandler;

impl CompositeHandler {
    pub fn handle(
        &self,
        acc: Accumulator,
        group: &CompositeAction,
        registry: &HandlerRegistry,
    ) -> Accumulator {
        group
            .items
            .iter()
            .filter(|item| item.active)
            .fold(acc, |acc, item| registry.apply_action(acc, item))
    }
}

// ---------------------------------------------------------------------------
// HandlerRegistry
// ---------------------------------------------------------------------------

pub struct HandlerRegistry {
    composite: CompositeHandler,
    handlers: Vec<Box<dyn ActionHandler>>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl HandlerRegistry {
    /// A registry holding only the composite handler.
    pub fn new() -> Self {
        Self {
            composite: CompositeHandler,
            handlers: Vec::new(),
        }
    }

    pub fn register(&mut self, handler: Box<dyn ActionHandler>) {
        let kind = handler.kind();
        if kind == KIND_COMPOSITE {
            tracing::warn!("ignoring handler for reserved kind '{KIND_COMPOSITE}'");
            return;
        }
        if self.contains(kind) {
            tracing::warn!(kind, "handler already registered; first registration wins");
        }
        self.handlers.push(handler);
    }

    pub fn contains(&self, kind: &str) -> bool {
        kind == KIND_COMPOSITE || self.lookup(kind).is_some()
    }

    /// Registered kinds in lookup order, composite first.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds = vec![KIND_COMPOSITE];
        for h in &self.handlers {
            let kind = h.kind();
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    fn lookup(&self, kind: &str) -> Option<&dyn ActionHandler> {
        self.handlers
            .iter()
            .find(|h| h.kind() == kind)
            .map(|h| h.as_ref())
    }

    /// Apply one top-level entry. Inactive entries pass `acc` through.
    pub fn apply(&self, acc: Accumulator, entry: &ActionEntry) -> Accumulator {
        if !entry.is_active() {
            return acc;
        }
        match entry {
            ActionEntry::Composite(c) => self.composite.handle(acc, &c.group, self),
            ActionEntry::Action(action) => self.apply_action(acc, action),
        }
    }

    /// Apply one leaf action, skipping it with a diagnostic when no handler
    /// answers for its kind.
    pub fn apply_action(&self, acc: Accumulator, action: &Action) -> Accumulator {
        if !action.active {
            return acc;
        }
        if action.kind == KIND_COMPOSITE {
            tracing::warn!(id = %action.id, "leaf action uses reserved kind '{KIND_COMPOSITE}'; skipped");
            return acc;
        }
        match self.lookup(&action.kind) {
            Some(handler) => handler.handle(acc, action),
            None => {
                tracing::warn!(
                    id = %action.id,
                    kind = %action.kind,
                    known = ?self.kinds(),
                    "no handler found for action; skipped"
                );
                acc
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
