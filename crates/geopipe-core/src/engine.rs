//! The editing-session engine: an action [`Pipeline`] plus the state derived
//! from it.
//!
//! Every list mutation that goes through the engine is followed by a full
//! re-fold of the active actions over the initial state, after which the
//! state listeners see the new `(state, outcomes)` pair.

use crate::action::{ActionEntry, ActionId};
use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::features::FeatureCollection;
use crate::handlers;
use crate::outcome::OutcomeMap;
use crate::pipeline::{ActionRef, Pipeline};
use crate::reducer;
use crate::registry::{ActionHandler, HandlerRegistry};

pub type StateListener = Box<dyn FnMut(&FeatureCollection, &OutcomeMap)>;

pub struct Engine {
    pipeline: Pipeline,
    registry: HandlerRegistry,
    initial_state: Option<FeatureCollection>,
    current_state: Option<FeatureCollection>,
    outcomes: OutcomeMap,
    state_listeners: Vec<StateListener>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("pipeline", &self.pipeline)
            .field("registry", &self.registry)
            .field("dataset", &self.dataset_name())
            .field("outcomes", &self.outcomes.len())
            .field("state_listeners", &self.state_listeners.len())
            .finish()
    }
}

impl Engine {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            pipeline: Pipeline::new(),
            registry,
            initial_state: None,
            current_state: None,
            outcomes: OutcomeMap::new(),
            state_listeners: Vec::new(),
        }
    }

    /// Engine with every built-in handler registered.
    pub fn with_builtins(config: &Config) -> Self {
        let mut registry = HandlerRegistry::new();
        handlers::register_builtins(&mut registry, config);
        Self::new(registry)
    }

    /// Builder form of [`Engine::set_initial_state`]. Actions already in the
    /// list are folded over `state` before the engine is returned.
    pub fn with_initial_state(mut self, state: FeatureCollection) -> Result<Self> {
        self.set_initial_state(state)?;
        Ok(self)
    }

    /// Load the dataset the actions are folded over. It can be set once.
    pub fn set_initial_state(&mut self, state: FeatureCollection) -> Result<()> {
        if self.initial_state.is_some() {
            return Err(PipelineError::InitialStateAlreadySet);
        }
        tracing::info!(
            dataset = state.name.as_deref().unwrap_or("unknown"),
            features = state.features.len(),
            "initial state loaded"
        );
        self.initial_state = Some(state);
        self.recompute()
    }

    pub fn register_handler(&mut self, handler: Box<dyn ActionHandler>) {
        self.registry.register(handler);
    }

    pub fn on_actions_changed(&mut self, listener: impl FnMut(&[ActionEntry]) + 'static) {
        self.pipeline.on_actions_changed(listener);
    }

    pub fn on_state_changed(
        &mut self,
        listener: impl FnMut(&FeatureCollection, &OutcomeMap) + 'static,
    ) {
        self.state_listeners.push(Box::new(listener));
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    pub fn actions(&self) -> &[ActionEntry] {
        self.pipeline.actions()
    }

    pub fn find(&self, id: ActionId) -> Option<ActionRef<'_>> {
        self.pipeline.find(id)
    }

    pub fn is_contiguous(&self, ids: &[ActionId]) -> bool {
        self.pipeline.is_contiguous(ids)
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn initial_state(&self) -> Option<&FeatureCollection> {
        self.initial_state.as_ref()
    }

    pub fn current_state(&self) -> Option<&FeatureCollection> {
        self.current_state.as_ref()
    }

    pub fn outcomes(&self) -> &OutcomeMap {
        &self.outcomes
    }

    /// `"pending"` until a dataset is loaded, then its name or `"unknown"`.
    pub fn dataset_name(&self) -> &str {
        match &self.initial_state {
            None => "pending",
            Some(state) => state.name.as_deref().unwrap_or("unknown"),
        }
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    pub fn add_action(&mut self, entry: impl Into<ActionEntry>) -> ActionId {
        let id = self.pipeline.add_action(entry);
        self.refold();
        id
    }

    pub fn remove_action(&mut self, id: ActionId) -> Option<ActionEntry> {
        let removed = self.pipeline.remove_action(id);
        self.refold();
        removed
    }

    pub fn toggle_action_active(&mut self, id: ActionId) -> bool {
        let found = self.pipeline.toggle_action_active(id);
        self.refold();
        found
    }

    pub fn group_actions(&mut self, ids: &[ActionId], name: &str) -> Result<ActionId> {
        let id = self.pipeline.group_actions(ids, name)?;
        self.refold();
        Ok(id)
    }

    pub fn ungroup_action(&mut self, id: ActionId) -> Result<Vec<ActionId>> {
        let released = self.pipeline.ungroup_action(id)?;
        self.refold();
        Ok(released)
    }

    // ---------------------------------------------------------------------------
    // Folding
    // ---------------------------------------------------------------------------

    /// Re-derive the current state and outcomes from scratch and notify the
    /// state listeners. Without an initial state nothing changes.
    pub fn recompute(&mut self) -> Result<()> {
        let Some(initial) = &self.initial_state else {
            tracing::error!("cannot fold actions: no initial state set");
            return Err(PipelineError::MissingInitialState);
        };
        let acc = reducer::fold(&self.registry, initial, self.pipeline.actions());
        tracing::debug!(
            actions = self.pipeline.actions().len(),
            outcomes = acc.outcomes.len(),
            "recomputed state"
        );
        self.outcomes = acc.outcomes;
        let state = &*self.current_state.insert(acc.state);
        for listener in self.state_listeners.iter_mut() {
            listener(state, &self.outcomes);
        }
        Ok(())
    }

    /// Mutations never fail on a missing dataset; `recompute` has logged it.
    fn refold(&mut self) {
        let _ = self.recompute();
    }
}
