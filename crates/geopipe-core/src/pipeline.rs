//! The ordered action list and its edit operations.
//!
//! Every edit that reaches the list notifies the registered listeners with
//! the full new list. Rejected edits (`group_actions`, `ungroup_action`
//! returning `Err`) leave the list untouched and notify nobody.

use crate::action::{Action, ActionEntry, ActionId, CompositeAction};
use crate::error::{PipelineError, Result};

pub type ActionsListener = Box<dyn FnMut(&[ActionEntry])>;

pub struct Pipeline {
    actions: Vec<ActionEntry>,
    last_id: u64,
    listeners: Vec<ActionsListener>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("actions", &self.actions)
            .field("last_id", &self.last_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            last_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn actions(&self) -> &[ActionEntry] {
        &self.actions
    }

    pub fn on_actions_changed(&mut self, listener: impl FnMut(&[ActionEntry]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self) {
        for listener in self.listeners.iter_mut() {
            listener(&self.actions);
        }
    }

    fn next_id(&mut self) -> ActionId {
        self.last_id += 1;
        ActionId(self.last_id)
    }

    fn position(&self, id: ActionId) -> Option<usize> {
        self.actions.iter().position(|a| a.id() == id)
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    /// Look up an action at the top level or inside a group.
    pub fn find(&self, id: ActionId) -> Option<ActionRef<'_>> {
        for entry in &self.actions {
            if entry.id() == id {
                return Some(ActionRef::TopLevel(entry));
            }
            if let Some(group) = entry.as_composite() {
                if let Some(item) = group.item(id) {
                    return Some(ActionRef::Member { group, item });
                }
            }
        }
        None
    }

    /// True when `ids` name top-level actions occupying consecutive slots.
    pub fn is_contiguous(&self, ids: &[ActionId]) -> bool {
        self.contiguous_range(ids).is_ok()
    }

    fn contiguous_range(&self, ids: &[ActionId]) -> Result<(usize, usize)> {
        if ids.is_empty() {
            return Err(PipelineError::EmptySelection);
        }
        let mut positions = Vec::with_capacity(ids.len());
        for &id in ids {
            let pos = self.position(id).ok_or(PipelineError::ActionNotFound(id))?;
            positions.push(pos);
        }
        positions.sort_unstable();
        positions.dedup();
        if positions.len() != ids.len() {
            return Err(PipelineError::NonContiguousSelection(ids.to_vec()));
        }
        let first = positions[0];
        let last = positions[positions.len() - 1];
        if last - first + 1 != positions.len() {
            return Err(PipelineError::NonContiguousSelection(ids.to_vec()));
        }
        Ok((first, last + 1))
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    /// Append an action, assigning it a fresh id. Any id already on `entry`
    /// is overwritten; a group's items are renumbered too.
    pub fn add_action(&mut self, entry: impl Into<ActionEntry>) -> ActionId {
        let mut entry = entry.into();
        let id = self.next_id();
        entry.set_id(id);
        if let ActionEntry::Composite(c) = &mut entry {
            for item in c.group.items.iter_mut() {
                self.last_id += 1;
                item.id = ActionId(self.last_id);
            }
        }
        self.actions.push(entry);
        self.notify();
        id
    }

    /// Remove an action from the top level or, failing that, from the first
    /// group that holds it. Removing an unknown id is a no-op.
    pub fn remove_action(&mut self, id: ActionId) -> Option<ActionEntry> {
        let removed = match self.position(id) {
            Some(pos) => Some(self.actions.remove(pos)),
            None => self.remove_member(id).map(ActionEntry::from),
        };
        if removed.is_none() {
            tracing::debug!(%id, "remove: action not in pipeline");
        }
        self.notify();
        removed
    }

    fn remove_member(&mut self, id: ActionId) -> Option<Action> {
        self.actions.iter_mut().find_map(|entry| match entry {
            ActionEntry::Composite(c) => {
                let pos = c.group.items.iter().position(|a| a.id == id)?;
                Some(c.group.items.remove(pos))
            }
            ActionEntry::Action(_) => None,
        })
    }

    /// Flip the active flag of an action at any depth. Returns false when
    /// the id is unknown.
    pub fn toggle_action_active(&mut self, id: ActionId) -> bool {
        let found = self.actions.iter_mut().any(|entry| entry.toggle_nested(id));
        if !found {
            tracing::warn!(%id, "toggle: action not in pipeline");
        }
        self.notify();
        found
    }

    /// Replace the contiguous top-level run `ids` with a new group named
    /// `name`, placed where the run started. Members keep their ids and
    /// their list order regardless of the order of `ids`.
    pub fn group_actions(&mut self, ids: &[ActionId], name: &str) -> Result<ActionId> {
        let (start, end) = self.contiguous_range(ids).inspect_err(|e| {
            tracing::warn!(error = %e, "group rejected");
        })?;
        if let Some(nested) = self.actions[start..end].iter().find(|a| a.is_composite()) {
            let err = PipelineError::NestedComposite(nested.id());
            tracing::warn!(error = %err, "group rejected");
            return Err(err);
        }

        let items: Vec<Action> = self
            .actions
            .drain(start..end)
            .filter_map(|entry| match entry {
                ActionEntry::Action(a) => Some(a),
                ActionEntry::Composite(_) => None,
            })
            .collect();
        let mut group = CompositeAction::new(name, items);
        let id = self.next_id();
        group.id = id;
        self.actions.insert(start, ActionEntry::from(group));
        self.notify();
        Ok(id)
    }

    /// Dissolve a top-level group, splicing its items back where it stood.
    /// Returns the ids of the released items in order.
    pub fn ungroup_action(&mut self, id: ActionId) -> Result<Vec<ActionId>> {
        let Some(pos) = self.position(id) else {
            let err = match self.find(id) {
                Some(ActionRef::Member { .. }) => PipelineError::InvalidUngroupTarget(id),
                _ => PipelineError::ActionNotFound(id),
            };
            tracing::warn!(error = %err, "ungroup rejected");
            return Err(err);
        };
        let Some(group) = self.actions[pos].as_composite() else {
            let err = PipelineError::InvalidUngroupTarget(id);
            tracing::warn!(error = %err, "ungroup rejected");
            return Err(err);
        };

        let items = group.items.clone();
        let released: Vec<ActionId> = items.iter().map(|a| a.id).collect();
        self.actions
            .splice(pos..=pos, items.into_iter().map(ActionEntry::from));
        self.notify();
        Ok(released)
    }
}

// ---------------------------------------------------------------------------
// ActionRef
// ---------------------------------------------------------------------------

/// Where [`Pipeline::find`] located an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionRef<'a> {
    TopLevel(&'a ActionEntry),
    Member {
        group: &'a CompositeAction,
        item: &'a Action,
    },
}

impl ActionRef<'_> {
    pub fn id(&self) -> ActionId {
        match self {
            ActionRef::TopLevel(entry) => entry.id(),
            ActionRef::Member { item, .. } => item.id,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            ActionRef::TopLevel(entry) => entry.is_active(),
            ActionRef::Member { item, .. } => item.active,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn action(kind: &str) -> Action {
        Action::new(kind, kind, json!({ "distance": 0.1 }))
    }

    fn ids(pipeline: &Pipeline) -> Vec<u64> {
        pipeline.actions().iter().map(|a| a.id().0).collect()
    }

    fn three() -> Pipeline {
        let mut p = Pipeline::new();
        p.add_action(action("move-north"));
        p.add_action(action("move-east"));
        p.add_action(action("scale"));
        p
    }

    #[test]
    fn add_assigns_increasing_ids_and_ignores_caller_id() {
        let mut p = Pipeline::new();
        let mut a = action("move-north");
        a.id = ActionId(42);
        assert_eq!(p.add_action(a), ActionId(1));
        assert_eq!(p.add_action(action("scale")), ActionId(2));
        assert_eq!(ids(&p), vec![1, 2]);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut p = three();
        p.remove_action(ActionId(3));
        assert_eq!(p.add_action(action("scale")), ActionId(4));
    }

    #[test]
    fn adding_a_group_renumbers_items() {
        let mut p = Pipeline::new();
        let group = CompositeAction::new("g", vec![action("a"), action("b")]);
        let id = p.add_action(group);
        assert_eq!(id, ActionId(1));
        let items: Vec<u64> = p.actions()[0]
            .as_composite()
            .unwrap()
            .items
            .iter()
            .map(|a| a.id.0)
            .collect();
        assert_eq!(items, vec![2, 3]);
        assert_eq!(p.add_action(action("c")), ActionId(4));
    }

    #[test]
    fn remove_is_by_identity_not_value() {
        let mut p = Pipeline::new();
        p.add_action(action("move-north"));
        p.add_action(action("move-north"));
        let removed = p.remove_action(ActionId(2)).unwrap();
        assert_eq!(removed.id(), ActionId(2));
        assert_eq!(ids(&p), vec![1]);
    }

    #[test]
    fn remove_reaches_into_groups() {
        let mut p = three();
        let g = p.group_actions(&[ActionId(1), ActionId(2)], "g").unwrap();
        let removed = p.remove_action(ActionId(2)).unwrap();
        assert_eq!(removed.id(), ActionId(2));

        let group = p.find(g).unwrap();
        let ActionRef::TopLevel(entry) = group else {
            panic!("group should be top level");
        };
        let items: Vec<ActionId> = entry
            .as_composite()
            .unwrap()
            .items
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(items, vec![ActionId(1)]);
        assert!(p.find(ActionId(2)).is_none());
    }

    #[test]
    fn remove_unknown_is_a_noop() {
        let mut p = three();
        assert!(p.remove_action(ActionId(99)).is_none());
        assert_eq!(ids(&p), vec![1, 2, 3]);
    }

    #[test]
    fn toggle_flips_in_place() {
        let mut p = three();
        assert!(p.toggle_action_active(ActionId(2)));
        assert!(!p.actions()[1].is_active());
        assert_eq!(ids(&p), vec![1, 2, 3]);
        assert!(p.toggle_action_active(ActionId(2)));
        assert!(p.actions()[1].is_active());
        assert!(!p.toggle_action_active(ActionId(77)));
    }

    #[test]
    fn toggle_reaches_group_members() {
        let mut p = three();
        p.group_actions(&[ActionId(1), ActionId(2)], "g").unwrap();
        assert!(p.toggle_action_active(ActionId(1)));
        assert!(!p.find(ActionId(1)).unwrap().is_active());
        assert!(p.find(ActionId(4)).unwrap().is_active());
    }

    #[test]
    fn group_inserts_at_first_position_in_list_order() {
        let mut p = three();
        let g = p.group_actions(&[ActionId(3), ActionId(2)], "Compound A").unwrap();
        assert_eq!(g, ActionId(4));
        assert_eq!(ids(&p), vec![1, 4]);

        let group = p.actions()[1].as_composite().unwrap();
        assert_eq!(group.label, "Compound A");
        assert!(group.active);
        let items: Vec<u64> = group.items.iter().map(|a| a.id.0).collect();
        assert_eq!(items, vec![2, 3]);
    }

    #[test]
    fn group_rejects_gaps_without_mutating() {
        let mut p = three();
        let err = p.group_actions(&[ActionId(1), ActionId(3)], "g").unwrap_err();
        assert!(matches!(err, PipelineError::NonContiguousSelection(_)));
        assert_eq!(ids(&p), vec![1, 2, 3]);
        assert!(!p.is_contiguous(&[ActionId(1), ActionId(3)]));
        assert!(p.is_contiguous(&[ActionId(2), ActionId(1)]));
    }

    #[test]
    fn group_rejects_empty_unknown_and_duplicate_selections() {
        let mut p = three();
        assert!(matches!(
            p.group_actions(&[], "g"),
            Err(PipelineError::EmptySelection)
        ));
        assert!(matches!(
            p.group_actions(&[ActionId(1), ActionId(9)], "g"),
            Err(PipelineError::ActionNotFound(ActionId(9)))
        ));
        assert!(matches!(
            p.group_actions(&[ActionId(1), ActionId(1)], "g"),
            Err(PipelineError::NonContiguousSelection(_))
        ));
        assert_eq!(ids(&p), vec![1, 2, 3]);
    }

    #[test]
    fn group_rejects_nested_groups() {
        let mut p = three();
        let g = p.group_actions(&[ActionId(1), ActionId(2)], "inner").unwrap();
        let err = p.group_actions(&[g, ActionId(3)], "outer").unwrap_err();
        assert!(matches!(err, PipelineError::NestedComposite(id) if id == g));
        assert_eq!(ids(&p), vec![4, 3]);
    }

    #[test]
    fn ungroup_restores_order_and_ids() {
        let mut p = three();
        let g = p.group_actions(&[ActionId(1), ActionId(2)], "Compound A").unwrap();
        assert_eq!(ids(&p), vec![4, 3]);
        let released = p.ungroup_action(g).unwrap();
        assert_eq!(released, vec![ActionId(1), ActionId(2)]);
        assert_eq!(ids(&p), vec![1, 2, 3]);
        assert!(p.find(g).is_none());
        assert_eq!(p.add_action(action("x")), ActionId(5));
    }

    #[test]
    fn ungroup_rejects_leaf_actions() {
        let mut p = three();
        assert!(matches!(
            p.ungroup_action(ActionId(2)),
            Err(PipelineError::InvalidUngroupTarget(ActionId(2)))
        ));
        p.group_actions(&[ActionId(1), ActionId(2)], "g").unwrap();
        assert!(matches!(
            p.ungroup_action(ActionId(1)),
            Err(PipelineError::InvalidUngroupTarget(ActionId(1)))
        ));
        assert!(matches!(
            p.ungroup_action(ActionId(50)),
            Err(PipelineError::ActionNotFound(ActionId(50)))
        ));
    }

    #[test]
    fn listeners_see_every_successful_edit() {
        let seen: Rc<RefCell<Vec<Vec<u64>>>> = Rc::default();
        let mut p = Pipeline::new();
        let sink = Rc::clone(&seen);
        p.on_actions_changed(move |actions| {
            sink.borrow_mut()
                .push(actions.iter().map(|a| a.id().0).collect());
        });

        p.add_action(action("a"));
        p.add_action(action("b"));
        p.toggle_action_active(ActionId(1));
        let g = p.group_actions(&[ActionId(1), ActionId(2)], "g").unwrap();
        p.ungroup_action(ActionId(1)).unwrap_err();
        p.ungroup_action(g).unwrap();
        p.remove_action(ActionId(2));

        let seen = seen.borrow();
        assert_eq!(
            *seen,
            vec![vec![1], vec![1, 2], vec![1, 2], vec![3], vec![1, 2], vec![1]]
        );
    }
}
