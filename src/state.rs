use std::hash::Hash;
use std::mem;

use ratatui::widgets::TableState;
use rustc_hash::FxHashSet;

use crate::action::{TreeAction, TreeChange, TreeEvent};
use crate::auto_expand::AutoExpand;
use crate::config::TreeViewConfig;
use crate::error::{TreeError, TreeResult};
use crate::expansion::ExpandedSet;
use crate::focus_trap::FocusTrap;
use crate::model::{TreeFilter, TreeFilterConfig, TreeModel};
use crate::style::TreeScrollPolicy;
use crate::traversal::Traversal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "keymap")]
use crate::keymap::TreeKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

/// Tree view state: expansion, focus, activation and the cached traversal.
///
/// `Id` is the model's node handle and `K` its expansion key. Every
/// observable transition is queued as a [`TreeChange`]; drain the queue with
/// [`take_changes`](Self::take_changes) after handling input.
pub struct TreeViewState<Id, K> {
    table_state: TableState,
    expanded: ExpandedSet<K>,
    auto_expand: AutoExpand,
    // Keys already auto-expanded once; a later collapse must stick.
    auto_expanded: FxHashSet<K>,
    traversal: Traversal<Id>,
    // Marks whether the traversal must be rebuilt.
    dirty: bool,
    focused: Option<Id>,
    active: Option<Id>,
    // Whether the tree itself (not a control inside the active row) holds
    // keyboard focus.
    has_focus: bool,
    trap: Option<FocusTrap>,
    // Set when focus moved and the viewport should follow it.
    scroll_to_focus: bool,
    prevent_blur: bool,
    draw_lines: bool,
    changes: Vec<TreeChange<Id, K>>,
    #[cfg(feature = "keymap")]
    keymap: TreeKeyBindings,
}

/// Snapshot of state (expansion, focus, activation, scroll).
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeViewSnapshot<Id, K> {
    /// Keys of expanded nodes.
    pub expanded: Vec<K>,
    /// Focused node.
    pub focused: Option<Id>,
    /// Active node.
    pub active: Option<Id>,
    /// Scroll offset within the traversal.
    pub offset: usize,
    /// Whether guide lines were enabled.
    pub draw_lines: bool,
}

impl<Id: Copy + Eq + Hash, K: Clone + Eq + Hash> Default for TreeViewState<Id, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Copy + Eq + Hash, K: Clone + Eq + Hash> TreeViewState<Id, K> {
    /// Creates a state with nothing expanded, focused or active.
    pub fn new() -> Self {
        Self {
            table_state: TableState::default(),
            expanded: ExpandedSet::new(),
            auto_expand: AutoExpand::disabled(),
            auto_expanded: FxHashSet::default(),
            traversal: Traversal::new(),
            dirty: true,
            focused: None,
            active: None,
            has_focus: true,
            trap: None,
            scroll_to_focus: false,
            prevent_blur: false,
            draw_lines: true,
            changes: Vec::new(),
            #[cfg(feature = "keymap")]
            keymap: TreeKeyBindings::new(),
        }
    }

    /// Creates a state with an initial expansion set supplied by the caller.
    pub fn with_expanded(expanded: ExpandedSet<K>) -> Self {
        let mut state = Self::new();
        state.expanded = expanded;
        state
    }

    /// Creates a state configured from `config`.
    pub fn with_config(config: &TreeViewConfig) -> Self {
        let mut state = Self::new();
        state.auto_expand = config.auto_expand;
        state.prevent_blur = config.prevent_blur;
        state.draw_lines = config.draw_lines;
        #[cfg(feature = "keymap")]
        state.keymap.set_profile(config.keymap);
        state
    }

    #[cfg(feature = "keymap")]
    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut TreeKeyBindings {
        &mut self.keymap
    }

    pub(crate) const fn table_state(&self) -> &TableState {
        &self.table_state
    }

    pub(crate) const fn table_state_mut(&mut self) -> &mut TableState {
        &mut self.table_state
    }

    /// The cached traversal (rebuilt by `ensure_traversal*`).
    pub const fn traversal(&self) -> &Traversal<Id> {
        &self.traversal
    }

    /// Number of visible rows in the cached traversal.
    pub fn visible_len(&self) -> usize {
        self.traversal.len()
    }

    /// The current expansion set.
    pub const fn expanded(&self) -> &ExpandedSet<K> {
        &self.expanded
    }

    /// Replaces the expansion set with one persisted by the caller.
    ///
    /// No change is reported for it.
    pub fn set_expanded_set(&mut self, expanded: ExpandedSet<K>) {
        self.expanded = expanded;
        self.dirty = true;
    }

    /// Returns `true` if the node's key is in the expansion set.
    pub fn is_expanded<T>(&self, model: &T, id: Id) -> bool
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        self.expanded.contains(&model.key(id))
    }

    /// The focused node, if any.
    pub const fn focused(&self) -> Option<Id> {
        self.focused
    }

    /// The active node, if any.
    pub const fn active(&self) -> Option<Id> {
        self.active
    }

    /// Whether the tree holds keyboard focus (as opposed to a control inside
    /// the active row, or something outside the tree).
    pub const fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// The focus trap of the active row, if it has focusable controls.
    pub const fn focus_trap(&self) -> Option<FocusTrap> {
        self.trap
    }

    /// Replaces the focused node with one persisted by the caller.
    ///
    /// No change is reported for it.
    pub fn set_focused(&mut self, focused: Option<Id>) {
        self.focused = focused;
    }

    /// Sets the automatic expansion applied to newly seen items.
    pub fn set_auto_expand(&mut self, auto_expand: AutoExpand) {
        self.auto_expand = auto_expand;
        self.dirty = true;
    }

    /// Keeps focus when the tree loses keyboard focus.
    pub const fn set_prevent_blur(&mut self, prevent_blur: bool) {
        self.prevent_blur = prevent_blur;
    }

    /// Returns whether guide lines are drawn.
    #[inline]
    pub const fn draw_lines(&self) -> bool {
        self.draw_lines
    }

    /// Enables or disables drawing of guide lines.
    pub const fn set_draw_lines(&mut self, draw: bool) {
        self.draw_lines = draw;
    }

    /// Marks the traversal as stale (call after the model changed).
    pub const fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Drains the changes produced since the last call, oldest first.
    pub fn take_changes(&mut self) -> Vec<TreeChange<Id, K>> {
        mem::take(&mut self.changes)
    }

    /// Captures a snapshot of the current state for persistence or restore.
    pub fn snapshot(&self) -> TreeViewSnapshot<Id, K> {
        TreeViewSnapshot {
            expanded: self.expanded.iter().cloned().collect(),
            focused: self.focused,
            active: self.active,
            offset: self.table_state.offset(),
            draw_lines: self.draw_lines,
        }
    }

    /// Restores state from a previously captured snapshot.
    ///
    /// Activation is not restored: without the model the row's controls are
    /// unknown. Use [`try_restore`](Self::try_restore) to keep it.
    pub fn restore(&mut self, snapshot: TreeViewSnapshot<Id, K>) {
        self.expanded = snapshot.expanded.into_iter().collect();
        self.focused = snapshot.focused;
        self.active = None;
        self.trap = None;
        self.has_focus = true;
        self.draw_lines = snapshot.draw_lines;
        *self.table_state.offset_mut() = snapshot.offset;
        self.scroll_to_focus = false;
        self.dirty = true;
    }

    /// Restores a snapshot after checking that its items exist in `model`.
    pub fn try_restore<T>(&mut self, model: &T, snapshot: TreeViewSnapshot<Id, K>) -> TreeResult<()>
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        if snapshot.focused.is_some_and(|id| !model.contains(id)) {
            return Err(TreeError::UnknownItem { field: "focused" });
        }
        if snapshot.active.is_some_and(|id| !model.contains(id)) {
            return Err(TreeError::UnknownItem { field: "active" });
        }
        let active = snapshot.active;
        self.restore(snapshot);
        if let Some(active) = active {
            self.active = Some(active);
            self.trap = FocusTrap::new(model.focusable_elements(active));
            self.has_focus = self.trap.is_none();
        }
        Ok(())
    }

    /// Applies auto-expansion and rebuilds the traversal if it is stale.
    pub fn ensure_traversal<T>(&mut self, model: &T)
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        if !self.dirty {
            return;
        }
        self.apply_auto_expand(model);
        self.traversal
            .build(model, |id| self.expanded.contains(&model.key(id)), None);
        self.dirty = false;
    }

    /// Same as [`ensure_traversal`](Self::ensure_traversal) with an active filter.
    pub fn ensure_traversal_filtered<T, F>(&mut self, model: &T, filter: &F, config: TreeFilterConfig)
    where
        T: TreeModel<Id = Id, Key = K>,
        F: TreeFilter<T>,
    {
        if !self.dirty {
            return;
        }
        self.apply_auto_expand(model);
        self.traversal.build_filtered(model, filter, config, |id| {
            self.expanded.contains(&model.key(id))
        });
        self.dirty = false;
    }

    /// Row index of the focused node in the cached traversal.
    pub fn focused_index<T>(&self, model: &T) -> Option<usize>
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        self.focused
            .and_then(|focused| self.traversal.position_of(model, focused))
    }

    /// Node shown on `row` of the viewport (0 is the first row below the header).
    pub fn item_at_row(&self, row: usize) -> Option<Id> {
        self.traversal
            .get(self.table_state.offset() + row)
            .map(|entry| entry.id)
    }

    /// Expands or collapses a node and reports the updated set.
    ///
    /// Returns `false` when the node was already in the requested state.
    pub fn set_expanded<T>(&mut self, model: &T, id: Id, expand: bool) -> bool
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        let key = model.key(id);
        if self.expanded.contains(&key) == expand {
            return false;
        }
        let expanded = mem::take(&mut self.expanded);
        self.expanded = if expand {
            expanded.with(key)
        } else {
            expanded.without(&key)
        };
        self.dirty = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "tree.expand", expand, expanded = self.expanded.len());

        let expanded = self.expanded.clone();
        self.changes.push(if expand {
            TreeChange::Expanded { id, expanded }
        } else {
            TreeChange::Collapsed { id, expanded }
        });
        true
    }

    /// Toggles expansion of a node.
    pub fn toggle<T>(&mut self, model: &T, id: Id)
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        let expand = !self.is_expanded(model, id);
        self.set_expanded(model, id, expand);
    }

    /// Expands every listed node and focuses the first one.
    ///
    /// Used to reveal an item: pass the chain of its ancestors.
    pub fn expand_list_items<T>(&mut self, model: &T, items: &[Id])
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        let Some(&first) = items.first() else {
            return;
        };
        let keys = items.iter().map(|&id| model.key(id));
        let expanded = mem::take(&mut self.expanded).extend(keys);
        self.replace_expanded(expanded);
        self.focus_item(Some(first), true);
    }

    /// Focuses `chain[0]` if it is visible, otherwise its nearest visible
    /// stand-in.
    ///
    /// `chain` lists the target first and then its ancestors up to a root.
    /// When an ancestor is collapsed, the outermost collapsed ancestor (the
    /// first one seen from the root side, sentinels skipped) is the row the
    /// user can actually see, so it receives focus instead.
    pub fn highlight_items<T>(&mut self, model: &T, chain: &[Id])
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        let Some((&target, ancestors)) = chain.split_first() else {
            return;
        };
        let hidden_by = ancestors
            .iter()
            .rev()
            .copied()
            .find(|&ancestor| !model.is_sentinel(ancestor) && !self.is_expanded(model, ancestor));
        self.focus_item(Some(hidden_by.unwrap_or(target)), true);
    }

    /// Focuses a node (or clears focus) and scrolls it into view.
    pub fn focus(&mut self, id: Option<Id>) {
        self.focus_item(id, true);
    }

    /// Activates a node; its focusable controls (if any) take keyboard focus.
    pub fn activate<T>(&mut self, model: &T, id: Id) -> bool
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        if self.active.is_some_and(|active| model.same_item(active, id)) {
            return false;
        }
        self.active = Some(id);
        self.trap = FocusTrap::new(model.focusable_elements(id));
        self.has_focus = self.trap.is_none();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "tree.activate",
            controls = self.trap.map_or(0, |trap| trap.count())
        );

        self.changes.push(TreeChange::Activated(Some(id)));
        true
    }

    /// Clears activation and returns keyboard focus to the tree.
    pub fn deactivate(&mut self) -> bool {
        let had_inner_focus = !self.has_focus;
        self.has_focus = true;
        self.trap = None;
        if self.active.take().is_none() {
            return had_inner_focus;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "tree.deactivate");

        self.changes.push(TreeChange::Activated(None));
        true
    }

    /// Handles a click on a row: focus it without scrolling and toggle it.
    pub fn handle_click<T>(&mut self, model: &T, id: Id) -> TreeEvent
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        self.focus_item(Some(id), false);
        if model.is_expandable(id) {
            self.toggle(model, id);
        }
        self.has_focus = true;
        TreeEvent::Handled
    }

    /// Handles keyboard focus entering the tree.
    ///
    /// When it comes from outside and nothing is focused yet, the first row
    /// receives focus.
    pub fn handle_focus_in<T>(&mut self, model: &T, from_outside: bool)
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        self.has_focus = true;
        if self.focused.is_some() || !from_outside {
            return;
        }
        self.ensure_traversal(model);
        if let Some(first) = self.traversal.first().map(|entry| entry.id) {
            self.focus_item(Some(first), true);
        }
    }

    /// Handles keyboard focus leaving the tree.
    ///
    /// `target_inside` tells whether focus moved to a control within the
    /// tree (e.g. inside the active row).
    pub fn handle_blur(&mut self, target_inside: bool) {
        if self.active.is_some() {
            if !target_inside {
                self.deactivate();
            }
        } else if !self.prevent_blur {
            self.focus_item(None, false);
        }
        self.has_focus = false;
    }

    /// Expands all nodes in the model.
    pub fn expand_all<T>(&mut self, model: &T)
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        let keys = expandable_keys(model, model.roots());
        self.replace_expanded(keys.into_iter().collect());
    }

    /// Collapses all nodes.
    pub fn collapse_all(&mut self) {
        self.replace_expanded(ExpandedSet::new());
    }

    /// Expands or collapses a node together with its whole subtree.
    pub fn set_expanded_recursive<T>(&mut self, model: &T, id: Id, expand: bool)
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        let keys = expandable_keys(model, &[id]);
        let expanded = mem::take(&mut self.expanded);
        let expanded = if expand {
            expanded.extend(keys)
        } else {
            let removed: FxHashSet<K> = keys.into_iter().collect();
            expanded.retain(|key| !removed.contains(key))
        };
        self.replace_expanded(expanded);
    }

    /// Scrolls the view down by the given number of rows.
    pub fn scroll_down_by(&mut self, amount: u16) {
        let max_offset = self.traversal.len().saturating_sub(1);
        let offset = self
            .table_state
            .offset()
            .saturating_add(amount as usize)
            .min(max_offset);
        *self.table_state.offset_mut() = offset;
    }

    /// Scrolls the view up by the given number of rows.
    pub fn scroll_up_by(&mut self, amount: u16) {
        let offset = self.table_state.offset().saturating_sub(amount as usize);
        *self.table_state.offset_mut() = offset;
    }

    /// Handles a tree action and returns the resulting event.
    pub fn handle_action<T, C>(&mut self, model: &T, action: TreeAction<C>) -> TreeEvent<C>
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        self.ensure_traversal(model);
        self.handle_action_inner(model, action)
    }

    /// Handles a tree action with filtering enabled and returns the resulting event.
    pub fn handle_action_filtered<T, F, C>(
        &mut self,
        model: &T,
        filter: &F,
        config: TreeFilterConfig,
        action: TreeAction<C>,
    ) -> TreeEvent<C>
    where
        T: TreeModel<Id = Id, Key = K>,
        F: TreeFilter<T>,
    {
        self.ensure_traversal_filtered(model, filter, config);
        self.handle_action_inner(model, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event into an action and handles it.
    pub fn handle_key<T>(&mut self, model: &T, key: KeyEvent) -> TreeEvent<()>
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        self.ensure_traversal(model);
        let Some(action) = self.keymap.resolve(key) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action_inner(model, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with a custom mapping and handles it.
    pub fn handle_key_with<T, C, R>(&mut self, model: &T, key: KeyEvent, custom: R) -> TreeEvent<C>
    where
        T: TreeModel<Id = Id, Key = K>,
        R: Fn(KeyEvent) -> Option<C>,
    {
        self.ensure_traversal(model);
        let Some(action) = self.keymap.resolve_with(key, custom) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action_inner(model, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with filtering enabled and handles it.
    pub fn handle_key_filtered<T, F>(
        &mut self,
        model: &T,
        filter: &F,
        config: TreeFilterConfig,
        key: KeyEvent,
    ) -> TreeEvent<()>
    where
        T: TreeModel<Id = Id, Key = K>,
        F: TreeFilter<T>,
    {
        self.ensure_traversal_filtered(model, filter, config);
        let Some(action) = self.keymap.resolve(key) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action_inner(model, action)
    }

    /// Selects the focused row in the table and scrolls per `policy`.
    pub(crate) fn prepare_viewport<T>(
        &mut self,
        model: &T,
        viewport_height: usize,
        policy: TreeScrollPolicy,
    ) where
        T: TreeModel<Id = Id, Key = K>,
    {
        let selected = self.focused_index(model);
        self.table_state.select(selected);
        let scroll_to_focus = mem::take(&mut self.scroll_to_focus);

        let total = self.traversal.len();
        let max_offset = total.saturating_sub(1);
        if self.table_state.offset() > max_offset {
            *self.table_state.offset_mut() = max_offset;
        }
        let Some(selected) = selected else {
            return;
        };

        let viewport_height = viewport_height.max(1);
        let offset = self.table_state.offset();
        let hidden = selected < offset || selected >= offset + viewport_height;
        match policy {
            TreeScrollPolicy::KeepInView => {
                if selected < offset {
                    *self.table_state.offset_mut() = selected;
                } else if selected >= offset + viewport_height {
                    *self.table_state.offset_mut() = selected + 1 - viewport_height;
                }
            }
            TreeScrollPolicy::CenterOnSelect => {
                if scroll_to_focus {
                    self.center_on(selected, viewport_height);
                }
            }
            TreeScrollPolicy::CenterWhenHidden => {
                if scroll_to_focus && hidden {
                    self.center_on(selected, viewport_height);
                }
            }
        }

        // An off-screen focused row stays unselected so the table keeps a
        // manual scroll.
        let offset = self.table_state.offset();
        if selected < offset || selected >= offset + viewport_height {
            self.table_state.select(None);
        }
    }

    fn center_on(&mut self, selected: usize, viewport_height: usize) {
        let total = self.traversal.len();
        if total <= viewport_height {
            *self.table_state.offset_mut() = 0;
            return;
        }
        // Center selection, then clamp to valid scroll range.
        let max_offset = total - viewport_height;
        let offset = selected.saturating_sub(viewport_height / 2).min(max_offset);
        *self.table_state.offset_mut() = offset;
    }

    fn handle_action_inner<T, C>(&mut self, model: &T, action: TreeAction<C>) -> TreeEvent<C>
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        match action {
            TreeAction::Custom(_) => return TreeEvent::Action(action),
            TreeAction::ExpandAll => {
                self.expand_all(model);
                return TreeEvent::Handled;
            }
            TreeAction::CollapseAll => {
                self.collapse_all();
                return TreeEvent::Handled;
            }
            TreeAction::ToggleGuides => {
                self.draw_lines = !self.draw_lines;
                return TreeEvent::Handled;
            }
            _ => {}
        }

        let Some(focused) = self.focused else {
            return TreeEvent::Unhandled;
        };
        if self.traversal.is_empty() {
            return TreeEvent::Unhandled;
        }

        let handled = match action {
            TreeAction::FocusPrev => self.focus_prev(model, focused),
            TreeAction::FocusNext => self.focus_next(model, focused),
            TreeAction::ExpandOrFocusNext => {
                if !model.is_expandable(focused) {
                    false
                } else if self.is_expanded(model, focused) {
                    self.focus_next(model, focused)
                } else {
                    self.set_expanded(model, focused, true)
                }
            }
            TreeAction::CollapseOrFocusParent => {
                if model.is_expandable(focused) && self.is_expanded(model, focused) {
                    self.set_expanded(model, focused, false)
                } else {
                    self.focus_parent(model, focused)
                }
            }
            TreeAction::FocusFirst => {
                let first = self.traversal.first().map(|entry| entry.id);
                self.move_focus(model, first)
            }
            TreeAction::FocusLast => {
                let last = self.traversal.last().map(|entry| entry.id);
                self.move_focus(model, last)
            }
            TreeAction::Activate => self.has_focus && self.activate(model, focused),
            TreeAction::Deactivate => self.deactivate(),
            TreeAction::FocusNextElement => self.trap.as_mut().is_some_and(|trap| {
                trap.move_next();
                true
            }),
            TreeAction::FocusPrevElement => self.trap.as_mut().is_some_and(|trap| {
                trap.move_prev();
                true
            }),
            TreeAction::ToggleNode => {
                if model.is_expandable(focused) {
                    self.toggle(model, focused);
                    true
                } else {
                    false
                }
            }
            TreeAction::ToggleRecursive => {
                if model.is_expandable(focused) {
                    let expand = !self.is_expanded(model, focused);
                    self.set_expanded_recursive(model, focused, expand);
                    true
                } else {
                    false
                }
            }
            TreeAction::ExpandAll
            | TreeAction::CollapseAll
            | TreeAction::ToggleGuides
            | TreeAction::Custom(_) => false,
        };

        if handled {
            TreeEvent::Handled
        } else {
            TreeEvent::Unhandled
        }
    }

    fn focus_prev<T>(&mut self, model: &T, focused: Id) -> bool
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        // A focused row that is no longer visible steps back onto the last row.
        let prev = match self.traversal.position_of(model, focused) {
            Some(0) => None,
            Some(idx) => self.traversal.get(idx - 1),
            None => self.traversal.last(),
        };
        let prev = prev.map(|entry| entry.id);
        self.move_focus(model, prev)
    }

    fn focus_next<T>(&mut self, model: &T, focused: Id) -> bool
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        let next = self
            .traversal
            .position_of(model, focused)
            .and_then(|idx| self.traversal.get(idx + 1))
            .map(|entry| entry.id);
        self.move_focus(model, next)
    }

    fn focus_parent<T>(&mut self, model: &T, focused: Id) -> bool
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        match model.parent(focused) {
            Some(parent) => self.move_focus(model, Some(parent)),
            None => self.focus_prev(model, focused),
        }
    }

    fn move_focus<T>(&mut self, model: &T, target: Option<Id>) -> bool
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        let Some(target) = target else {
            return false;
        };
        if self
            .focused
            .is_some_and(|focused| model.same_item(focused, target))
        {
            return false;
        }
        self.focus_item(Some(target), true);
        true
    }

    fn focus_item(&mut self, id: Option<Id>, scroll: bool) {
        if self.active.is_some() {
            self.deactivate();
        }
        self.scroll_to_focus = scroll && id.is_some();
        if self.focused == id {
            return;
        }
        self.focused = id;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "tree.focus",
            row = id.and_then(|id| self.traversal.index_of(id))
        );

        self.changes.push(TreeChange::Focused(id));
    }

    fn replace_expanded(&mut self, expanded: ExpandedSet<K>) {
        self.expanded = expanded;
        self.dirty = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "tree.expansion_changed", expanded = self.expanded.len());

        self.changes
            .push(TreeChange::ExpansionChanged(self.expanded.clone()));
    }

    fn apply_auto_expand<T>(&mut self, model: &T)
    where
        T: TreeModel<Id = Id, Key = K>,
    {
        let mut ids = Vec::new();
        self.auto_expand
            .collect(model, &mut self.auto_expanded, &mut ids);
        if ids.is_empty() {
            return;
        }
        let keys = ids.into_iter().map(|id| model.key(id));
        let expanded = mem::take(&mut self.expanded).extend(keys);
        self.replace_expanded(expanded);
    }
}

/// Keys of every expandable node reachable from `starts`.
fn expandable_keys<T: TreeModel>(model: &T, starts: &[T::Id]) -> Vec<T::Key> {
    let hint = model.size_hint().max(1);
    let mut keys = Vec::with_capacity(hint);
    let mut visited: FxHashSet<T::Id> = FxHashSet::default();
    let mut stack: Vec<T::Id> = starts.to_vec();
    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        if model.is_expandable(node) {
            keys.push(model.key(node));
        }
        stack.extend(model.children(node).iter().copied());
    }
    keys
}
