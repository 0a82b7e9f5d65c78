use crate::expansion::ExpandedSet;

/// Actions that a user or application can initiate on the tree view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeAction<Custom = ()> {
    /// Focus the previous visible row (ArrowUp).
    FocusPrev,
    /// Focus the next visible row (ArrowDown).
    FocusNext,
    /// Expand a collapsed row, or step into an expanded one (ArrowRight).
    ExpandOrFocusNext,
    /// Collapse an expanded row, or focus its parent (ArrowLeft).
    CollapseOrFocusParent,
    /// Focus the first visible row (Home).
    FocusFirst,
    /// Focus the last visible row (End).
    FocusLast,
    /// Activate the focused row (Enter/Space).
    Activate,
    /// Clear activation and return keyboard focus to the tree (Escape).
    Deactivate,
    /// Move to the next control inside the active row (Tab).
    FocusNextElement,
    /// Move to the previous control inside the active row (Shift-Tab).
    FocusPrevElement,
    /// Toggle expansion for the focused row only.
    ToggleNode,
    /// Toggle expansion for the focused subtree.
    ToggleRecursive,
    /// Expand every node in the tree.
    ExpandAll,
    /// Collapse every node in the tree.
    CollapseAll,
    /// Toggle drawing of guide lines.
    ToggleGuides,
    /// Custom action forwarded to the caller without internal handling.
    Custom(Custom),
}

/// Result of handling an action or key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeEvent<Custom = ()> {
    /// The action was handled internally and state was updated.
    Handled,
    /// The action was ignored (e.g., nothing focused / nothing to do).
    Unhandled,
    /// The action is forwarded to the caller for handling.
    Action(TreeAction<Custom>),
}

/// Observable side effect of a state transition.
///
/// Drained with `TreeViewState::take_changes`; the caller persists whatever it
/// needs (the expansion set, the focused item) and may feed it back later.
#[derive(Clone, Debug)]
pub enum TreeChange<Id, K> {
    /// Keyboard focus moved to the item (or was cleared).
    Focused(Option<Id>),
    /// The item was expanded; `expanded` is the updated set.
    Expanded { id: Id, expanded: ExpandedSet<K> },
    /// The item was collapsed; `expanded` is the updated set.
    Collapsed { id: Id, expanded: ExpandedSet<K> },
    /// Several items changed at once (bulk, recursive or automatic
    /// expansion); carries the updated set.
    ExpansionChanged(ExpandedSet<K>),
    /// The item was activated (or activation was cleared).
    Activated(Option<Id>),
}
