use std::hash::Hash;

/// Read-only view of a forest consumed by the tree view.
///
/// The view never creates or drops nodes; it only asks the model about them.
/// A proper forest is expected:
/// - each node has at most one parent and appears once under it;
/// - identifiers and keys are stable between frames (for focus/expansion);
/// - `children` is deterministic, so the traversal order is too.
///
/// Cycles are tolerated by the traversal (a repeated node is skipped), but
/// navigation through `parent` assumes tree-shaped input.
pub trait TreeModel {
    /// Node handle type.
    type Id: Copy + Eq + Hash;
    /// Identity stored in the expansion set (a path, a stable id, ...).
    type Key: Clone + Eq + Hash;

    /// Returns the top-level nodes in display order.
    fn roots(&self) -> &[Self::Id];
    /// Returns the node's children in a deterministic order.
    fn children(&self, id: Self::Id) -> &[Self::Id];
    /// Returns the node's parent, or `None` for a root.
    fn parent(&self, id: Self::Id) -> Option<Self::Id>;
    /// Returns the identity used to remember whether the node is expanded.
    fn key(&self, id: Self::Id) -> Self::Key;
    /// Returns `true` if the node exists in the model.
    fn contains(&self, id: Self::Id) -> bool;

    /// Returns `true` if the node can be expanded (defaults to having children).
    fn is_expandable(&self, id: Self::Id) -> bool {
        !self.children(id).is_empty()
    }

    /// Returns `true` if both handles name the same logical node.
    ///
    /// Override when handles are re-created between frames but still refer to
    /// the same node.
    fn same_item(&self, a: Self::Id, b: Self::Id) -> bool {
        a == b
    }

    /// Returns `true` for a synthetic container node that should never be
    /// used as the visible proxy of a highlighted item.
    fn is_sentinel(&self, _id: Self::Id) -> bool {
        false
    }

    /// Returns `true` if the node should be auto-expanded regardless of depth.
    fn initially_expanded(&self, _id: Self::Id) -> bool {
        false
    }

    /// Number of keyboard-focusable controls the row renders while active.
    fn focusable_elements(&self, _id: Self::Id) -> usize {
        0
    }

    /// Returns an approximate size hint (not required to be exact).
    fn size_hint(&self) -> usize {
        0
    }
}

/// Visibility filter for nodes (used to build a reduced traversal).
pub trait TreeFilter<T: TreeModel> {
    /// Returns `true` if the node matches the filter criteria.
    fn is_match(&self, model: &T, id: T::Id) -> bool;
}

impl<T, F> TreeFilter<T> for F
where
    T: TreeModel,
    F: Fn(&T, T::Id) -> bool,
{
    #[inline]
    fn is_match(&self, model: &T, id: T::Id) -> bool {
        self(model, id)
    }
}

/// Configuration for filtered rendering.
#[derive(Clone, Copy, Debug)]
pub struct TreeFilterConfig {
    /// Enables or disables filtering.
    pub enabled: bool,
    /// Shows every matching path even when its ancestors are collapsed.
    pub auto_expand: bool,
}

impl TreeFilterConfig {
    /// Creates a configuration with filtering disabled.
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            auto_expand: false,
        }
    }

    /// Creates a configuration with filtering enabled and auto-expansion.
    pub const fn enabled() -> Self {
        Self {
            enabled: true,
            auto_expand: true,
        }
    }
}

impl Default for TreeFilterConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Filter that matches every node.
#[derive(Clone, Copy, Debug)]
pub struct NoFilter;

impl<T: TreeModel> TreeFilter<T> for NoFilter {
    #[inline]
    fn is_match(&self, _model: &T, _id: T::Id) -> bool {
        true
    }
}
