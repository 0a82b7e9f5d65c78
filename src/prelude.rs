pub use crate::{
    AutoExpand, ExpandedSet, FocusTrap, NoFilter, Traversal, TraversalEntry, TreeAction,
    TreeChange, TreeError, TreeEvent, TreeFilter, TreeFilterConfig, TreeGlyphSet, TreeGlyphs,
    TreeItemRenderer, TreeLabelParts, TreeLabelProvider, TreeModel, TreeResult, TreeRowContext,
    TreeScrollPolicy, TreeView, TreeViewConfig, TreeViewSnapshot, TreeViewState, TreeViewStyle,
    tree_arrow, tree_label_line,
};

#[cfg(feature = "keymap")]
pub use crate::{KeymapProfile, TreeKeyBindings};
