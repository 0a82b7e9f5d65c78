//! Managed tree view for ratatui.
//!
//! The crate flattens a forest into visible rows, owns the expansion set,
//! focus and activation, and turns key, click and focus events into
//! [`TreeChange`]s for the application to observe.
//!
//! Feature flags:
//! - `keymap`: crossterm-based key bindings and `TreeViewState::handle_key*` helpers.
//! - `serde`: serde support for `TreeViewSnapshot` and TOML loading of `TreeViewConfig`.
//! - `tracing`: debug events for focus, expansion, activation and traversal rebuilds.

mod action;
mod auto_expand;
mod config;
mod context;
mod error;
mod expansion;
mod focus_trap;
mod glyphs;
#[cfg(feature = "keymap")]
mod keymap;
mod model;
pub mod prelude;
mod state;
mod style;
mod traversal;
mod widget;

pub use action::{TreeAction, TreeChange, TreeEvent};
pub use auto_expand::AutoExpand;
pub use config::TreeViewConfig;
pub use context::TreeRowContext;
pub use error::{TreeError, TreeResult};
pub use expansion::ExpandedSet;
pub use focus_trap::FocusTrap;
pub use glyphs::{
    TreeGlyphSet, TreeGlyphs, TreeItemRenderer, TreeLabelParts, TreeLabelProvider, tree_arrow,
    tree_label_line,
};
#[cfg(feature = "keymap")]
pub use keymap::{KeymapProfile, TreeKeyBindings};
pub use model::{NoFilter, TreeFilter, TreeFilterConfig, TreeModel};
pub use state::{TreeViewSnapshot, TreeViewState};
pub use style::{TreeScrollPolicy, TreeViewStyle};
pub use traversal::{Traversal, TraversalEntry};
pub use widget::TreeView;
