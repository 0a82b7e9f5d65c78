//! Property-based invariant tests for traversal and navigation.
//!
//! 1. Every reachable node with expanded ancestors appears exactly once, in pre-order.
//! 2. Collapsing a node removes exactly its descendants and keeps the rest in order.
//! 3. FocusNext on the last row and FocusPrev on the first row are no-ops.
//! 4. Depths recorded in the traversal match the model.

mod common;

use common::Forest;
use proptest::prelude::*;
use rustc_hash::FxHashSet;
use tui_managedtree::{Traversal, TreeAction, TreeModel, TreeViewState};

// ── Helpers ─────────────────────────────────────────────────────────────

/// Random forest: node `i` either is a root or hangs below an earlier node.
fn forest(max_len: usize) -> impl Strategy<Value = Forest> {
    proptest::collection::vec(any::<Option<prop::sample::Index>>(), 1..=max_len).prop_map(
        |picks| {
            let parents: Vec<Option<usize>> = picks
                .iter()
                .enumerate()
                .map(|(id, pick)| match pick {
                    Some(index) if id > 0 => Some(index.index(id)),
                    _ => None,
                })
                .collect();
            Forest::from_parents(&parents)
        },
    )
}

fn forest_with_expansion() -> impl Strategy<Value = (Forest, Vec<bool>)> {
    forest(40).prop_flat_map(|forest| {
        let len = forest.children.len();
        (Just(forest), proptest::collection::vec(any::<bool>(), len))
    })
}

/// Reference pre-order walk, written recursively.
fn naive_preorder(model: &Forest, expanded: &[bool]) -> Vec<usize> {
    fn walk(model: &Forest, expanded: &[bool], id: usize, out: &mut Vec<usize>) {
        out.push(id);
        if expanded[id] {
            for &child in model.children(id) {
                walk(model, expanded, child, out);
            }
        }
    }
    let mut out = Vec::new();
    for &root in model.roots() {
        walk(model, expanded, root, &mut out);
    }
    out
}

fn is_descendant(model: &Forest, ancestor: usize, mut id: usize) -> bool {
    while let Some(parent) = model.parent(id) {
        if parent == ancestor {
            return true;
        }
        id = parent;
    }
    false
}

fn state_for(model: &Forest, expanded: &[bool]) -> TreeViewState<usize, usize> {
    let mut state = TreeViewState::new();
    for (id, &open) in expanded.iter().enumerate() {
        if open {
            state.set_expanded(model, id, true);
        }
    }
    state.ensure_traversal(model);
    state
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Visible nodes appear once, in pre-order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn traversal_matches_naive_preorder((model, expanded) in forest_with_expansion()) {
        let traversal = Traversal::from_roots(&model, |id| expanded[id], None);
        let ids: Vec<usize> = traversal.ids().collect();

        prop_assert_eq!(&ids, &naive_preorder(&model, &expanded));

        let unique: FxHashSet<usize> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Collapse removes exactly the descendants
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn collapse_removes_descendants(
        (model, expanded) in forest_with_expansion(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut state = state_for(&model, &expanded);
        let before: Vec<usize> = state.traversal().ids().collect();
        let target = before[pick.index(before.len())];

        state.set_expanded(&model, target, false);
        state.ensure_traversal(&model);
        let after: Vec<usize> = state.traversal().ids().collect();

        let expected: Vec<usize> = before
            .into_iter()
            .filter(|&id| !is_descendant(&model, target, id))
            .collect();
        prop_assert_eq!(after, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Edges of the traversal
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn focus_does_not_move_past_edges((model, expanded) in forest_with_expansion()) {
        let mut state = state_for(&model, &expanded);
        let first = state.traversal().first().map(|entry| entry.id());
        let last = state.traversal().last().map(|entry| entry.id());

        state.focus(last);
        state.handle_action(&model, TreeAction::<()>::FocusNext);
        prop_assert_eq!(state.focused(), last);

        state.focus(first);
        state.handle_action(&model, TreeAction::<()>::FocusPrev);
        prop_assert_eq!(state.focused(), first);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Depths
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn depths_match_model((model, expanded) in forest_with_expansion()) {
        let traversal = Traversal::from_roots(&model, |id| expanded[id], None);

        for entry in traversal.entries() {
            prop_assert_eq!(entry.depth(), model.depth(entry.id()));
            prop_assert_eq!(entry.parent(), model.parent(entry.id()));
        }
    }
}
