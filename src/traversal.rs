use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;

use crate::model::{TreeFilter, TreeFilterConfig, TreeModel};

/// One visible row of the flattened tree.
#[derive(Clone, Debug)]
pub struct TraversalEntry<Id> {
    pub(crate) id: Id,
    pub(crate) depth: u16,
    pub(crate) parent: Option<Id>,
    pub(crate) is_expandable: bool,
    pub(crate) is_tail_stack: SmallVec<[bool; 8]>,
}

impl<Id: Copy> TraversalEntry<Id> {
    /// The node shown on this row.
    pub const fn id(&self) -> Id {
        self.id
    }

    /// Zero based depth; roots are at depth 0.
    pub const fn depth(&self) -> u16 {
        self.depth
    }

    /// The node this row was reached from, `None` for roots.
    pub const fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Whether the node can be expanded.
    pub const fn is_expandable(&self) -> bool {
        self.is_expandable
    }

    /// For every ancestor level, whether that ancestor was the last sibling.
    pub fn is_tail_stack(&self) -> &[bool] {
        &self.is_tail_stack
    }
}

/// Pre-order flattening of the visible part of a forest.
///
/// Children are only visited when their parent is expanded, so hidden
/// subtrees cost nothing. A node reached twice (a cycle or a shared child) is
/// skipped the second time.
#[derive(Clone, Debug)]
pub struct Traversal<Id> {
    entries: Vec<TraversalEntry<Id>>,
    index: FxHashMap<Id, usize>,
}

impl<Id: Copy + Eq + std::hash::Hash> Default for Traversal<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Copy + Eq + std::hash::Hash> Traversal<Id> {
    /// Creates an empty traversal.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Walks the whole forest, descending into nodes for which `is_expanded`
    /// returns `true`, down to `max_depth` (inclusive) when given.
    pub fn from_roots<T, E>(model: &T, is_expanded: E, max_depth: Option<u16>) -> Self
    where
        T: TreeModel<Id = Id>,
        E: Fn(Id) -> bool,
    {
        let mut traversal = Self::new();
        traversal.build(model, is_expanded, max_depth);
        traversal
    }

    /// Rebuilds the traversal in place, reusing allocations.
    pub fn build<T, E>(&mut self, model: &T, is_expanded: E, max_depth: Option<u16>)
    where
        T: TreeModel<Id = Id>,
        E: Fn(Id) -> bool,
    {
        self.reset(model);
        let mut is_tail_stack: SmallVec<[bool; 8]> = SmallVec::new();
        for root in model.roots().iter().copied() {
            self.push_subtree(model, root, 0, None, &mut is_tail_stack, &is_expanded, max_depth);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "tree.traversal.rebuild", entries = self.entries.len());
    }

    /// Rebuilds the traversal keeping only nodes that match `filter` or have a
    /// matching descendant.
    ///
    /// With `config.auto_expand` every kept path is shown; otherwise kept
    /// nodes still respect `is_expanded`.
    pub fn build_filtered<T, F, E>(
        &mut self,
        model: &T,
        filter: &F,
        config: TreeFilterConfig,
        is_expanded: E,
    ) where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T>,
        E: Fn(Id) -> bool,
    {
        if !config.enabled {
            self.build(model, is_expanded, None);
            return;
        }

        self.reset(model);
        let memo_capacity = model.size_hint().max(1);
        let mut memo: FxHashMap<Id, bool> =
            FxHashMap::with_capacity_and_hasher(memo_capacity, FxBuildHasher);
        let mut is_tail_stack: SmallVec<[bool; 8]> = SmallVec::new();

        let mut roots: SmallVec<[Id; 8]> = SmallVec::new();
        for root in model.roots().iter().copied() {
            if subtree_has_match(model, root, filter, &mut memo) {
                roots.push(root);
            }
        }
        for root in roots {
            self.push_filtered(
                model,
                root,
                0,
                None,
                &mut is_tail_stack,
                filter,
                config,
                &is_expanded,
                &mut memo,
            );
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "tree.traversal.rebuild_filtered",
            entries = self.entries.len()
        );
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the row at `index`.
    pub fn get(&self, index: usize) -> Option<&TraversalEntry<Id>> {
        self.entries.get(index)
    }

    /// First visible row.
    pub fn first(&self) -> Option<&TraversalEntry<Id>> {
        self.entries.first()
    }

    /// Last visible row.
    pub fn last(&self) -> Option<&TraversalEntry<Id>> {
        self.entries.last()
    }

    /// All rows in display order.
    pub fn entries(&self) -> &[TraversalEntry<Id>] {
        &self.entries
    }

    /// Iterates over the visible node ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    /// Finds the row of `id`, falling back to `TreeModel::same_item` when the
    /// handle itself is not in the traversal.
    pub fn position_of<T: TreeModel<Id = Id>>(&self, model: &T, id: Id) -> Option<usize> {
        if let Some(idx) = self.index_of(id) {
            return Some(idx);
        }
        self.entries
            .iter()
            .position(|entry| model.same_item(entry.id, id))
    }

    pub(crate) fn index_of(&self, id: Id) -> Option<usize> {
        self.index.get(&id).copied()
    }

    fn reset<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        self.entries.clear();
        self.index.clear();
        let hint = model.size_hint();
        if hint == 0 {
            return;
        }
        let entry_extra = hint.saturating_sub(self.entries.capacity());
        if entry_extra > 0 {
            self.entries.reserve(entry_extra);
        }
        let index_extra = hint.saturating_sub(self.index.capacity());
        if index_extra > 0 {
            self.index.reserve(index_extra);
        }
    }

    /// Appends the row for `id`; returns `false` if it was already emitted.
    fn push_entry<T: TreeModel<Id = Id>>(
        &mut self,
        model: &T,
        id: Id,
        depth: u16,
        parent: Option<Id>,
        is_tail_stack: &SmallVec<[bool; 8]>,
    ) -> bool {
        if self.index.contains_key(&id) {
            #[cfg(feature = "tracing")]
            tracing::warn!(message = "tree.traversal.cycle", depth);
            return false;
        }
        let idx = self.entries.len();
        self.entries.push(TraversalEntry {
            id,
            depth,
            parent,
            is_expandable: model.is_expandable(id),
            is_tail_stack: is_tail_stack.clone(),
        });
        self.index.insert(id, idx);
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn push_subtree<T, E>(
        &mut self,
        model: &T,
        id: Id,
        depth: u16,
        parent: Option<Id>,
        is_tail_stack: &mut SmallVec<[bool; 8]>,
        is_expanded: &E,
        max_depth: Option<u16>,
    ) where
        T: TreeModel<Id = Id>,
        E: Fn(Id) -> bool,
    {
        if !self.push_entry(model, id, depth, parent, is_tail_stack) {
            return;
        }
        if !is_expanded(id) {
            return;
        }
        let next_depth = depth.saturating_add(1);
        if max_depth.is_some_and(|max| next_depth > max) {
            return;
        }

        let children = model.children(id);
        let last_idx = children.len().saturating_sub(1);
        for (i, child) in children.iter().copied().enumerate() {
            is_tail_stack.push(i == last_idx);
            self.push_subtree(
                model,
                child,
                next_depth,
                Some(id),
                is_tail_stack,
                is_expanded,
                max_depth,
            );
            is_tail_stack.pop();
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push_filtered<T, F, E>(
        &mut self,
        model: &T,
        id: Id,
        depth: u16,
        parent: Option<Id>,
        is_tail_stack: &mut SmallVec<[bool; 8]>,
        filter: &F,
        config: TreeFilterConfig,
        is_expanded: &E,
        memo: &mut FxHashMap<Id, bool>,
    ) where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T>,
        E: Fn(Id) -> bool,
    {
        if !self.push_entry(model, id, depth, parent, is_tail_stack) {
            return;
        }

        let show_children = config.auto_expand || is_expanded(id);
        if !show_children {
            return;
        }

        let mut visible_children: SmallVec<[Id; 8]> = SmallVec::new();
        for child in model.children(id).iter().copied() {
            if subtree_has_match(model, child, filter, memo) {
                visible_children.push(child);
            }
        }

        let last_idx = visible_children.len().saturating_sub(1);
        for (i, child) in visible_children.iter().copied().enumerate() {
            is_tail_stack.push(i == last_idx);
            self.push_filtered(
                model,
                child,
                depth.saturating_add(1),
                Some(id),
                is_tail_stack,
                filter,
                config,
                is_expanded,
                memo,
            );
            is_tail_stack.pop();
        }
    }
}

fn subtree_has_match<T, F>(
    model: &T,
    id: T::Id,
    filter: &F,
    memo: &mut FxHashMap<T::Id, bool>,
) -> bool
where
    T: TreeModel,
    F: TreeFilter<T>,
{
    if let Some(&cached) = memo.get(&id) {
        return cached;
    }
    // Provisional answer so a cycle terminates instead of recursing forever.
    memo.insert(id, false);

    let mut matched = filter.is_match(model, id);
    if !matched {
        for child in model.children(id).iter().copied() {
            if subtree_has_match(model, child, filter, memo) {
                matched = true;
                break;
            }
        }
    }

    memo.insert(id, matched);
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    /// Forest backed by adjacency lists; node `i` has `children[i]`.
    struct Forest {
        roots: Vec<usize>,
        children: Vec<Vec<usize>>,
        parents: Vec<Option<usize>>,
    }

    impl Forest {
        fn new(roots: Vec<usize>, children: Vec<Vec<usize>>) -> Self {
            let mut parents = vec![None; children.len()];
            for (parent, kids) in children.iter().enumerate() {
                for &kid in kids {
                    parents[kid] = Some(parent);
                }
            }
            Self {
                roots,
                children,
                parents,
            }
        }
    }

    impl TreeModel for Forest {
        type Id = usize;
        type Key = usize;

        fn roots(&self) -> &[usize] {
            &self.roots
        }

        fn children(&self, id: usize) -> &[usize] {
            &self.children[id]
        }

        fn parent(&self, id: usize) -> Option<usize> {
            self.parents[id]
        }

        fn key(&self, id: usize) -> usize {
            id
        }

        fn contains(&self, id: usize) -> bool {
            id < self.children.len()
        }
    }

    // A=0, B=1, C=2, D=3
    fn abcd() -> Forest {
        Forest::new(vec![0], vec![vec![1, 2], vec![3], vec![], vec![]])
    }

    fn ids(traversal: &Traversal<usize>) -> Vec<usize> {
        traversal.ids().collect()
    }

    #[test]
    fn collapsed_forest_shows_roots_only() {
        let forest = abcd();
        let traversal = Traversal::from_roots(&forest, |_| false, None);

        assert_eq!(ids(&traversal), vec![0]);
        assert_eq!(traversal.get(0).map(TraversalEntry::depth), Some(0));
    }

    #[test]
    fn expanded_subtree_precedes_next_sibling() {
        let forest = abcd();
        let expanded: FxHashSet<usize> = [0, 1].into_iter().collect();
        let traversal = Traversal::from_roots(&forest, |id| expanded.contains(&id), None);

        assert_eq!(ids(&traversal), vec![0, 1, 3, 2]);
        let depths: Vec<_> = traversal.entries().iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1]);
        let parents: Vec<_> = traversal.entries().iter().map(|e| e.parent).collect();
        assert_eq!(parents, vec![None, Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn max_depth_cuts_off_deeper_levels() {
        let forest = abcd();
        let traversal = Traversal::from_roots(&forest, |_| true, Some(1));

        assert_eq!(ids(&traversal), vec![0, 1, 2]);
    }

    #[test]
    fn walks_every_root_in_order() {
        let forest = Forest::new(vec![2, 0], vec![vec![1], vec![], vec![3], vec![]]);
        let traversal = Traversal::from_roots(&forest, |_| true, None);

        assert_eq!(ids(&traversal), vec![2, 3, 0, 1]);
    }

    #[test]
    fn cycle_is_visited_once() {
        // 0 -> 1 -> 0
        let forest = Forest::new(vec![0], vec![vec![1], vec![0]]);
        let traversal = Traversal::from_roots(&forest, |_| true, None);

        assert_eq!(ids(&traversal), vec![0, 1]);
    }

    #[test]
    fn tail_stack_marks_last_siblings() {
        let forest = abcd();
        let traversal = Traversal::from_roots(&forest, |_| true, None);

        let stacks: Vec<Vec<bool>> = traversal
            .entries()
            .iter()
            .map(|e| e.is_tail_stack().to_vec())
            .collect();
        assert_eq!(
            stacks,
            vec![vec![], vec![false], vec![false, true], vec![true]]
        );
    }

    #[test]
    fn filtered_traversal_keeps_matching_path() {
        let forest = abcd();
        let mut traversal = Traversal::new();
        let filter = |_: &Forest, id: usize| id == 3;

        traversal.build_filtered(&forest, &filter, TreeFilterConfig::enabled(), |_| false);

        assert_eq!(ids(&traversal), vec![0, 1, 3]);
    }

    #[test]
    fn filtered_traversal_without_auto_expand_respects_expansion() {
        let forest = abcd();
        let mut traversal = Traversal::new();
        let filter = |_: &Forest, id: usize| id == 3;
        let config = TreeFilterConfig {
            enabled: true,
            auto_expand: false,
        };

        traversal.build_filtered(&forest, &filter, config, |id| id == 0);

        assert_eq!(ids(&traversal), vec![0, 1]);
    }

    #[test]
    fn filtered_traversal_without_matches_is_empty() {
        let forest = abcd();
        let mut traversal = Traversal::new();
        let filter = |_: &Forest, _: usize| false;

        traversal.build_filtered(&forest, &filter, TreeFilterConfig::enabled(), |_| true);

        assert!(traversal.is_empty());
    }
}
