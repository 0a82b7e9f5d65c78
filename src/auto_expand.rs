use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::model::TreeModel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Automatic expansion applied to items the state has not seen before.
///
/// Items are expanded down to `depth` levels (depth 0 expands nothing unless
/// the model reports `initially_expanded`). Each item is auto-expanded at most
/// once per state, so a user collapse sticks.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoExpand {
    /// Number of levels to open below each considered root.
    pub depth: u16,
    /// Consider every root, or only the first one (plus initially expanded roots).
    pub all_roots: bool,
    /// Skip nodes with more children than this.
    pub node_children_limit: Option<usize>,
}

impl Default for AutoExpand {
    fn default() -> Self {
        Self::disabled()
    }
}

impl AutoExpand {
    /// No automatic expansion besides `initially_expanded` items.
    pub const fn disabled() -> Self {
        Self {
            depth: 0,
            all_roots: true,
            node_children_limit: None,
        }
    }

    /// Expands the first `depth` levels under every root.
    pub const fn depth(depth: u16) -> Self {
        Self {
            depth,
            all_roots: true,
            node_children_limit: None,
        }
    }

    /// Restricts depth-based expansion to the first root.
    #[must_use]
    pub const fn first_root_only(mut self) -> Self {
        self.all_roots = false;
        self
    }

    /// Skips nodes whose child count exceeds `limit`.
    #[must_use]
    pub const fn children_limit(mut self, limit: usize) -> Self {
        self.node_children_limit = Some(limit);
        self
    }

    /// Collects the items to expand that are not in `seen`, recording them.
    pub(crate) fn collect<T>(
        &self,
        model: &T,
        seen: &mut FxHashSet<T::Key>,
        out: &mut Vec<T::Id>,
    ) where
        T: TreeModel,
    {
        let roots = model.roots();
        let mut visiting: FxHashSet<T::Id> = FxHashSet::default();
        let mut selected: SmallVec<[T::Id; 8]> = SmallVec::new();
        if self.all_roots {
            selected.extend(roots.iter().copied());
        } else if let Some((&first, rest)) = roots.split_first() {
            selected.push(first);
            selected.extend(
                rest.iter()
                    .copied()
                    .filter(|&root| model.initially_expanded(root)),
            );
        }
        for root in selected {
            self.visit(model, root, 0, seen, &mut visiting, out);
        }
    }

    fn visit<T>(
        &self,
        model: &T,
        id: T::Id,
        depth: u16,
        seen: &mut FxHashSet<T::Key>,
        visiting: &mut FxHashSet<T::Id>,
        out: &mut Vec<T::Id>,
    ) where
        T: TreeModel,
    {
        if !visiting.insert(id) {
            return;
        }
        let initial = model.initially_expanded(id);
        if !initial && depth >= self.depth {
            return;
        }
        let children = model.children(id);
        if !initial
            && self
                .node_children_limit
                .is_some_and(|limit| children.len() > limit)
        {
            return;
        }

        if model.is_expandable(id) && seen.insert(model.key(id)) {
            out.push(id);
        }

        for child in children.iter().copied() {
            self.visit(model, child, depth.saturating_add(1), seen, visiting, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Forest {
        roots: Vec<usize>,
        children: Vec<Vec<usize>>,
        initial: Vec<usize>,
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
            self.children.iter().position(|kids| kids.contains(&id))
        }

        fn key(&self, id: usize) -> usize {
            id
        }

        fn contains(&self, id: usize) -> bool {
            id < self.children.len()
        }

        fn initially_expanded(&self, id: usize) -> bool {
            self.initial.contains(&id)
        }
    }

    // 0 -> {1 -> {2 -> {3}}}, 4 -> {5}
    fn forest() -> Forest {
        Forest {
            roots: vec![0, 4],
            children: vec![vec![1], vec![2], vec![3], vec![], vec![5], vec![]],
            initial: Vec::new(),
        }
    }

    fn run(auto: AutoExpand, model: &Forest, seen: &mut FxHashSet<usize>) -> Vec<usize> {
        let mut out = Vec::new();
        auto.collect(model, seen, &mut out);
        out
    }

    #[test]
    fn expands_levels_under_every_root() {
        let model = forest();
        let mut seen = FxHashSet::default();

        assert_eq!(run(AutoExpand::depth(2), &model, &mut seen), vec![0, 1, 4]);
    }

    #[test]
    fn first_root_only_ignores_other_roots() {
        let model = forest();
        let mut seen = FxHashSet::default();

        let out = run(AutoExpand::depth(1).first_root_only(), &model, &mut seen);
        assert_eq!(out, vec![0]);
    }

    #[test]
    fn initially_expanded_ignores_depth() {
        let mut model = forest();
        model.initial = vec![4];
        let mut seen = FxHashSet::default();

        let out = run(AutoExpand::disabled().first_root_only(), &model, &mut seen);
        assert_eq!(out, vec![4]);
    }

    #[test]
    fn children_limit_skips_wide_nodes() {
        let model = Forest {
            roots: vec![0],
            children: vec![vec![1, 2, 3], vec![], vec![], vec![]],
            initial: Vec::new(),
        };
        let mut seen = FxHashSet::default();

        let out = run(AutoExpand::depth(3).children_limit(2), &model, &mut seen);
        assert!(out.is_empty());
    }

    #[test]
    fn seen_items_are_not_expanded_twice() {
        let model = forest();
        let mut seen = FxHashSet::default();

        assert_eq!(run(AutoExpand::depth(1), &model, &mut seen), vec![0, 4]);
        assert!(run(AutoExpand::depth(1), &model, &mut seen).is_empty());
    }
}
