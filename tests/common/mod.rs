#![allow(dead_code)]

use tui_managedtree::TreeModel;

/// Forest described by a parent list: `parents[i]` is the parent of node `i`.
#[derive(Clone, Debug)]
pub struct Forest {
    pub roots: Vec<usize>,
    pub children: Vec<Vec<usize>>,
    pub parents: Vec<Option<usize>>,
    pub sentinels: Vec<usize>,
}

impl Forest {
    pub fn from_parents(parents: &[Option<usize>]) -> Self {
        let mut roots = Vec::new();
        let mut children = vec![Vec::new(); parents.len()];
        for (id, parent) in parents.iter().enumerate() {
            match parent {
                Some(parent) => children[*parent].push(id),
                None => roots.push(id),
            }
        }
        Self {
            roots,
            children,
            parents: parents.to_vec(),
            sentinels: Vec::new(),
        }
    }

    /// A=0 -> {B=1 -> {D=3}, C=2}
    pub fn abcd() -> Self {
        Self::from_parents(&[None, Some(0), Some(0), Some(1)])
    }

    pub fn depth(&self, mut id: usize) -> u16 {
        let mut depth = 0;
        while let Some(parent) = self.parents[id] {
            depth += 1;
            id = parent;
        }
        depth
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

    fn is_sentinel(&self, id: usize) -> bool {
        self.sentinels.contains(&id)
    }

    fn size_hint(&self) -> usize {
        self.children.len()
    }
}
