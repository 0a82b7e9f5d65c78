// Minimal example: a two-root forest with default styling, rendered into a buffer.
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::StatefulWidget;

use tui_managedtree::{
    TreeAction, TreeLabelParts, TreeLabelProvider, TreeModel, TreeView, TreeViewState,
    TreeViewStyle,
};

// Simple in-memory forest with fixed children lists.
struct Model {
    roots: Vec<usize>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    names: Vec<String>,
}

impl Model {
    // Two roots: src -> {lib.rs, main.rs}, and a lone Cargo.toml.
    fn new() -> Self {
        Self {
            roots: vec![0, 3],
            children: vec![vec![1, 2], vec![], vec![], vec![]],
            parents: vec![None, Some(0), Some(0), None],
            names: ["src", "lib.rs", "main.rs", "Cargo.toml"]
                .map(String::from)
                .to_vec(),
        }
    }
}

// The widget and state query the forest through this trait only.
impl TreeModel for Model {
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

// Label provider: the default renderer adds guides and the expand arrow.
struct Label;

impl TreeLabelProvider<Model> for Label {
    fn label_parts<'a>(&'a self, model: &'a Model, id: usize) -> TreeLabelParts<'a> {
        TreeLabelParts {
            name: model.names[id].as_str(),
            prefix: None,
        }
    }
}

fn main() {
    let model = Model::new();

    // State holds expansion/focus and must live across frames.
    let mut state: TreeViewState<usize, usize> = TreeViewState::new();
    state.focus(Some(0));
    state.handle_action(&model, TreeAction::<()>::ExpandOrFocusNext);
    state.handle_action(&model, TreeAction::<()>::ExpandOrFocusNext);

    let widget = TreeView::new(&model, &Label, TreeViewStyle::default());

    // Render into an in-memory buffer (no terminal required for the example).
    let area = Rect::new(0, 0, 40, 8);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer, &mut state);

    for change in state.take_changes() {
        println!("{change:?}");
    }
}
