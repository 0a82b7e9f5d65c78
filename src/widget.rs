use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Buffer;
use ratatui::widgets::{
    Block, Borders, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Table,
    TableState,
};

use crate::context::TreeRowContext;
use crate::glyphs::{TreeGlyphs, TreeItemRenderer};
use crate::model::{NoFilter, TreeFilter, TreeFilterConfig, TreeModel};
use crate::state::TreeViewState;
use crate::style::TreeViewStyle;
use crate::traversal::TraversalEntry;

/// Tree widget: renders the visible rows of a [`TreeModel`] into a table.
pub struct TreeView<'a, T, R, F = NoFilter>
where
    T: TreeModel,
    R: TreeItemRenderer<T>,
    F: TreeFilter<T>,
{
    model: &'a T,
    renderer: &'a R,
    style: TreeViewStyle<'a>,
    glyphs: TreeGlyphs<'a>,
    filter: F,
    filter_config: TreeFilterConfig,
}

impl<'a, T, R> TreeView<'a, T, R, NoFilter>
where
    T: TreeModel,
    R: TreeItemRenderer<T>,
{
    pub const fn new(model: &'a T, renderer: &'a R, style: TreeViewStyle<'a>) -> Self {
        Self {
            model,
            renderer,
            style,
            glyphs: TreeGlyphs::unicode(),
            filter: NoFilter,
            filter_config: TreeFilterConfig::disabled(),
        }
    }

    pub fn with_filter<F>(self, filter: F, filter_config: TreeFilterConfig) -> TreeView<'a, T, R, F>
    where
        F: TreeFilter<T>,
    {
        TreeView {
            model: self.model,
            renderer: self.renderer,
            style: self.style,
            glyphs: self.glyphs,
            filter,
            filter_config,
        }
    }
}

impl<'a, T, R, F> TreeView<'a, T, R, F>
where
    T: TreeModel,
    R: TreeItemRenderer<T>,
    F: TreeFilter<T>,
{
    #[must_use]
    pub fn glyphs(mut self, glyphs: TreeGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    fn build_rows(
        &self,
        entries: &[TraversalEntry<T::Id>],
        state: &TreeViewState<T::Id, T::Key>,
    ) -> Vec<Row<'a>> {
        let focused = state.focused();
        let active = state.active();
        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = entry.id;
            let is_active = active.is_some_and(|active| self.model.same_item(active, id));
            let ctx = TreeRowContext {
                depth: entry.depth,
                is_tail_stack: entry.is_tail_stack(),
                is_focused: focused.is_some_and(|focused| self.model.same_item(focused, id)),
                is_active,
                is_expanded: state.is_expanded(self.model, id),
                is_expandable: entry.is_expandable,
                draw_lines: state.draw_lines(),
                line_style: self.style.line_style,
            };
            let line = self.renderer.line(self.model, id, &ctx, &self.glyphs);
            let mut row = Row::new([line]);
            if is_active {
                row = row.style(self.style.active_style);
            }
            rows.push(row);
        }
        rows
    }

    fn render_scrollbar(
        area: Rect,
        buf: &mut Buffer,
        offset: usize,
        inner_height: usize,
        scroll_rows: usize,
    ) {
        let scroll_len = scroll_rows.saturating_add(1);
        let position = offset.min(scroll_len.saturating_sub(1));
        let mut scrollbar_state = ScrollbarState::new(scroll_len)
            .position(position)
            .viewport_content_length(inner_height);
        Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .render(area, buf, &mut scrollbar_state);
    }
}

impl<T, R, F> StatefulWidget for TreeView<'_, T, R, F>
where
    T: TreeModel,
    R: TreeItemRenderer<T>,
    F: TreeFilter<T>,
{
    type State = TreeViewState<T::Id, T::Key>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if self.filter_config.enabled {
            state.ensure_traversal_filtered(self.model, &self.filter, self.filter_config);
        } else {
            state.ensure_traversal(self.model);
        }

        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);

        let inner_height = block.inner(area).height as usize;
        state.prepare_viewport(self.model, inner_height, self.style.scroll_policy);

        let entries = state.traversal().entries();
        let total_rows = entries.len();
        let offset = state.table_state().offset();
        let (range_start, range_end) = if self.style.virtualize_rows {
            let start = offset.min(total_rows);
            let end = (start + inner_height).min(total_rows);
            (start, end)
        } else {
            (0, total_rows)
        };
        let rows = self.build_rows(&entries[range_start..range_end], state);
        let scroll_rows = total_rows.saturating_sub(inner_height);

        // Virtualized rows are rendered through a local state shifted to the
        // rendered window.
        let mut local_state = if self.style.virtualize_rows {
            let mut local = *state.table_state();
            *local.offset_mut() = 0;
            let selected = local
                .selected()
                .filter(|selected| (range_start..range_end).contains(selected))
                .map(|selected| selected - range_start);
            local.select(selected);
            Some(local)
        } else {
            None
        };
        let table_state: &mut TableState = match local_state.as_mut() {
            Some(local) => local,
            None => state.table_state_mut(),
        };

        let (table_area, table_block, scrollbar_area) = if scroll_rows > 0 {
            let table_area = Rect {
                width: area.width.saturating_sub(1),
                ..area
            };
            let scrollbar_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y,
                width: 1,
                height: area.height,
            };
            let mut table_borders = self.style.borders;
            table_borders.remove(Borders::RIGHT);
            (table_area, block.borders(table_borders), Some(scrollbar_area))
        } else {
            (area, block, None)
        };

        let table = Table::new(rows, [Constraint::Percentage(100)])
            .style(self.style.block_style)
            .block(table_block)
            .row_highlight_style(self.style.highlight_style)
            .highlight_symbol(self.style.highlight_symbol);
        table.render(table_area, buf, table_state);

        if let Some(scrollbar_area) = scrollbar_area {
            let offset = state.table_state().offset();
            Self::render_scrollbar(scrollbar_area, buf, offset, inner_height, scroll_rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::{TreeLabelParts, TreeLabelProvider};
    use crate::style::TreeScrollPolicy;

    struct TestModel {
        roots: Vec<usize>,
        children: Vec<Vec<usize>>,
        names: Vec<String>,
    }

    impl TestModel {
        fn new(child_count: usize) -> Self {
            let mut children = vec![Vec::new(); child_count + 1];
            let mut names = Vec::with_capacity(child_count + 1);
            names.push("root".to_string());
            for idx in 1..=child_count {
                children[0].push(idx);
                names.push(format!("node-{idx}"));
            }
            Self {
                roots: vec![0],
                children,
                names,
            }
        }
    }

    impl TreeModel for TestModel {
        type Id = usize;
        type Key = usize;

        fn roots(&self) -> &[usize] {
            &self.roots
        }

        fn children(&self, id: usize) -> &[usize] {
            &self.children[id]
        }

        fn parent(&self, id: usize) -> Option<usize> {
            (id != 0).then_some(0)
        }

        fn key(&self, id: usize) -> usize {
            id
        }

        fn contains(&self, id: usize) -> bool {
            id < self.children.len()
        }
    }

    struct Label;

    impl TreeLabelProvider<TestModel> for Label {
        fn label_parts<'a>(&'a self, model: &'a TestModel, id: usize) -> TreeLabelParts<'a> {
            TreeLabelParts {
                name: model.names[id].as_str(),
                prefix: None,
            }
        }
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        let area = buffer.area;
        (area.x..area.x + area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn render_smoke_with_scrollbar() {
        let model = TestModel::new(12);
        let widget = TreeView::new(&model, &Label, TreeViewStyle::default());

        let mut state = TreeViewState::new();
        state.set_expanded(&model, 0, true);

        let area = Rect::new(0, 0, 20, 6);
        let mut buffer = Buffer::empty(area);

        widget.render(area, &mut buffer, &mut state);
        assert_eq!(state.visible_len(), 13);
    }

    #[test]
    fn focused_row_scrolls_into_view() {
        let model = TestModel::new(12);
        let style = TreeViewStyle {
            borders: Borders::NONE,
            scroll_policy: TreeScrollPolicy::KeepInView,
            virtualize_rows: true,
            ..TreeViewStyle::default()
        };

        let mut state = TreeViewState::new();
        state.set_expanded(&model, 0, true);
        state.focus(Some(12));

        let area = Rect::new(0, 0, 24, 4);
        let mut buffer = Buffer::empty(area);
        TreeView::new(&model, &Label, style)
            .glyphs(TreeGlyphs::ascii())
            .render(area, &mut buffer, &mut state);

        assert_eq!(state.item_at_row(3), Some(12));
        assert!(row_text(&buffer, 3).contains("node-12"));
    }

    #[test]
    fn wheel_scroll_survives_next_frame() {
        let model = TestModel::new(12);
        let mut state = TreeViewState::new();
        state.set_expanded(&model, 0, true);
        state.focus(Some(0));

        let area = Rect::new(0, 0, 20, 6);
        let mut buffer = Buffer::empty(area);
        TreeView::new(&model, &Label, TreeViewStyle::default()).render(area, &mut buffer, &mut state);
        assert_eq!(state.item_at_row(0), Some(0));

        state.scroll_down_by(5);
        let mut buffer = Buffer::empty(area);
        TreeView::new(&model, &Label, TreeViewStyle::default()).render(area, &mut buffer, &mut state);

        assert_eq!(state.item_at_row(0), Some(5));
        assert_eq!(state.focused(), Some(0));
        assert!(row_text(&buffer, 1).contains("node-5"));
    }
}
