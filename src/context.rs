use ratatui::style::Style;

/// Everything a row renderer needs to know about the row being drawn.
#[derive(Clone, Copy)]
pub struct TreeRowContext<'a> {
    pub depth: u16,
    pub is_tail_stack: &'a [bool],
    pub is_focused: bool,
    pub is_active: bool,
    pub is_expanded: bool,
    pub is_expandable: bool,
    pub draw_lines: bool,
    pub line_style: Style,
}
