use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Borders;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the viewport follows the focused row.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TreeScrollPolicy {
    /// Scroll the minimum amount that keeps the row in view.
    KeepInView,
    /// Always center the focused row.
    CenterOnSelect,
    /// Center a newly focused row only when it is outside the viewport.
    #[default]
    CenterWhenHidden,
}

/// Visual settings of the tree view.
#[derive(Clone)]
pub struct TreeViewStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    /// Style of the focused row.
    pub highlight_style: Style,
    /// Style of the active row.
    pub active_style: Style,
    pub line_style: Style,
    pub highlight_symbol: &'a str,
    pub borders: Borders,
    pub virtualize_rows: bool,
    pub scroll_policy: TreeScrollPolicy,
}

impl Default for TreeViewStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            highlight_style: Style::default(),
            active_style: Style::default(),
            line_style: Style::default(),
            highlight_symbol: ">> ",
            borders: Borders::ALL,
            virtualize_rows: false,
            scroll_policy: TreeScrollPolicy::default(),
        }
    }
}
