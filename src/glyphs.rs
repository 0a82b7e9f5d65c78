use std::borrow::Cow;

use ratatui::text::{Line, Span};

use crate::context::TreeRowContext;
use crate::model::TreeModel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Characters used for indentation, guide lines and the expand arrow.
#[derive(Clone, Copy, Debug)]
pub struct TreeGlyphs<'a> {
    pub indent: &'a str,
    pub branch_last: &'a str,
    pub branch: &'a str,
    pub vert: &'a str,
    pub empty: &'a str,
    pub leaf: &'a str,
    pub expanded: &'a str,
    pub collapsed: &'a str,
}

impl TreeGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            indent: "   ",
            branch_last: "└──",
            branch: "├──",
            vert: "│  ",
            empty: "   ",
            leaf: " ",
            expanded: "▼",
            collapsed: "▶",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            indent: "   ",
            branch_last: "`--",
            branch: "|--",
            vert: "|  ",
            empty: "   ",
            leaf: " ",
            expanded: "v",
            collapsed: ">",
        }
    }
}

/// Named glyph presets, selectable from configuration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TreeGlyphSet {
    #[default]
    Unicode,
    Ascii,
}

impl TreeGlyphSet {
    pub const fn glyphs(self) -> TreeGlyphs<'static> {
        match self {
            Self::Unicode => TreeGlyphs::unicode(),
            Self::Ascii => TreeGlyphs::ascii(),
        }
    }
}

/// Text of a row: the name and an optional decoration drawn before it.
#[derive(Clone)]
pub struct TreeLabelParts<'a> {
    pub name: &'a str,
    pub prefix: Option<Cow<'a, str>>,
}

/// Supplies label text; rows get the default arrow and guide rendering.
pub trait TreeLabelProvider<T: TreeModel> {
    fn label_parts<'a>(&'a self, model: &'a T, id: T::Id) -> TreeLabelParts<'a>;
}

/// Renders one row of the tree.
pub trait TreeItemRenderer<T: TreeModel> {
    fn line<'a>(
        &'a self,
        model: &'a T,
        id: T::Id,
        ctx: &TreeRowContext,
        glyphs: &TreeGlyphs<'a>,
    ) -> Line<'a>;
}

impl<T, P> TreeItemRenderer<T> for P
where
    T: TreeModel,
    P: TreeLabelProvider<T>,
{
    fn line<'a>(
        &'a self,
        model: &'a T,
        id: T::Id,
        ctx: &TreeRowContext,
        glyphs: &TreeGlyphs<'a>,
    ) -> Line<'a> {
        tree_label_line(ctx, self.label_parts(model, id), glyphs)
    }
}

/// The arrow for expandable rows, the leaf glyph otherwise.
pub const fn tree_arrow<'a>(ctx: &TreeRowContext<'_>, glyphs: &TreeGlyphs<'a>) -> &'a str {
    if !ctx.is_expandable {
        glyphs.leaf
    } else if ctx.is_expanded {
        glyphs.expanded
    } else {
        glyphs.collapsed
    }
}

/// Builds the default row line: indentation or guides, arrow, prefix, name.
pub fn tree_label_line<'a>(
    ctx: &TreeRowContext<'_>,
    parts: TreeLabelParts<'a>,
    glyphs: &TreeGlyphs<'a>,
) -> Line<'a> {
    let TreeLabelParts { name, prefix } = parts;
    let prefix = prefix.filter(|value| !value.is_empty());
    let depth = ctx.depth as usize;
    let mut spans = Vec::with_capacity(depth + 5);

    if ctx.draw_lines && depth > 0 {
        for (level, is_last) in ctx.is_tail_stack.iter().copied().enumerate() {
            let part = if level + 1 == depth {
                if is_last {
                    glyphs.branch_last
                } else {
                    glyphs.branch
                }
            } else if is_last {
                glyphs.indent
            } else {
                glyphs.vert
            };
            spans.push(Span::styled(part, ctx.line_style));
        }
    } else {
        for _ in 0..depth {
            spans.push(Span::raw(glyphs.empty));
        }
    }

    let arrow = tree_arrow(ctx, glyphs);
    if !arrow.is_empty() {
        spans.push(Span::raw(arrow));
        spans.push(Span::raw(" "));
    }
    if let Some(prefix) = prefix {
        spans.push(Span::raw(prefix));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw(name));
    Line::from(spans)
}
