use crate::auto_expand::AutoExpand;
use crate::error::{TreeError, TreeResult};
use crate::glyphs::{TreeGlyphSet, TreeGlyphs};
use crate::style::{TreeScrollPolicy, TreeViewStyle};

#[cfg(feature = "keymap")]
use crate::keymap::KeymapProfile;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Behavioural settings of a tree view, loadable from TOML with the `serde`
/// feature.
///
/// ```toml
/// prevent_blur = true
/// scroll_policy = "keep-in-view"
///
/// [auto_expand]
/// depth = 1
/// all_roots = false
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeViewConfig {
    pub auto_expand: AutoExpand,
    /// Keep focus when the tree loses keyboard focus.
    pub prevent_blur: bool,
    pub draw_lines: bool,
    pub glyphs: TreeGlyphSet,
    pub scroll_policy: TreeScrollPolicy,
    pub virtualize_rows: bool,
    #[cfg(feature = "keymap")]
    pub keymap: KeymapProfile,
}

impl Default for TreeViewConfig {
    fn default() -> Self {
        Self {
            auto_expand: AutoExpand::disabled(),
            prevent_blur: false,
            draw_lines: true,
            glyphs: TreeGlyphSet::default(),
            scroll_policy: TreeScrollPolicy::default(),
            virtualize_rows: false,
            #[cfg(feature = "keymap")]
            keymap: KeymapProfile::default(),
        }
    }
}

impl TreeViewConfig {
    /// Parses and validates a TOML document.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(raw: &str) -> TreeResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that the type system cannot express.
    pub fn validate(&self) -> TreeResult<()> {
        if let Some(0) = self.auto_expand.node_children_limit {
            return Err(TreeError::InvalidConfig {
                field: "auto_expand.node_children_limit",
                reason: "must be greater than zero (omit it to disable the limit)",
            });
        }
        Ok(())
    }

    /// Glyphs selected by `glyphs`.
    pub const fn tree_glyphs(&self) -> TreeGlyphs<'static> {
        self.glyphs.glyphs()
    }

    /// Copies the rendering-related settings into `style`.
    #[must_use]
    pub fn apply_style<'a>(&self, mut style: TreeViewStyle<'a>) -> TreeViewStyle<'a> {
        style.scroll_policy = self.scroll_policy;
        style.virtualize_rows = self.virtualize_rows;
        style
    }
}
