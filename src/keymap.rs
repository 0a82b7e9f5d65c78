use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::TreeAction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which keys drive row navigation.
///
/// Every profile shares Home/End, Enter/Space, Escape and Tab handling.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeymapProfile {
    /// Arrow keys and `hjkl`.
    #[default]
    Default,
    /// `hjkl` only.
    Vim,
    /// Arrow keys only.
    Arrows,
}

#[derive(Clone, Copy, Debug)]
pub struct TreeKeyBindings {
    profile: KeymapProfile,
}

impl Default for TreeKeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeKeyBindings {
    pub const fn new() -> Self {
        Self {
            profile: KeymapProfile::Default,
        }
    }

    pub const fn with_profile(profile: KeymapProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> KeymapProfile {
        self.profile
    }

    pub const fn set_profile(&mut self, profile: KeymapProfile) {
        self.profile = profile;
    }

    pub fn resolve<C>(&self, key: KeyEvent) -> Option<TreeAction<C>> {
        match key.code {
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                return Some(TreeAction::FocusPrevElement);
            }
            KeyCode::Tab => return Some(TreeAction::FocusNextElement),
            KeyCode::BackTab => return Some(TreeAction::FocusPrevElement),
            _ => {}
        }

        // Modified keys belong to the application, except Shift on printable
        // characters (e.g. `*` on most layouts).
        let blocked = KeyModifiers::CONTROL
            | KeyModifiers::ALT
            | KeyModifiers::SUPER
            | KeyModifiers::META;
        if key.modifiers.intersects(blocked) {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, KeyCode::Char(_)) {
            return None;
        }

        let nav_action = match self.profile {
            KeymapProfile::Default => self.resolve_default_nav(key),
            KeymapProfile::Vim => self.resolve_vim_nav(key),
            KeymapProfile::Arrows => self.resolve_arrow_nav(key),
        };
        if nav_action.is_some() {
            return nav_action;
        }

        self.resolve_common(key)
    }

    pub fn resolve_with<C, F>(&self, key: KeyEvent, custom: F) -> Option<TreeAction<C>>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        if let Some(action) = custom(key) {
            return Some(TreeAction::Custom(action));
        }

        self.resolve(key)
    }

    const fn resolve_default_nav<C>(&self, key: KeyEvent) -> Option<TreeAction<C>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(TreeAction::FocusPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(TreeAction::FocusNext),
            KeyCode::Left | KeyCode::Char('h') => Some(TreeAction::CollapseOrFocusParent),
            KeyCode::Right | KeyCode::Char('l') => Some(TreeAction::ExpandOrFocusNext),
            _ => None,
        }
    }

    const fn resolve_vim_nav<C>(&self, key: KeyEvent) -> Option<TreeAction<C>> {
        match key.code {
            KeyCode::Char('k') => Some(TreeAction::FocusPrev),
            KeyCode::Char('j') => Some(TreeAction::FocusNext),
            KeyCode::Char('h') => Some(TreeAction::CollapseOrFocusParent),
            KeyCode::Char('l') => Some(TreeAction::ExpandOrFocusNext),
            _ => None,
        }
    }

    const fn resolve_arrow_nav<C>(&self, key: KeyEvent) -> Option<TreeAction<C>> {
        match key.code {
            KeyCode::Up => Some(TreeAction::FocusPrev),
            KeyCode::Down => Some(TreeAction::FocusNext),
            KeyCode::Left => Some(TreeAction::CollapseOrFocusParent),
            KeyCode::Right => Some(TreeAction::ExpandOrFocusNext),
            _ => None,
        }
    }

    const fn resolve_common<C>(&self, key: KeyEvent) -> Option<TreeAction<C>> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(TreeAction::Activate),
            KeyCode::Esc => Some(TreeAction::Deactivate),
            KeyCode::Home => Some(TreeAction::FocusFirst),
            KeyCode::End => Some(TreeAction::FocusLast),
            KeyCode::Char('*') => Some(TreeAction::ToggleRecursive),
            KeyCode::Char('g') => Some(TreeAction::ToggleGuides),
            _ => None,
        }
    }
}
