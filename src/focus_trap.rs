/// Keyboard focus confined to the focusable controls of the active row.
///
/// Tab from the last control wraps to the first and Shift-Tab from the first
/// wraps to the last, so focus never leaves the row while it is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusTrap {
    current: usize,
    count: usize,
}

impl FocusTrap {
    /// Creates a trap over `count` controls focused on the first one, or
    /// `None` if the row has nothing focusable.
    pub const fn new(count: usize) -> Option<Self> {
        if count == 0 {
            None
        } else {
            Some(Self { current: 0, count })
        }
    }

    /// Index of the focused control.
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Number of focusable controls.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Moves to the next control; returns `true` if focus wrapped around.
    pub const fn move_next(&mut self) -> bool {
        if self.current + 1 >= self.count {
            self.current = 0;
            true
        } else {
            self.current += 1;
            false
        }
    }

    /// Moves to the previous control; returns `true` if focus wrapped around.
    pub const fn move_prev(&mut self) -> bool {
        if self.current == 0 {
            self.current = self.count - 1;
            true
        } else {
            self.current -= 1;
            false
        }
    }
}
