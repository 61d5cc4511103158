#![forbid(unsafe_code)]

//! Keyboard focus over the visible rows.
//!
//! # Invariants
//!
//! 1. After [`FocusCursor::reconcile`], the focused identifier is either
//!    present in the rows or unset.
//! 2. Moving never lands on a group header or a disabled option.
//! 3. Moving past the first or last eligible row leaves focus unchanged.

use crate::item::{Item, ItemValue};
use crate::projection::Row;

/// Direction of a focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the top of the list.
    Up,
    /// Towards the bottom of the list.
    Down,
}

/// The keyboard-highlighted identifier.
#[derive(Debug, Clone, Default)]
pub struct FocusCursor {
    focused: Option<ItemValue>,
}

impl FocusCursor {
    /// Create a cursor, optionally focused.
    #[must_use]
    pub fn new(initial: Option<ItemValue>) -> Self {
        Self { focused: initial }
    }

    /// The focused identifier.
    #[must_use]
    pub fn focused(&self) -> Option<&ItemValue> {
        self.focused.as_ref()
    }

    /// Whether `value` is the focused identifier.
    #[must_use]
    pub fn is_focused(&self, value: &ItemValue) -> bool {
        self.focused.as_ref().is_some_and(|f| f.shallow_eq(value))
    }

    /// Pin focus to `value`.
    pub fn set(&mut self, value: ItemValue) {
        self.focused = Some(value);
    }

    /// Unset focus.
    pub fn clear(&mut self) {
        self.focused = None;
    }

    /// Move to the next eligible row in `direction`.
    ///
    /// From an unset focus, `Down` lands on the first eligible row and `Up`
    /// does nothing. Returns the focused identifier after the move.
    pub fn move_focus<F>(&mut self, direction: Direction, rows: &[Row], is_disabled: F) -> Option<&ItemValue>
    where
        F: Fn(&Item) -> bool,
    {
        let current = self
            .focused
            .as_ref()
            .and_then(|f| rows.iter().position(|row| row_holds(row, f)));

        let target = match (direction, current) {
            (Direction::Down, None) => rows
                .iter()
                .find_map(|row| eligible_item(row, &is_disabled)),
            (Direction::Down, Some(idx)) => rows[idx + 1..]
                .iter()
                .find_map(|row| eligible_item(row, &is_disabled)),
            (Direction::Up, None) => None,
            (Direction::Up, Some(idx)) => rows[..idx]
                .iter()
                .rev()
                .find_map(|row| eligible_item(row, &is_disabled)),
        };

        if let Some(item) = target {
            self.focused = Some(item.value.clone());
        }
        self.focused.as_ref()
    }

    /// Unset focus when its identifier is no longer among `rows`.
    ///
    /// Returns `true` when focus was cleared.
    pub fn reconcile(&mut self, rows: &[Row]) -> bool {
        let dangling = self
            .focused
            .as_ref()
            .is_some_and(|f| !rows.iter().any(|row| row_holds(row, f)));
        if dangling {
            self.focused = None;
        }
        dangling
    }
}

fn eligible_item<'r>(row: &'r Row, is_disabled: &impl Fn(&Item) -> bool) -> Option<&'r Item> {
    row.item().filter(|item| !is_disabled(item))
}

fn row_holds(row: &Row, value: &ItemValue) -> bool {
    row.item().is_some_and(|item| item.value.shallow_eq(value))
}
