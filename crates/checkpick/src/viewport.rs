#![forbid(unsafe_code)]

//! Scroll window over the visible rows.

use std::ops::Range;

/// Default number of rows painted at once.
pub const DEFAULT_MAX_VISIBLE_ROWS: usize = 8;

/// A window of at most `max_visible` rows starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    max_visible: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VISIBLE_ROWS)
    }
}

impl Viewport {
    /// Create a viewport; a zero height is treated as one row.
    #[must_use]
    pub fn new(max_visible: usize) -> Self {
        Self {
            offset: 0,
            max_visible: max_visible.max(1),
        }
    }

    /// First visible row.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Window height in rows.
    #[must_use]
    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Row range to paint out of `total` rows.
    #[must_use]
    pub fn window(&self, total: usize) -> Range<usize> {
        let start = self.offset.min(total);
        start..(start + self.max_visible).min(total)
    }

    /// Scroll the minimum amount that brings `row` into the window.
    pub fn ensure_visible(&mut self, row: usize) {
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + self.max_visible {
            self.offset = row + 1 - self.max_visible;
        }
    }

    /// Scroll by `delta` rows, staying within `total`.
    pub fn scroll_by(&mut self, delta: isize, total: usize) {
        let next = self.offset.saturating_add_signed(delta);
        self.offset = next;
        self.clamp(total);
    }

    /// Pull the offset back so the window never starts past the last page.
    pub fn clamp(&mut self, total: usize) {
        let max_offset = total.saturating_sub(self.max_visible);
        self.offset = self.offset.min(max_offset);
    }

    /// Scroll to the top.
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}
