#![forbid(unsafe_code)]

//! Pinned selection for one open session.
//!
//! The snapshot is taken once when the menu finishes opening and stays fixed
//! while the menu is open, so rows do not jump as the user toggles options.
//! Replacing the dataset while open re-resolves the captured identifiers
//! against the new data; the set of identifiers itself never changes until the
//! next capture.

use crate::item::{Dataset, Item, ItemValue};

/// Items captured at open time.
#[derive(Debug, Clone, Default)]
pub struct StickySnapshot {
    enabled: bool,
    captured: Vec<ItemValue>,
    items: Vec<Item>,
}

impl StickySnapshot {
    /// Create a snapshot holder; a disabled one never captures anything.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    /// Whether capturing is enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Capture the dataset items whose identifiers are in `selection`.
    pub fn capture(&mut self, dataset: &Dataset, selection: &[ItemValue]) {
        if !self.enabled {
            return;
        }
        self.captured = selection.to_vec();
        self.items = dataset.matching(&self.captured);
    }

    /// Re-resolve the captured identifiers against a replacement dataset.
    pub fn rebase(&mut self, dataset: &Dataset) {
        if !self.captured.is_empty() {
            self.items = dataset.matching(&self.captured);
        }
    }

    /// Drop the snapshot.
    pub fn discard(&mut self) {
        self.captured.clear();
        self.items.clear();
    }

    /// Captured items in dataset order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Whether nothing is pinned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
