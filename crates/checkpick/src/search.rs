#![forbid(unsafe_code)]

//! Keyword filtering.
//!
//! The default predicate is a case-insensitive substring match on the item
//! label: both sides are lowercased with [`str::to_lowercase`]. A keyword that
//! is empty or whitespace matches every item. A caller-supplied [`SearchBy`]
//! replaces the default entirely and receives the raw keyword.
//!
//! Filtering is a pure function of (items, keyword, predicate); the engine only
//! remembers the keyword.

use std::fmt;
use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::item::{Item, ItemValue};
use crate::tree;

/// Custom match predicate: `(keyword, label, item) -> matches`.
pub type SearchBy = Arc<dyn Fn(&str, &str, &Item) -> bool + Send + Sync>;

/// Result of applying a keyword.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Surviving tree.
    pub filtered: Vec<Item>,
    /// Identifier of the first surviving selectable item, the new focus target.
    pub focus_candidate: Option<ItemValue>,
}

/// Tracks the keyword and filters items against it.
#[derive(Clone, Default)]
pub struct SearchEngine {
    keyword: String,
    search_by: Option<SearchBy>,
}

impl fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEngine")
            .field("keyword", &self.keyword)
            .field("search_by", &self.search_by.is_some())
            .finish()
    }
}

impl SearchEngine {
    /// Create an engine with an optional custom predicate.
    #[must_use]
    pub fn new(search_by: Option<SearchBy>) -> Self {
        Self {
            keyword: String::new(),
            search_by,
        }
    }

    /// Current keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Replace the keyword and filter `items` with it.
    pub fn search(&mut self, items: &[Item], keyword: impl Into<String>) -> SearchOutcome {
        self.keyword = keyword.into();
        let filtered = self.filter(items);
        let focus_candidate = tree::first_leaf(&filtered).map(|item| item.value.clone());
        SearchOutcome {
            filtered,
            focus_candidate,
        }
    }

    /// Keyword with `text` appended.
    #[must_use]
    pub fn appended(&self, text: &str) -> String {
        let mut next = self.keyword.clone();
        next.push_str(text);
        next
    }

    /// Keyword with its last grapheme cluster removed, or `None` when empty.
    #[must_use]
    pub fn popped(&self) -> Option<String> {
        let (idx, _) = self.keyword.grapheme_indices(true).next_back()?;
        Some(self.keyword[..idx].to_string())
    }

    /// Forget the keyword.
    pub fn reset(&mut self) {
        self.keyword.clear();
    }

    /// Filter `items` with the current keyword, preserving tree shape.
    #[must_use]
    pub fn filter(&self, items: &[Item]) -> Vec<Item> {
        tree::filter_tree(items, &mut |item| self.matches(item))
    }

    /// Whether a single item matches the current keyword.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        match &self.search_by {
            Some(search_by) => search_by(&self.keyword, &item.label, item),
            None => label_matches(&item.label, &self.keyword),
        }
    }
}

/// Default predicate: case-insensitive substring; blank keywords match all.
#[must_use]
pub fn label_matches(label: &str, keyword: &str) -> bool {
    if keyword.trim().is_empty() {
        return true;
    }
    label.to_lowercase().contains(&keyword.to_lowercase())
}
