#![forbid(unsafe_code)]

//! Render-ready ordering of the visible options.
//!
//! [`project`] combines the pinned (sticky) segment with the keyword-filtered
//! tree and produces both the structured result and the flattened [`Row`]
//! list that focus traversal, pointer hit-testing and the viewport index into.
//!
//! # Invariants
//!
//! 1. A selectable identifier appears in at most one row.
//! 2. Sticky rows precede every other item row when no group key is set.
//! 3. Group header rows are never focus targets.

use crate::group::{self, Group, Sort};
use crate::item::{Item, ItemValue};
use crate::tree;

/// One line of the visible list.
#[derive(Debug, Clone)]
pub enum Row {
    /// A group header.
    Group {
        /// Header text.
        label: String,
        /// Nesting depth, 0 for top level.
        depth: usize,
    },
    /// A selectable option.
    Item {
        /// The option.
        item: Item,
        /// Nesting depth, 0 for top level.
        depth: usize,
        /// Whether the row belongs to the pinned segment.
        sticky: bool,
    },
}

impl Row {
    /// The option on this row, if it is not a header.
    #[must_use]
    pub fn item(&self) -> Option<&Item> {
        match self {
            Self::Item { item, .. } => Some(item),
            Self::Group { .. } => None,
        }
    }

    /// Whether this row is a group header.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }

    /// Nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Group { depth, .. } | Self::Item { depth, .. } => *depth,
        }
    }
}

/// The visible list, structured and flattened.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    sticky: Vec<Item>,
    filtered: Vec<Item>,
    groups: Option<Vec<Group>>,
    rows: Vec<Row>,
}

impl Projection {
    /// Pinned items, in capture order.
    #[must_use]
    pub fn sticky(&self) -> &[Item] {
        &self.sticky
    }

    /// Trailing segment: the filtered tree without pinned items, sorted.
    #[must_use]
    pub fn filtered(&self) -> &[Item] {
        &self.filtered
    }

    /// Buckets, when a group key is configured.
    #[must_use]
    pub fn groups(&self) -> Option<&[Group]> {
        self.groups.as_deref()
    }

    /// Flattened rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Whether nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row index of the option with identifier `value`.
    #[must_use]
    pub fn row_of(&self, value: &ItemValue) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.item().is_some_and(|item| item.value.shallow_eq(value)))
    }

    /// Whether an option with identifier `value` is visible.
    #[must_use]
    pub fn contains(&self, value: &ItemValue) -> bool {
        self.row_of(value).is_some()
    }

    /// Selectable items in display order.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.rows.iter().filter_map(Row::item)
    }
}

/// Build the visible list.
///
/// Leaves of `filtered` that also appear in `sticky` are dropped. Without a
/// group key the item comparator orders the trailing segment only. With a
/// group key the concatenation (sticky leaves first, then filtered leaves) is
/// bucketed by that field.
#[must_use]
pub fn project(sticky: Vec<Item>, filtered: &[Item], group_key: Option<&str>, sort: &Sort) -> Projection {
    let mut trailing = tree::retain_leaves(filtered, &mut |item| {
        !sticky.iter().any(|s| s.value.shallow_eq(&item.value))
    });

    let mut rows = Vec::new();
    let groups = match group_key {
        Some(key) => {
            let combined: Vec<Item> = sticky
                .iter()
                .cloned()
                .chain(tree::leaves(&trailing).cloned())
                .collect();
            let groups = group::group_by(combined, key, sort);
            for bucket in &groups {
                rows.push(Row::Group {
                    label: bucket.label.clone(),
                    depth: 0,
                });
                for item in &bucket.items {
                    let pinned = sticky.iter().any(|s| s.value.shallow_eq(&item.value));
                    rows.push(Row::Item {
                        item: item.clone(),
                        depth: 1,
                        sticky: pinned,
                    });
                }
            }
            Some(groups)
        }
        None => {
            sort.sort_items(&mut trailing);
            rows.extend(sticky.iter().map(|item| Row::Item {
                item: item.clone(),
                depth: 0,
                sticky: true,
            }));
            push_tree_rows(&trailing, 0, &mut rows);
            None
        }
    };

    Projection {
        sticky,
        filtered: trailing,
        groups,
        rows,
    }
}

fn push_tree_rows(nodes: &[Item], depth: usize, rows: &mut Vec<Row>) {
    for node in nodes {
        if node.is_group() {
            rows.push(Row::Group {
                label: node.label.clone(),
                depth,
            });
            push_tree_rows(&node.children, depth + 1, rows);
        } else {
            rows.push(Row::Item {
                item: node.clone(),
                depth,
                sticky: false,
            });
        }
    }
}
