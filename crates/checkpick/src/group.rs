#![forbid(unsafe_code)]

//! Grouping and ordering of options.
//!
//! [`group_by`] buckets items by the value of one record field. Buckets keep
//! first-occurrence order unless a group comparator is supplied, and members
//! keep source order unless an item comparator is supplied. All sorts are
//! stable.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::item::Item;

/// Comparator over two items.
pub type ItemComparator = Arc<dyn Fn(&Item, &Item) -> Ordering + Send + Sync>;

/// Comparator over two group labels.
pub type GroupComparator = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

/// Caller-supplied ordering for items and group buckets.
#[derive(Clone, Default)]
pub struct Sort {
    item: Option<ItemComparator>,
    group: Option<GroupComparator>,
}

impl fmt::Debug for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sort")
            .field("item", &self.item.is_some())
            .field("group", &self.group.is_some())
            .finish()
    }
}

impl Sort {
    /// No ordering: source order everywhere.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the item comparator (builder).
    #[must_use]
    pub fn by_item<F>(mut self, cmp: F) -> Self
    where
        F: Fn(&Item, &Item) -> Ordering + Send + Sync + 'static,
    {
        self.item = Some(Arc::new(cmp));
        self
    }

    /// Set the group label comparator (builder).
    #[must_use]
    pub fn by_group<F>(mut self, cmp: F) -> Self
    where
        F: Fn(&str, &str) -> Ordering + Send + Sync + 'static,
    {
        self.group = Some(Arc::new(cmp));
        self
    }

    /// Whether any comparator is set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.item.is_some() || self.group.is_some()
    }

    /// Stable-sort `items` and, recursively, the children of any group among them.
    pub fn sort_items(&self, items: &mut [Item]) {
        let Some(cmp) = &self.item else {
            return;
        };
        sort_tree(items, cmp.as_ref());
    }

    /// Stable-sort group buckets by label.
    pub fn sort_groups(&self, groups: &mut [Group]) {
        if let Some(cmp) = &self.group {
            groups.sort_by(|a, b| cmp(&a.label, &b.label));
        }
    }
}

fn sort_tree(items: &mut [Item], cmp: &(dyn Fn(&Item, &Item) -> Ordering + Send + Sync)) {
    items.sort_by(|a, b| cmp(a, b));
    for item in items.iter_mut().filter(|i| i.is_group()) {
        sort_tree(&mut item.children, cmp);
    }
}

/// One bucket produced by [`group_by`].
#[derive(Debug, Clone)]
pub struct Group {
    /// Bucket title: the display form of the shared field value.
    pub label: String,
    /// Members in bucket order.
    pub items: Vec<Item>,
}

/// Partition `items` into buckets keyed by the field `key`.
///
/// Items lacking the field land in a bucket titled with an empty string.
#[must_use]
pub fn group_by(items: Vec<Item>, key: &str, sort: &Sort) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let label = item.field(key).map(ToString::to_string).unwrap_or_default();
        match index.get(&label) {
            Some(&slot) => groups[slot].items.push(item),
            None => {
                index.insert(label.clone(), groups.len());
                groups.push(Group {
                    label,
                    items: vec![item],
                });
            }
        }
    }

    for group in &mut groups {
        sort.sort_items(&mut group.items);
    }
    sort.sort_groups(&mut groups);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit(value: i32, label: &str, kind: &str) -> Item {
        Item::new(value, label).with_field("kind", kind)
    }

    fn sample() -> Vec<Item> {
        vec![
            fruit(1, "Lime", "citrus"),
            fruit(2, "Apple", "pome"),
            fruit(3, "Lemon", "citrus"),
            fruit(4, "Pear", "pome"),
        ]
    }

    #[test]
    fn buckets_follow_first_occurrence() {
        let groups = group_by(sample(), "kind", &Sort::none());
        let titles: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(titles, ["citrus", "pome"]);
        let citrus: Vec<_> = groups[0].items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(citrus, ["Lime", "Lemon"], "source order is preserved");
    }

    #[test]
    fn comparators_sort_buckets_and_members() {
        let sort = Sort::none()
            .by_group(|a, b| b.cmp(a))
            .by_item(|a, b| a.label.cmp(&b.label));
        let groups = group_by(sample(), "kind", &sort);
        let titles: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(titles, ["pome", "citrus"]);
        let citrus: Vec<_> = groups[1].items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(citrus, ["Lemon", "Lime"]);
    }

    #[test]
    fn missing_field_goes_to_untitled_bucket() {
        let mut items = sample();
        items.push(Item::new(5, "Mystery"));
        let groups = group_by(items, "kind", &Sort::none());
        assert_eq!(groups.last().map(|g| g.label.as_str()), Some(""));
    }

    #[test]
    fn sort_items_recurses_into_groups() {
        let mut items = vec![
            Item::group("z", vec![Item::new(2, "b"), Item::new(1, "a")]),
            Item::new(3, "c"),
        ];
        Sort::none()
            .by_item(|a, b| a.label.cmp(&b.label))
            .sort_items(&mut items);
        assert_eq!(items[0].label, "c");
        assert_eq!(items[1].children[0].label, "a");
    }
}
