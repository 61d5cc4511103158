#![forbid(unsafe_code)]

//! Tree utilities over [`Item`] hierarchies.
//!
//! Flat data is a tree without group nodes, so these functions serve both
//! shapes. All of them are pure: inputs are borrowed and fresh trees are
//! returned.

use crate::item::Item;

/// Keep the nodes that satisfy `predicate`, preserving ancestor chains.
///
/// For a group node the children are filtered first. If any child survives,
/// the group is kept with only the surviving children. Otherwise the group is
/// tested against `predicate` itself and, when it matches, kept with all of
/// its children.
pub fn filter_tree<F>(nodes: &[Item], predicate: &mut F) -> Vec<Item>
where
    F: FnMut(&Item) -> bool,
{
    let mut out = Vec::new();
    for node in nodes {
        if node.is_group() {
            let children = filter_tree(&node.children, predicate);
            if !children.is_empty() {
                out.push(Item {
                    children,
                    ..shallow_clone(node)
                });
                continue;
            }
        }
        if predicate(node) {
            out.push(node.clone());
        }
    }
    out
}

/// Keep the leaves that satisfy `keep`, dropping groups left without children.
pub fn retain_leaves<F>(nodes: &[Item], keep: &mut F) -> Vec<Item>
where
    F: FnMut(&Item) -> bool,
{
    let mut out = Vec::new();
    for node in nodes {
        if node.is_group() {
            let children = retain_leaves(&node.children, keep);
            if !children.is_empty() {
                out.push(Item {
                    children,
                    ..shallow_clone(node)
                });
            }
        } else if keep(node) {
            out.push(node.clone());
        }
    }
    out
}

/// Depth-first iterator over the selectable (non-group) items of a tree.
pub fn leaves(nodes: &[Item]) -> Leaves<'_> {
    Leaves {
        stack: vec![nodes.iter()],
    }
}

/// The first selectable item of a tree, depth-first.
#[must_use]
pub fn first_leaf(nodes: &[Item]) -> Option<&Item> {
    leaves(nodes).next()
}

/// Iterator returned by [`leaves`].
#[derive(Debug, Clone)]
pub struct Leaves<'a> {
    stack: Vec<std::slice::Iter<'a, Item>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) if node.is_group() => self.stack.push(node.children.iter()),
                Some(node) => return Some(node),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Clone a node without its children.
fn shallow_clone(node: &Item) -> Item {
    Item {
        value: node.value.clone(),
        label: node.label.clone(),
        children: Vec::new(),
        disabled: node.disabled,
        fields: node.fields.clone(),
    }
}
