#![forbid(unsafe_code)]

//! Selection ownership.
//!
//! The picker either owns its selection (uncontrolled) or mirrors a value the
//! host owns (controlled). The mode is fixed when the store is created.
//!
//! | Mode | `current()` returns | After a toggle |
//! |------|---------------------|----------------|
//! | Uncontrolled | the owned selection | owned selection is replaced |
//! | Controlled | the host's last value, verbatim | unchanged until the host calls `sync_controlled` |

use checkpick_core::warn;

use crate::error::{PickerError, Result};
use crate::item::{ItemValue, contains_value, position_of};

/// Holder of the current selection.
#[derive(Debug, Clone)]
pub enum ValueStore {
    /// The host owns the value; this is its latest copy.
    Controlled(Vec<ItemValue>),
    /// The picker owns the value.
    Uncontrolled(Vec<ItemValue>),
}

impl Default for ValueStore {
    fn default() -> Self {
        Self::Uncontrolled(Vec::new())
    }
}

impl ValueStore {
    /// A store mirroring a host-owned value.
    #[must_use]
    pub fn controlled(value: Vec<ItemValue>) -> Self {
        Self::Controlled(value)
    }

    /// A self-owned store seeded from `default_value`, without duplicates.
    #[must_use]
    pub fn uncontrolled(default_value: Vec<ItemValue>) -> Self {
        Self::Uncontrolled(dedup(default_value))
    }

    /// The current selection, in selection order.
    #[must_use]
    pub fn current(&self) -> &[ItemValue] {
        match self {
            Self::Controlled(v) | Self::Uncontrolled(v) => v,
        }
    }

    /// Whether the host owns the value.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::Controlled(_))
    }

    /// Whether `value` is selected.
    #[must_use]
    pub fn contains(&self, value: &ItemValue) -> bool {
        contains_value(self.current(), value)
    }

    /// Store a new selection produced by the mutator.
    ///
    /// Controlled stores ignore this; the host answers with `sync_controlled`.
    pub(crate) fn commit(&mut self, next: Vec<ItemValue>) {
        if let Self::Uncontrolled(v) = self {
            *v = next;
        }
    }

    /// Replace the mirrored value of a controlled store.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::ModeSwitch`] on an uncontrolled store; the store
    /// is left untouched.
    pub fn sync_controlled(&mut self, value: Vec<ItemValue>) -> Result<()> {
        match self {
            Self::Controlled(v) => {
                *v = value;
                Ok(())
            }
            Self::Uncontrolled(_) => {
                warn!("controlled value supplied to an uncontrolled picker");
                Err(PickerError::ModeSwitch)
            }
        }
    }
}

/// The selection after toggling `value`: appended if absent, otherwise the
/// first shallow-equal entry is removed.
#[must_use]
pub fn toggled(current: &[ItemValue], value: &ItemValue) -> Vec<ItemValue> {
    let mut next = current.to_vec();
    match position_of(&next, value) {
        Some(idx) => {
            next.remove(idx);
        }
        None => next.push(value.clone()),
    }
    next
}

fn dedup(values: Vec<ItemValue>) -> Vec<ItemValue> {
    let mut out: Vec<ItemValue> = Vec::with_capacity(values.len());
    for value in values {
        if !contains_value(&out, &value) {
            out.push(value);
        }
    }
    out
}
