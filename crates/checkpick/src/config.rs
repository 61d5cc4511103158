#![forbid(unsafe_code)]

//! Picker configuration.
//!
//! [`PickerOptions`] holds the plain settings and can be (de)serialized with
//! the `serde` feature. [`PickerConfig`] adds the data, the initial value and
//! the caller-supplied closures, and is what [`CheckPicker::new`] consumes.
//!
//! [`CheckPicker::new`]: crate::CheckPicker::new

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::group::Sort;
use crate::item::{Dataset, FieldKeys, Item, ItemValue};
use crate::locale::PickerLocale;
use crate::search::SearchBy;
use crate::viewport::DEFAULT_MAX_VISIBLE_ROWS;

/// Plain picker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PickerOptions {
    /// Show the search bar and filter by keyword.
    pub searchable: bool,
    /// Pin the selection at the top of the menu on open.
    pub sticky: bool,
    /// Allow clearing the whole selection.
    pub cleanable: bool,
    /// Disable the whole control.
    pub disabled: bool,
    /// Append the selection count to the display text.
    pub countable: bool,
    /// Rows painted at once.
    pub max_visible_rows: usize,
    /// Record field to bucket options by.
    pub group_by: Option<String>,
    /// Locale tag for built-in strings; `None` detects it from the environment.
    pub locale: Option<String>,
    /// Wait for [`finish_transition`](crate::CheckPicker::finish_transition)
    /// instead of completing transitions immediately.
    pub animated: bool,
    /// Field selectors for record import.
    pub fields: FieldKeys,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            searchable: true,
            sticky: false,
            cleanable: true,
            disabled: false,
            countable: true,
            max_visible_rows: DEFAULT_MAX_VISIBLE_ROWS,
            group_by: None,
            locale: None,
            animated: true,
            fields: FieldKeys::default(),
        }
    }
}

/// Everything needed to build a picker.
#[derive(Clone, Default)]
pub struct PickerConfig {
    pub(crate) options: PickerOptions,
    pub(crate) data: Dataset,
    pub(crate) value: Option<Vec<ItemValue>>,
    pub(crate) default_value: Vec<ItemValue>,
    pub(crate) disabled_item_values: Vec<ItemValue>,
    pub(crate) sort: Sort,
    pub(crate) search_by: Option<SearchBy>,
    pub(crate) strings: Option<PickerLocale>,
    pub(crate) placeholder: Option<String>,
}

impl fmt::Debug for PickerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerConfig")
            .field("options", &self.options)
            .field("items", &self.data.len())
            .field("value", &self.value)
            .field("default_value", &self.default_value)
            .field("sort", &self.sort)
            .field("search_by", &self.search_by.is_some())
            .finish_non_exhaustive()
    }
}

impl PickerConfig {
    /// Create a configuration with default options and no data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a set of plain options.
    #[must_use]
    pub fn from_options(options: PickerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The plain options.
    #[must_use]
    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    /// Set the dataset (builder).
    #[must_use]
    pub fn data(mut self, data: impl Into<Dataset>) -> Self {
        self.data = data.into();
        self
    }

    /// Import records through the configured field selectors (builder).
    #[cfg(feature = "serde")]
    #[must_use]
    pub fn json_data(mut self, records: &serde_json::Value) -> Self {
        self.data = Dataset::from_json(records, &self.options.fields);
        self
    }

    /// Make the picker controlled by the host, starting at `value` (builder).
    #[must_use]
    pub fn value(mut self, value: impl IntoIterator<Item = impl Into<ItemValue>>) -> Self {
        self.value = Some(value.into_iter().map(Into::into).collect());
        self
    }

    /// Initial selection of an uncontrolled picker (builder).
    #[must_use]
    pub fn default_value(mut self, value: impl IntoIterator<Item = impl Into<ItemValue>>) -> Self {
        self.default_value = value.into_iter().map(Into::into).collect();
        self
    }

    /// Identifiers that cannot be toggled or focused (builder).
    #[must_use]
    pub fn disabled_item_values(
        mut self,
        values: impl IntoIterator<Item = impl Into<ItemValue>>,
    ) -> Self {
        self.disabled_item_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Record field holding the identifier (builder).
    #[must_use]
    pub fn value_key(mut self, key: impl Into<String>) -> Self {
        self.options.fields.value_key = key.into();
        self
    }

    /// Record field holding the display text (builder).
    #[must_use]
    pub fn label_key(mut self, key: impl Into<String>) -> Self {
        self.options.fields.label_key = key.into();
        self
    }

    /// Enable or disable keyword search (builder).
    #[must_use]
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.options.searchable = searchable;
        self
    }

    /// Enable or disable pinning the selection on open (builder).
    #[must_use]
    pub fn sticky(mut self, sticky: bool) -> Self {
        self.options.sticky = sticky;
        self
    }

    /// Enable or disable clearing (builder).
    #[must_use]
    pub fn cleanable(mut self, cleanable: bool) -> Self {
        self.options.cleanable = cleanable;
        self
    }

    /// Disable the whole control (builder).
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.options.disabled = disabled;
        self
    }

    /// Show the selection count in the display text (builder).
    #[must_use]
    pub fn countable(mut self, countable: bool) -> Self {
        self.options.countable = countable;
        self
    }

    /// Rows painted at once (builder).
    #[must_use]
    pub fn max_visible_rows(mut self, rows: usize) -> Self {
        self.options.max_visible_rows = rows;
        self
    }

    /// Bucket options by a record field (builder).
    #[must_use]
    pub fn group_by(mut self, key: impl Into<String>) -> Self {
        self.options.group_by = Some(key.into());
        self
    }

    /// Order options with an item comparator (builder).
    #[must_use]
    pub fn sort_items(mut self, cmp: impl Fn(&Item, &Item) -> Ordering + Send + Sync + 'static) -> Self {
        self.sort = self.sort.by_item(cmp);
        self
    }

    /// Order group buckets with a label comparator (builder).
    #[must_use]
    pub fn sort_groups(mut self, cmp: impl Fn(&str, &str) -> Ordering + Send + Sync + 'static) -> Self {
        self.sort = self.sort.by_group(cmp);
        self
    }

    /// Replace both comparators at once (builder).
    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Replace the match predicate (builder).
    #[must_use]
    pub fn search_by(mut self, f: impl Fn(&str, &str, &Item) -> bool + Send + Sync + 'static) -> Self {
        self.search_by = Some(Arc::new(f));
        self
    }

    /// Locale tag for built-in strings (builder).
    #[must_use]
    pub fn locale(mut self, tag: impl Into<String>) -> Self {
        self.options.locale = Some(tag.into());
        self
    }

    /// Use custom strings instead of a built-in catalog (builder).
    #[must_use]
    pub fn strings(mut self, strings: PickerLocale) -> Self {
        self.strings = Some(strings);
        self
    }

    /// Override the placeholder text only (builder).
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    /// Complete transitions immediately when `false` (builder).
    #[must_use]
    pub fn animated(mut self, animated: bool) -> Self {
        self.options.animated = animated;
        self
    }

    /// Strings after applying the locale and any overrides.
    pub(crate) fn resolve_strings(&self) -> PickerLocale {
        let mut strings = match (&self.strings, &self.options.locale) {
            (Some(strings), _) => strings.clone(),
            (None, Some(tag)) => PickerLocale::resolve(tag),
            (None, None) => PickerLocale::system(),
        };
        if let Some(placeholder) = &self.placeholder {
            strings.placeholder.clone_from(placeholder);
        }
        strings
    }
}
