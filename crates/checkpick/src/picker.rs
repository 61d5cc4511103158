#![forbid(unsafe_code)]

//! The multi-select picker.
//!
//! [`CheckPicker`] owns every component (value store, search engine, focus
//! cursor, sticky snapshot, projection, lifecycle, viewport) and is the only
//! mutable entry point. Each public operation runs to completion before it
//! returns: state is mutated, focus is retargeted, derived structures are
//! recomputed, and only then are observers notified.
//!
//! # Keyboard routing
//!
//! | Key | Target | Effect |
//! |-----|--------|--------|
//! | Enter | any | toggles the menu when it is not active or nothing is focused, otherwise toggles the focused option |
//! | Backspace | `Toggle` | clears the selection |
//! | Backspace | `SearchBar` | removes the last keyword grapheme |
//! | Escape | any | closes the menu |
//! | Up / Down | any | moves focus while the menu is mounted |
//! | printable | `SearchBar` | appends to the keyword |
//!
//! # Pointer routing
//!
//! [`CheckPicker::handle_mouse`] takes the row under the pointer as hit-tested
//! by the host. A left press clicks that row, a move hovers it, and the wheel
//! scrolls the menu. Losing focus closes the menu.
//!
//! # Example
//!
//! ```
//! use checkpick::{CheckPicker, Item, Origin, PickerConfig};
//!
//! let mut picker = CheckPicker::new(
//!     PickerConfig::new()
//!         .data(vec![Item::new(1, "Apple"), Item::new(2, "Banana"), Item::new(3, "Cherry")])
//!         .default_value([2])
//!         .sticky(true)
//!         .animated(false),
//! );
//! picker.open();
//! assert_eq!(picker.projection().sticky()[0].label, "Banana");
//!
//! picker.set_keyword("an", Origin::Input);
//! assert_eq!(picker.projection().items().count(), 1);
//! ```

use std::fmt;
use std::ops::Range;

use checkpick_core::debug;
use checkpick_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use checkpick_core::trace;

use crate::config::{PickerConfig, PickerOptions};
use crate::error::Result;
use crate::focus::{Direction, FocusCursor};
use crate::group::Sort;
use crate::item::{Dataset, Item, ItemValue, contains_value};
use crate::lifecycle::{Lifecycle, Phase, TransitionToken};
use crate::locale::PickerLocale;
use crate::observer::{Origin, PickerObserver};
use crate::projection::{Projection, Row, project};
use crate::search::SearchEngine;
use crate::sticky::StickySnapshot;
use crate::value::{ValueStore, toggled};
use crate::viewport::Viewport;

/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: isize = 3;

/// Which part of the control received a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    /// The toggle button.
    Toggle,
    /// The search input inside the menu.
    SearchBar,
    /// The option list.
    Menu,
}

/// Multi-select dropdown state engine.
pub struct CheckPicker {
    options: PickerOptions,
    strings: PickerLocale,
    data: Dataset,
    store: ValueStore,
    disabled_item_values: Vec<ItemValue>,
    sort: Sort,
    search: SearchEngine,
    filtered: Vec<Item>,
    focus: FocusCursor,
    sticky: StickySnapshot,
    projection: Projection,
    lifecycle: Lifecycle,
    viewport: Viewport,
    observers: Vec<Box<dyn PickerObserver>>,
}

impl fmt::Debug for CheckPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckPicker")
            .field("phase", &self.lifecycle.phase())
            .field("value", &self.store)
            .field("keyword", &self.search.keyword())
            .field("focused", &self.focus.focused())
            .field("rows", &self.projection.rows().len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for CheckPicker {
    fn default() -> Self {
        Self::new(PickerConfig::default())
    }
}

impl CheckPicker {
    /// Build a closed picker from `config`.
    #[must_use]
    pub fn new(config: PickerConfig) -> Self {
        let strings = config.resolve_strings();
        let store = match config.value {
            Some(value) => ValueStore::controlled(value),
            None => ValueStore::uncontrolled(config.default_value),
        };
        let initial_focus = store
            .current()
            .iter()
            .find(|value| config.data.find(value).is_some())
            .cloned();

        let mut picker = Self {
            viewport: Viewport::new(config.options.max_visible_rows),
            sticky: StickySnapshot::new(config.options.sticky),
            options: config.options,
            strings,
            data: config.data,
            store,
            disabled_item_values: config.disabled_item_values,
            sort: config.sort,
            search: SearchEngine::new(config.search_by),
            filtered: Vec::new(),
            focus: FocusCursor::new(initial_focus),
            projection: Projection::default(),
            lifecycle: Lifecycle::default(),
            observers: Vec::new(),
        };
        picker.refresh();
        picker
    }

    /// Register an observer; observers run in registration order.
    pub fn add_observer(&mut self, observer: impl PickerObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Register an observer (builder).
    #[must_use]
    pub fn with_observer(mut self, observer: impl PickerObserver + 'static) -> Self {
        self.add_observer(observer);
        self
    }

    // --- State ---

    /// The plain options the picker was built with.
    #[must_use]
    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    /// Resolved user-facing strings.
    #[must_use]
    pub fn strings(&self) -> &PickerLocale {
        &self.strings
    }

    /// The dataset.
    #[must_use]
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// The current selection, in selection order.
    #[must_use]
    pub fn current_value(&self) -> &[ItemValue] {
        self.store.current()
    }

    /// Whether the host owns the value.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.store.is_controlled()
    }

    /// Whether `value` is selected.
    #[must_use]
    pub fn is_selected(&self, value: &ItemValue) -> bool {
        self.store.contains(value)
    }

    /// Whether `item` can be toggled and focused.
    #[must_use]
    pub fn is_item_disabled(&self, item: &Item) -> bool {
        item_disabled(&self.disabled_item_values, item)
    }

    /// Dataset items matching the selection, in dataset order.
    #[must_use]
    pub fn selected_items(&self) -> Vec<Item> {
        self.data.matching(self.store.current())
    }

    /// Whether any selected identifier resolves to a dataset item.
    #[must_use]
    pub fn has_value(&self) -> bool {
        let selection = self.store.current();
        !selection.is_empty() && self.data.leaves().any(|item| contains_value(selection, &item.value))
    }

    /// Text for the toggle: the placeholder, or the selected labels.
    ///
    /// Labels are joined with `", "`; a countable picker appends the count in
    /// parentheses.
    #[must_use]
    pub fn display_text(&self) -> String {
        let selected = self.selected_items();
        if selected.is_empty() {
            return self.strings.placeholder.clone();
        }
        let labels: Vec<&str> = selected.iter().map(|item| item.label.as_str()).collect();
        let mut text = labels.join(", ");
        if self.options.countable {
            text.push_str(&format!(" ({})", selected.len()));
        }
        text
    }

    /// The no-results text when nothing is visible.
    #[must_use]
    pub fn empty_text(&self) -> Option<&str> {
        self.projection
            .is_empty()
            .then_some(self.strings.no_results_text.as_str())
    }

    /// The current keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        self.search.keyword()
    }

    /// The keyword-filtered tree, before sticky partitioning.
    #[must_use]
    pub fn filtered(&self) -> &[Item] {
        &self.filtered
    }

    /// The focused identifier.
    #[must_use]
    pub fn focused(&self) -> Option<&ItemValue> {
        self.focus.focused()
    }

    /// The render-ready list.
    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Every visible row.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        self.projection.rows()
    }

    /// Range of [`rows`](Self::rows) inside the scroll window.
    #[must_use]
    pub fn visible_window(&self) -> Range<usize> {
        self.viewport.window(self.projection.rows().len())
    }

    /// Rows inside the scroll window.
    #[must_use]
    pub fn visible_rows(&self) -> &[Row] {
        &self.projection.rows()[self.visible_window()]
    }

    /// Lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    /// Whether the menu has finished opening.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Whether the menu is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }

    /// Token completing the running transition, if any.
    #[must_use]
    pub fn pending_transition(&self) -> Option<TransitionToken> {
        self.lifecycle.pending()
    }

    // --- Lifecycle ---

    /// Start opening the menu. Ignored while the control is disabled.
    pub fn open(&mut self) {
        if self.options.disabled {
            return;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("picker_transition", op = "open").entered();

        if let Some(token) = self.lifecycle.open() {
            self.notify(|o| o.on_enter());
            if !self.options.animated {
                self.finish_transition(token);
            }
        }
    }

    /// Start closing the menu.
    pub fn close(&mut self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("picker_transition", op = "close").entered();

        if let Some(token) = self.lifecycle.close() {
            self.notify(|o| o.on_exit());
            if !self.options.animated {
                self.finish_transition(token);
            }
        }
    }

    /// Open when not active, close otherwise.
    pub fn toggle_menu(&mut self) {
        if self.lifecycle.is_active() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Complete a transition started by [`open`](Self::open) or
    /// [`close`](Self::close).
    ///
    /// Returns `false` for a stale token.
    pub fn finish_transition(&mut self, token: TransitionToken) -> bool {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("picker_transition", op = "finish").entered();

        match self.lifecycle.finish(token) {
            Some(Phase::Open) => {
                self.sticky.capture(&self.data, self.store.current());
                self.refresh();
                self.follow_focus();
                self.notify(|o| o.on_open());
                self.notify(|o| o.on_entered());
                true
            }
            Some(Phase::Closed) => {
                self.search.reset();
                self.focus.clear();
                self.sticky.discard();
                self.viewport.reset();
                self.refresh();
                self.notify(|o| o.on_close());
                self.notify(|o| o.on_exited());
                true
            }
            _ => false,
        }
    }

    /// Pointer or focus left the control: close the menu.
    ///
    /// Returns `true` when this started closing.
    pub fn handle_outside_interaction(&mut self) -> bool {
        if !self.lifecycle.is_opening_or_open() {
            return false;
        }
        debug!("outside interaction");
        self.close();
        true
    }

    // --- Selection ---

    /// Toggle the item with identifier `value`.
    ///
    /// Returns `false` (and changes nothing) when the control is disabled,
    /// the item is disabled, or no item has this identifier.
    pub fn toggle(&mut self, value: &ItemValue, origin: Origin) -> bool {
        if self.options.disabled {
            return false;
        }
        let Some(item) = self.data.find(value).cloned() else {
            debug!(%value, "toggle of unknown identifier ignored");
            return false;
        };
        if self.is_item_disabled(&item) {
            return false;
        }

        let next = toggled(self.store.current(), &item.value);
        self.store.commit(next.clone());
        if self.projection.contains(&item.value) {
            self.focus.set(item.value.clone());
            self.follow_focus();
        }
        debug!(value = %item.value, selected = next.len(), "selection toggled");

        self.notify(|o| o.on_select(&next, &item, &origin));
        self.notify(|o| o.on_change(&next, &origin));
        true
    }

    /// Toggle the focused item; `false` when nothing is focused.
    pub fn toggle_focused(&mut self, origin: Origin) -> bool {
        match self.focus.focused().cloned() {
            Some(value) => self.toggle(&value, origin),
            None => false,
        }
    }

    /// Empty the selection.
    ///
    /// Ignored when the control is disabled or not cleanable.
    pub fn clear(&mut self, origin: Origin) -> bool {
        if self.options.disabled || !self.options.cleanable {
            return false;
        }
        self.store.commit(Vec::new());
        debug!("selection cleared");
        self.notify(|o| o.on_change(&[], &origin));
        self.notify(|o| o.on_clean(&origin));
        true
    }

    /// Replace the mirrored value of a controlled picker.
    ///
    /// # Errors
    ///
    /// [`PickerError::ModeSwitch`](crate::PickerError::ModeSwitch) when the
    /// picker was built uncontrolled.
    pub fn sync_controlled(&mut self, value: impl IntoIterator<Item = impl Into<ItemValue>>) -> Result<()> {
        self.store
            .sync_controlled(value.into_iter().map(Into::into).collect())
    }

    // --- Pointer ---

    /// Click on the option with identifier `value`.
    pub fn click_item(&mut self, value: &ItemValue, origin: Origin) -> bool {
        self.toggle(value, origin)
    }

    /// Click on the row at `index` of [`rows`](Self::rows).
    pub fn click_row(&mut self, index: usize, origin: Origin) -> bool {
        match self.projection.rows().get(index) {
            Some(Row::Item { item, .. }) => {
                let value = item.value.clone();
                self.toggle(&value, origin)
            }
            Some(Row::Group { label, .. }) => {
                let label = label.clone();
                self.click_group(&label, origin);
                true
            }
            None => false,
        }
    }

    /// Pointer over the row at `index` of [`rows`](Self::rows).
    ///
    /// Group headers and disabled items leave focus alone.
    pub fn hover_row(&mut self, index: usize) -> bool {
        match self.projection.rows().get(index) {
            Some(Row::Item { item, .. }) => {
                let value = item.value.clone();
                self.hover_item(&value)
            }
            _ => false,
        }
    }

    /// Pointer over the option with identifier `value`: focus it.
    pub fn hover_item(&mut self, value: &ItemValue) -> bool {
        let eligible = self
            .projection
            .items()
            .any(|item| item.value.shallow_eq(value) && !item_disabled(&self.disabled_item_values, item));
        if eligible {
            self.focus.set(value.clone());
        }
        eligible
    }

    /// Click on a group header.
    pub fn click_group(&mut self, label: &str, origin: Origin) {
        self.notify(|o| o.on_group_title_click(label, &origin));
    }

    /// Scroll the menu by whole rows.
    pub fn scroll_by(&mut self, delta: isize) {
        self.viewport.scroll_by(delta, self.projection.rows().len());
    }

    // --- Search ---

    /// Replace the keyword, refilter, and focus the first match.
    ///
    /// Ignored when the picker is not searchable.
    pub fn set_keyword(&mut self, keyword: impl Into<String>, origin: Origin) {
        if !self.options.searchable {
            return;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("picker_search").entered();

        let outcome = self.search.search(self.data.items(), keyword);
        trace!(keyword = self.search.keyword(), matches = outcome.filtered.len(), "keyword changed");
        match outcome.focus_candidate {
            Some(value) => self.focus.set(value),
            None => self.focus.clear(),
        }
        self.viewport.reset();
        self.rebuild(outcome.filtered);
        self.follow_focus();

        let keyword = self.search.keyword().to_string();
        self.notify(|o| o.on_search(&keyword, &origin));
    }

    // --- Data ---

    /// Replace the dataset and recompute everything derived from it.
    pub fn set_data(&mut self, data: impl Into<Dataset>) {
        self.data = data.into();
        if self.lifecycle.is_mounted() {
            self.sticky.rebase(&self.data);
        }
        self.refresh();
    }

    // --- Input ---

    /// Route an input event. Returns `true` when it was consumed.
    ///
    /// Mouse events arrive without a hit-tested row, so only wheel scrolling
    /// applies here. Hosts that know which row is under the pointer use
    /// [`handle_mouse`](Self::handle_mouse).
    pub fn handle_event(&mut self, event: &Event, target: KeyTarget) -> bool {
        match event {
            Event::Key(key) => self.handle_key(key, target),
            Event::Mouse(mouse) => self.handle_mouse(mouse, None),
            Event::Paste(paste) if target == KeyTarget::SearchBar && self.accepts_text() => {
                let keyword = self.search.appended(&paste.text);
                self.set_keyword(keyword, Origin::Input);
                true
            }
            Event::Focus(false) => self.handle_outside_interaction(),
            _ => false,
        }
    }

    /// Route a pointer event over the menu.
    ///
    /// `row` is the index into [`rows`](Self::rows) under the pointer, or
    /// `None` when the pointer is not over a row. A left press clicks the
    /// row, a move hovers it, and the wheel scrolls by three rows. Returns
    /// `true` when the event was consumed.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent, row: Option<usize>) -> bool {
        if !self.lifecycle.is_mounted() {
            return false;
        }
        match (mouse.kind, row) {
            (MouseEventKind::ScrollUp, _) => {
                self.scroll_by(-WHEEL_STEP);
                true
            }
            (MouseEventKind::ScrollDown, _) => {
                self.scroll_by(WHEEL_STEP);
                true
            }
            (MouseEventKind::Down(MouseButton::Left), Some(index)) => {
                self.click_row(index, Origin::Mouse(*mouse))
            }
            (MouseEventKind::Moved, Some(index)) => self.hover_row(index),
            _ => false,
        }
    }

    /// Route a key press. Returns `true` when it was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent, target: KeyTarget) -> bool {
        if self.options.disabled || key.kind == KeyEventKind::Release {
            return false;
        }
        let origin = Origin::Key(*key);

        match key.code {
            KeyCode::Enter => {
                if !self.lifecycle.is_active() || self.focus.focused().is_none() {
                    self.toggle_menu();
                } else {
                    self.toggle_focused(origin);
                }
                true
            }
            KeyCode::Backspace => match target {
                KeyTarget::Toggle => self.clear(origin),
                KeyTarget::SearchBar if self.accepts_text() => match self.search.popped() {
                    Some(keyword) => {
                        self.set_keyword(keyword, Origin::Input);
                        true
                    }
                    None => false,
                },
                _ => false,
            },
            KeyCode::Escape if self.lifecycle.is_opening_or_open() => {
                self.close();
                true
            }
            KeyCode::Up if self.lifecycle.is_mounted() => {
                self.move_focus(Direction::Up);
                true
            }
            KeyCode::Down if self.lifecycle.is_mounted() => {
                self.move_focus(Direction::Down);
                true
            }
            KeyCode::Char(c) if target == KeyTarget::SearchBar && key.is_text_input() && self.accepts_text() => {
                let mut buf = [0u8; 4];
                let keyword = self.search.appended(c.encode_utf8(&mut buf));
                self.set_keyword(keyword, Origin::Input);
                true
            }
            _ => false,
        }
    }

    /// Move keyboard focus one eligible row.
    pub fn move_focus(&mut self, direction: Direction) -> Option<&ItemValue> {
        let disabled = &self.disabled_item_values;
        self.focus
            .move_focus(direction, self.projection.rows(), |item| item_disabled(disabled, item));
        self.follow_focus();
        self.focus.focused()
    }

    // --- Internals ---

    fn accepts_text(&self) -> bool {
        self.options.searchable && self.lifecycle.is_mounted()
    }

    /// Recompute the filtered tree and everything derived from it.
    fn refresh(&mut self) {
        let filtered = self.search.filter(self.data.items());
        self.rebuild(filtered);
    }

    fn rebuild(&mut self, filtered: Vec<Item>) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("picker_refresh", items = filtered.len()).entered();

        self.filtered = filtered;
        let pinned = self.search.filter(self.sticky.items());
        self.projection = project(
            pinned,
            &self.filtered,
            self.options.group_by.as_deref(),
            &self.sort,
        );
        if self.focus.reconcile(self.projection.rows()) {
            debug!("focused item left the visible list");
        }
        self.viewport.clamp(self.projection.rows().len());
    }

    fn follow_focus(&mut self) {
        if let Some(row) = self.focus.focused().and_then(|v| self.projection.row_of(v)) {
            self.viewport.ensure_visible(row);
        }
    }

    fn notify(&mut self, mut f: impl FnMut(&mut dyn PickerObserver)) {
        for observer in &mut self.observers {
            f(observer.as_mut());
        }
    }
}

fn item_disabled(disabled_values: &[ItemValue], item: &Item) -> bool {
    item.disabled || contains_value(disabled_values, &item.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{Notification, NotificationLog};
    use checkpick_core::event::{Modifiers, PasteEvent};

    fn fruit() -> Vec<Item> {
        vec![
            Item::new(1, "Apple"),
            Item::new(2, "Banana"),
            Item::new(3, "Cherry"),
        ]
    }

    fn picker(config: PickerConfig) -> (CheckPicker, NotificationLog) {
        let log = NotificationLog::new();
        let picker = CheckPicker::new(config.data(fruit()).locale("en").animated(false))
            .with_observer(log.clone());
        (picker, log)
    }

    fn ids(values: &[ItemValue]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    #[test]
    fn initial_focus_is_first_known_selection() {
        let (p, _) = picker(PickerConfig::new().default_value([9, 3, 2]));
        assert!(p.focused().is_some_and(|f| f.shallow_eq(&3.into())));
    }

    #[test]
    fn toggle_notifies_select_then_change() {
        let (mut p, log) = picker(PickerConfig::new().default_value([1]));
        assert!(p.toggle(&2.into(), Origin::Programmatic));
        assert_eq!(ids(p.current_value()), ["1", "2"]);
        assert_eq!(log.names(), ["select", "change"]);
        assert!(p.focused().is_some_and(|f| f.shallow_eq(&2.into())));
    }

    #[test]
    fn toggling_a_disabled_item_is_silent() {
        let (mut p, log) = picker(PickerConfig::new().disabled_item_values([3]));
        assert!(!p.toggle(&3.into(), Origin::Programmatic));
        assert!(p.current_value().is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn disabled_control_ignores_everything() {
        let (mut p, log) = picker(PickerConfig::new().disabled(true).default_value([1]));
        p.open();
        assert_eq!(p.phase(), Phase::Closed);
        assert!(!p.toggle(&2.into(), Origin::Programmatic));
        assert!(!p.clear(Origin::Programmatic));
        assert!(!p.handle_key(&key(KeyCode::Enter), KeyTarget::Toggle));
        assert_eq!(ids(p.current_value()), ["1"]);
        assert!(log.is_empty());
    }

    #[test]
    fn clear_fires_change_then_clean() {
        let (mut p, log) = picker(PickerConfig::new().default_value([1, 2]));
        assert!(p.clear(Origin::Programmatic));
        assert!(p.current_value().is_empty());
        assert_eq!(log.names(), ["change", "clean"]);
    }

    #[test]
    fn controlled_value_waits_for_the_host() {
        let (mut p, log) = picker(PickerConfig::new().value([1]));
        p.toggle(&2.into(), Origin::Programmatic);
        assert_eq!(ids(p.current_value()), ["1"]);
        match log.drain().last() {
            Some(Notification::Change { selection, .. }) => assert_eq!(ids(selection), ["1", "2"]),
            other => panic!("expected change, got {other:?}"),
        }
        p.sync_controlled([1, 2]).expect("controlled picker accepts sync");
        assert_eq!(ids(p.current_value()), ["1", "2"]);
    }

    #[test]
    fn immediate_open_close_fires_hooks_in_order() {
        let (mut p, log) = picker(PickerConfig::new());
        p.open();
        assert!(p.is_active());
        p.close();
        assert_eq!(p.phase(), Phase::Closed);
        assert_eq!(
            log.names(),
            ["enter", "open", "entered", "exit", "close", "exited"]
        );
    }

    #[test]
    fn enter_opens_then_toggles_focused() {
        let (mut p, _) = picker(PickerConfig::new());
        assert!(p.handle_key(&key(KeyCode::Enter), KeyTarget::Toggle));
        assert!(p.is_active());
        // Nothing focused yet: Enter closes.
        p.handle_key(&key(KeyCode::Enter), KeyTarget::Menu);
        assert!(!p.is_mounted());

        p.open();
        p.handle_key(&key(KeyCode::Down), KeyTarget::Menu);
        p.handle_key(&key(KeyCode::Enter), KeyTarget::Menu);
        assert_eq!(ids(p.current_value()), ["1"]);
        assert!(p.is_active());
    }

    #[test]
    fn backspace_depends_on_target() {
        let (mut p, _) = picker(PickerConfig::new().default_value([1]));
        p.open();
        p.set_keyword("ch", Origin::Input);
        assert!(p.handle_key(&key(KeyCode::Backspace), KeyTarget::SearchBar));
        assert_eq!(p.keyword(), "c");
        assert_eq!(ids(p.current_value()), ["1"]);

        assert!(p.handle_key(&key(KeyCode::Backspace), KeyTarget::Toggle));
        assert!(p.current_value().is_empty());
    }

    #[test]
    fn typing_in_search_bar_filters_and_focuses() {
        let (mut p, log) = picker(PickerConfig::new());
        p.open();
        log.drain();
        p.handle_key(&key(KeyCode::Char('a')), KeyTarget::SearchBar);
        p.handle_key(&key(KeyCode::Char('n')), KeyTarget::SearchBar);
        assert_eq!(p.keyword(), "an");
        let shown: Vec<_> = p.projection().items().map(|i| i.label.as_str()).collect();
        assert_eq!(shown, ["Banana"]);
        assert!(p.focused().is_some_and(|f| f.shallow_eq(&2.into())));
        assert_eq!(log.names(), ["search", "search"]);

        let ctrl_a = key(KeyCode::Char('a')).with_modifiers(Modifiers::CTRL);
        assert!(!p.handle_key(&ctrl_a, KeyTarget::SearchBar));
    }

    #[test]
    fn no_results_text_when_nothing_matches() {
        let (mut p, _) = picker(PickerConfig::new());
        p.open();
        assert!(p.empty_text().is_none());
        p.set_keyword("zzz", Origin::Input);
        assert_eq!(p.empty_text(), Some("No results found"));
        assert!(p.focused().is_none());
    }

    #[test]
    fn unsearchable_picker_ignores_keywords() {
        let (mut p, log) = picker(PickerConfig::new().searchable(false));
        p.open();
        log.drain();
        p.set_keyword("an", Origin::Programmatic);
        assert_eq!(p.keyword(), "");
        assert!(log.is_empty());
    }

    #[test]
    fn display_text_lists_labels_with_count() {
        let (p, _) = picker(PickerConfig::new().default_value([3, 1]));
        assert_eq!(p.display_text(), "Apple, Cherry (2)");
        assert!(p.has_value());

        let (p, _) = picker(PickerConfig::new().default_value([3]).countable(false));
        assert_eq!(p.display_text(), "Cherry");

        let (p, _) = picker(PickerConfig::new().default_value([42]));
        assert_eq!(p.display_text(), "Select");
        assert!(!p.has_value());
    }

    #[test]
    fn closing_resets_keyword_and_focus() {
        let (mut p, _) = picker(PickerConfig::new());
        p.open();
        p.set_keyword("an", Origin::Input);
        p.close();
        assert_eq!(p.keyword(), "");
        assert!(p.focused().is_none());
        assert_eq!(p.projection().items().count(), 3);
    }

    #[test]
    fn group_rows_report_title_clicks() {
        let data = vec![
            Item::new(1, "Apple").with_field("kind", "pome"),
            Item::new(2, "Lemon").with_field("kind", "citrus"),
        ];
        let log = NotificationLog::new();
        let mut p = CheckPicker::new(PickerConfig::new().data(data).group_by("kind").animated(false))
            .with_observer(log.clone());
        p.open();
        log.drain();
        assert!(p.click_row(0, Origin::Programmatic));
        match log.drain().as_slice() {
            [Notification::GroupTitleClick { label, .. }] => assert_eq!(label, "pome"),
            other => panic!("unexpected notifications: {other:?}"),
        }
        assert!(p.click_row(3, Origin::Programmatic));
        assert_eq!(ids(p.current_value()), ["2"]);
        assert!(!p.click_row(9, Origin::Programmatic));
    }

    #[test]
    fn hover_focuses_enabled_visible_items_only() {
        let (mut p, _) = picker(PickerConfig::new().disabled_item_values([2]));
        assert!(p.hover_item(&1.into()));
        assert!(!p.hover_item(&2.into()));
        assert!(!p.hover_item(&7.into()));
        assert!(p.focused().is_some_and(|f| f.shallow_eq(&1.into())));
    }

    #[test]
    fn wheel_and_paste_events() {
        let many: Vec<Item> = (0..20).map(|i| Item::new(i, format!("Item {i}"))).collect();
        let mut p = CheckPicker::new(
            PickerConfig::new()
                .data(many)
                .max_visible_rows(5)
                .animated(false),
        );
        p.open();
        let wheel = Event::Mouse(MouseEvent::new(MouseEventKind::ScrollDown, 0, 0));
        assert!(p.handle_event(&wheel, KeyTarget::Menu));
        assert_eq!(p.visible_window(), 3..8);

        let paste = Event::Paste(PasteEvent::bracketed("Item 1"));
        assert!(p.handle_event(&paste, KeyTarget::SearchBar));
        assert_eq!(p.keyword(), "Item 1");
        assert_eq!(p.visible_window(), 0..5);
    }

    #[test]
    fn focus_loss_closes_the_menu() {
        let (mut p, _) = picker(PickerConfig::new());
        p.open();
        assert!(p.handle_event(&Event::Focus(false), KeyTarget::Menu));
        assert_eq!(p.phase(), Phase::Closed);
        assert!(!p.handle_event(&Event::Focus(false), KeyTarget::Menu));
    }

    #[test]
    fn pointer_presses_and_hover_route_to_rows() {
        let (mut p, log) = picker(PickerConfig::new().disabled_item_values([3]));
        let press = MouseEvent::new(MouseEventKind::Down(MouseButton::Left), 4, 2);
        assert!(!p.handle_mouse(&press, Some(1)));

        p.open();
        log.drain();
        assert!(p.handle_mouse(&press, Some(1)));
        assert_eq!(ids(p.current_value()), ["2"]);
        match log.drain().as_slice() {
            [
                Notification::Select { origin: Origin::Mouse(m), .. },
                Notification::Change { .. },
            ] => assert_eq!(m.position(), (4, 2)),
            other => panic!("unexpected notifications: {other:?}"),
        }

        let hover = MouseEvent::new(MouseEventKind::Moved, 4, 1);
        assert!(p.handle_mouse(&hover, Some(0)));
        assert!(p.focused().is_some_and(|f| f.shallow_eq(&1.into())));
        assert!(!p.handle_mouse(&hover, Some(2)));
        assert!(p.focused().is_some_and(|f| f.shallow_eq(&1.into())));

        let right = MouseEvent::new(MouseEventKind::Down(MouseButton::Right), 4, 0);
        assert!(!p.handle_mouse(&right, Some(0)));
        assert!(!p.handle_mouse(&press, None));
        assert!(!p.handle_event(&Event::Mouse(press), KeyTarget::Menu));
        assert_eq!(ids(p.current_value()), ["2"]);
    }

    #[test]
    fn callbacks_receive_select_and_clean() {
        use crate::observer::Callbacks;
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let (on_select, on_clean) = (Rc::clone(&seen), Rc::clone(&seen));
        let mut p = CheckPicker::new(PickerConfig::new().data(fruit()).animated(false))
            .with_observer(
                Callbacks::new()
                    .with_select(move |_, item, _| {
                        on_select.borrow_mut().push(item.label.clone());
                    })
                    .with_clean(move |_| on_clean.borrow_mut().push("clean".to_string())),
            );
        p.toggle(&2.into(), Origin::Programmatic);
        p.clear(Origin::Programmatic);
        assert_eq!(*seen.borrow(), ["Banana", "clean"]);
    }

    #[test]
    fn focus_follows_into_the_scroll_window() {
        let many: Vec<Item> = (0..10).map(|i| Item::new(i, format!("Item {i}"))).collect();
        let mut p = CheckPicker::new(PickerConfig::new().data(many).max_visible_rows(3).animated(false));
        p.open();
        for _ in 0..6 {
            p.handle_key(&key(KeyCode::Down), KeyTarget::Menu);
        }
        assert!(p.focused().is_some_and(|f| f.shallow_eq(&5.into())));
        assert_eq!(p.visible_window(), 3..6);
        assert_eq!(p.visible_rows().len(), 3);
    }

    #[test]
    fn replacing_data_reconciles_focus() {
        let (mut p, _) = picker(PickerConfig::new());
        p.open();
        p.hover_item(&3.into());
        p.set_data(vec![Item::new(1, "Apple")]);
        assert!(p.focused().is_none());
        assert_eq!(p.projection().items().count(), 1);
    }
}
