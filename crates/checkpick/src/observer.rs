#![forbid(unsafe_code)]

//! Notifications emitted by the picker.
//!
//! Hosts register [`PickerObserver`]s; the picker calls them in registration
//! order after each state change has been fully applied, so an observer always
//! sees a consistent picker. Every method has a no-op default.
//!
//! Two ready-made observers are provided:
//!
//! - [`NotificationLog`] queues [`Notification`] values for hosts that prefer
//!   polling ([`drain`](NotificationLog::drain)) over callbacks.
//! - [`Callbacks`] forwards the host-facing notifications to closures.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use checkpick_core::event::{KeyEvent, MouseEvent};

use crate::item::{Item, ItemValue};

/// What caused a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A key press.
    Key(KeyEvent),
    /// A pointer event.
    Mouse(MouseEvent),
    /// Search bar edit or paste.
    Input,
    /// A direct method call by the host.
    Programmatic,
}

/// Receiver of picker notifications.
#[allow(unused_variables)]
pub trait PickerObserver {
    /// The selection changed.
    fn on_change(&mut self, selection: &[ItemValue], origin: &Origin) {}

    /// An item was toggled; fires before [`on_change`](Self::on_change).
    fn on_select(&mut self, selection: &[ItemValue], item: &Item, origin: &Origin) {}

    /// The keyword changed.
    fn on_search(&mut self, keyword: &str, origin: &Origin) {}

    /// The menu finished opening.
    fn on_open(&mut self) {}

    /// The menu finished closing.
    fn on_close(&mut self) {}

    /// The selection was cleared through the clean affordance.
    fn on_clean(&mut self, origin: &Origin) {}

    /// A group header was clicked.
    fn on_group_title_click(&mut self, label: &str, origin: &Origin) {}

    /// The enter transition started.
    fn on_enter(&mut self) {}

    /// The enter transition finished.
    fn on_entered(&mut self) {}

    /// The exit transition started.
    fn on_exit(&mut self) {}

    /// The exit transition finished.
    fn on_exited(&mut self) {}
}

/// A recorded notification.
#[derive(Debug, Clone)]
pub enum Notification {
    /// See [`PickerObserver::on_change`].
    Change {
        /// Selection after the change.
        selection: Vec<ItemValue>,
        /// Cause.
        origin: Origin,
    },
    /// See [`PickerObserver::on_select`].
    Select {
        /// Selection after the toggle.
        selection: Vec<ItemValue>,
        /// The toggled item.
        item: Item,
        /// Cause.
        origin: Origin,
    },
    /// See [`PickerObserver::on_search`].
    Search {
        /// The new keyword.
        keyword: String,
        /// Cause.
        origin: Origin,
    },
    /// See [`PickerObserver::on_open`].
    Open,
    /// See [`PickerObserver::on_close`].
    Close,
    /// See [`PickerObserver::on_clean`].
    Clean {
        /// Cause.
        origin: Origin,
    },
    /// See [`PickerObserver::on_group_title_click`].
    GroupTitleClick {
        /// Header text.
        label: String,
        /// Cause.
        origin: Origin,
    },
    /// See [`PickerObserver::on_enter`].
    Enter,
    /// See [`PickerObserver::on_entered`].
    Entered,
    /// See [`PickerObserver::on_exit`].
    Exit,
    /// See [`PickerObserver::on_exited`].
    Exited,
}

impl Notification {
    /// Short name of the notification kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Change { .. } => "change",
            Self::Select { .. } => "select",
            Self::Search { .. } => "search",
            Self::Open => "open",
            Self::Close => "close",
            Self::Clean { .. } => "clean",
            Self::GroupTitleClick { .. } => "group_title_click",
            Self::Enter => "enter",
            Self::Entered => "entered",
            Self::Exit => "exit",
            Self::Exited => "exited",
        }
    }
}

/// Observer that queues notifications.
///
/// Clones share one queue: register one clone with the picker and keep
/// another to drain.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    queue: Rc<RefCell<Vec<Notification>>>,
}

impl NotificationLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    /// Names of queued notifications, without draining.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.queue.borrow().iter().map(Notification::name).collect()
    }

    /// Number of queued notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    fn push(&self, notification: Notification) {
        self.queue.borrow_mut().push(notification);
    }
}

impl PickerObserver for NotificationLog {
    fn on_change(&mut self, selection: &[ItemValue], origin: &Origin) {
        self.push(Notification::Change {
            selection: selection.to_vec(),
            origin: origin.clone(),
        });
    }

    fn on_select(&mut self, selection: &[ItemValue], item: &Item, origin: &Origin) {
        self.push(Notification::Select {
            selection: selection.to_vec(),
            item: item.clone(),
            origin: origin.clone(),
        });
    }

    fn on_search(&mut self, keyword: &str, origin: &Origin) {
        self.push(Notification::Search {
            keyword: keyword.to_string(),
            origin: origin.clone(),
        });
    }

    fn on_open(&mut self) {
        self.push(Notification::Open);
    }

    fn on_close(&mut self) {
        self.push(Notification::Close);
    }

    fn on_clean(&mut self, origin: &Origin) {
        self.push(Notification::Clean {
            origin: origin.clone(),
        });
    }

    fn on_group_title_click(&mut self, label: &str, origin: &Origin) {
        self.push(Notification::GroupTitleClick {
            label: label.to_string(),
            origin: origin.clone(),
        });
    }

    fn on_enter(&mut self) {
        self.push(Notification::Enter);
    }

    fn on_entered(&mut self) {
        self.push(Notification::Entered);
    }

    fn on_exit(&mut self) {
        self.push(Notification::Exit);
    }

    fn on_exited(&mut self) {
        self.push(Notification::Exited);
    }
}

type ChangeFn = Box<dyn FnMut(&[ItemValue], &Origin)>;
type SelectFn = Box<dyn FnMut(&[ItemValue], &Item, &Origin)>;
type SearchFn = Box<dyn FnMut(&str, &Origin)>;
type OriginFn = Box<dyn FnMut(&Origin)>;
type HookFn = Box<dyn FnMut()>;

/// Observer forwarding the host-facing notifications to closures.
///
/// Covers change, select, search, clean, open and close. Lifecycle
/// milestones and group title clicks need a full [`PickerObserver`].
#[derive(Default)]
pub struct Callbacks {
    change: Option<ChangeFn>,
    select: Option<SelectFn>,
    search: Option<SearchFn>,
    clean: Option<OriginFn>,
    open: Option<HookFn>,
    close: Option<HookFn>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("change", &self.change.is_some())
            .field("select", &self.select.is_some())
            .field("search", &self.search.is_some())
            .field("clean", &self.clean.is_some())
            .field("open", &self.open.is_some())
            .field("close", &self.close.is_some())
            .finish()
    }
}

impl Callbacks {
    /// Create a set with no closures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `f` on every selection change.
    #[must_use]
    pub fn with_change(mut self, f: impl FnMut(&[ItemValue], &Origin) + 'static) -> Self {
        self.change = Some(Box::new(f));
        self
    }

    /// Call `f` with the proposed selection and the toggled item.
    #[must_use]
    pub fn with_select(mut self, f: impl FnMut(&[ItemValue], &Item, &Origin) + 'static) -> Self {
        self.select = Some(Box::new(f));
        self
    }

    /// Call `f` on every keyword change.
    #[must_use]
    pub fn with_search(mut self, f: impl FnMut(&str, &Origin) + 'static) -> Self {
        self.search = Some(Box::new(f));
        self
    }

    /// Call `f` after the selection was cleared.
    #[must_use]
    pub fn with_clean(mut self, f: impl FnMut(&Origin) + 'static) -> Self {
        self.clean = Some(Box::new(f));
        self
    }

    /// Call `f` when the menu finishes opening.
    #[must_use]
    pub fn with_open(mut self, f: impl FnMut() + 'static) -> Self {
        self.open = Some(Box::new(f));
        self
    }

    /// Call `f` when the menu finishes closing.
    #[must_use]
    pub fn with_close(mut self, f: impl FnMut() + 'static) -> Self {
        self.close = Some(Box::new(f));
        self
    }
}

impl PickerObserver for Callbacks {
    fn on_change(&mut self, selection: &[ItemValue], origin: &Origin) {
        if let Some(f) = &mut self.change {
            f(selection, origin);
        }
    }

    fn on_select(&mut self, selection: &[ItemValue], item: &Item, origin: &Origin) {
        if let Some(f) = &mut self.select {
            f(selection, item, origin);
        }
    }

    fn on_search(&mut self, keyword: &str, origin: &Origin) {
        if let Some(f) = &mut self.search {
            f(keyword, origin);
        }
    }

    fn on_clean(&mut self, origin: &Origin) {
        if let Some(f) = &mut self.clean {
            f(origin);
        }
    }

    fn on_open(&mut self) {
        if let Some(f) = &mut self.open {
            f();
        }
    }

    fn on_close(&mut self) {
        if let Some(f) = &mut self.close {
            f();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_clones_share_a_queue() {
        let log = NotificationLog::new();
        let mut handle = log.clone();
        handle.on_open();
        handle.on_clean(&Origin::Programmatic);
        assert_eq!(log.names(), ["open", "clean"]);
        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn log_records_payloads() {
        let mut log = NotificationLog::new();
        log.on_search("an", &Origin::Input);
        match log.drain().as_slice() {
            [Notification::Search { keyword, origin }] => {
                assert_eq!(keyword, "an");
                assert_eq!(*origin, Origin::Input);
            }
            other => panic!("unexpected notifications: {other:?}"),
        }
    }

    #[test]
    fn callbacks_forward_to_closures() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut callbacks = Callbacks::new().with_change(move |selection, _| {
            sink.borrow_mut().push(selection.len());
        });
        callbacks.on_change(&[1.into(), 2.into()], &Origin::Programmatic);
        callbacks.on_open();
        assert_eq!(*seen.borrow(), [2]);
    }

    #[test]
    fn callbacks_forward_select_and_clean() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let on_select = Rc::clone(&seen);
        let on_clean = Rc::clone(&seen);
        let mut callbacks = Callbacks::new()
            .with_select(move |selection, item, _| {
                on_select
                    .borrow_mut()
                    .push(format!("select {} of {}", item.label, selection.len()));
            })
            .with_clean(move |origin| {
                on_clean.borrow_mut().push(format!("clean {origin:?}"));
            });

        let banana = Item::new(2, "Banana");
        callbacks.on_select(&[1.into(), 2.into()], &banana, &Origin::Input);
        callbacks.on_clean(&Origin::Programmatic);
        callbacks.on_close();
        assert_eq!(*seen.borrow(), ["select Banana of 2", "clean Programmatic"]);
    }

    #[test]
    fn default_methods_are_noops() {
        struct Silent;
        impl PickerObserver for Silent {}
        let mut silent = Silent;
        silent.on_entered();
        silent.on_group_title_click("Fruit", &Origin::Programmatic);
    }
}
