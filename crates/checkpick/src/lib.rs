#![forbid(unsafe_code)]

//! Selection and filtering engine for multi-select dropdown pickers.
//!
//! [`CheckPicker`] holds the state of a "check picker": a dropdown whose menu
//! lists options with checkboxes, a search bar, optional grouping, and an
//! optional "sticky" mode that pins the current selection at the top each
//! time the menu opens. Rendering and placement are left to the host; the
//! engine exposes render-ready [`Row`]s and a scroll window over them.

pub mod config;
pub mod error;
pub mod focus;
pub mod group;
pub mod item;
pub mod lifecycle;
pub mod locale;
pub mod observer;
pub mod picker;
pub mod projection;
pub mod search;
pub mod sticky;
pub mod tree;
pub mod value;
pub mod viewport;

// --- Core re-exports -------------------------------------------------------

pub use checkpick_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind,
    PasteEvent,
};

// --- Engine re-exports -----------------------------------------------------

pub use config::{PickerConfig, PickerOptions};
pub use error::{PickerError, Result};
pub use focus::Direction;
pub use group::{Group, Sort};
pub use item::{Dataset, FieldKeys, Item, ItemValue};
pub use lifecycle::{Phase, TransitionToken};
pub use locale::PickerLocale;
pub use observer::{Callbacks, Notification, NotificationLog, Origin, PickerObserver};
pub use picker::{CheckPicker, KeyTarget};
pub use projection::{Projection, Row};
pub use search::SearchBy;

pub mod prelude {
    //! Types needed by most hosts.
    pub use crate::{
        CheckPicker, Event, Item, ItemValue, KeyCode, KeyEvent, KeyTarget, NotificationLog,
        Origin, PickerConfig, PickerObserver,
    };
}
