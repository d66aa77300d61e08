pub mod cli;
pub mod core;
pub mod logging;
pub mod picker;
pub mod render;
pub mod terminal;
pub mod ui;

pub use crate::core::clock;
pub use crate::core::date;
pub use crate::core::error;
pub use crate::core::grid;
pub use crate::core::notifier;

pub use crate::picker::bindings;
pub use crate::picker::controller;
pub use crate::picker::options;

pub use crate::core::{CalendarDay, MonthKey, PickerError, PickerResult};
pub use crate::picker::{DatePicker, Interaction, Outcome, PickerOptions};
pub use crate::render::{RenderTarget, SnapshotTarget, TerminalTarget};
