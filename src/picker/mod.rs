pub mod bindings;
pub mod controller;
pub mod options;

pub use bindings::{EventBinder, InteractionBindings, NativeBinder, RawEvent};
pub use controller::{DatePicker, Interaction, Outcome, PickerState};
pub use options::{ConfigError, PickerOptions};
