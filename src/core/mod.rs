pub mod clock;
pub mod date;
pub mod error;
pub mod grid;
pub mod notifier;

pub use clock::{Clock, FixedClock, SystemClock};
pub use date::{CalendarDay, MonthKey, Weekday};
pub use error::{HandlerError, HandlerFailure, PickerError, PickerResult};
pub use grid::{GridCell, MonthGrid, PagerLabels, PagerVariant};
pub use notifier::{HandlerId, SelectionHandler, SelectionNotifier};
