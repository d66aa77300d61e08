pub mod snapshot;
pub mod terminal;

pub use snapshot::SnapshotTarget;
pub use terminal::TerminalTarget;

use crate::core::grid::{GridCell, PagerLabels, PagerVariant, WEEK_LENGTH};
use serde::Serialize;

/// Fixed parts of the picker, handed to the target once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scaffold {
    pub week_labels: [&'static str; WEEK_LENGTH],
    pub pager: PagerVariant,
    pub overlay: bool,
}

/// Which part of the picker an event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Cell(usize),
    PrevMonth,
    NextMonth,
    PrevYear,
    NextYear,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Picker,
    Overlay,
}

impl Region {
    pub fn surface(self) -> Surface {
        match self {
            Region::Overlay => Surface::Overlay,
            _ => Surface::Picker,
        }
    }
}

/// What a target needs to draw one day cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CellView {
    pub label: String,
    pub blocked: bool,
    pub today: bool,
    pub selected: bool,
}

impl From<&GridCell> for CellView {
    fn from(cell: &GridCell) -> Self {
        Self {
            label: cell.label(),
            blocked: cell.is_blocked(),
            today: cell.is_today,
            selected: cell.is_selected,
        }
    }
}

/// The surface a picker draws to.
///
/// The picker is the only writer. Cells are addressed by grid index,
/// row-major from the top-left Monday.
pub trait RenderTarget {
    /// Builds the pager, week labels, empty grid and (optionally) overlay.
    fn mount(&mut self, scaffold: &Scaffold);

    /// Replaces every cell.
    fn set_cells(&mut self, cells: &[CellView]);

    /// Moves the selection highlight without touching labels.
    fn set_selected(&mut self, index: Option<usize>);

    fn set_pager(&mut self, labels: &PagerLabels);

    fn set_visible(&mut self, visible: bool);

    fn set_overlay_visible(&mut self, visible: bool);

    /// Removes the picker (and overlay) for good.
    fn detach(&mut self);
}
