//! Month grid layout.
//!
//! A grid is always 5 weeks of 7 days, weeks starting on Monday. Days of the
//! previous and next month fill the leading and trailing cells and are
//! *blocked*: they are shown but cannot be picked, and are never marked as
//! today or selected.
//!
//! The fixed capacity means a month whose first day falls late in the week
//! can lose its last days (a 31-day month starting on Saturday or Sunday, a
//! 30-day month starting on Sunday). [`MonthGrid::truncated_days`] reports
//! how many were dropped.

use crate::core::date::{CalendarDay, MonthKey, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const WEEK_LENGTH: usize = 7;
pub const WEEKS: usize = 5;
pub const GRID_CELLS: usize = WEEK_LENGTH * WEEKS;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "June", "July", "August", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellPlacement {
    Previous,
    Current,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub date: CalendarDay,
    pub placement: CellPlacement,
    pub is_today: bool,
    pub is_selected: bool,
}

impl GridCell {
    fn new(date: CalendarDay, placement: CellPlacement) -> Self {
        Self {
            date,
            placement,
            is_today: false,
            is_selected: false,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.placement != CellPlacement::Current
    }

    pub fn label(&self) -> String {
        self.date.day.to_string()
    }
}

pub fn is_today(cell: &GridCell, today: CalendarDay) -> bool {
    !cell.is_blocked() && cell.date == today
}

pub fn is_selected(cell: &GridCell, selected: CalendarDay) -> bool {
    !cell.is_blocked() && cell.date == selected
}

/// Number of previous-month cells before day 1.
pub fn leading_offset(key: MonthKey) -> usize {
    key.first_day().weekday().index()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    key: MonthKey,
    cells: [GridCell; GRID_CELLS],
}

pub fn compute_grid(key: MonthKey) -> MonthGrid {
    let prev = key.prev();
    let next = key.next();
    let prev_days = prev.days();
    let days = key.days();

    let mut leading = leading_offset(key) as u8;
    let mut current = 0u8;
    let mut trailing = 0u8;

    let cells = std::array::from_fn(|_| {
        if leading > 0 {
            let cell = GridCell::new(
                prev.day(prev_days - leading + 1),
                CellPlacement::Previous,
            );
            leading -= 1;
            cell
        } else if current < days {
            current += 1;
            GridCell::new(key.day(current), CellPlacement::Current)
        } else {
            trailing += 1;
            GridCell::new(next.day(trailing), CellPlacement::Next)
        }
    });

    let grid = MonthGrid { key, cells };
    let truncated = grid.truncated_days();
    if truncated > 0 {
        tracing::warn!(month = %key, truncated, "month does not fit the 5-week grid");
    }
    grid
}

impl MonthGrid {
    pub fn key(&self) -> MonthKey {
        self.key
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.cells.get(index)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(WEEK_LENGTH)
    }

    pub fn leading_blocked(&self) -> usize {
        self.cells
            .iter()
            .take_while(|c| c.placement == CellPlacement::Previous)
            .count()
    }

    pub fn active_days(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.placement == CellPlacement::Current)
            .count()
    }

    /// Days of the active month that did not fit in the grid.
    pub fn truncated_days(&self) -> usize {
        (self.key.days() as usize).saturating_sub(self.active_days())
    }

    /// Index of the non-blocked cell showing `date`.
    pub fn position_of(&self, date: CalendarDay) -> Option<usize> {
        self.cells
            .iter()
            .position(|c| !c.is_blocked() && c.date == date)
    }

    pub fn mark_today(&mut self, today: CalendarDay) -> Option<usize> {
        for cell in &mut self.cells {
            cell.is_today = is_today(cell, today);
        }
        self.cells.iter().position(|c| c.is_today)
    }

    pub fn mark_selected(&mut self, selected: Option<CalendarDay>) -> Option<usize> {
        for cell in &mut self.cells {
            cell.is_selected = selected.is_some_and(|s| is_selected(cell, s));
        }
        self.cells.iter().position(|c| c.is_selected)
    }

    pub fn today_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_today)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_selected)
    }
}

// ── Pager ─────────────────────────────────────────────────────────────────────

/// Shape of the month pager.
///
/// - `Triple` shows the previous, current and next month labels; the outer
///   labels page by one month. There are no year controls.
/// - `Single` shows only the current label, flanked by month and year arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagerVariant {
    Triple,
    #[default]
    Single,
}

impl PagerVariant {
    pub fn has_year_controls(self) -> bool {
        self == PagerVariant::Single
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagerLabels {
    pub previous: Option<String>,
    pub current: String,
    pub next: Option<String>,
}

impl fmt::Display for PagerLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(previous) = &self.previous {
            write!(f, "{previous} / ")?;
        }
        f.write_str(&self.current)?;
        if let Some(next) = &self.next {
            write!(f, " / {next}")?;
        }
        Ok(())
    }
}

pub fn month_label(key: MonthKey) -> String {
    format!(
        "{}, {}",
        MONTH_NAMES[(key.month as usize).saturating_sub(1) % 12],
        key.year
    )
}

pub fn compute_pager_labels(key: MonthKey, variant: PagerVariant) -> PagerLabels {
    match variant {
        PagerVariant::Triple => PagerLabels {
            previous: Some(month_label(key.prev())),
            current: month_label(key),
            next: Some(month_label(key.next())),
        },
        PagerVariant::Single => PagerLabels {
            previous: None,
            current: month_label(key),
            next: None,
        },
    }
}

pub fn week_labels() -> [&'static str; WEEK_LENGTH] {
    std::array::from_fn(|i| Weekday(i as u8).short_name())
}
