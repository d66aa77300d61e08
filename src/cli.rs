use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::core::date::CalendarDay;
use crate::core::grid::PagerVariant;
use crate::picker::options::{ConfigError, PickerOptions};

/// Terminal date picker demo.
#[derive(Debug, Parser)]
#[command(
    name = "datepicker-demo",
    version,
    about = "Pick a date with the mouse; the choice is printed on exit"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Picker options file (.yaml, .yml or .json).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dim the screen behind the picker; clicking it (or Esc) hides the picker.
    #[arg(long)]
    pub backdrop: bool,

    /// Month pager layout.
    #[arg(long, value_enum)]
    pub pager: Option<PagerArg>,

    /// Initially selected date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<CalendarDay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PagerArg {
    /// Previous, current and next month labels.
    Triple,
    /// One label between month and year arrows.
    Single,
}

impl From<PagerArg> for PagerVariant {
    fn from(arg: PagerArg) -> Self {
        match arg {
            PagerArg::Triple => PagerVariant::Triple,
            PagerArg::Single => PagerVariant::Single,
        }
    }
}

impl Cli {
    /// Options from `--config` (if any) with command-line flags applied on top.
    pub fn options(&self) -> Result<PickerOptions, ConfigError> {
        let mut options = match &self.config {
            Some(path) => PickerOptions::load(path)?,
            None => PickerOptions::default(),
        };
        if self.backdrop {
            options.backdrop = true;
        }
        if let Some(pager) = self.pager {
            options.pager = pager.into();
        }
        Ok(options)
    }
}
