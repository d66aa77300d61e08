//! Mapping from raw input to picker interactions.
//!
//! A picker keeps one [`InteractionBindings`] table per surface: the picker
//! itself and, with `backdrop` enabled, the overlay. How the tables are
//! filled is decided by an [`EventBinder`]. [`NativeBinder`] is used unless
//! the host supplies its own, e.g. one that reacts to pointer release (a tap)
//! instead of press, or that adds vim-style keys.

use crate::picker::controller::Interaction;
use crate::render::{Region, Surface};
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPress {
    Down,
    Up,
}

/// Input as delivered by an event source, before binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    Key(KeyEvent),
    Pointer { press: PointerPress, region: Region },
}

impl RawEvent {
    pub fn press(region: Region) -> Self {
        RawEvent::Pointer {
            press: PointerPress::Down,
            region,
        }
    }

    pub fn release(region: Region) -> Self {
        RawEvent::Pointer {
            press: PointerPress::Up,
            region,
        }
    }
}

/// A region with any cell index erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Cell,
    PrevMonth,
    NextMonth,
    PrevYear,
    NextYear,
    Overlay,
}

impl From<Region> for RegionKind {
    fn from(region: Region) -> Self {
        match region {
            Region::Cell(_) => RegionKind::Cell,
            Region::PrevMonth => RegionKind::PrevMonth,
            Region::NextMonth => RegionKind::NextMonth,
            Region::PrevYear => RegionKind::PrevYear,
            Region::NextYear => RegionKind::NextYear,
            Region::Overlay => RegionKind::Overlay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Key(KeyBinding),
    Pointer { press: PointerPress, kind: RegionKind },
}

impl Trigger {
    pub fn key(code: KeyCode) -> Self {
        Trigger::Key(KeyBinding::key(code))
    }

    pub fn pointer(press: PointerPress, kind: RegionKind) -> Self {
        Trigger::Pointer { press, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick the day cell the pointer landed on.
    PickDay,
    PrevMonth,
    NextMonth,
    PrevYear,
    NextYear,
    Dismiss,
}

impl Command {
    fn interaction(self, region: Option<Region>) -> Option<Interaction> {
        match self {
            Command::PickDay => match region {
                Some(Region::Cell(index)) => Some(Interaction::Day { index }),
                _ => None,
            },
            Command::PrevMonth => Some(Interaction::PrevMonth),
            Command::NextMonth => Some(Interaction::NextMonth),
            Command::PrevYear => Some(Interaction::PrevYear),
            Command::NextYear => Some(Interaction::NextYear),
            Command::Dismiss => Some(Interaction::Overlay),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InteractionBindings {
    surface: Surface,
    bindings: HashMap<Trigger, Command>,
}

impl InteractionBindings {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            bindings: HashMap::new(),
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn bind(&mut self, trigger: Trigger, command: Command) {
        self.bindings.insert(trigger, command);
    }

    pub fn unbind(&mut self, trigger: &Trigger) {
        self.bindings.remove(trigger);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn resolve(&self, event: RawEvent) -> Option<Interaction> {
        match event {
            RawEvent::Key(key) => self
                .bindings
                .get(&Trigger::Key(KeyBinding::from_event(key)))
                .and_then(|cmd| cmd.interaction(None)),
            RawEvent::Pointer { press, region } => {
                if region.surface() != self.surface {
                    return None;
                }
                self.bindings
                    .get(&Trigger::pointer(press, region.into()))
                    .and_then(|cmd| cmd.interaction(Some(region)))
            }
        }
    }
}

/// Decides how raw input is attached to a picker surface.
pub trait EventBinder {
    fn bind(&self, bindings: &mut InteractionBindings);
}

impl<F> EventBinder for F
where
    F: Fn(&mut InteractionBindings),
{
    fn bind(&self, bindings: &mut InteractionBindings) {
        self(bindings)
    }
}

/// Pointer press on every element, plus paging keys.
#[derive(Debug, Clone, Copy)]
pub struct NativeBinder {
    pub year_controls: bool,
}

impl EventBinder for NativeBinder {
    fn bind(&self, bindings: &mut InteractionBindings) {
        use PointerPress::Down;

        match bindings.surface() {
            Surface::Picker => {
                bindings.bind(Trigger::pointer(Down, RegionKind::Cell), Command::PickDay);
                bindings.bind(
                    Trigger::pointer(Down, RegionKind::PrevMonth),
                    Command::PrevMonth,
                );
                bindings.bind(
                    Trigger::pointer(Down, RegionKind::NextMonth),
                    Command::NextMonth,
                );
                bindings.bind(Trigger::key(KeyCode::PageUp), Command::PrevMonth);
                bindings.bind(Trigger::key(KeyCode::PageDown), Command::NextMonth);

                if self.year_controls {
                    bindings.bind(
                        Trigger::pointer(Down, RegionKind::PrevYear),
                        Command::PrevYear,
                    );
                    bindings.bind(
                        Trigger::pointer(Down, RegionKind::NextYear),
                        Command::NextYear,
                    );
                    bindings.bind(Trigger::key(KeyCode::Char('[')), Command::PrevYear);
                    bindings.bind(Trigger::key(KeyCode::Char(']')), Command::NextYear);
                }
            }
            Surface::Overlay => {
                bindings.bind(
                    Trigger::pointer(Down, RegionKind::Overlay),
                    Command::Dismiss,
                );
                bindings.bind(Trigger::key(KeyCode::Esc), Command::Dismiss);
            }
        }
    }
}
