//! The date picker state machine.
//!
//! A [`DatePicker`] owns its render target and is driven synchronously: every
//! public method applies its whole transition before returning. Selection
//! handlers run inside [`DatePicker::handle_interaction`] and must not call
//! back into the same picker. Sharing the picker through `Rc<RefCell<_>>`
//! turns such a call into a borrow panic rather than a half-applied state.

use crate::core::clock::{Clock, SystemClock};
use crate::core::date::{CalendarDay, MonthKey};
use crate::core::error::{HandlerError, PickerError, PickerResult};
use crate::core::grid::{MonthGrid, PagerLabels, compute_grid, compute_pager_labels, week_labels};
use crate::core::notifier::{HandlerId, SelectionHandler, SelectionNotifier};
use crate::picker::bindings::{EventBinder, InteractionBindings, NativeBinder, RawEvent};
use crate::picker::options::PickerOptions;
use crate::render::{CellView, RenderTarget, Scaffold, Surface};

/// A logical element the user activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Day { index: usize },
    PrevMonth,
    NextMonth,
    PrevYear,
    NextYear,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    Hidden,
    Visible,
}

/// What an interaction ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Selected(CalendarDay),
    Paged(MonthKey),
    Hidden,
}

pub struct DatePicker<R: RenderTarget, C = ()> {
    target: Option<R>,
    options: PickerOptions,
    picker_bindings: InteractionBindings,
    overlay_bindings: Option<InteractionBindings>,
    clock: Box<dyn Clock>,
    state: PickerState,
    active: Option<CalendarDay>,
    grid: Option<MonthGrid>,
    selected: Option<CalendarDay>,
    context: Option<C>,
    notifier: SelectionNotifier<C>,
    grid_recomputes: usize,
}

impl<R: RenderTarget, C> DatePicker<R, C> {
    /// Mounts the picker on `target`, hidden, with native event bindings.
    pub fn new(mut target: R, options: PickerOptions) -> Self {
        target.mount(&Scaffold {
            week_labels: week_labels(),
            pager: options.pager,
            overlay: options.backdrop,
        });
        target.set_visible(false);
        target.set_overlay_visible(false);

        let native = NativeBinder {
            year_controls: options.pager.has_year_controls(),
        };
        let (picker_bindings, overlay_bindings) = build_bindings(&native, &options);
        tracing::debug!(?options, "date picker mounted");

        Self {
            target: Some(target),
            options,
            picker_bindings,
            overlay_bindings,
            clock: Box::new(SystemClock),
            state: PickerState::Hidden,
            active: None,
            grid: None,
            selected: None,
            context: None,
            notifier: SelectionNotifier::new(),
            grid_recomputes: 0,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the native bindings with the ones `binder` installs.
    pub fn with_binder(mut self, binder: impl EventBinder) -> Self {
        let (picker, overlay) = build_bindings(&binder, &self.options);
        self.picker_bindings = picker;
        self.overlay_bindings = overlay;
        self
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn options(&self) -> PickerOptions {
        self.options
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.target.is_some() && self.state == PickerState::Visible
    }

    pub fn is_destroyed(&self) -> bool {
        self.target.is_none()
    }

    pub fn active_month(&self) -> Option<MonthKey> {
        self.active.map(CalendarDay::key)
    }

    pub fn active_day(&self) -> Option<CalendarDay> {
        self.active
    }

    pub fn selected_date(&self) -> Option<CalendarDay> {
        self.selected
    }

    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    pub fn grid(&self) -> Option<&MonthGrid> {
        self.grid.as_ref()
    }

    pub fn pager_labels(&self) -> Option<PagerLabels> {
        self.active_month()
            .map(|key| compute_pager_labels(key, self.options.pager))
    }

    /// How many times the grid has been laid out.
    pub fn grid_recomputes(&self) -> usize {
        self.grid_recomputes
    }

    pub fn target(&self) -> Option<&R> {
        self.target.as_ref()
    }

    pub fn handler_count(&self) -> usize {
        self.notifier.len()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Opens `date`'s month, selects `date` and shows the picker.
    pub fn show(&mut self, date: CalendarDay, context: Option<C>) -> PickerResult<()> {
        self.ensure_live("show")?;
        let date = date.validate()?;
        self.context = context;
        self.open(date);
        self.selected = Some(date);
        self.apply_selection();
        self.set_visibility(PickerState::Visible);
        tracing::debug!(%date, "date picker shown");
        Ok(())
    }

    pub fn show_today(&mut self, context: Option<C>) -> PickerResult<()> {
        let today = self.clock.today();
        self.show(today, context)
    }

    /// Hides the picker. Month, selection and context are kept.
    pub fn hide(&mut self) -> PickerResult<()> {
        self.ensure_live("hide")?;
        self.set_visibility(PickerState::Hidden);
        tracing::debug!("date picker hidden");
        Ok(())
    }

    /// Detaches the render target and hands it back. Every later call fails
    /// with [`PickerError::UseAfterDestroy`].
    pub fn destroy(&mut self) -> PickerResult<R> {
        let Some(mut target) = self.target.take() else {
            return Err(PickerError::UseAfterDestroy {
                operation: "destroy",
            });
        };
        target.detach();
        self.state = PickerState::Hidden;
        tracing::debug!("date picker destroyed");
        Ok(target)
    }

    // ── Selection ─────────────────────────────────────────────────────────────

    pub fn set_selected_date(&mut self, date: CalendarDay) -> PickerResult<()> {
        self.ensure_live("set_selected_date")?;
        let date = date.validate()?;
        self.selected = Some(date);
        self.apply_selection();
        Ok(())
    }

    pub fn add_selection_handler<F>(&mut self, handler: F) -> PickerResult<HandlerId>
    where
        F: Fn(CalendarDay, Option<&C>) -> Result<(), HandlerError> + 'static,
    {
        self.ensure_live("add_selection_handler")?;
        Ok(self.notifier.add(handler))
    }

    pub fn add_shared_selection_handler(
        &mut self,
        handler: SelectionHandler<C>,
    ) -> PickerResult<HandlerId> {
        self.ensure_live("add_selection_handler")?;
        Ok(self.notifier.add_shared(handler))
    }

    pub fn remove_selection_handler(&mut self, id: HandlerId) -> PickerResult<bool> {
        self.ensure_live("remove_selection_handler")?;
        Ok(self.notifier.remove(id))
    }

    pub fn remove_shared_selection_handler(
        &mut self,
        handler: &SelectionHandler<C>,
    ) -> PickerResult<bool> {
        self.ensure_live("remove_selection_handler")?;
        Ok(self.notifier.remove_shared(handler))
    }

    // ── Paging ────────────────────────────────────────────────────────────────

    /// Makes `date` the active day. The grid is laid out again only when the
    /// (year, month) changes. Returns whether it was.
    pub fn open_month(&mut self, date: CalendarDay) -> PickerResult<bool> {
        self.ensure_live("open_month")?;
        let date = date.validate()?;
        Ok(self.open(date))
    }

    pub fn prev_month(&mut self) -> PickerResult<Outcome> {
        self.ensure_live("prev_month")?;
        Ok(self.page(self.anchor().key().prev().last_day()))
    }

    pub fn next_month(&mut self) -> PickerResult<Outcome> {
        self.ensure_live("next_month")?;
        Ok(self.page(self.anchor().key().next().last_day()))
    }

    /// Ignored when the pager has no year controls.
    pub fn prev_year(&mut self) -> PickerResult<Outcome> {
        self.ensure_live("prev_year")?;
        if !self.options.pager.has_year_controls() {
            return Ok(Outcome::Ignored);
        }
        Ok(self.page(self.anchor().add_years(-1)))
    }

    /// Ignored when the pager has no year controls.
    pub fn next_year(&mut self) -> PickerResult<Outcome> {
        self.ensure_live("next_year")?;
        if !self.options.pager.has_year_controls() {
            return Ok(Outcome::Ignored);
        }
        Ok(self.page(self.anchor().add_years(1)))
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Applies one user interaction.
    ///
    /// Picking a day sets the selection, moves the highlight and notifies the
    /// handlers. If some handlers fail the selection stays applied and the
    /// failures come back as [`PickerError::SubscriberFailures`].
    pub fn handle_interaction(&mut self, interaction: Interaction) -> PickerResult<Outcome> {
        self.ensure_live("handle_interaction")?;
        match interaction {
            Interaction::Day { index } => self.pick(index),
            Interaction::PrevMonth => self.prev_month(),
            Interaction::NextMonth => self.next_month(),
            Interaction::PrevYear => self.prev_year(),
            Interaction::NextYear => self.next_year(),
            Interaction::Overlay => {
                if !self.options.backdrop {
                    tracing::trace!("overlay interaction without backdrop ignored");
                    return Ok(Outcome::Ignored);
                }
                self.hide()?;
                Ok(Outcome::Hidden)
            }
        }
    }

    /// Resolves a raw event through the bindings. Nothing reaches a hidden picker.
    pub fn dispatch(&mut self, event: RawEvent) -> PickerResult<Outcome> {
        self.ensure_live("dispatch")?;
        if !self.is_visible() {
            return Ok(Outcome::Ignored);
        }
        let overlay = self.overlay_bindings.as_ref();
        let interaction = match event {
            RawEvent::Pointer { region, .. } => match region.surface() {
                Surface::Picker => self.picker_bindings.resolve(event),
                Surface::Overlay => overlay.and_then(|b| b.resolve(event)),
            },
            RawEvent::Key(_) => self
                .picker_bindings
                .resolve(event)
                .or_else(|| overlay.and_then(|b| b.resolve(event))),
        };
        match interaction {
            Some(interaction) => self.handle_interaction(interaction),
            None => {
                tracing::trace!(?event, "unbound event ignored");
                Ok(Outcome::Ignored)
            }
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn ensure_live(&self, operation: &'static str) -> PickerResult<()> {
        if self.target.is_none() {
            return Err(PickerError::UseAfterDestroy { operation });
        }
        Ok(())
    }

    fn anchor(&self) -> CalendarDay {
        self.active.unwrap_or_else(|| self.clock.today())
    }

    fn page(&mut self, date: CalendarDay) -> Outcome {
        self.open(date);
        tracing::debug!(month = %date.key(), "paged");
        Outcome::Paged(date.key())
    }

    fn open(&mut self, date: CalendarDay) -> bool {
        let changed = self.active_month() != Some(date.key());
        self.active = Some(date);
        if changed {
            self.recompute();
        }
        changed
    }

    fn recompute(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        let key = active.key();
        let mut grid = compute_grid(key);
        grid.mark_today(self.clock.today());
        grid.mark_selected(self.selected);

        let cells: Vec<CellView> = grid.cells().iter().map(CellView::from).collect();
        let labels = compute_pager_labels(key, self.options.pager);
        if let Some(target) = self.target.as_mut() {
            target.set_cells(&cells);
            target.set_pager(&labels);
        }
        self.grid = Some(grid);
        self.grid_recomputes += 1;
        tracing::debug!(month = %key, "grid laid out");
    }

    fn apply_selection(&mut self) {
        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        let index = grid.mark_selected(self.selected);
        if let Some(target) = self.target.as_mut() {
            target.set_selected(index);
        }
    }

    fn set_visibility(&mut self, state: PickerState) {
        self.state = state;
        let visible = state == PickerState::Visible;
        let backdrop = self.options.backdrop;
        if let Some(target) = self.target.as_mut() {
            target.set_visible(visible);
            if backdrop {
                target.set_overlay_visible(visible);
            }
        }
    }

    fn pick(&mut self, index: usize) -> PickerResult<Outcome> {
        let (Some(active), Some(cell)) = (
            self.active,
            self.grid.as_ref().and_then(|g| g.cell(index)).copied(),
        ) else {
            tracing::trace!(index, "no such day cell");
            return Ok(Outcome::Ignored);
        };
        if cell.is_blocked() {
            tracing::trace!(index, date = %cell.date, "blocked cell ignored");
            return Ok(Outcome::Ignored);
        }

        let date = active.key().day(cell.date.day);
        self.selected = Some(date);
        self.apply_selection();
        tracing::debug!(%date, "day selected");
        self.notifier.emit(date, self.context.as_ref())?;
        Ok(Outcome::Selected(date))
    }
}

fn build_bindings(
    binder: &impl EventBinder,
    options: &PickerOptions,
) -> (InteractionBindings, Option<InteractionBindings>) {
    let mut picker = InteractionBindings::new(Surface::Picker);
    binder.bind(&mut picker);
    let overlay = options.backdrop.then(|| {
        let mut overlay = InteractionBindings::new(Surface::Overlay);
        binder.bind(&mut overlay);
        overlay
    });
    (picker, overlay)
}
