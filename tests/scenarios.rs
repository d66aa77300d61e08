//! End-to-end picker behaviour against an in-memory render target.

use std::cell::RefCell;
use std::rc::Rc;

use datepicker::core::clock::FixedClock;
use datepicker::core::error::HandlerError;
use datepicker::core::grid::{GRID_CELLS, PagerVariant, compute_grid};
use datepicker::core::notifier::SelectionHandler;
use datepicker::picker::{DatePicker, Interaction, Outcome, PickerOptions, RawEvent};
use datepicker::render::{Region, SnapshotTarget, TerminalTarget};
use datepicker::terminal::{KeyCode, KeyEvent, KeyModifiers};
use datepicker::{CalendarDay, MonthKey, PickerError};

type Picker = DatePicker<SnapshotTarget, String>;

fn day(y: i32, m: u8, d: u8) -> CalendarDay {
    CalendarDay::new(y, m, d).expect("valid date")
}

fn picker(options: PickerOptions) -> Picker {
    DatePicker::new(SnapshotTarget::new(), options).with_clock(FixedClock(day(2024, 3, 5)))
}

fn snapshot(p: &Picker) -> &SnapshotTarget {
    p.target().expect("picker still attached")
}

#[test]
fn show_highlights_date_and_labels_pager() {
    let mut single = picker(PickerOptions::default());
    single.show(day(2024, 2, 15), None).expect("show");
    let t = snapshot(&single);
    assert!(t.visible);
    assert_eq!(t.cells[t.selected_index().expect("selected")].label, "15");
    assert_eq!(t.pager_text(), "Feb, 2024");
    assert_eq!(t.scaffold.as_ref().expect("mounted").week_labels[0], "Mon");

    let mut triple = picker(PickerOptions::new().with_pager(PagerVariant::Triple));
    triple.show(day(2024, 2, 15), None).expect("show");
    assert_eq!(
        snapshot(&triple).pager_text(),
        "Jan, 2024 / Feb, 2024 / Mar, 2024"
    );
}

#[test]
fn hide_keeps_selection_and_month() {
    let mut p = picker(PickerOptions::default());
    p.show(day(2024, 2, 15), Some("due".to_string())).expect("show");
    p.hide().expect("hide");

    assert!(!p.is_visible());
    assert!(!snapshot(&p).visible);
    assert_eq!(p.selected_date(), Some(day(2024, 2, 15)));
    assert_eq!(p.active_month(), Some(MonthKey { year: 2024, month: 2 }));
    assert_eq!(p.context().map(String::as_str), Some("due"));
}

#[test]
fn march_2024_lays_out_with_four_leading_blocked_cells() {
    let mut p = picker(PickerOptions::default());
    p.show(day(2024, 3, 1), None).expect("show");

    let t = snapshot(&p);
    assert_eq!(t.cells.len(), GRID_CELLS);
    assert!(t.cells[..4].iter().all(|c| c.blocked));
    assert_eq!(t.cells[4].label, "1");
    assert!(!t.cells[4].blocked);
    assert_eq!(t.selected_index(), Some(4));
    // Today (5 March) sits four cells later.
    assert_eq!(t.today_index(), Some(8));
    assert_eq!(t.blocked_count(), GRID_CELLS - 31);
}

#[test]
fn every_month_is_contiguous_and_covered() {
    for year in [1900, 2023, 2024, 2100] {
        for month in 1..=12 {
            let grid = compute_grid(MonthKey::new(year, month).expect("month"));
            let cells = grid.cells();
            for pair in cells.windows(2) {
                assert_eq!(pair[0].date.next_day(), pair[1].date);
            }
            let days = grid.key().days() as usize;
            if grid.leading_blocked() + days <= GRID_CELLS {
                assert_eq!(grid.active_days(), days);
                assert_eq!(grid.truncated_days(), 0);
            } else {
                assert_eq!(grid.active_days() + grid.truncated_days(), days);
            }
        }
    }
}

#[test]
fn blocked_cell_click_changes_nothing() {
    let calls = Rc::new(RefCell::new(0));
    let mut p = picker(PickerOptions::default());
    let counter = Rc::clone(&calls);
    p.add_selection_handler(move |_, _| {
        *counter.borrow_mut() += 1;
        Ok(())
    })
    .expect("add");
    p.show(day(2024, 3, 10), None).expect("show");

    let outcome = p
        .dispatch(RawEvent::press(Region::Cell(2)))
        .expect("dispatch");
    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(p.selected_date(), Some(day(2024, 3, 10)));
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn removed_subscriber_is_not_called() {
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();
    let mut p = picker(PickerOptions::default());

    let first = Rc::clone(&log);
    p.add_selection_handler(move |_, _| {
        first.borrow_mut().push("first");
        Ok(())
    })
    .expect("add");
    let second_log = Rc::clone(&log);
    let second: SelectionHandler<String> = Rc::new(move |_: CalendarDay, _: Option<&String>| {
        second_log.borrow_mut().push("second");
        Ok(())
    });
    p.add_shared_selection_handler(Rc::clone(&second))
        .expect("add");

    p.show(day(2024, 3, 1), None).expect("show");
    p.handle_interaction(Interaction::Day { index: 10 })
        .expect("pick");
    assert_eq!(*log.borrow(), vec!["first", "second"]);

    assert!(p.remove_shared_selection_handler(&second).expect("remove"));
    assert!(!p.remove_shared_selection_handler(&second).expect("remove again"));
    p.handle_interaction(Interaction::Day { index: 11 })
        .expect("pick");
    assert_eq!(*log.borrow(), vec!["first", "second", "first"]);
}

#[test]
fn handlers_receive_date_and_context() {
    let seen: Rc<RefCell<Vec<(CalendarDay, Option<String>)>>> = Rc::default();
    let mut p = picker(PickerOptions::default());
    let sink = Rc::clone(&seen);
    p.add_selection_handler(move |date, ctx| {
        sink.borrow_mut().push((date, ctx.cloned()));
        Ok(())
    })
    .expect("add");

    p.show(day(2024, 3, 1), Some("start".to_string()))
        .expect("show");
    // March 2024: cell 4 is the 1st, so cell 24 is the 21st.
    p.dispatch(RawEvent::press(Region::Cell(24)))
        .expect("dispatch");
    assert_eq!(
        *seen.borrow(),
        vec![(day(2024, 3, 21), Some("start".to_string()))]
    );
}

#[test]
fn next_then_prev_month_is_an_inverse() {
    let mut p = picker(PickerOptions::default());
    p.show(day(2023, 12, 24), None).expect("show");
    p.next_month().expect("next");
    assert_eq!(p.active_month(), Some(MonthKey { year: 2024, month: 1 }));
    p.prev_month().expect("prev");
    assert_eq!(p.active_month(), Some(MonthKey { year: 2023, month: 12 }));
    assert_eq!(p.selected_date(), Some(day(2023, 12, 24)));
}

#[test]
fn layout_reused_within_a_month() {
    let mut p = picker(PickerOptions::default());
    p.show(day(2024, 2, 1), None).expect("show");
    p.show(day(2024, 2, 20), None).expect("show again");
    p.set_selected_date(day(2024, 2, 9)).expect("select");
    assert_eq!(p.grid_recomputes(), 1);
    assert_eq!(snapshot(&p).cell_updates, 1);

    p.next_month().expect("next");
    assert_eq!(p.grid_recomputes(), 2);
    assert_eq!(snapshot(&p).selected_index(), None);
}

#[test]
fn destroyed_picker_rejects_everything() {
    let mut p = picker(PickerOptions::new().with_backdrop(true));
    p.show(day(2024, 2, 15), None).expect("show");
    let target = p.destroy().expect("destroy");
    assert!(!target.attached);

    assert!(matches!(
        p.show(day(2024, 2, 1), None),
        Err(PickerError::UseAfterDestroy { operation: "show" })
    ));
    assert!(matches!(
        p.dispatch(RawEvent::press(Region::Overlay)),
        Err(PickerError::UseAfterDestroy { .. })
    ));
    assert!(matches!(
        p.destroy(),
        Err(PickerError::UseAfterDestroy { operation: "destroy" })
    ));
}

#[test]
fn backdrop_click_and_escape_hide() {
    let mut p = picker(PickerOptions::new().with_backdrop(true));
    p.show(day(2024, 2, 15), None).expect("show");
    assert!(snapshot(&p).overlay_visible);
    assert_eq!(
        p.dispatch(RawEvent::press(Region::Overlay)).expect("click"),
        Outcome::Hidden
    );
    assert!(!snapshot(&p).overlay_visible);

    p.show(day(2024, 2, 15), None).expect("show");
    let esc = RawEvent::Key(KeyEvent {
        code: KeyCode::Esc,
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(p.dispatch(esc).expect("esc"), Outcome::Hidden);
    assert!(!p.is_visible());
}

#[test]
fn failing_subscriber_does_not_stop_others() {
    let reached = Rc::new(RefCell::new(Vec::new()));
    let mut p = picker(PickerOptions::default());
    p.add_selection_handler(|_, _| Err(HandlerError::new("disk full")))
        .expect("add");
    let sink = Rc::clone(&reached);
    p.add_selection_handler(move |date, _| {
        sink.borrow_mut().push(date);
        Ok(())
    })
    .expect("add");
    p.show(day(2024, 3, 1), None).expect("show");

    let err = p
        .handle_interaction(Interaction::Day { index: 6 })
        .expect_err("one handler fails");
    assert_eq!(
        err.to_string(),
        "1 selection handler(s) failed: #1: disk full"
    );
    assert_eq!(*reached.borrow(), vec![day(2024, 3, 3)]);
    assert_eq!(p.selected_date(), Some(day(2024, 3, 3)));
}

#[test]
fn terminal_target_maps_clicks_back_to_cells() {
    let mut p: DatePicker<TerminalTarget, ()> =
        DatePicker::new(TerminalTarget::new().with_origin(0, 0), PickerOptions::default())
            .with_clock(FixedClock(day(2024, 3, 5)));
    p.show(day(2024, 3, 1), None).expect("show");

    let target = p.target().expect("attached");
    let lines = target.picker_lines();
    assert_eq!(lines.len(), 7);

    // Row 0 is the pager, row 1 the week labels, rows 2.. the weeks.
    let region = target.region_at(4 * 4 + 1, 2).expect("cell region");
    assert_eq!(region, Region::Cell(4));
    assert_eq!(
        p.dispatch(RawEvent::press(region)).expect("pick"),
        Outcome::Selected(day(2024, 3, 1))
    );
}

#[test]
fn show_refuses_dates_built_out_of_range() {
    let mut p = picker(PickerOptions::default());
    p.show(day(2024, 2, 15), Some("kept".to_string()))
        .expect("show");

    let bogus = CalendarDay {
        year: 2024,
        month: 13,
        day: 1,
    };
    assert!(matches!(
        p.show(bogus, Some("lost".to_string())),
        Err(PickerError::InvalidMonth { month: 13 })
    ));
    assert_eq!(p.context().map(String::as_str), Some("kept"));
    assert_eq!(p.active_month(), Some(MonthKey { year: 2024, month: 2 }));
}
