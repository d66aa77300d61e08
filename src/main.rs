use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use datepicker::cli::Cli;
use datepicker::logging;
use datepicker::options::ConfigError;
use datepicker::picker::{DatePicker, Outcome, RawEvent};
use datepicker::terminal::{KeyCode, KeyModifiers, Terminal, TerminalEvent};
use datepicker::ui::span::Span;
use datepicker::ui::style::{Color, Style};
use datepicker::{CalendarDay, PickerError, TerminalTarget};

const FIELD: &str = "demo";
const HINT: &str = " q quit  o open  PgUp/PgDn month  [ ] year";

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Picker(#[from] PickerError),
}

type Picker = DatePicker<TerminalTarget, &'static str>;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), DemoError> {
    let options = cli.options()?;
    let mut picker: Picker = DatePicker::new(TerminalTarget::new(), options);

    let picked: Rc<RefCell<Option<CalendarDay>>> = Rc::default();
    let sink = Rc::clone(&picked);
    picker.add_selection_handler(move |date, field| {
        tracing::info!(%date, field = field.copied().unwrap_or("-"), "date picked");
        *sink.borrow_mut() = Some(date);
        Ok(())
    })?;

    match cli.date {
        Some(date) => picker.show(date, Some(FIELD))?,
        None => picker.show_today(Some(FIELD))?,
    }

    let mut terminal = Terminal::new()?;
    terminal.enter()?;
    let result = event_loop(&mut terminal, &mut picker, &picked);
    terminal.exit()?;
    result?;

    picker.destroy()?;
    if let Some(date) = *picked.borrow() {
        println!("{date}");
    }
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal,
    picker: &mut Picker,
    picked: &RefCell<Option<CalendarDay>>,
) -> Result<(), DemoError> {
    let mut render_requested = true;

    loop {
        if render_requested {
            draw(terminal, picker, *picked.borrow())?;
            render_requested = false;
        }

        let raw = match terminal.poll_event(Duration::from_millis(250))? {
            TerminalEvent::Key(key) => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Char('q') => break,
                KeyCode::Char('o') if !picker.is_visible() => {
                    match picker.selected_date() {
                        Some(date) => picker.show(date, Some(FIELD))?,
                        None => picker.show_today(Some(FIELD))?,
                    }
                    render_requested = true;
                    continue;
                }
                _ => RawEvent::Key(key),
            },
            TerminalEvent::MouseDown { col, row } => {
                match picker.target().and_then(|t| t.region_at(col, row)) {
                    Some(region) => RawEvent::press(region),
                    None => continue,
                }
            }
            TerminalEvent::MouseUp { col, row } => {
                match picker.target().and_then(|t| t.region_at(col, row)) {
                    Some(region) => RawEvent::release(region),
                    None => continue,
                }
            }
            TerminalEvent::Resize(_) => {
                render_requested = true;
                continue;
            }
            TerminalEvent::Tick => continue,
        };

        match picker.dispatch(raw) {
            Ok(Outcome::Ignored) => {}
            Ok(_) => render_requested = true,
            Err(PickerError::SubscriberFailures { failures }) => {
                tracing::warn!(count = failures.len(), "selection handlers failed");
                render_requested = true;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn draw(
    terminal: &mut Terminal,
    picker: &Picker,
    picked: Option<CalendarDay>,
) -> io::Result<()> {
    let size = terminal.size();
    let Some(target) = picker.target() else {
        return Ok(());
    };
    let mut lines = target.frame(size.width, size.height);
    if let Some(last) = lines.last_mut() {
        let status = match picked {
            Some(date) => format!("{HINT}  picked {date}"),
            None => HINT.to_string(),
        };
        *last = vec![Span::styled(status, Style::new().color(Color::DarkGrey))];
    }
    terminal.render_frame(&lines)
}
