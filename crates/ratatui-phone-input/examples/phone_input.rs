use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::text::Span;
use ratatui_phone_input::config::PhoneInputConfig;
use ratatui_phone_input::country::Country;
use ratatui_phone_input::country::builtin;
use ratatui_phone_input::country::find_by_iso;
use ratatui_phone_input::crossterm_input::input_event_from_crossterm;
use ratatui_phone_input::phone_input::PhoneInput;
use ratatui_phone_input::phone_input::PhoneInputAction;
use ratatui_phone_input::theme::Theme;
use std::fs;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// Usage: cargo run -p ratatui-phone-input --example phone_input --features crossterm -- [config.toml]
// Logs go to phone_input.log; set RUST_LOG=debug to see picker events.
fn main() -> io::Result<()> {
    let log = fs::File::create("phone_input.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            PhoneInputConfig::from_toml_str(&text).map_err(io::Error::other)?
        }
        None => PhoneInputConfig::default(),
    };

    let countries = builtin();
    let iso = config.default_country.clone().unwrap_or_else(|| "VN".to_string());
    let Some(country) = find_by_iso(&countries, &iso).cloned() else {
        return Err(io::Error::other(format!("unknown default_country {iso:?}")));
    };
    let widget = PhoneInput::with_options(countries, config.into_options());

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App {
        widget,
        country,
        number: String::new(),
        last: "ctrl+o: pick country • tab: switch focus • ctrl+c: quit".to_string(),
    };
    let res = run(&mut terminal, &Theme::default(), &mut app);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    res
}

struct App {
    widget: PhoneInput,
    country: Country,
    number: String,
    last: String,
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    theme: &Theme,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let [field, status, _] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .areas(area);

            let buf = f.buffer_mut();
            app.widget
                .render(field, buf, theme, &app.country, &app.number);
            let line = format!(
                "{}{}  |  {}",
                app.country.dial_prefix(),
                app.number,
                app.last
            );
            buf.set_span(status.x, status.y, &Span::styled(line, theme.text_muted), status.width);
            app.widget.render_overlay(area, buf, theme);

            if let Some((x, y)) = app.widget.cursor_pos() {
                f.set_cursor_position((x, y));
            }
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let ev = crossterm::event::read()?;
        if let Event::Key(key) = &ev {
            if key.kind == KeyEventKind::Press
                && key.code == KeyCode::Char('c')
                && key.modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
            {
                return Ok(());
            }
        }
        let Some(ev) = input_event_from_crossterm(ev) else {
            continue;
        };
        match app.widget.handle_event(ev, &app.country, &app.number) {
            PhoneInputAction::CountryChanged(c) => {
                app.last = format!("country: {} ({})", c.name, c.dial_prefix());
                app.country = c;
            }
            PhoneInputAction::NationalNumberChanged(n) => app.number = n,
            PhoneInputAction::PickerOpened => app.last = "picker opened".to_string(),
            PhoneInputAction::PickerClosed => app.last = "picker closed".to_string(),
            PhoneInputAction::Redraw | PhoneInputAction::None => {}
        }
    }
}
