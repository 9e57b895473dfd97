//! roll_tui - Interactive TUI for mutation roll analysis and simulation

mod app;
mod error;
mod settings;
mod ui;

use app::{App, Tab};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use error::AppError;
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use roll_core::GameData;
use settings::{Settings, SETTINGS_FILE};
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AppError> {
    let settings = Settings::load(Path::new(SETTINGS_FILE))?;
    init_tracing(&settings.log_path)?;

    let data = match &settings.data_dir {
        Some(dir) => GameData::load_from_dir(dir)?,
        None => GameData::builtin()?,
    };
    let mut app = App::new(Arc::new(data), settings);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result?;
    tracing::info!("roll_tui exited");
    Ok(())
}

/// Log to a file so the alternate screen stays clean; `RUST_LOG` filters
fn init_tracing(path: &Path) -> Result<(), AppError> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let analyze = app.current_tab == Tab::Analyze;
                match (key.code, key.modifiers) {
                    (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
                    (KeyCode::Tab, _) => app.next_tab(),
                    (KeyCode::BackTab, _) => app.prev_tab(),
                    (KeyCode::Char('1'), _) => app.set_tab(0),
                    (KeyCode::Char('2'), _) => app.set_tab(1),
                    (KeyCode::Char('3'), _) => app.set_tab(2),
                    (KeyCode::Char('4'), _) => app.set_tab(3),
                    (KeyCode::Char('5'), _) => app.set_tab(4),
                    (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.on_up(),
                    (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.on_down(),
                    (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.on_left(),
                    (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.on_right(),
                    (KeyCode::Char('s'), _) => app.start_simulation(),
                    (KeyCode::Char('x'), _) => app.stop_simulation(),
                    (KeyCode::Char('w'), _) => app.export(),
                    (KeyCode::Char('r'), _) if analyze => app.roll_random(),
                    (KeyCode::Char('b'), _) if analyze => app.reset_roll(),
                    (KeyCode::Char('o'), _) if analyze => app.load_roll(),
                    (KeyCode::Char('?'), _) => app.toggle_help(),
                    _ => {}
                }
            }
        }

        // Drain runner events
        app.tick();
    }

    Ok(())
}
