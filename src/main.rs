//! Weatherdash - weather for any place on earth in the terminal
//!
//! A terminal UI application that shows current conditions, air quality and a
//! 5-day forecast for a searched place, the home location, or any point
//! clicked on the world map.

use std::io;
use std::panic;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::info;

use weatherdash::app::App;
use weatherdash::cli::{Cli, StartupConfig};
use weatherdash::data::OpenWeatherClient;
use weatherdash::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse and validate arguments before touching the terminal
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let log_path = logging::init(config.log_file.as_deref())?;
    info!(log = %log_path.display(), startup = ?config.target, "starting weatherdash");

    let client = OpenWeatherClient::new(config.api_key.clone(), config.timeout)?
        .with_base_url(config.base_url.clone());

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, &config);
    let size = terminal.size()?;
    app.set_viewport(Rect::new(0, 0, size.width, size.height));
    app.start(&config.target);

    // Main event loop
    loop {
        app.drain_events();
        app.tick(Instant::now());

        let frame = terminal.draw(|f| ui::render(f, &app))?;
        app.set_viewport(frame.area);

        // Poll for input with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    info!("shutting down");

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;

    Ok(())
}
