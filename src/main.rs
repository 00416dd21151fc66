use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hystrix_watch::{events, ui, App, Dashboard, DataSource, FileSource, Settings};

#[derive(Parser, Debug)]
#[command(name = "hystrix-watch")]
#[command(about = "Terminal dashboard for Hystrix circuit breaker metrics")]
struct Args {
    /// Path to the metrics JSON document [default: hystrix.json]
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Refresh interval in seconds [default: 1]
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export the dashboard to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(file) = args.file {
        settings.file = file;
    }
    if let Some(refresh) = args.refresh {
        settings.refresh_secs = refresh.max(1);
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = Some(log_file);
    }

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        init_stderr_logging(&settings.log_level);
        return export_to_file(&settings, &export_path);
    }

    if let Some(ref log_file) = settings.log_file {
        init_file_logging(log_file, &settings.log_level)?;
    }

    info!(file = %settings.file.display(), refresh_secs = settings.refresh_secs, "Starting");
    let source = Box::new(FileSource::new(&settings.file));
    let dashboard = Dashboard::with_sorts(settings.circuit_sort, settings.thread_pool_sort);
    run_tui(source, dashboard, Duration::from_secs(settings.refresh_secs))
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// The TUI owns the terminal, so logs only go to a file.
fn init_file_logging(path: &Path, level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn init_stderr_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(io::stderr)
        .init();
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    dashboard: Dashboard,
    refresh_interval: Duration,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(source, dashboard);
    let _ = app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    events::handle_mouse_event(app, mouse, ui::CONTENT_START_ROW)
                }
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Load the metrics file once and write the resulting dashboard as JSON.
fn export_to_file(settings: &Settings, export_path: &Path) -> Result<()> {
    let mut source = FileSource::new(&settings.file);
    let Some(snapshot) = source.load() else {
        anyhow::bail!(
            "Failed to load {}: {}",
            settings.file.display(),
            source.error().unwrap_or("unknown error")
        );
    };

    let mut dashboard = Dashboard::with_sorts(settings.circuit_sort, settings.thread_pool_sort);
    let outcome = dashboard.refresh(&snapshot);
    info!(
        circuits = outcome.new_circuits,
        thread_pools = outcome.new_thread_pools,
        "Loaded metrics"
    );

    let json = serde_json::to_string_pretty(&dashboard.to_json())?;
    std::fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    println!("Exported dashboard to: {}", export_path.display());
    Ok(())
}
