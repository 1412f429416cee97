// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod config;
mod data;
mod events;
mod source;
mod ui;

use app::{App, View};
use crate::config::DashboardConfig;
use source::{AutomationFetcher, DataSource, FileSource};

#[derive(Parser, Debug)]
#[command(name = "dq-doctor")]
#[command(about = "Data quality TUI for monitoring warehouse pipeline health")]
struct Args {
    /// Path to the quality snapshot JSON file (warehouse export)
    #[arg(short, long, default_value = "quality.json")]
    file: PathBuf,

    /// Path to a TOML config file (thresholds, score weights, API credentials)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh interval in seconds
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Override: hours before a source counts as stale
    #[arg(long)]
    fresh_max: Option<f64>,

    /// Override: hours before a source counts as critical
    #[arg(long)]
    stale_max: Option<f64>,

    /// Export current state to JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write tracing output to this file (off by default; the terminal
    /// is occupied by the TUI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref log_path) = args.log_file {
        init_logging(log_path)?;
    }

    let mut config = DashboardConfig::load(args.config.as_deref())?;

    // Apply CLI threshold overrides on top of file/env config
    if let Some(fresh_max) = args.fresh_max {
        config.thresholds.fresh_max_hours = fresh_max;
    }
    if let Some(stale_max) = args.stale_max {
        config.thresholds.stale_max_hours = stale_max;
    }
    config.validate()?;

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return export_to_file(&args.file, &export_path, config);
    }

    run_with_file(&args.file, config, Duration::from_secs(args.refresh))
}

/// Route tracing output to a file so it never corrupts the TUI.
fn init_logging(path: &std::path::Path) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let file = std::fs::File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dq_doctor=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Run with a file-based data source
fn run_with_file(path: &PathBuf, config: DashboardConfig, refresh: Duration) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, config, refresh)
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    config: DashboardConfig,
    refresh_interval: Duration,
) -> Result<()> {
    // Automation APIs are optional; absent credentials mean the view
    // falls back to snapshot-embedded sections
    let fetcher = AutomationFetcher::from_configs(
        config.sync_api.clone(),
        config.workflow_api.clone(),
        config.cache_ttl(),
    )?;

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
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, config).with_automation(fetcher);
    let _ = app.reload_data();

    // Run the main loop
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

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with overall health
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view, or the error panel before any data loads
            if app.data.is_none() && app.load_error.is_some() {
                ui::common::render_error_panel(frame, app, chunks[2]);
            } else {
                match app.current_view {
                    View::Overview => ui::overview::render(frame, app, chunks[2]),
                    View::Freshness => ui::freshness::render(frame, app, chunks[2]),
                    View::Automation => ui::automation::render(frame, app, chunks[2]),
                }
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + cards (4) +
                    // table header (1) in the Overview; views without cards
                    // still resolve clicks close enough for row selection
                    let content_start = match app.current_view {
                        View::Overview => 7,
                        _ => 3,
                    };
                    events::handle_mouse_event(app, mouse, content_start);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Export current quality state to a JSON file (non-interactive mode)
fn export_to_file(
    snapshot_path: &std::path::Path,
    export_path: &std::path::Path,
    config: DashboardConfig,
) -> Result<()> {
    let source = Box::new(FileSource::new(snapshot_path));
    let mut app = App::new(source, config);
    app.reload_data()?;

    if app.data.is_none() {
        if let Some(err) = app.load_error {
            anyhow::bail!("Failed to load {}: {}", snapshot_path.display(), err);
        }
        anyhow::bail!("Failed to load {}", snapshot_path.display());
    }

    app.export_state(export_path)?;
    println!("Exported quality state to: {}", export_path.display());
    Ok(())
}
