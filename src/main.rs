mod app;
mod config;
mod error;
mod event;
mod network;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use crate::app::App;
use crate::error::WmError;
use crate::event::{Event, EventHandler};
use crate::network::provision;
use crate::network::{BackendKind, WirelessManager};

/// iwtui — a TUI front-end for managing wireless connections through iwd
#[derive(Parser, Debug)]
#[command(name = "iwtui", version, about, long_about = None)]
struct Cli {
    /// Log file path (logging disabled if not specified)
    #[arg(short, long)]
    log: Option<String>,

    /// Config file path (default: ~/.config/iwtui/config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tick rate in milliseconds
    #[arg(short, long, default_value_t = 250)]
    tick_rate: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // The privileged-write path re-invokes this binary as sudo's askpass
    // helper; that mode must run before any argument or terminal handling.
    if provision::is_askpass_invocation() {
        provision::run_askpass_relay();
    }

    let cli = Cli::parse();

    install_panic_hook();
    init_logging(&cli.log);

    info!("iwtui starting");

    // Config errors are startup-fatal, with their line-numbered diagnostic
    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let config = match config::load(&config_path).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {e}", config_path.display());
            std::process::exit(1);
        }
    };
    if let Some(font) = &config.font {
        // The terminal renders its own glyphs; the request is honored only
        // as far as validating it resolves
        info!(
            font = %font.name,
            size = font.size,
            path = ?font.path,
            "font request resolved, ignored in terminal mode"
        );
    }

    let backend = BackendKind::Iwd.create();
    let mut manager = match WirelessManager::init(backend).await {
        Ok(m) => m,
        Err(WmError::NoDevices) => {
            eprintln!("No wireless devices available.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Could not get wireless devices: {e}");
            eprintln!("Is iwd running? Try: systemctl status iwd");
            std::process::exit(1);
        }
    };

    // Seed the network list right away when the device is already up;
    // otherwise the timed polling takes over once the device is activated
    if manager.current_device().is_powered() {
        let _ = manager.scan().await;
        let _ = manager.update_networks().await;
    }

    // Setup terminal
    enable_raw_mode().map_err(|e| WmError::Terminal(format!("failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut event_handler = EventHandler::new(Duration::from_millis(cli.tick_rate));
    let mut app = App::new(manager, config.theme);

    // ── Main event loop ───────────────────────────────────────────────
    // Backend calls run inline: operations stay strictly sequential, and a
    // slow iwctl invocation stalls the render loop rather than racing it.
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if let Some(event) = event_handler.next().await {
            match event {
                Event::Key(key) => app.handle_key(key).await,
                Event::Tick => app.on_tick().await,
                Event::Resize(_, _) => {}
            }

            if app.should_quit {
                break;
            }
        }
    }

    // Restore terminal
    event_handler.stop();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("iwtui exiting");
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(panic_info);
    }));
    color_eyre::install().ok();
}

/// Initialize tracing to a log file
fn init_logging(log_path: &Option<String>) {
    use tracing_subscriber::EnvFilter;

    if let Some(path) = log_path {
        let file = match std::fs::File::create(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Failed to create log file {path}: {e}");
                std::process::exit(1);
            }
        };
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        // No logging if no log path specified (can't log to stdout in a TUI)
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .with_writer(io::sink)
            .init();
    }
}
