//! Storefront demo for the sticky scroll engine.
//!
//! Run the binary to scroll a product page whose order summary sticks
//! below the header until the end of the product list pushes it away.
//! Run with `--print-config` to see the effective configuration.

use std::fs::File;
use std::io::{self, stderr, Stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, widgets::Paragraph, Frame, Terminal};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use sticky_scroll::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    page::{PageLayout, MAX_PRODUCTS},
    state::AppState,
};
use sticky_scroll::config::AppConfig;
use sticky_scroll::ui::{
    layout::AppLayout, page_widget::PageView, popup::DiagnosticsPopup, spinner::ScrollIndicator,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Sticky sidebar and scroll coordination demo")]
struct Cli {
    /// Height of the fixed page header, in rows.
    #[arg(long, default_value_t = 3)]
    header: u16,

    /// Gap kept between the header and the pinned order summary.
    #[arg(long, default_value_t = 1)]
    offset: u16,

    /// Number of products on the page (controls the page length).
    #[arg(
        long,
        default_value_t = 24,
        value_parser = clap::value_parser!(u16).range(1..=MAX_PRODUCTS as i64),
    )]
    products: u16,

    /// Write logs here instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    save_config: bool,
}

type Term = Terminal<CrosstermBackend<Stderr>>;

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let config = AppConfig::load();
    if cli.print_config {
        print!("{}", config.serialise());
        return Ok(());
    }
    if cli.save_config {
        let path = config.save()?;
        println!("config written to {}", path.display());
        return Ok(());
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &cli, config).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(io::stderr).init(), // never pollute stdout
    }
    Ok(())
}

async fn run(terminal: &mut Term, cli: &Cli, config: AppConfig) -> Result<()> {
    let size = terminal.size()?;
    let screen = AppLayout::from_area(Rect::new(0, 0, size.width, size.height));

    let layout = PageLayout::new(screen.page_area.width, cli.header, usize::from(cli.products)).shared();
    let mut state = AppState::new(
        config,
        layout,
        f64::from(cli.offset),
        screen.page_area.height,
    );
    tracing::info!(
        header = cli.header,
        offset = cli.offset,
        products = cli.products,
        "page ready"
    );

    // ── async sources ─────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(50));
    let mut frames = tokio::time::interval(state.config.frame_interval());
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| draw(frame, &state))?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(w, h) => {
                        let screen = AppLayout::from_area(Rect::new(0, 0, w, h));
                        state.resize(screen.page_area.width, screen.page_area.height);
                    }
                }
            }

            at = frames.tick() => state.on_tick(at.into_std()),
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState) {
    let screen = AppLayout::from_area(frame.area());
    let layout = state.layout.borrow();
    let sticky = state.sticky.borrow();

    frame.render_widget(
        PageView {
            layout: &layout,
            sticky: &sticky,
            scroll_y: state.scroll.position(),
            progress: state.reading_progress(),
        },
        screen.page_area,
    );

    let hint = state.config.status_bar_hint();
    let status_text = state.status_message.as_deref().unwrap_or(&hint);
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, screen.status_area);
    frame.render_widget(
        ScrollIndicator {
            visible: state.coordinator.is_currently_scrolling(),
            tick: state.tick,
        },
        screen.status_area,
    );

    if state.show_diagnostics {
        frame.render_widget(
            DiagnosticsPopup {
                coordinator: &state.coordinator,
                sticky: &sticky,
                config: &state.config,
            },
            frame.area(),
        );
    }
}
