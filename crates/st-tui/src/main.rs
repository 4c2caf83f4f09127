mod app;
mod command;
mod panels;
mod race;
mod ui;
mod widgets;

use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self as ct_event, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use st_advisor::StrategyAdvisor;
use st_core::config::Config;
use st_core::seed::demo_tickets;
use st_feed::{FeedParams, TelemetryFeed};

use crate::app::App;
use crate::race::{Drained, Race};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// StratOS -- a pit wall for your sprint, fed by a simulated telemetry uplink.
#[derive(Parser, Debug)]
#[command(name = "stratos", version, about)]
struct Cli {
    /// Config file to use instead of ~/.stratos/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the feed's random source for a reproducible race.
    #[arg(long)]
    seed: Option<u64>,

    /// Print feed events and advice as JSON lines; read commands from stdin.
    #[arg(long)]
    headless: bool,

    /// Start with the uplink closed.
    #[arg(long)]
    paused: bool,

    /// Never call the strategy model.
    #[arg(long)]
    no_advisor: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading config")?;

    init_logging(&config, cli.headless);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("stratos-rt")
        .build()
        .context("starting tokio runtime")?;
    let _enter = runtime.enter();

    let params = FeedParams::from(&config.feed);
    let seed = demo_tickets();
    let feed = match cli.seed.or(config.feed.seed) {
        Some(rng_seed) => TelemetryFeed::seeded(&seed, params, rng_seed),
        None => TelemetryFeed::new(&seed, params),
    };
    let advisor = if cli.no_advisor {
        StrategyAdvisor::offline("disabled by --no-advisor")
    } else {
        StrategyAdvisor::from_config(&config.advisor)
    };
    let race = Race::start(
        feed,
        advisor,
        Duration::from_secs(config.advisor.debounce_secs),
        runtime.handle().clone(),
    );

    let mut app = App::new(
        race.feed.tickets(),
        config.dashboard.log_capacity,
        config.dashboard.export_path(),
    );
    if config.dashboard.start_live && !cli.paused {
        let intent = app.toggle_live();
        race.handle(intent, &app);
    }
    info!(headless = cli.headless, live = app.live, "dashboard started");

    if cli.headless {
        return run_headless(&race, &mut app);
    }

    // Restore the terminal before the panic message is printed.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run(&race, &mut app);
    restore_terminal()?;
    race.feed.disconnect();
    result
}

/// The dashboard draws over the terminal, so its logs go to a file; the
/// headless mode owns stdout, so its logs go to stderr.
fn init_logging(config: &Config, headless: bool) {
    let level = config.general.log_level.as_str();
    if headless {
        if config.general.log_json {
            st_observability::logging::init_logging_json("stratos", level);
        } else {
            st_observability::logging::init_logging("stratos", level);
        }
        return;
    }
    let path = config.general.log_path();
    if let Err(e) = st_observability::logging::init_logging_to_file("stratos", level, &path) {
        // No subscriber: tracing output is dropped.
        eprintln!("warning: cannot open log file {}: {e}", path.display());
    }
}

/// Run the interactive TUI with the standard crossterm backend.
fn run(race: &Race, app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        race.drain(app, |_| {});

        terminal.draw(|frame| ui::render(frame, app))?;

        if ct_event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = ct_event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(intent) = app.on_key(key) {
                        race.handle(intent, app);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Headless mode: every feed event and advice goes to stdout as a JSON
/// line; stdin takes commands (see [`command`]) until it closes.
///
/// Usage: `echo 'query state' | stratos --headless --seed 7`
fn run_headless(race: &Race, app: &mut App) -> Result<()> {
    let (line_tx, lines) = flume::unbounded::<String>();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    emit_event(&serde_json::json!({
        "event": "started",
        "live": app.live,
        "tickets": app.tickets.len(),
    }));

    loop {
        match lines.recv_timeout(Duration::from_millis(50)) {
            Ok(line) => handle_line(race, app, line.trim()),
            Err(flume::RecvTimeoutError::Timeout) => {}
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }

        race.drain(app, |item| match item {
            Drained::Feed(event) => emit(event),
            Drained::Advice(advice) => emit_event(&serde_json::json!({
                "event": "advice",
                "strategy": advice.strategy,
                "error": advice.error,
            })),
        });

        if app.should_quit {
            break;
        }
    }

    emit_event(&serde_json::json!({"event": "quit"}));
    race.feed.disconnect();
    Ok(())
}

fn handle_line(race: &Race, app: &mut App, line: &str) {
    if line.is_empty() {
        return;
    }
    let Some(cmd) = command::parse_json_command(line).or_else(|| command::parse_command(line))
    else {
        warn!(line, "unknown command");
        emit_event(&serde_json::json!({
            "event": "error",
            "message": format!("unknown command: {line}"),
        }));
        return;
    };

    let outcome = command::execute_command(app, cmd, crate::app::export_date());
    if let Some(intent) = outcome.intent {
        race.handle(intent, app);
    }
    match outcome.reply {
        Some(json) => {
            println!("{json}");
            let _ = io::stdout().flush();
        }
        None => emit_event(&serde_json::json!({"event": "ok"})),
    }
}

fn emit(value: &impl serde::Serialize) {
    if let Ok(s) = serde_json::to_string(value) {
        println!("{s}");
        let _ = io::stdout().flush();
    }
}

fn emit_event(value: &serde_json::Value) {
    emit(value);
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    Ok(())
}
