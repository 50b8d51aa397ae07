mod app;
mod data;
#[cfg(test)]
mod fake;
mod format;
mod model;
mod route;
mod screens;
mod ui;

use std::{
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result};
use app::{App, FetchOutcome};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use data::{DataClient, FootballApi, DEFAULT_API_URL};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use route::Route;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base address of the predictions API
    #[arg(long, env = "CEVIX_BACKEND_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Screen to open first: /, /league/{id} or /match/{id}
    #[arg(long, default_value = "/")]
    start: Route,

    /// File that receives diagnostic logs
    #[arg(long, default_value = "cevix.log")]
    log_file: PathBuf,

    /// Print backend record counts and exit
    #[arg(long)]
    stats: bool,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let client = DataClient::new(&args.api_url).context("failed to build http client")?;
    info!(api_url = %args.api_url, start = %args.start, "starting cevix");

    if args.stats {
        let stats = client.fetch_stats().await?;
        println!("Ligas:       {}", stats.total_leagues);
        println!("Partidos:    {}", stats.total_matches);
        println!("Pronósticos: {}", stats.total_predictions);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Fetch tasks report back on this channel
    let (tx, mut rx) = mpsc::channel::<FetchOutcome>(16);
    let api: Arc<dyn FootballApi> = Arc::new(client);
    let mut app = App::new(api, tx, args.start);

    let res = run_app(&mut terminal, &mut app, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "ui loop failed");
        println!("{:?}", err)
    }

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::Receiver<FetchOutcome>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;
        if app.screen.is_loading() {
            app.tick = app.tick.wrapping_add(1);
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                        app.should_quit = true;
                    } else {
                        app.on_key(key.code);
                    }
                }
            }
        }

        while let Ok(outcome) = rx.try_recv() {
            app.apply(outcome);
        }

        if app.should_quit {
            info!("quitting");
            return Ok(());
        }
    }
}
