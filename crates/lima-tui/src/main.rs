//! lima-tui - terminal dashboard for Lima virtual machines.
//!
//! Lists instances, shows their status, and drives the lifecycle
//! verbs by shelling out to limactl. The outer loop in [`main`]
//! restarts the dashboard after an interactive shell session ends.

use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lima_client::LimaClient;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lima_tui::actions::{self, VmCommand};
use lima_tui::app::{App, RunOutcome};
use lima_tui::events::{AppEvent, EventHandler};
use lima_tui::ui;

#[derive(Parser)]
#[command(name = "lima-tui")]
#[command(about = "Terminal dashboard for Lima virtual machines")]
#[command(version)]
struct Cli {
    /// Path to the limactl binary
    #[arg(long, default_value = "limactl")]
    limactl: String,

    /// Terminal poll interval in milliseconds
    #[arg(long, default_value = "200")]
    tick_rate: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Log to stderr so tracing output never lands in the alternate screen.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let client = LimaClient::with_program(&cli.limactl);
    let tick_rate = Duration::from_millis(cli.tick_rate);

    loop {
        match run_dashboard(&client, tick_rate).await? {
            RunOutcome::Quit => break,
            RunOutcome::Connect(name) => {
                info!(vm = %name, "handing terminal to interactive shell");
                let status = tokio::process::Command::from(client.shell_command(&name))
                    .status()
                    .await;
                match status {
                    Ok(status) if status.success() => {}
                    Ok(status) => eprintln!("shell session for '{name}' exited with {status}"),
                    Err(e) => eprintln!("failed to run shell for '{name}': {e}"),
                }
                // Fall through: the dashboard restarts with a fresh list.
            }
        }
    }

    Ok(())
}

/// One dashboard session: set up the terminal, run the UI loop,
/// restore the terminal even if the loop failed.
async fn run_dashboard(client: &LimaClient, tick_rate: Duration) -> anyhow::Result<RunOutcome> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, client, tick_rate).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: &LimaClient,
    tick_rate: Duration,
) -> anyhow::Result<RunOutcome> {
    let mut app = App::new();
    let mut events = EventHandler::new(tick_rate);

    // Initial load goes through the same worker path as a refresh.
    app.refreshing = true;
    app.set_status("Loading VMs...");
    actions::spawn(client.clone(), VmCommand::List, events.sender());

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        match events.next().await {
            Some(AppEvent::Key(key)) => {
                if let Some(action) = actions::action_for_key(&app, key) {
                    if let Some(command) = actions::dispatch(&mut app, action) {
                        actions::spawn(client.clone(), command, events.sender());
                    }
                }
            }
            Some(AppEvent::Resize(_, _) | AppEvent::Tick) => {}
            Some(AppEvent::Worker(event)) => actions::apply_worker_event(&mut app, event),
            None => return Ok(RunOutcome::Quit),
        }

        if let Some(outcome) = app.outcome.take() {
            return Ok(outcome);
        }
    }
}
