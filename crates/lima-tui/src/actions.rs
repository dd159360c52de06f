//! Key dispatch and VM lifecycle actions.
//!
//! The flow is split in three so each piece stays testable without a
//! terminal or a real limactl: [`action_for_key`] maps input to an
//! [`Action`], [`dispatch`] applies it to the state and decides which
//! subprocess (if any) to launch, and [`spawn`] runs that subprocess
//! on a worker task whose completion comes back as a
//! [`WorkerEvent`].

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lima_client::{LimaClient, VmStatus};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::app::{App, ConfirmDelete, RunOutcome};
use crate::events::{AppEvent, WorkerEvent};

/// Delay after a successful lifecycle command before re-listing, to
/// let limactl's reported state settle.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Gap between the stop and start halves of a restart.
pub const RESTART_GAP: Duration = Duration::from_secs(2);

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Open an interactive shell on the selected VM.
    Connect,
    /// Stop a running VM or start a stopped one.
    TogglePower,
    /// Stop then start the selected VM.
    Restart,
    /// Ask for delete confirmation.
    DeleteRequest,
    /// Confirm the pending delete.
    ConfirmDelete,
    /// Dismiss the confirmation modal.
    CancelModal,
    /// Reload the VM list.
    Refresh,
    /// Flip light/dark palette.
    ToggleTheme,
    /// Show or hide the help panel.
    ToggleHelp,
    /// End the dashboard.
    Quit,
    /// Move the selection down.
    SelectNext,
    /// Move the selection up.
    SelectPrevious,
}

/// A limactl invocation for a worker task to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmCommand {
    /// `limactl start <name>`.
    Start(String),
    /// `limactl stop <name>`.
    Stop(String),
    /// Stop, wait, start.
    Restart(String),
    /// `limactl delete <name>`.
    Delete(String),
    /// `limactl list --format json`.
    List,
}

/// Map a key press to an action, honoring the modal state.
///
/// While the confirmation modal is open only confirm/cancel keys do
/// anything; everything else is swallowed so a stray `d` cannot
/// stack requests.
#[must_use]
pub fn action_for_key(app: &App, key: KeyEvent) -> Option<Action> {
    if app.modal.is_some() {
        return match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Action::ConfirmDelete),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::CancelModal),
            _ => None,
        };
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('s' | 'S') if ctrl => Some(Action::TogglePower),
        KeyCode::Char('r' | 'R') if ctrl => Some(Action::Restart),
        KeyCode::Char('d' | 'D') if ctrl => Some(Action::DeleteRequest),
        KeyCode::Char('t' | 'T') if ctrl => Some(Action::ToggleTheme),
        KeyCode::Enter | KeyCode::Char('c') => Some(Action::Connect),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Esc => Some(if app.show_help {
            Action::ToggleHelp
        } else {
            Action::Quit
        }),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('h' | '?') => Some(Action::ToggleHelp),
        KeyCode::Char('t') => Some(Action::ToggleTheme),
        KeyCode::Char('s') => Some(Action::TogglePower),
        KeyCode::Char('d') => Some(Action::DeleteRequest),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrevious),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
        _ => None,
    }
}

/// Apply an action to the state and return the command to launch, if
/// any.
///
/// Precondition violations (wrong status, empty selection) set a
/// status bar message and return `None`; the list is never touched.
/// [`VmCommand::Delete`] is only ever produced from
/// [`Action::ConfirmDelete`] while the modal is open.
pub fn dispatch(app: &mut App, action: Action) -> Option<VmCommand> {
    match action {
        Action::Quit => {
            app.outcome = Some(RunOutcome::Quit);
            None
        }
        Action::SelectNext => {
            app.select_next();
            None
        }
        Action::SelectPrevious => {
            app.select_previous();
            None
        }
        Action::ToggleHelp => {
            app.show_help = !app.show_help;
            None
        }
        Action::ToggleTheme => {
            app.theme.toggle();
            None
        }
        Action::Refresh => {
            if app.refreshing {
                return None;
            }
            app.refreshing = true;
            app.set_status("Refreshing...");
            Some(VmCommand::List)
        }
        Action::Connect => {
            let (name, status) = selected(app)?;
            if status != VmStatus::Running {
                app.set_status(format!("VM '{name}' is not running (status: {status})"));
                return None;
            }
            app.outcome = Some(RunOutcome::Connect(name));
            None
        }
        Action::TogglePower => {
            let (name, status) = selected(app)?;
            match status {
                VmStatus::Running => {
                    app.set_status(format!("Stopping VM '{name}'..."));
                    Some(VmCommand::Stop(name))
                }
                VmStatus::Stopped => {
                    app.set_status(format!("Starting VM '{name}'..."));
                    Some(VmCommand::Start(name))
                }
                other => {
                    app.set_status(format!("Cannot toggle VM '{name}' in state '{other}'"));
                    None
                }
            }
        }
        Action::Restart => {
            let (name, status) = selected(app)?;
            if status != VmStatus::Running {
                app.set_status(format!("VM '{name}' is not running (status: {status})"));
                return None;
            }
            app.set_status(format!("Restarting VM '{name}'..."));
            Some(VmCommand::Restart(name))
        }
        Action::DeleteRequest => {
            let (name, _) = selected(app)?;
            app.modal = Some(ConfirmDelete { name });
            None
        }
        Action::ConfirmDelete => {
            let confirm = app.modal.take()?;
            app.set_status(format!("Deleting VM '{}'...", confirm.name));
            Some(VmCommand::Delete(confirm.name))
        }
        Action::CancelModal => {
            app.modal = None;
            None
        }
    }
}

/// Selected VM's name and status, or set the no-selection message.
fn selected(app: &mut App) -> Option<(String, VmStatus)> {
    match app.selected_vm() {
        Some(vm) => Some((vm.name.clone(), vm.status.clone())),
        None => {
            app.set_status("No VM selected");
            None
        }
    }
}

/// Run a command on a background task; the completion event is the
/// only thing that crosses back to the UI loop.
pub fn spawn(client: LimaClient, command: VmCommand, tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let event = run_command(&client, command).await;
        if tx.send(AppEvent::Worker(event)).is_err() {
            warn!("UI loop gone, dropping worker result");
        }
    });
}

async fn run_command(client: &LimaClient, command: VmCommand) -> WorkerEvent {
    match command {
        VmCommand::List => WorkerEvent::Loaded(client.list().await.map_err(|e| e.to_string())),
        VmCommand::Start(name) => {
            let result = client.start(&name).await;
            finish(client, result, "start", "started", &name).await
        }
        VmCommand::Stop(name) => {
            let result = client.stop(&name).await;
            finish(client, result, "stop", "stopped", &name).await
        }
        VmCommand::Delete(name) => {
            let result = client.delete(&name).await;
            finish(client, result, "delete", "deleted", &name).await
        }
        VmCommand::Restart(name) => {
            // Stop first; a failed stop aborts the start half.
            if let Err(e) = client.stop(&name).await {
                return WorkerEvent::CommandDone {
                    message: format!("Failed to stop VM '{name}': {e}"),
                    reload: None,
                };
            }
            tokio::time::sleep(RESTART_GAP).await;
            let result = client.start(&name).await;
            finish(client, result, "restart", "restarted", &name).await
        }
    }
}

/// Report a command outcome. On success, wait out the settle delay
/// and re-list so the UI shows the post-action state.
async fn finish(
    client: &LimaClient,
    result: lima_client::Result<()>,
    verb: &str,
    done: &str,
    name: &str,
) -> WorkerEvent {
    match result {
        Ok(()) => {
            tokio::time::sleep(SETTLE_DELAY).await;
            let reload = client.list().await.map_err(|e| e.to_string());
            WorkerEvent::CommandDone {
                message: format!("Successfully {done} VM '{name}'"),
                reload: Some(reload),
            }
        }
        Err(e) => WorkerEvent::CommandDone {
            message: format!("Failed to {verb} VM '{name}': {e}"),
            reload: None,
        },
    }
}

/// Fold a worker completion back into the state, on the UI loop.
pub fn apply_worker_event(app: &mut App, event: WorkerEvent) {
    match event {
        WorkerEvent::Loaded(Ok(vms)) => {
            app.refreshing = false;
            let count = vms.len();
            app.set_vms(vms);
            let clock = app
                .last_update
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_default();
            app.set_status(format!("Loaded {count} VMs - Last updated: {clock}"));
        }
        WorkerEvent::Loaded(Err(e)) => {
            app.refreshing = false;
            app.set_status(format!("Error loading VMs: {e}"));
        }
        WorkerEvent::CommandDone { message, reload } => match reload {
            Some(Ok(vms)) => {
                app.set_vms(vms);
                app.set_status(message);
            }
            Some(Err(e)) => {
                app.set_status(format!("{message} (reload failed: {e})"));
            }
            None => app.set_status(message),
        },
    }
}
