//! Application state for the Lima dashboard.

use chrono::{DateTime, Local};
use lima_client::VmRecord;

use crate::theme::Theme;

/// Pending delete confirmation; rendered as a modal over the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDelete {
    /// Name of the VM the user asked to delete.
    pub name: String,
}

/// Why the UI loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// User quit; the process exits.
    Quit,
    /// User connected to a VM; the caller runs the interactive shell
    /// and restarts the dashboard afterwards.
    Connect(String),
}

/// Everything the renderer and dispatcher see. No ambient singletons;
/// the one UI loop owns this struct and is the only mutator.
#[derive(Debug)]
pub struct App {
    /// Current VM snapshot, replaced wholesale on each reload.
    pub vms: Vec<VmRecord>,
    /// Selected row index; meaningless while `vms` is empty.
    pub selected: usize,
    /// Help panel visibility.
    pub show_help: bool,
    /// Active color palette.
    pub theme: Theme,
    /// Inventory reload in flight. Read and set only on the UI loop,
    /// so refresh requests can never overlap.
    pub refreshing: bool,
    /// Transient status bar message.
    pub status: String,
    /// When the snapshot was last replaced.
    pub last_update: Option<DateTime<Local>>,
    /// Delete confirmation modal, when open.
    pub modal: Option<ConfirmDelete>,
    /// Set when the loop should end; `None` while running.
    pub outcome: Option<RunOutcome>,
    /// Home directory used to abbreviate instance paths.
    pub home: String,
}

impl App {
    /// Fresh state with the default (light) theme.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vms: Vec::new(),
            selected: 0,
            show_help: false,
            theme: Theme::default(),
            refreshing: false,
            status: String::new(),
            last_update: None,
            modal: None,
            outcome: None,
            home: std::env::var("HOME").unwrap_or_default(),
        }
    }

    /// The record under the cursor, or `None` when the list is empty.
    #[must_use]
    pub fn selected_vm(&self) -> Option<&VmRecord> {
        self.vms.get(self.selected)
    }

    /// Move the selection down, clamped to the last row.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.vms.len() {
            self.selected += 1;
        }
    }

    /// Move the selection up, clamped to the first row.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Replace the snapshot and re-clamp the selection.
    pub fn set_vms(&mut self, vms: Vec<VmRecord>) {
        self.vms = vms;
        self.selected = self.selected.min(self.vms.len().saturating_sub(1));
        self.last_update = Some(Local::now());
    }

    /// Set the transient status bar message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
