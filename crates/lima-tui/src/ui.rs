//! UI rendering for the Lima dashboard.
//!
//! Pure function of the application state; no business logic here.

use lima_client::vm::{abbreviate_home, format_size};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use crate::app::App;

const KEY_HINTS: &str =
    "Enter=Connect | Ctrl+S=Stop/Start | Ctrl+R=Restart | Ctrl+D=Delete | Ctrl+T=Theme | h=Help | q=Quit";

/// Render one frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    if app.show_help {
        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(chunks[0]);
        draw_table(frame, app, main[0]);
        draw_help(frame, app, main[1]);
    } else {
        draw_table(frame, app, chunks[0]);
    }

    draw_status_bar(frame, app, chunks[1]);

    if let Some(confirm) = &app.modal {
        draw_confirm_modal(frame, app, &confirm.name);
    }
}

fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let header = Row::new(vec![
        "Name", "Status", "Address", "Type", "Arch", "CPUs", "Memory", "Disk", "Dir",
    ])
    .style(theme.header());

    let rows: Vec<Row> = app
        .vms
        .iter()
        .map(|vm| {
            let text = Style::default().fg(theme.text());
            Row::new(vec![
                Cell::from(vm.name.clone()).style(text),
                Cell::from(vm.status.to_string())
                    .style(Style::default().fg(theme.status_color(&vm.status))),
                Cell::from(vm.address()).style(text),
                Cell::from(vm.vm_type.clone()).style(text),
                Cell::from(vm.arch.clone()).style(text),
                Cell::from(vm.cpus.to_string()).style(text),
                Cell::from(format_size(vm.memory)).style(text),
                Cell::from(format_size(vm.disk)).style(text),
                Cell::from(abbreviate_home(&vm.dir, &app.home)).style(text),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(18),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .row_highlight_style(theme.selection())
    .style(Style::default().fg(theme.text()).bg(theme.background()))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" LIMA VM MANAGER ")
            .title_style(
                Style::default()
                    .fg(theme.title())
                    .add_modifier(Modifier::BOLD),
            ),
    );

    let mut state = TableState::default();
    if !app.vms.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let clock = app
        .last_update
        .map(|t| t.format(" [%H:%M:%S]").to_string())
        .unwrap_or_default();

    let bar = Paragraph::new(Line::from(vec![
        Span::raw(format!(" {}", app.status)),
        Span::raw(clock),
        Span::raw(" | "),
        Span::raw(KEY_HINTS),
    ]))
    .style(app.theme.status_bar());

    frame.render_widget(bar, area);
}

fn draw_help(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let help = Paragraph::new(help_text())
        .style(Style::default().fg(theme.text()).bg(theme.background()))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" HELP ")
                .title_style(Style::default().fg(theme.title())),
        );

    frame.render_widget(help, area);
}

fn draw_confirm_modal(frame: &mut Frame, app: &App, name: &str) {
    let theme = &app.theme;
    let area = centered_rect(46, 7, frame.area());

    let body = vec![
        Line::from(""),
        Line::from(format!("Delete VM '{name}'?")).centered(),
        Line::from("This action cannot be undone.").centered(),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Red)),
            Span::raw(" delete    "),
            Span::styled("[n]", Style::default().fg(theme.title())),
            Span::raw(" cancel"),
        ])
        .centered(),
    ];

    let modal = Paragraph::new(body)
        .style(Style::default().fg(theme.text()).bg(theme.background()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" CONFIRM DELETE ")
                .title_style(
                    Style::default()
                        .fg(theme.title())
                        .add_modifier(Modifier::BOLD),
                ),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(modal, area);
}

/// Fixed-size rect centered in `r`, clamped to fit.
fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

fn help_text() -> String {
    [
        "Navigation:",
        "  Up/Down, k/j - Select VM",
        "",
        "Actions:",
        "  Enter        - Connect to VM",
        "  Ctrl+S, s    - Stop/Start VM",
        "  Ctrl+R       - Restart VM",
        "  Ctrl+D, d    - Delete VM",
        "  r            - Refresh list",
        "",
        "View:",
        "  h, ?         - Toggle help",
        "  Ctrl+T, t    - Toggle theme",
        "",
        "Other:",
        "  q, Esc       - Quit",
        "  Ctrl+C       - Force quit",
        "",
        "Status colors:",
        "  Running      - Green",
        "  Stopped      - Red",
        "  Starting     - Yellow",
        "  Stopping     - Light yellow",
    ]
    .join("\n")
}
