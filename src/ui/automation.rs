//! Automation view rendering.
//!
//! Shows sync-service connections, workflow activation states, and totals
//! over the most recent executions. Falls back to an explanatory panel when
//! no automation data is available.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::AutomationData;

/// Render the Automation view with connection, workflow, and execution panels.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let Some(ref automation) = data.automation else {
        render_unavailable(frame, app, area);
        return;
    };

    if automation.is_empty() {
        render_unavailable(frame, app, area);
        return;
    }

    let chunks = Layout::horizontal([
        Constraint::Fill(1), // Connections
        Constraint::Fill(1), // Workflows
        Constraint::Fill(1), // Executions
    ])
    .split(area);

    render_connections(frame, app, automation, chunks[0]);
    render_workflows(frame, app, automation, chunks[1]);
    render_executions(frame, app, automation, chunks[2]);
}

fn render_connections(frame: &mut Frame, app: &App, automation: &AutomationData, area: Rect) {
    let healthy = automation.connections.iter().filter(|c| c.healthy).count();

    let items: Vec<ListItem> = automation
        .connections
        .iter()
        .map(|c| {
            let (icon, style) = if c.healthy {
                ("●", Style::default().fg(app.theme.healthy))
            } else {
                ("●", Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD))
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", icon), style),
                Span::raw(c.name.clone()),
                Span::styled(
                    format!("  {}", c.status),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]))
        })
        .collect();

    let title = format!(
        " Connections ({}/{} active) ",
        healthy,
        automation.connections.len()
    );
    let border = if healthy < automation.connections.len() {
        Style::default().fg(app.theme.critical)
    } else {
        Style::default().fg(app.theme.border)
    };

    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(border),
    );

    frame.render_widget(list, area);
}

fn render_workflows(frame: &mut Frame, app: &App, automation: &AutomationData, area: Rect) {
    let active = automation.workflows.iter().filter(|w| w.active).count();

    let items: Vec<ListItem> = automation
        .workflows
        .iter()
        .map(|w| {
            let (label, style) = if w.active {
                ("on ", Style::default().fg(app.theme.healthy))
            } else {
                ("off", Style::default().add_modifier(Modifier::DIM))
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", label), style),
                Span::raw(w.name.clone()),
            ]))
        })
        .collect();

    let title = format!(
        " Workflows ({}/{} active) ",
        active,
        automation.workflows.len()
    );

    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(list, area);
}

fn render_executions(frame: &mut Frame, app: &App, automation: &AutomationData, area: Rect) {
    let lines = if let Some(totals) = automation.executions {
        let success_rate = if totals.total > 0 {
            totals.succeeded as f64 / totals.total as f64 * 100.0
        } else {
            0.0
        };

        let rate_style = if totals.failed > 0 {
            Style::default().fg(app.theme.warning)
        } else {
            Style::default().fg(app.theme.healthy)
        };

        vec![
            Line::from(""),
            Line::from(vec![
                Span::raw(" Recent executions: "),
                Span::styled(
                    format!("{}", totals.total),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::raw(" Succeeded: "),
                Span::styled(
                    format!("{}", totals.succeeded),
                    Style::default().fg(app.theme.healthy),
                ),
            ]),
            Line::from(vec![
                Span::raw(" Failed: "),
                if totals.failed > 0 {
                    Span::styled(
                        format!("{}", totals.failed),
                        Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled("0", Style::default().add_modifier(Modifier::DIM))
                },
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw(" Success rate: "),
                Span::styled(format!("{:.0}%", success_rate), rate_style),
            ]),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                " No execution data",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ]
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Executions ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(paragraph, area);
}

/// Panel shown when no automation APIs are configured and the snapshot
/// carries no automation sections. Lists warehouse sync times instead so
/// the view still answers "when did each pipeline last run".
fn render_unavailable(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Automation data unavailable",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Configure sync_api / workflow_api credentials, or include",
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(Span::styled(
            "connections/workflows/executions sections in the snapshot.",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    if let Some(ref data) = app.data {
        if !data.sources.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Warehouse sync times",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for source in &data.sources {
                lines.push(Line::from(vec![
                    Span::raw(format!("{}  ", source.label())),
                    Span::styled(
                        crate::data::hours::format_hours_ago(source.hours_since_sync),
                        app.theme.freshness_style(source.status),
                    ),
                ]));
            }
        }
    }

    let block = Block::default()
        .title(" Automation ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, area);
}
