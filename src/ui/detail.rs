//! Detail overlay rendering.
//!
//! Displays a modal overlay with detailed information about a selected source.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::hours::{describe_freshness, format_hours_ago};
use crate::data::FreshnessStatus;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 14;

/// Render the source detail as a modal overlay.
///
/// Shows the selected source's freshness status, row count and trend,
/// sync timing, and a plain-language summary of what to do about it.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(source) = app.selected_source() else {
        return;
    };

    // Calculate overlay size - use most of the screen
    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 70 / 100).clamp(MIN_OVERLAY_HEIGHT, 24);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Min(10),   // Content
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    let status_style = app.theme.freshness_style(source.status);
    let status_label = match source.status {
        FreshnessStatus::Fresh => "Fresh",
        FreshnessStatus::Stale => "Stale",
        FreshnessStatus::Critical => "Critical",
    };

    let sparkline = super::render_sparkline(&app.history.get_rows_sparkline(&source.label()));
    let rate = app
        .history
        .get_row_rate(&source.label())
        .map(|r| format!("{:.1} rows/s", r))
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} ", source.label()),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Status: "),
            Span::styled(
                format!("{} {}", source.status.symbol(), status_label),
                status_style.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw(" Rows: "),
            Span::styled(
                super::format_count(source.row_count),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Trend: "),
            Span::raw(sparkline),
            Span::raw("    Rate: "),
            Span::raw(rate),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Last sync: "),
            Span::styled(format_hours_ago(source.hours_since_sync), status_style),
        ]),
        Line::from(vec![
            Span::raw(" Synced at: "),
            Span::raw(source.last_sync_at.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            format!(
                " {}",
                describe_freshness(source.hours_since_sync, &app.config.thresholds)
            ),
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Source Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, chunks[0]);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[1]);
}
