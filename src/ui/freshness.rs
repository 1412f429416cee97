//! Freshness view rendering.
//!
//! Lists only the sources that have fallen behind (stale or critical),
//! worst first, so the operator sees what needs a sync trigger.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::hours::format_hours_ago;
use crate::data::SourceData;

/// Column to sort by in the Freshness view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FreshnessSortColumn {
    /// Sort by hours since last sync.
    #[default]
    Hours,
    /// Sort by source system then table name.
    Name,
    /// Sort by row count.
    Rows,
}

impl FreshnessSortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            FreshnessSortColumn::Hours => FreshnessSortColumn::Name,
            FreshnessSortColumn::Name => FreshnessSortColumn::Rows,
            FreshnessSortColumn::Rows => FreshnessSortColumn::Hours,
        }
    }
}

/// Render the Freshness view showing stale sources in a sortable table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let mut stale: Vec<&SourceData> = data
        .stale_sources()
        .into_iter()
        .filter(|s| app.matches_filter(s))
        .collect();

    if stale.is_empty() {
        render_all_fresh(frame, app, area);
        return;
    }

    sort_stale_by(
        &mut stale,
        app.freshness_sort_column,
        app.freshness_sort_ascending,
    );

    let header = Row::new(vec![
        Cell::from(format_header("Source", FreshnessSortColumn::Name, app)),
        Cell::from(format_header("Table", FreshnessSortColumn::Name, app)),
        Cell::from(format_header("Rows", FreshnessSortColumn::Rows, app)),
        Cell::from(format_header("Last Sync", FreshnessSortColumn::Hours, app)),
        Cell::from("Synced At"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = stale
        .iter()
        .map(|s| {
            let status_style = app.theme.freshness_style(s.status);
            Row::new(vec![
                Cell::from(s.system.clone()),
                Cell::from(s.table.clone()),
                Cell::from(super::format_count(s.row_count)),
                Cell::from(format_hours_ago(s.hours_since_sync)).style(status_style),
                Cell::from(s.last_sync_at.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(s.status.symbol()).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Min(6),
    ];

    let selected_visual_index = app.selected_source_index.min(stale.len().saturating_sub(1));

    let sort_indicator = match app.freshness_sort_column {
        FreshnessSortColumn::Hours => "hours",
        FreshnessSortColumn::Name => "name",
        FreshnessSortColumn::Rows => "rows",
    };
    let sort_dir = if app.freshness_sort_ascending { "↑" } else { "↓" };

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let title = format!(
        " Stale Sources ({}) [s:sort {}{}]{} ",
        stale.len(),
        sort_indicator,
        sort_dir,
        filter_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.warning)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Render the empty-state panel shown when every source is fresh.
fn render_all_fresh(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.data.as_ref().map(|d| d.sources.len()).unwrap_or(0);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "All sources fresh",
            Style::default().fg(app.theme.healthy).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} sources synced within the last 24 hours", total),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Stale Sources (0) ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.healthy));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, area);
}

fn format_header(name: &str, col: FreshnessSortColumn, app: &App) -> Span<'static> {
    if app.freshness_sort_column == col {
        let arrow = if app.freshness_sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort stale sources by the given column and direction (public for use in app.rs)
pub fn sort_stale_by(sources: &mut [&SourceData], column: FreshnessSortColumn, ascending: bool) {
    sources.sort_by(|a, b| {
        let primary = match column {
            FreshnessSortColumn::Hours => a
                .hours_since_sync
                .partial_cmp(&b.hours_since_sync)
                .unwrap_or(std::cmp::Ordering::Equal),
            FreshnessSortColumn::Name => a
                .system
                .cmp(&b.system)
                .then_with(|| a.table.cmp(&b.table)),
            FreshnessSortColumn::Rows => a.row_count.cmp(&b.row_count),
        };

        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        if primary == std::cmp::Ordering::Equal {
            a.system.cmp(&b.system).then_with(|| a.table.cmp(&b.table))
        } else {
            primary
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FreshnessStatus;

    fn source(system: &str, hours: f64) -> SourceData {
        SourceData {
            system: system.to_string(),
            table: "t".to_string(),
            row_count: 0,
            last_sync_at: None,
            hours_since_sync: hours,
            status: FreshnessStatus::Stale,
        }
    }

    #[test]
    fn test_default_sort_is_worst_first() {
        let a = source("A", 30.0);
        let b = source("B", 90.0);
        let c = source("C", 50.0);
        let mut stale = vec![&a, &b, &c];

        // Matches the app default: Hours column, descending
        sort_stale_by(&mut stale, FreshnessSortColumn::default(), false);
        let hours: Vec<f64> = stale.iter().map(|s| s.hours_since_sync).collect();
        assert_eq!(hours, vec![90.0, 50.0, 30.0]);
    }

    #[test]
    fn test_sort_column_cycle() {
        let mut col = FreshnessSortColumn::default();
        for _ in 0..3 {
            col = col.next();
        }
        assert_eq!(col, FreshnessSortColumn::Hours);
    }
}
