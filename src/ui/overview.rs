//! Overview view rendering.
//!
//! Displays headline metric cards (health score, CRM match and coverage
//! rates, duplicates) above a sortable table of all monitored sources with
//! freshness status, row counts, and sparkline trends.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::hours::format_hours_ago;
use crate::data::{Metric, SourceData, StatusLabel};

/// Column to sort by in the Overview view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Sort by source system then table name.
    #[default]
    Name,
    /// Sort by row count.
    Rows,
    /// Sort by hours since last sync.
    Hours,
    /// Sort by freshness status.
    Status,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Name => SortColumn::Rows,
            SortColumn::Rows => SortColumn::Hours,
            SortColumn::Hours => SortColumn::Status,
            SortColumn::Status => SortColumn::Name,
        }
    }
}

/// Render the Overview view: metric cards on top, source table below.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let has_completeness = data
        .account_data
        .as_ref()
        .map(|a| !a.completeness.is_empty())
        .unwrap_or(false);

    let chunks = Layout::vertical([
        Constraint::Length(4),                                 // Metric cards
        Constraint::Length(if has_completeness { 1 } else { 0 }), // Completeness strip
        Constraint::Min(5),                                    // Source table
    ])
    .split(area);

    render_metric_cards(frame, app, chunks[0]);
    if has_completeness {
        render_completeness_strip(frame, app, chunks[1]);
    }

    // Get filtered and sorted sources
    let mut sources: Vec<&SourceData> =
        data.sources.iter().filter(|s| app.matches_filter(s)).collect();
    sort_sources_by(&mut sources, app.sort_column, app.sort_ascending);

    let header = Row::new(vec![
        Cell::from(format_header("Source", SortColumn::Name, app)),
        Cell::from(format_header("Table", SortColumn::Name, app)),
        Cell::from(format_header("Rows", SortColumn::Rows, app)),
        Cell::from("Rate"),
        Cell::from(format_header("Last Sync", SortColumn::Hours, app)),
        Cell::from("Trend"),
        Cell::from(format_header("Status", SortColumn::Status, app)),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = sources
        .iter()
        .map(|s| {
            let status_style = app.theme.freshness_style(s.status);

            let sparkline = super::render_sparkline(&app.history.get_rows_sparkline(&s.label()));
            let rate = app
                .history
                .get_row_rate(&s.label())
                .map(|r| format!("{:.0}/s", r))
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(s.system.clone()),
                Cell::from(s.table.clone()),
                Cell::from(super::format_count(s.row_count)),
                Cell::from(rate),
                Cell::from(format_hours_ago(s.hours_since_sync)).style(status_style),
                Cell::from(sparkline),
                Cell::from(s.status.symbol()).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2), // Source system
        Constraint::Fill(3), // Table - gets the largest share
        Constraint::Fill(1), // Rows
        Constraint::Fill(1), // Rate
        Constraint::Fill(2), // Last sync
        Constraint::Min(8),  // Trend/Sparkline - fixed 8 for sparkline chars
        Constraint::Min(6),  // Status - fixed minimum
    ];

    let selected_visual_index = app.selected_source_index.min(sources.len().saturating_sub(1));

    let sort_indicator = match app.sort_column {
        SortColumn::Name => "name",
        SortColumn::Rows => "rows",
        SortColumn::Hours => "hours",
        SortColumn::Status => "status",
    };
    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    // Build title with filter info
    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !sources.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, sources.len())
    } else {
        String::new()
    };

    let title = format!(
        " Sources ({}/{}) [s:sort {}{}]{}{} ",
        sources.len(),
        data.sources.len(),
        sort_indicator,
        sort_dir,
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, chunks[2], &mut state);
}

/// One-line field completeness readout under the metric cards.
fn render_completeness_strip(frame: &mut Frame, app: &App, area: Rect) {
    let Some(account) = app.data.as_ref().and_then(|d| d.account_data.as_ref()) else {
        return;
    };

    let mut spans = vec![Span::styled(
        " Completeness ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (field, pct) in &account.completeness {
        spans.push(Span::raw("│ "));
        spans.push(Span::raw(format!("{} ", field)));
        let style = if *pct >= 90.0 {
            Style::default().fg(app.theme.healthy)
        } else if *pct >= 70.0 {
            Style::default().fg(app.theme.warning)
        } else {
            Style::default().fg(app.theme.critical)
        };
        spans.push(Span::styled(format!("{:.0}% ", pct), style));
    }

    // Tack the secondary CRM rates onto the same line
    if let Some(distributor) = app
        .data
        .as_ref()
        .and_then(|d| d.match_data.as_ref())
        .and_then(|m| m.distributor_rate)
    {
        spans.push(Span::raw("│ Distributors "));
        spans.push(Span::styled(
            format!("{:.1}% ", distributor.value),
            app.theme.status_style(distributor.status),
        ));
    }
    if let Some(active) = account.active_rate {
        spans.push(Span::raw("│ Active 90d "));
        spans.push(Span::styled(
            format!("{:.1}% ", active.value),
            app.theme.status_style(active.status),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the headline metric cards across the top of the view.
fn render_metric_cards(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let cards = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ])
    .split(area);

    let score_metric = Metric {
        value: data.health_score as f64,
        status: data.health_status,
    };
    render_card(frame, app, cards[0], "Health Score", Some(score_metric), "/100");

    let match_rate = data.match_data.as_ref().and_then(|m| m.match_rate);
    render_card(frame, app, cards[1], "CRM Match", match_rate, "%");

    let chain = data.match_data.as_ref().and_then(|m| m.chain_coverage);
    render_card(frame, app, cards[2], "Chain HQ", chain, "%");

    let link = data.account_data.as_ref().and_then(|a| a.link_coverage);
    render_card(frame, app, cards[3], "Linked", link, "%");

    let duplicates = data.account_data.as_ref().and_then(|a| a.duplicates);
    render_card(frame, app, cards[4], "Dup Names", duplicates, "");
}

/// Render a single bordered metric card, dimmed "n/a" when absent.
fn render_card(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    label: &str,
    metric: Option<Metric>,
    unit: &str,
) {
    let (value_span, border_style) = match metric {
        Some(m) => {
            let style = app.theme.status_style(m.status).add_modifier(Modifier::BOLD);
            let text = if unit == "%" {
                format!("{:.1}%", m.value)
            } else {
                format!("{}{}", m.value as i64, unit)
            };
            let border = if m.status == StatusLabel::Critical {
                Style::default().fg(app.theme.critical)
            } else {
                Style::default().fg(app.theme.border)
            };
            (Span::styled(text, style), border)
        }
        None => (
            Span::styled("n/a", Style::default().add_modifier(Modifier::DIM)),
            Style::default().fg(app.theme.border),
        ),
    };

    let block = Block::default()
        .title(format!(" {} ", label))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);

    let paragraph = Paragraph::new(Line::from(value_span))
        .alignment(ratatui::layout::Alignment::Center)
        .block(block);

    frame.render_widget(paragraph, area);
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort sources by the given column and direction (public for use in app.rs)
pub fn sort_sources_by(sources: &mut [&SourceData], column: SortColumn, ascending: bool) {
    sources.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Name => a
                .system
                .cmp(&b.system)
                .then_with(|| a.table.cmp(&b.table)),
            SortColumn::Rows => a.row_count.cmp(&b.row_count),
            SortColumn::Hours => a
                .hours_since_sync
                .partial_cmp(&b.hours_since_sync)
                .unwrap_or(std::cmp::Ordering::Equal),
            SortColumn::Status => a.status.cmp(&b.status),
        };

        // Apply direction to primary comparison
        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        // Use secondary sort by name for stability when primary values are equal
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

    fn source(system: &str, table: &str, rows: u64, hours: f64) -> SourceData {
        SourceData {
            system: system.to_string(),
            table: table.to_string(),
            row_count: rows,
            last_sync_at: None,
            hours_since_sync: hours,
            status: if hours <= 24.0 {
                FreshnessStatus::Fresh
            } else if hours <= 48.0 {
                FreshnessStatus::Stale
            } else {
                FreshnessStatus::Critical
            },
        }
    }

    #[test]
    fn test_sort_by_rows_descending() {
        let a = source("A", "t1", 10, 1.0);
        let b = source("B", "t2", 30, 1.0);
        let c = source("C", "t3", 20, 1.0);
        let mut sources = vec![&a, &b, &c];

        sort_sources_by(&mut sources, SortColumn::Rows, false);
        let rows: Vec<u64> = sources.iter().map(|s| s.row_count).collect();
        assert_eq!(rows, vec![30, 20, 10]);
    }

    #[test]
    fn test_sort_by_status_uses_name_tiebreak() {
        let a = source("B", "t", 0, 1.0);
        let b = source("A", "t", 0, 1.0);
        let c = source("C", "t", 0, 90.0);
        let mut sources = vec![&a, &b, &c];

        sort_sources_by(&mut sources, SortColumn::Status, false);
        assert_eq!(sources[0].system, "C");
        // Equal statuses fall back to name order
        assert_eq!(sources[1].system, "A");
        assert_eq!(sources[2].system, "B");
    }

    #[test]
    fn test_sort_column_cycle() {
        let mut col = SortColumn::default();
        for _ in 0..4 {
            col = col.next();
        }
        assert_eq!(col, SortColumn::Name);
    }
}
