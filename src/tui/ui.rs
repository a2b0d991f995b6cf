//! UI rendering for the TUI.
//!
//! Defines the layout and renders all dashboard components.

use super::app::{App, InsightOutcome, ReportField, Tab};
use super::widgets::{header::Header, metrics::MetricsRow, table::ResultTable};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Main layout: header, tab bar, content, key hints
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Content
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_header(frame, main_layout[0], app);
    render_tabs(frame, main_layout[1], app);

    match app.tab {
        Tab::Overview => render_overview(frame, main_layout[2], app),
        Tab::Insights => render_insights(frame, main_layout[2], app),
        Tab::Report => render_report(frame, main_layout[2], app),
    }

    render_hints(frame, main_layout[3], app);
}

/// Renders the header bar.
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let widget = Header::new(&app.connection_info, app.is_running_query);
    frame.render_widget(widget, area);
}

/// Renders the tab bar.
fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|t| Line::from(format!(" {} ", t.title())))
        .collect();

    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Renders the overview tab: metric tiles, violation chart, tables.
fn render_overview(frame: &mut Frame, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Metric tiles
            Constraint::Min(8),    // Chart + outcome summary
            Constraint::Min(6),    // Vehicle log
        ])
        .split(area);

    frame.render_widget(MetricsRow::new(app.metrics), layout[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[1]);

    render_violation_chart(frame, middle[0], app);
    render_framed_table(frame, middle[1], "Officer Outcomes", &app.outcome_summary);
    render_framed_table(frame, layout[2], "Vehicle Logs", &app.vehicle_log);
}

/// Renders the top-violations bar chart.
fn render_violation_chart(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title("Top Violations");

    if app.violation_counts.is_empty() {
        let empty = Paragraph::new("(no stops loaded)")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    const BAR_WIDTH: u16 = 12;
    let bars: Vec<Bar> = app
        .violation_counts
        .iter()
        .take(app.chart_bars)
        .map(|(violation, count)| {
            let label: String = violation.chars().take(BAR_WIDTH as usize).collect();
            Bar::default()
                .value(*count)
                .label(Line::from(label))
                .text_value(count.to_string())
                .style(Style::default().fg(Color::Cyan))
                .value_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(1)
        .block(block);

    frame.render_widget(chart, area);
}

/// Renders a result table inside a titled block.
fn render_framed_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    result: &crate::db::QueryResult,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title.to_string());

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(ResultTable::without_footer(result), inner);
}

/// Renders the insights tab: query selector and result pane.
fn render_insights(frame: &mut Frame, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    // Selector list for the current catalog section
    let items: Vec<ListItem> = app
        .insights
        .entries()
        .iter()
        .map(|entry| ListItem::new(entry.label()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(app.insights.section.title()),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.insights.selected));
    frame.render_stateful_widget(list, layout[0], &mut state);

    // Result pane
    match &app.insights.outcome {
        None => {
            let hint = Paragraph::new("Press Enter to run the selected query.")
                .style(Style::default().fg(Color::DarkGray))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray))
                        .title("Results"),
                );
            frame.render_widget(hint, layout[1]);
        }
        Some(InsightOutcome::Table { label, result }) => {
            render_framed_table(frame, layout[1], label, result);
        }
        Some(InsightOutcome::Error { label, message }) => {
            let error = Paragraph::new(format!("Query failed:\n  {message}"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red))
                        .title(label.to_string()),
                );
            frame.render_widget(error, layout[1]);
        }
    }
}

/// Renders the report tab: form and composed summary.
fn render_report(frame: &mut Frame, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let items: Vec<ListItem> = ReportField::ALL
        .iter()
        .map(|field| {
            ListItem::new(format!(
                "{:<24} {}",
                field.label(),
                app.report_field_value(*field)
            ))
        })
        .collect();

    let form = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title("Generate Stop Report Summary"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.report.field));
    frame.render_stateful_widget(form, layout[0], &mut state);

    let summary_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title("Summary");

    let summary = if let Some(error) = &app.report.error {
        Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(summary_block)
    } else if let Some(text) = &app.report.composed {
        Paragraph::new(text.as_str())
            .wrap(Wrap { trim: false })
            .block(summary_block)
    } else {
        Paragraph::new("Press Enter to generate the summary.")
            .style(Style::default().fg(Color::DarkGray))
            .block(summary_block)
    };

    frame.render_widget(summary, layout[1]);
}

/// Renders the key hints line.
fn render_hints(frame: &mut Frame, area: Rect, app: &App) {
    let mut hints = String::from(" Tab/1-3 switch tab · q quit");

    match app.tab {
        Tab::Overview => {
            if app.skipped_rows > 0 {
                hints.push_str(&format!(" · {} rows skipped during load", app.skipped_rows));
            }
        }
        Tab::Insights => hints.push_str(" · ↑/↓ select · ←/→ section · Enter run"),
        Tab::Report => hints.push_str(" · ↑/↓ field · ←/→ adjust · Enter generate"),
    }

    let line = Paragraph::new(hints)
        .alignment(Alignment::Left)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(line, area);
}
