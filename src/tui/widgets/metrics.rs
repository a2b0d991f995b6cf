//! Metric tile widgets for the overview tab.
//!
//! Renders the four summary aggregates as a row of bordered tiles.

use crate::snapshot::SummaryMetrics;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

/// A single metric tile with a title and a count.
pub struct MetricTile<'a> {
    title: &'a str,
    value: usize,
    accent: Color,
}

impl<'a> MetricTile<'a> {
    /// Creates a new metric tile.
    pub fn new(title: &'a str, value: usize, accent: Color) -> Self {
        Self {
            title,
            value,
            accent,
        }
    }
}

impl Widget for MetricTile<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(self.title);

        let value_line = Line::from(format_count(self.value)).centered();
        let paragraph = Paragraph::new(value_line).block(block).style(
            Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD),
        );

        paragraph.render(area, buf);
    }
}

/// The row of four summary tiles.
pub struct MetricsRow {
    metrics: SummaryMetrics,
}

impl MetricsRow {
    /// Creates the metrics row for the given summary.
    pub fn new(metrics: SummaryMetrics) -> Self {
        Self { metrics }
    }
}

impl Widget for MetricsRow {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);

        MetricTile::new("Total Police Stops", self.metrics.total_stops, Color::Cyan)
            .render(tiles[0], buf);
        MetricTile::new("Total Arrests", self.metrics.total_arrests, Color::Red)
            .render(tiles[1], buf);
        MetricTile::new("Total Warnings", self.metrics.total_warnings, Color::Yellow)
            .render(tiles[2], buf);
        MetricTile::new(
            "Drug-Related Stops",
            self.metrics.drug_related_stops,
            Color::Magenta,
        )
        .render(tiles[3], buf);
    }
}

/// Formats a count with thousands separators.
fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
