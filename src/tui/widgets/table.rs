//! Result table widget for the TUI.
//!
//! Renders query results (and snapshot-derived tables) with column headers,
//! auto-sized columns, and styled NULL values.

use crate::db::{QueryResult, Value};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 32;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Widget for rendering a query result as a table.
pub struct ResultTable<'a> {
    result: &'a QueryResult,
    show_footer: bool,
}

impl<'a> ResultTable<'a> {
    /// Creates a new result table widget with the row-count footer.
    pub fn new(result: &'a QueryResult) -> Self {
        Self {
            result,
            show_footer: true,
        }
    }

    /// Creates a table without the footer (for snapshot-derived tables
    /// where execution time is meaningless).
    pub fn without_footer(result: &'a QueryResult) -> Self {
        Self {
            result,
            show_footer: false,
        }
    }

    /// Calculates the width for each column from headers and cell contents.
    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .result
            .columns
            .iter()
            .map(|col| col.name.chars().count().max(MIN_COLUMN_WIDTH))
            .collect();

        for row in &self.result.rows {
            for (i, value) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(value.to_display_string().chars().count());
                }
            }
        }

        widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
    }

    /// Truncates a string to fit within the given width, adding an ellipsis
    /// if needed. Counts characters, not bytes.
    fn truncate(s: &str, max_width: usize) -> String {
        if s.chars().count() <= max_width {
            s.to_string()
        } else if max_width <= 1 {
            s.chars().take(max_width).collect()
        } else {
            let mut out: String = s.chars().take(max_width - 1).collect();
            out.push('…');
            out
        }
    }

    /// Renders the table to a vector of lines for embedding in other widgets.
    pub fn render_to_lines(&self) -> Vec<Line<'a>> {
        let mut lines = Vec::new();

        if self.result.columns.is_empty() {
            lines.push(Line::from(Span::styled(
                "(empty result)",
                Style::default().fg(Color::DarkGray),
            )));
            return lines;
        }

        let widths = self.column_widths();

        lines.push(self.border_line(&widths, '┌', '┬', '┐'));
        lines.push(self.header_line(&widths));
        lines.push(self.border_line(&widths, '├', '┼', '┤'));

        for row in &self.result.rows {
            lines.push(self.data_line(row, &widths));
        }

        lines.push(self.border_line(&widths, '└', '┴', '┘'));

        if self.show_footer {
            let mut footer = format!(
                "{} row{} returned ({}ms)",
                self.result.row_count,
                if self.result.row_count == 1 { "" } else { "s" },
                self.result.execution_time.as_millis()
            );
            if let Some(warning) = self.result.truncation_warning() {
                footer.push_str(" — ");
                footer.push_str(&warning);
            }
            lines.push(Line::from(Span::styled(
                footer,
                Style::default().fg(Color::DarkGray),
            )));
        }

        lines
    }

    /// Renders a horizontal border line.
    fn border_line(&self, widths: &[usize], left: char, mid: char, right: char) -> Line<'a> {
        let mut border = String::new();
        border.push(left);

        for (i, &width) in widths.iter().enumerate() {
            border.push_str(&"─".repeat(width + 2));
            if i < widths.len() - 1 {
                border.push(mid);
            }
        }

        border.push(right);

        Line::from(Span::styled(border, Style::default().fg(Color::DarkGray)))
    }

    /// Renders the header row with column names.
    fn header_line(&self, widths: &[usize]) -> Line<'a> {
        let mut spans = Vec::new();
        spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));

        for (i, col) in self.result.columns.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let name = Self::truncate(&col.name, width);
            let padded = format!(" {:width$} ", name, width = width);

            spans.push(Span::styled(
                padded,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }

    /// Renders a data row.
    fn data_line(&self, row: &[Value], widths: &[usize]) -> Line<'a> {
        let mut spans = Vec::new();
        spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));

        for (i, value) in row.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let display = value.to_display_string();
            let truncated = Self::truncate(&display, width);
            let padded = format!(" {:width$} ", truncated, width = width);

            let style = if value.is_null() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };

            spans.push(Span::styled(padded, style));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.render_to_lines();

        for (i, line) in lines.iter().enumerate() {
            if i >= area.height as usize {
                break;
            }
            let y = area.y + i as u16;
            buf.set_line(area.x, y, line, area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ColumnInfo;
    use std::time::Duration;

    fn sample_result() -> QueryResult {
        QueryResult::with_data(
            vec![
                ColumnInfo::new("violation", "varchar"),
                ColumnInfo::new("count", "bigint"),
                ColumnInfo::new("arrest_rate", "numeric"),
            ],
            vec![
                vec![
                    Value::String("Speeding".to_string()),
                    Value::Int(120),
                    Value::Float(4.5),
                ],
                vec![Value::String("DUI".to_string()), Value::Int(34), Value::Null],
            ],
        )
        .with_execution_time(Duration::from_millis(23))
    }

    #[test]
    fn test_column_widths() {
        let result = sample_result();
        let table = ResultTable::new(&result);
        let widths = table.column_widths();

        // violation: max of "violation" (9) and "Speeding" (8) -> 9
        // count: max of "count" (5) and "120" -> 5
        // arrest_rate: header (11) wins over "4.5"
        assert_eq!(widths, vec![9, 5, 11]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(ResultTable::truncate("hello", 10), "hello");
        assert_eq!(ResultTable::truncate("hello world", 8), "hello w…");
        assert_eq!(ResultTable::truncate("hi", 2), "hi");
        assert_eq!(ResultTable::truncate("hello", 1), "h");
    }

    #[test]
    fn test_render_to_lines() {
        let result = sample_result();
        let table = ResultTable::new(&result);
        let lines = table.render_to_lines();

        // top border, header, separator, 2 data rows, bottom border, footer
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_render_without_footer() {
        let result = sample_result();
        let table = ResultTable::without_footer(&result);
        assert_eq!(table.render_to_lines().len(), 6);
    }

    #[test]
    fn test_empty_result() {
        let result = QueryResult::new();
        let table = ResultTable::new(&result);
        let lines = table.render_to_lines();

        assert_eq!(lines.len(), 1);
    }
}
