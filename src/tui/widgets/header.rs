//! Header widget for the TUI.
//!
//! Displays the application name, version, and database connection info.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    connection_info: &'a str,
    is_busy: bool,
}

impl<'a> Header<'a> {
    /// Creates a new header widget.
    pub fn new(connection_info: &'a str, is_busy: bool) -> Self {
        Self {
            connection_info,
            is_busy,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // Fill background
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        // Left side: app name and version
        let left_text = format!(" SecureCheck v{}", env!("CARGO_PKG_VERSION"));
        let left_span = Span::styled(left_text, style);
        buf.set_span(area.x, area.y, &left_span, area.width);

        // Center: busy marker while a query is in flight
        if self.is_busy {
            let busy_text = "running query...";
            let busy_style = Style::default()
                .bg(Color::Blue)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD);
            let busy_width = busy_text.len() as u16;
            let busy_x = area.x + (area.width.saturating_sub(busy_width)) / 2;
            buf.set_string(busy_x, area.y, busy_text, busy_style);
        }

        // Right side: connection info
        let right_text = format!(" [db: {}] ", self.connection_info);
        let right_width = right_text.len() as u16;
        if right_width < area.width {
            let right_x = area.right().saturating_sub(right_width);
            buf.set_string(right_x, area.y, &right_text, style);
        }
    }
}
