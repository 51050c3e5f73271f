use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn keybind(key: &'static str, pad: usize, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(desc),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame, log_path: Option<&str>) {
    let mut lines = vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Esc", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        keybind("Enter", 9, "Analyze text"),
        keybind("Alt-Enter", 5, "New line"),
        keybind("Backspace", 5, "Delete last character"),
        keybind("Ctrl-U", 8, "Clear input"),
        keybind("Ctrl-Y", 8, "Copy final result to clipboard"),
        keybind("tab", 11, "Switch tabs"),
        keybind("F1", 12, "Show this help"),
        Line::from(""),
        Line::from("Errors:"),
        Line::from("  Failures show a generic message; the details are written to the log."),
    ];
    if let Some(path) = log_path {
        lines.push(Line::from(vec![
            Span::raw("  Log: "),
            Span::styled(path.to_string(), Style::default().fg(Color::Cyan)),
        ]));
    }

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
