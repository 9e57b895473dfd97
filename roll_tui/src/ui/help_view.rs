//! Help tab view

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        section("═══ Navigation ═══"),
        key_line("1-5", "Jump to tab (Simulate/Compare/Analyze/Skills/Help)"),
        key_line("Tab / Shift+Tab", "Next/previous tab"),
        key_line("↑/k  ↓/j", "Select field, stat or skill"),
        key_line("←/h  →/l", "Change the selected value"),
        key_line("q / Ctrl+C", "Quit"),
        key_line("?", "Toggle help"),
        Line::from(""),
        section("═══ Simulation ═══"),
        key_line("s", "Start (Compare tab: run both strengths back to back)"),
        key_line("x", "Stop at the next batch boundary"),
        key_line("w", "Export finished results as JSON"),
        Line::from(""),
        section("═══ Analysis ═══"),
        key_line("r", "Random roll with the selected mutation"),
        key_line("b", "Reset to the base module"),
        key_line("o", "Open roll file"),
        Line::from(""),
        section("═══ How rolls are rated ═══"),
        Line::from(""),
        Line::from(Span::styled("Effective rate:", Style::default().fg(Color::Yellow))),
        Line::from("  amount × (1 + crit chance × crit bonus) / cycle time, after skills"),
        Line::from(""),
        Line::from(Span::styled("Tier:", Style::default().fg(Color::Yellow))),
        Line::from("  S..E by effective rate band, F below E"),
        Line::from("  `+` when optimal range rolled above the base module"),
        Line::from(""),
        Line::from(Span::styled("Cost per hit:", Style::default().fg(Color::Yellow))),
        Line::from("  (base cost + mutation cost) × rolls per hit"),
        Line::from(""),
    ];

    lines.push(Line::from(vec![
        Span::styled("Roll file:   ", Style::default().fg(Color::Gray)),
        Span::styled(app.settings.roll_path.display().to_string(), Style::default().fg(Color::White)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Export file: ", Style::default().fg(Color::Gray)),
        Span::styled(app.settings.export_path.display().to_string(), Style::default().fg(Color::White)),
    ]));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Help "));

    f.render_widget(paragraph, area);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn key_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:20}", key), Style::default().fg(Color::Yellow)),
        Span::styled(desc.to_string(), Style::default().fg(Color::White)),
    ])
}
