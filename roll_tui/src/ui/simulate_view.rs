//! Simulate tab view

use super::{draw_config, letter_color, progress_bar, stat_line, state_line};
use crate::app::{App, RunPanel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use roll_core::simulation::{format_amount, format_odds, format_percentage, CostGroup, SimulationResult};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Config
            Constraint::Length(6), // Progress
            Constraint::Min(0),    // Statistics
        ])
        .split(chunks[0]);

    draw_config(f, app, left[0]);
    draw_progress(f, &app.primary, " Run ", left[1]);
    draw_statistics(f, app.primary.result.as_ref(), left[2]);
    draw_tier_table(f, app.primary.result.as_ref(), chunks[1]);
}

pub fn draw_progress(f: &mut Frame, panel: &RunPanel, title: &str, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    f.render_widget(Paragraph::new(state_line(panel.state(), panel.error.as_deref())), rows[0]);

    let Some(progress) = panel.progress else {
        return;
    };
    f.render_widget(
        progress_bar(progress.completed as f64, progress.total as f64, rows[1].width, Color::Green),
        rows[1],
    );

    let mut spans = vec![Span::styled(
        format!(
            "{} / {} ({:.1}%)",
            format_amount(progress.completed as f64),
            format_amount(progress.total as f64),
            progress.fraction() * 100.0
        ),
        Style::default().fg(Color::White),
    )];
    if let Some(eta) = panel.eta() {
        spans.push(Span::styled(format!("  ETA {}", eta), Style::default().fg(Color::DarkGray)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), rows[2]);
}

fn draw_statistics(f: &mut Frame, result: Option<&SimulationResult>, area: Rect) {
    let lines = match result {
        Some(result) => {
            let stats = &result.statistics;
            vec![
                Line::from(Span::styled(
                    "Effective rate (m³/s)",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
                stat_line("Average", format!("{:.4}", stats.average)),
                stat_line("Median", format!("{:.4}", stats.median)),
                stat_line("Min", format!("{:.4}", stats.min)),
                stat_line("Max", format!("{:.4}", stats.max)),
                Line::from(""),
                Line::from(Span::styled(
                    "Value",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
                stat_line("Cost per roll", format_amount(result.config.roll_cost())),
                stat_line("Expected value", format_amount(result.expected_value())),
                roi_line(result.roi()),
            ]
        }
        None => vec![Line::from(Span::styled(
            "No completed run yet. Press [s] to start.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Statistics "));
    f.render_widget(paragraph, area);
}

fn roi_line(roi: f64) -> Line<'static> {
    let color = if roi >= 0.0 { Color::Green } else { Color::Red };
    Line::from(vec![
        Span::styled(format!("{:20}", "ROI"), Style::default().fg(Color::Gray)),
        Span::styled(format!("{:+.1}%", roi), Style::default().fg(color)),
    ])
}

fn draw_tier_table(f: &mut Frame, result: Option<&SimulationResult>, area: Rect) {
    let header = Row::new(vec!["Tier", "Count", "Share", "Odds", "Cost per hit"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = match result {
        Some(result) => result
            .cost_analysis
            .rows
            .iter()
            .map(|row| {
                let total = result.total_trials;
                let style = match row.group {
                    CostGroup::Tier(tier) => Style::default().fg(letter_color(tier.letter)),
                    CostGroup::Total(letter) => Style::default().fg(letter_color(letter)).add_modifier(Modifier::BOLD),
                };
                Row::new(vec![
                    Cell::from(row.group.label()),
                    Cell::from(row.count.to_string()),
                    Cell::from(format_percentage(row.count, total)),
                    Cell::from(format_odds(row.count, total)),
                    Cell::from(format_amount(row.cost)),
                ])
                .style(style)
            })
            .collect(),
        None => Vec::new(),
    };

    let widths = [
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Min(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Tier Distribution "));

    f.render_widget(table, area);
}
