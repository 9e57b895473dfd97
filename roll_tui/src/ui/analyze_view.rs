//! Analyze tab view - "What did I get?"

use super::{letter_color, stat_line};
use crate::app::{App, ROLL_STATS};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use roll_core::simulation::format_amount;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    draw_roll(f, app, chunks[0]);
    draw_result(f, app, chunks[1]);
}

fn draw_roll(f: &mut Frame, app: &App, area: Rect) {
    let base = &app.data.family(app.defaults.family).base_stats;

    let items: Vec<ListItem> = ROLL_STATS
        .iter()
        .enumerate()
        .map(|(i, &stat)| {
            let selected = i == app.selected_stat;
            let name_style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let prefix = if selected { "► " } else { "  " };

            let base_value = base.get_or_zero(stat);
            let rolled = app.roll.get(stat).unwrap_or(base_value);
            let mut spans = vec![
                Span::styled(format!("{}{:28}", prefix, stat.tooltip_name()), name_style),
                Span::styled(format!("{:.4}", rolled), Style::default().fg(Color::White)),
            ];
            if (rolled - base_value).abs() > 1e-9 {
                let color = if rolled > base_value { Color::Green } else { Color::Red };
                spans.push(Span::styled(format!(" (base: {:.4})", base_value), Style::default().fg(color)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" {} / {} ", app.defaults.family.name(), app.defaults.strength.name());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_result(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if let Some(error) = &app.analysis_error {
        lines.push(Line::from(Span::styled(
            format!("⚠ {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    let Some(analysis) = &app.analysis else {
        lines.push(Line::from(Span::styled("No analysis available", Style::default().fg(Color::DarkGray))));
        f.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Result ")), area);
        return;
    };

    lines.push(Line::from(vec![
        Span::styled(format!("{:20}", "Tier"), Style::default().fg(Color::Gray)),
        Span::styled(
            analysis.tier.label(),
            Style::default()
                .fg(letter_color(analysis.tier.letter))
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(stat_line("Raw rate", format!("{:.4} m³/s", analysis.throughput_raw)));
    lines.push(stat_line("With crit bonus", format!("{:.4} m³/s", analysis.throughput_with_bonus_only)));
    lines.push(stat_line("Effective", format!("{:.4} m³/s", analysis.throughput_effective)));
    if let Some(loss) = analysis.residue_loss_rate {
        lines.push(stat_line("Residue waste", format!("{:.4} m³/s", loss)));
    }

    let delta = analysis.delta_vs_base_percent;
    let delta_color = if delta >= 0.0 { Color::Green } else { Color::Red };
    lines.push(Line::from(vec![
        Span::styled(format!("{:20}", "vs base"), Style::default().fg(Color::Gray)),
        Span::styled(format!("{:+.2}%", delta), Style::default().fg(delta_color)),
    ]));

    if let Some(price) = app.sell_price() {
        lines.push(stat_line("Sell estimate", format_amount(price)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Live stats",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    for &stat in ROLL_STATS {
        if let Some(value) = analysis.live_stats.get(stat) {
            lines.push(stat_line(stat.tooltip_name(), format!("{:.4}", value)));
        }
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Result "));
    f.render_widget(paragraph, area);
}
