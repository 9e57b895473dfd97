//! Skills tab view

use super::stat_line;
use crate::app::{App, SKILL_NAMES};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use roll_core::compose;
use roll_core::Quantity;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    draw_skill_list(f, app, chunks[0]);
    draw_multipliers(f, app, chunks[1]);
}

fn draw_skill_list(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = SKILL_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if i == app.selected_skill {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == app.selected_skill { "► " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{:24}", prefix, name), style),
                Span::styled(app.skill_value(i), Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Skills (↑/↓ to select, ←/→ to change) "),
    );

    f.render_widget(list, area);
}

/// Net live multiplier per quantity for the selected module family
fn draw_multipliers(f: &mut Frame, app: &App, area: Rect) {
    let family = app.defaults.family;
    let live = compose(family, &app.skills, &app.data.live);

    let mut lines = vec![
        Line::from(Span::styled(
            family.name(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for &quantity in Quantity::all() {
        let factors = live.get(quantity).factors();
        let detail = if factors.is_empty() {
            String::new()
        } else {
            let parts: Vec<String> = factors.iter().map(|x| format!("{:.3}", x)).collect();
            format!("  ({})", parts.join(" × "))
        };
        lines.push(stat_line(
            &format!("{:?}", quantity),
            format!("×{:.4}{}", live.multiplier(quantity), detail),
        ));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Live Multipliers "));
    f.render_widget(paragraph, area);
}
