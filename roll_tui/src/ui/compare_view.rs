//! Compare tab - two strengths side by side

use super::simulate_view::draw_progress;
use super::{draw_config, letter_color};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};
use roll_core::simulation::{format_amount, SimulationResult};
use roll_core::tier::{Tier, TierLetter};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(chunks[0]);

    draw_config(f, app, top[0]);
    let first = format!(" {} ", app.defaults.strength.name());
    let second = format!(" {} ", app.defaults.compare_strength.name());
    draw_progress(f, &app.primary, &first, top[1]);
    draw_progress(f, &app.comparison, &second, top[2]);

    draw_comparison(f, app, chunks[1]);
}

fn draw_comparison(f: &mut Frame, app: &App, area: Rect) {
    let left = app.primary.result.as_ref();
    let right = app.comparison.result.as_ref();
    let label = |result: Option<&SimulationResult>, fallback: &str| match result {
        Some(r) => r.config.strength.name().to_string(),
        None => fallback.to_string(),
    };

    let header = Row::new(vec![
        "Tier".to_string(),
        label(left, "First"),
        label(right, "Second"),
        "Difference".to_string(),
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let share = |result: Option<&SimulationResult>, letter: TierLetter| result.map(|r| r.letter_share(letter));
    let plus_share =
        |result: Option<&SimulationResult>, letter: TierLetter| result.map(|r| r.tier_share(Tier::new(letter, true)));

    let mut rows: Vec<Row> = Vec::new();
    for &letter in TierLetter::all() {
        rows.push(share_row(
            format!("{letter} Total"),
            share(left, letter),
            share(right, letter),
            Style::default().fg(letter_color(letter)).add_modifier(Modifier::BOLD),
        ));
        if letter != TierLetter::F {
            rows.push(share_row(
                format!("  {}+", letter),
                plus_share(left, letter),
                plus_share(right, letter),
                Style::default().fg(letter_color(letter)),
            ));
        }
    }

    let amount = |result: Option<&SimulationResult>, value: fn(&SimulationResult) -> f64| {
        result.map(|r| format_amount(value(r))).unwrap_or_else(|| "-".to_string())
    };
    rows.push(Row::new(vec![
        Cell::from("EV"),
        Cell::from(amount(left, SimulationResult::expected_value)),
        Cell::from(amount(right, SimulationResult::expected_value)),
        Cell::from(""),
    ]));
    let roi = |result: Option<&SimulationResult>| result.map(|r| format!("{:+.1}%", r.roi())).unwrap_or_else(|| "-".to_string());
    rows.push(Row::new(vec![
        Cell::from("ROI"),
        Cell::from(roi(left)),
        Cell::from(roi(right)),
        Cell::from(""),
    ]));

    let widths = [
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Min(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Tier Shares "));

    f.render_widget(table, area);
}

fn share_row(label: String, left: Option<f64>, right: Option<f64>, style: Style) -> Row<'static> {
    let pct = |share: Option<f64>| share.map(|s| format!("{:.2}%", s * 100.0)).unwrap_or_else(|| "-".to_string());
    let diff = match (left, right) {
        (Some(l), Some(r)) => format!("{:+.2} pts", (r - l) * 100.0),
        _ => String::new(),
    };
    Row::new(vec![Cell::from(label), Cell::from(pct(left)), Cell::from(pct(right)), Cell::from(diff)]).style(style)
}
