//! UI rendering

mod analyze_view;
mod compare_view;
mod help_view;
mod simulate_view;
mod skills_view;

use crate::app::{App, ConfigField, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use roll_core::simulation::{format_amount, RunnerState};
use roll_core::tier::TierLetter;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Keybindings footer
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);

    match app.current_tab {
        Tab::Simulate => simulate_view::draw(f, app, chunks[1]),
        Tab::Compare => compare_view::draw(f, app, chunks[1]),
        Tab::Analyze => analyze_view::draw(f, app, chunks[1]),
        Tab::Skills => skills_view::draw(f, app, chunks[1]),
        Tab::Help => help_view::draw(f, app, chunks[1]),
    }

    draw_keybindings(f, app, chunks[2]);
}

fn draw_keybindings(f: &mut Frame, app: &App, area: Rect) {
    let common_keys = vec![("Tab", "Next tab"), ("?", "Help"), ("q", "Quit")];

    let tab_keys: Vec<(&str, &str)> = match app.current_tab {
        Tab::Simulate => vec![("↑/↓", "Field"), ("←/→", "Change"), ("s", "Start"), ("x", "Stop"), ("w", "Export")],
        Tab::Compare => vec![("↑/↓", "Field"), ("←/→", "Change"), ("s", "Run both"), ("x", "Stop"), ("w", "Export")],
        Tab::Analyze => vec![("↑/↓", "Stat"), ("←/→", "±1%"), ("r", "Random roll"), ("b", "Base"), ("o", "Open roll")],
        Tab::Skills => vec![("↑/↓", "Select skill"), ("←/→", "Level")],
        Tab::Help => vec![],
    };

    let mut spans: Vec<Span> = Vec::new();

    for (i, (key, desc)) in tab_keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::White)));
    }

    if !tab_keys.is_empty() {
        spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
    }

    for (i, (key, desc)) in common_keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(format!("[{}]", key), Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::Gray)));
    }

    // Status messages replace the footer title until the next one
    let title = match &app.status {
        Some(status) => format!(" {} ", status),
        None => " Keys ".to_string(),
    };

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(title))
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(paragraph, area);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let style = if *t == app.current_tab {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(t.name(), style))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Roll Simulator "))
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider("|");

    f.render_widget(tabs, area);
}

/// Simulation settings list shared by the Simulate and Compare tabs
pub fn draw_config(f: &mut Frame, app: &App, area: Rect) {
    let defaults = &app.defaults;
    let lines: Vec<Line> = ConfigField::all()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let value = match field {
                ConfigField::Family => defaults.family.name().to_string(),
                ConfigField::Strength => defaults.strength.name().to_string(),
                ConfigField::CompareStrength => defaults.compare_strength.name().to_string(),
                ConfigField::SampleSize => format_amount(defaults.sample_size as f64),
                ConfigField::BaseCost => format_amount(defaults.base_cost),
                ConfigField::MutationCost => format_amount(defaults.mutation_cost),
            };
            let selected = i == app.selected_field;
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let prefix = if selected { "► " } else { "  " };
            Line::from(vec![
                Span::styled(format!("{}{:15}", prefix, field.name()), style),
                Span::styled(value, Style::default().fg(Color::White)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Configuration "));
    f.render_widget(paragraph, area);
}

pub fn progress_bar(current: f64, max: f64, width: u16, filled_color: Color) -> Paragraph<'static> {
    let percent = if max > 0.0 { (current / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (percent * width as f64) as usize;
    let empty = (width as usize).saturating_sub(filled);

    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(empty));

    Paragraph::new(bar).style(Style::default().fg(filled_color))
}

pub fn stat_line(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:20}", name), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

pub fn letter_color(letter: TierLetter) -> Color {
    match letter {
        TierLetter::S => Color::Magenta,
        TierLetter::A => Color::LightRed,
        TierLetter::B => Color::Yellow,
        TierLetter::C => Color::Green,
        TierLetter::D => Color::Cyan,
        TierLetter::E => Color::Blue,
        TierLetter::F => Color::DarkGray,
    }
}

pub fn state_line(state: RunnerState, error: Option<&str>) -> Line<'static> {
    let (text, color) = match state {
        RunnerState::Idle => ("Idle".to_string(), Color::Gray),
        RunnerState::Running => ("Running".to_string(), Color::Yellow),
        RunnerState::Completed => ("Completed".to_string(), Color::Green),
        RunnerState::Cancelled => ("Stopped".to_string(), Color::DarkGray),
        RunnerState::Failed => (format!("Failed: {}", error.unwrap_or("unknown error")), Color::Red),
    };
    Line::from(vec![
        Span::styled("State: ", Style::default().fg(Color::Gray)),
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}
