use crate::slots::{Grid, SpinResult, SymbolKind};
use crate::tui::app::{AppState, Tone};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::collections::BTreeSet;

use super::layout::{centered_rect, even_split, inner};

pub(super) fn draw_machine(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // meters
            Constraint::Min(9),    // grid
            Constraint::Length(6), // winning lines
            Constraint::Length(4), // status bar
        ])
        .split(f.area());

    draw_meters(f, app, chunks[0]);

    let result = app.session.last_result();
    let machine_block = Block::default().title("Reels").borders(Borders::ALL);
    let grid_area = inner(chunks[1]);
    f.render_widget(machine_block, chunks[1]);
    match result {
        Some(r) => draw_grid(f, grid_area, &r.grid, &r.winning_cells(), r.is_jackpot),
        None => {
            let hint = Paragraph::new("Press Space to spin").alignment(Alignment::Center);
            f.render_widget(hint, grid_area);
        }
    }

    draw_lines(f, chunks[2], result);
    draw_status(f, app, chunks[3]);

    if app.paytable_open() {
        draw_paytable(f, app);
    } else if app.history_open() {
        draw_history(f, app);
    }
}

fn draw_meters(f: &mut Frame, app: &AppState, area: Rect) {
    let s = &app.session;
    let autoplay = if s.autoplay() {
        Span::styled("AUTO", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("manual", Style::default().add_modifier(Modifier::DIM))
    };
    let lines = vec![
        Line::from(vec![
            Span::raw(format!("Credits: {}   Bet: {}   ", s.credits(), s.bet())),
            Span::styled(
                format!("Jackpot: {}", s.jackpot_value()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw(format!("Last win: {}   Spins: {}   Mode: ", s.last_win(), s.spins())),
            autoplay,
        ]),
    ];
    let header =
        Paragraph::new(lines).block(Block::default().title("casino-rs").borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_grid(f: &mut Frame, area: Rect, grid: &Grid, winners: &BTreeSet<usize>, jackpot: bool) {
    let rows = even_split(area, grid.rows(), Direction::Vertical);
    for (r, row_area) in rows.iter().enumerate() {
        let cells = even_split(*row_area, grid.cols(), Direction::Horizontal);
        for (c, cell_area) in cells.iter().enumerate() {
            let index = r * grid.cols() + c;
            let Some(symbol) = grid.at(index) else {
                continue;
            };
            let mut block = Block::default().borders(Borders::ALL);
            if jackpot && symbol.kind() == SymbolKind::Jackpot {
                block = block.border_style(Style::default().fg(Color::Magenta));
            } else if winners.contains(&index) {
                block = block.border_style(Style::default().fg(Color::Yellow));
            }
            let style = match symbol.kind() {
                SymbolKind::Jackpot => Style::default().fg(Color::Magenta),
                SymbolKind::Wild => Style::default().fg(Color::Cyan),
                _ if winners.contains(&index) => Style::default().add_modifier(Modifier::BOLD),
                _ => Style::default(),
            };
            let text = vec![
                Line::from(symbol.glyph().to_string()),
                Line::from(Span::styled(symbol.name().to_string(), style)),
            ];
            let para = Paragraph::new(text).alignment(Alignment::Center);
            f.render_widget(block, *cell_area);
            f.render_widget(para, inner(*cell_area));
        }
    }
}

fn draw_lines(f: &mut Frame, area: Rect, result: Option<&SpinResult>) {
    let block = Block::default().title("Winning lines").borders(Borders::ALL);
    let mut lines: Vec<Line> = Vec::new();
    match result {
        Some(r) if r.is_jackpot => {
            lines.push(Line::from(Span::styled(
                format!("JACKPOT {}", r.total_win),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            )));
        }
        Some(r) if r.winning_lines.is_empty() => lines.push(Line::from("No winning lines.")),
        Some(r) => {
            for w in &r.winning_lines {
                let wild = if w.wild { " +wild" } else { "" };
                lines.push(Line::from(format!(
                    "Line {}: {} x{}{} = {}",
                    w.payline_id,
                    w.reference.name(),
                    w.run_len(),
                    wild,
                    w.win
                )));
            }
        }
        None => lines.push(Line::from("--")),
    }
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn draw_status(f: &mut Frame, app: &AppState, area: Rect) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner(area));

    let left = match app.message() {
        Some((tone, text)) => {
            let color = match tone {
                Tone::Info => Color::White,
                Tone::Win => Color::Green,
                Tone::Jackpot => Color::Magenta,
                Tone::Error => Color::Red,
            };
            Line::from(Span::styled(text.to_string(), Style::default().fg(color)))
        }
        None => Line::from(""),
    };
    let right = vec![
        Line::from("Space spin • +/- bet • A auto • C credits"),
        Line::from("P paytable • H history • M menu • Q quit"),
    ];
    f.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(
        Paragraph::new(right).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        cols[1],
    );
}

fn draw_paytable(f: &mut Frame, app: &AppState) {
    let area = centered_rect(80, 85, f.area());
    let block = Block::default().title("Pay table").borders(Borders::ALL);
    let machine = app.session.machine();
    let config = machine.config();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(Span::styled("Symbols:", bold))];
    let mut symbols = machine.symbols().to_vec();
    symbols.sort_by(|a, b| b.value().cmp(&a.value()));
    for s in symbols {
        let detail = match (s.kind(), s.multiplier()) {
            (SymbolKind::Regular, _) => format!("{} per symbol", s.value()),
            (kind, Some(m)) => format!("{kind} x{m}"),
            (kind, None) => kind.to_string(),
        };
        lines.push(Line::from(format!("  {} {:<12} {detail}", s.glyph(), s.name())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Paylines:", bold)));
    for p in machine.paylines() {
        let cells: Vec<String> = p.positions().iter().map(usize::to_string).collect();
        lines.push(Line::from(format!(
            "  #{} {:<9} x{:<4} [{}]",
            p.id(),
            p.shape().to_string(),
            p.multiplier(),
            cells.join(",")
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "{}+ in a row pays value x run x line. Wilds multiply by {}.",
        config.min_match, config.wildcard_multiplier
    )));
    lines.push(Line::from(format!(
        "{} jackpot symbols win the meter.",
        config.jackpot_threshold()
    )));
    lines.push(Line::from(Span::styled(
        "Close: P or Esc",
        Style::default().add_modifier(Modifier::DIM),
    )));
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner(area));
}

fn draw_history(f: &mut Frame, app: &AppState) {
    let area = centered_rect(60, 60, f.area());
    let block = Block::default().title("History").borders(Borders::ALL);
    let mut lines: Vec<Line> = Vec::new();
    if app.session.history().is_empty() {
        lines.push(Line::from("No spins yet."));
    } else {
        for rec in app.session.history() {
            let style = if rec.jackpot {
                Style::default().fg(Color::Magenta)
            } else if rec.win > 0.0 {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            let tag = if rec.jackpot { " JACKPOT" } else { "" };
            lines.push(Line::from(Span::styled(
                format!("#{:<4} bet {:<4} win {}{tag}", rec.number, rec.bet, rec.win),
                style,
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Close: H or Esc",
        Style::default().add_modifier(Modifier::DIM),
    )));
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}
