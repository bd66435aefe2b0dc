use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

const LOGO: &str = r#"
  ___  __ _  ___(_)_ __   ___        _ __ ___
 / __|/ _` |/ __| | '_ \ / _ \ _____| '__/ __|
| (__| (_| |\__ \ | | | | (_) |_____| |  \__ \
 \___|\__,_||___/_|_| |_|\___/      |_|  |___/
"#;

pub(super) fn draw_menu(f: &mut Frame, app: &AppState) {
    let area = centered_rect(80, 80, f.area());
    let block = Block::default().title("casino-rs").borders(Borders::ALL);
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    let inner_all = inner(area);

    let mut logo_lines: Vec<Line> = LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Yellow))))
        .collect();
    logo_lines.push(Line::from(Span::styled(
        format!("Jackpot {}  •  v{}", app.session.jackpot_value(), crate::VERSION),
        Style::default().add_modifier(Modifier::DIM),
    )));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(logo_lines.len() as u16 + 1), Constraint::Min(3)])
        .split(inner_all);
    let logo_para = Paragraph::new(logo_lines).alignment(Alignment::Center);
    f.render_widget(logo_para, rows[0]);

    let mut cfg_lines: Vec<Line> = vec![Line::from(Span::styled(
        "New session:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (i, it) in app.menu_items_display().into_iter().enumerate() {
        let style = if i == app.menu_index {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        cfg_lines.push(Line::from(Span::styled(it, style)));
    }
    cfg_lines.push(Line::from(""));
    cfg_lines.push(Line::from(Span::styled(
        "[Enter] Start  [Esc] Back  [↑/↓] Move  [+/-] Adjust  [Q] Quit",
        Style::default().add_modifier(Modifier::DIM),
    )));
    let cfg_para = Paragraph::new(cfg_lines).wrap(Wrap { trim: true }).alignment(Alignment::Center);
    f.render_widget(cfg_para, rows[1]);
}
