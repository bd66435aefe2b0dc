use casino_rs::slots::{MachineConfig, SlotMachine};
use casino_rs::tui::{app::AppState, controller};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::io::{self, IsTerminal, Stdout};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const HEADLESS_SPINS: usize = 10;
const HEADLESS_WAGER: f64 = 10.0;

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// First argument, if any, names a JSON machine config.
fn load_config() -> io::Result<MachineConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => MachineConfig::load(&path)
            .map_err(|e| io::Error::other(format!("{}: {e}", path.to_string_lossy()))),
        None => Ok(MachineConfig::default()),
    }
}

/// No TTY: log to stderr and print a short batch of spins.
fn run_headless(config: MachineConfig) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let mut machine = SlotMachine::from_os_rng(config).map_err(io::Error::other)?;
    println!("casino-rs {} (headless, jackpot {})", casino_rs::VERSION, machine.jackpot_value());
    for n in 1..=HEADLESS_SPINS {
        let result = machine.spin(HEADLESS_WAGER).map_err(io::Error::other)?;
        for row in result.grid.iter_rows() {
            let glyphs: Vec<&str> = row.iter().map(|s| s.glyph()).collect();
            println!("  {}", glyphs.join(" "));
        }
        let tag = if result.is_jackpot { "  JACKPOT" } else { "" };
        println!(
            "spin {n:>2}: wager {} win {} lines {} meter {}{tag}",
            result.wager,
            result.total_win,
            result.winning_lines.len(),
            result.jackpot_after
        );
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let config = load_config()?;
    if !io::stdout().is_terminal() {
        return run_headless(config);
    }
    let mut app = AppState::with_config(config).map_err(io::Error::other)?;
    let mut terminal = setup_terminal()?;
    let tick_rate = Duration::from_millis(250);

    let res = controller::run(&mut terminal, &mut app, tick_rate);

    restore_terminal(terminal)?;
    res
}
