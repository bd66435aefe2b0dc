use crate::slots::{
    ConfigError, MachineConfig, SessionError, SlotMachine, SlotSession, DEFAULT_BET,
    STARTING_CREDITS,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Machine,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    TogglePaytable,
    ToggleHistory,
    CloseOverlay,
    Spin,
    BetUp,
    BetDown,
    ToggleAutoplay,
    AddCredits,
}

/// Severity of the status-bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Win,
    Jackpot,
    Error,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub session: SlotSession,
    // Menu config being edited
    pub menu_index: usize,
    pub cfg_starting_credits: u64,
    pub cfg_bet: u32,
    pub cfg_seed: u64,
    pub cfg_autoplay_delay_ms: u64,
    pub autoplay_delay_ms: u64,
    pub(crate) machine_config: MachineConfig,
    paytable_open: bool,
    history_open: bool,
    message: Option<(Tone, String)>,
    last_spin_at: Option<Instant>,
}

impl Default for AppState {
    fn default() -> Self {
        let session = SlotSession::new(SlotMachine::standard(Self::DEFAULT_SEED));
        Self::from_parts(MachineConfig::default(), session)
    }
}

impl AppState {
    pub const DEFAULT_SEED: u64 = 7;
    pub const DEFAULT_AUTOPLAY_DELAY_MS: u64 = 1500;

    /// Start on the menu with a custom machine configuration.
    pub fn with_config(config: MachineConfig) -> Result<Self, ConfigError> {
        let machine = SlotMachine::seeded(config.clone(), Self::DEFAULT_SEED)?;
        Ok(Self::from_parts(config, SlotSession::new(machine)))
    }

    fn from_parts(machine_config: MachineConfig, session: SlotSession) -> Self {
        Self {
            scene: Scene::Menu,
            session,
            menu_index: 0,
            cfg_starting_credits: STARTING_CREDITS as u64,
            cfg_bet: DEFAULT_BET,
            cfg_seed: Self::DEFAULT_SEED,
            cfg_autoplay_delay_ms: Self::DEFAULT_AUTOPLAY_DELAY_MS,
            autoplay_delay_ms: Self::DEFAULT_AUTOPLAY_DELAY_MS,
            machine_config,
            paytable_open: false,
            history_open: false,
            message: None,
            last_spin_at: None,
        }
    }

    pub fn paytable_open(&self) -> bool {
        self.paytable_open
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn overlay_open(&self) -> bool {
        self.paytable_open || self.history_open
    }

    pub fn message(&self) -> Option<(Tone, &str)> {
        self.message.as_ref().map(|(t, m)| (*t, m.as_str()))
    }

    pub(crate) fn say(&mut self, tone: Tone, text: impl Into<String>) {
        self.message = Some((tone, text.into()));
    }

    pub(crate) fn close_overlays(&mut self) {
        self.paytable_open = false;
        self.history_open = false;
    }

    /// Apply one input. Returns true when a spin settled.
    pub fn handle_input(&mut self, action: InputAction) -> bool {
        use InputAction::*;
        match (self.scene, action) {
            (_, ToggleMenu) => self.toggle_menu(),
            (_, CloseOverlay) => self.close_overlays(),
            (Scene::Menu, MenuNext) => self.menu_next(),
            (Scene::Menu, MenuPrev) => self.menu_prev(),
            (Scene::Menu, MenuInc) => self.menu_inc(),
            (Scene::Menu, MenuDec) => self.menu_dec(),
            (Scene::Menu, MenuApply) => self.apply_menu(),
            (Scene::Menu, MenuCancel) => self.cancel_menu(),
            (Scene::Machine, TogglePaytable) => {
                self.history_open = false;
                self.paytable_open = !self.paytable_open;
            }
            (Scene::Machine, ToggleHistory) => {
                self.paytable_open = false;
                self.history_open = !self.history_open;
            }
            (Scene::Machine, Spin) => return self.spin(),
            (Scene::Machine, BetUp) => self.session.increase_bet(),
            (Scene::Machine, BetDown) => self.session.decrease_bet(),
            (Scene::Machine, ToggleAutoplay) => {
                let on = self.session.toggle_autoplay();
                self.say(Tone::Info, if on { "Autoplay on" } else { "Autoplay off" });
            }
            (Scene::Machine, AddCredits) => {
                self.session.add_credits();
                self.say(Tone::Info, format!("Credits added: {}", self.session.credits()));
            }
            _ => {}
        }
        false
    }

    fn spin(&mut self) -> bool {
        self.last_spin_at = Some(Instant::now());
        match self.session.spin() {
            Ok(r) => {
                let (tone, text) = if r.is_jackpot {
                    (Tone::Jackpot, format!("JACKPOT! You win {}", r.total_win))
                } else if r.is_win() {
                    let lines = r.winning_lines.len();
                    (Tone::Win, format!("You win {} on {lines} line(s)", r.total_win))
                } else {
                    (Tone::Info, "No win".to_string())
                };
                self.say(tone, text);
                true
            }
            Err(SessionError::InsufficientCredits { .. }) => {
                self.say(Tone::Error, "Insufficient credits. Press C to add more.");
                false
            }
            Err(err) => {
                self.say(Tone::Error, err.to_string());
                false
            }
        }
    }

    /// Periodic work: keeps autoplay spinning at the configured pace.
    pub fn on_tick(&mut self) -> bool {
        if self.scene != Scene::Machine || !self.session.autoplay() {
            return false;
        }
        let delay = Duration::from_millis(self.autoplay_delay_ms);
        let due = self.last_spin_at.map(|at| at.elapsed() >= delay).unwrap_or(true);
        due && self.spin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autoplay_spins_on_first_tick() {
        let mut app = AppState::default();
        app.apply_menu();
        app.autoplay_delay_ms = 0;
        let _ = app.handle_input(InputAction::ToggleAutoplay);
        assert!(app.on_tick());
        assert_eq!(app.session.spins(), 1);
    }

    #[test]
    fn ticks_do_nothing_without_autoplay() {
        let mut app = AppState::default();
        app.apply_menu();
        assert!(!app.on_tick());
        assert_eq!(app.session.spins(), 0);
    }
}
