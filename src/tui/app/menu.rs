use crate::slots::{SlotMachine, SlotSession, BET_STEP, MAX_BET, MIN_BET};
use tracing::{event, Level};

use super::{AppState, Scene, Tone};

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    StartingCredits,
    Bet,
    Seed,
    AutoplayDelayMs,
}

const MENU_ITEMS: [MenuItem; 4] =
    [MenuItem::StartingCredits, MenuItem::Bet, MenuItem::Seed, MenuItem::AutoplayDelayMs];

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        match self {
            MenuItem::StartingCredits => format!("Starting Credits: {}", app.cfg_starting_credits),
            MenuItem::Bet => format!("Bet: {}", app.cfg_bet),
            MenuItem::Seed => format!("RNG Seed: {}", app.cfg_seed),
            MenuItem::AutoplayDelayMs => {
                format!("Autoplay Delay (ms): {}", app.cfg_autoplay_delay_ms)
            }
        }
    }

    fn inc(self, app: &mut AppState) {
        match self {
            MenuItem::StartingCredits => {
                app.cfg_starting_credits = app.cfg_starting_credits.saturating_add(100);
            }
            MenuItem::Bet => {
                app.cfg_bet = app.cfg_bet.saturating_add(BET_STEP).min(MAX_BET);
            }
            MenuItem::Seed => {
                app.cfg_seed = app.cfg_seed.wrapping_add(1);
            }
            MenuItem::AutoplayDelayMs => {
                app.cfg_autoplay_delay_ms = app.cfg_autoplay_delay_ms.saturating_add(100);
            }
        }
    }

    fn dec(self, app: &mut AppState) {
        match self {
            MenuItem::StartingCredits => {
                app.cfg_starting_credits = app.cfg_starting_credits.saturating_sub(100).max(100);
            }
            MenuItem::Bet => {
                app.cfg_bet = app.cfg_bet.saturating_sub(BET_STEP).max(MIN_BET);
            }
            MenuItem::Seed => {
                app.cfg_seed = app.cfg_seed.wrapping_sub(1);
            }
            MenuItem::AutoplayDelayMs => {
                app.cfg_autoplay_delay_ms = app.cfg_autoplay_delay_ms.saturating_sub(100).max(100);
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        self.close_overlays();
        match self.scene {
            Scene::Menu => self.scene = Scene::Machine,
            _ => self.open_menu(),
        }
    }

    pub fn open_menu(&mut self) {
        self.close_overlays();
        self.menu_index = 0;
        self.cfg_bet = self.session.bet();
        self.cfg_autoplay_delay_ms = self.autoplay_delay_ms;
        self.session.set_autoplay(false);
        self.scene = Scene::Menu;
    }

    /// Start a fresh session from the edited settings.
    pub fn apply_menu(&mut self) {
        self.autoplay_delay_ms = self.cfg_autoplay_delay_ms;
        match SlotMachine::seeded(self.machine_config.clone(), self.cfg_seed) {
            Ok(machine) => {
                self.session = SlotSession::new(machine)
                    .with_credits(self.cfg_starting_credits as f64)
                    .with_bet(self.cfg_bet);
                event!(
                    Level::INFO,
                    seed = self.cfg_seed,
                    credits = self.cfg_starting_credits,
                    bet = self.cfg_bet,
                    "new slot session"
                );
                self.say(Tone::Info, "Press Space to spin");
            }
            Err(err) => self.say(Tone::Error, err.to_string()),
        }
        self.scene = Scene::Machine;
    }

    pub fn cancel_menu(&mut self) {
        self.scene = Scene::Machine;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.inc(self);
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.dec(self);
    }
}
