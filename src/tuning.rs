//! Operator-tunable economy prices
//!
//! Loaded from a JSON file at startup; any problem falls back to defaults so
//! a bad edit can never brick the service.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PLAY_COST: u64 = 10;
pub const DEFAULT_DOUBLE_JUMP_COST: u64 = 5;
pub const DEFAULT_SHIELD_COST: u64 = 15;
pub const DEFAULT_STARTING_BALANCE: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuning {
    /// Entry fee per run, credited to the daily pot
    pub play_cost: u64,
    pub double_jump_cost: u64,
    pub shield_cost: u64,
    /// Balance granted to a brand-new account
    pub starting_balance: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            play_cost: DEFAULT_PLAY_COST,
            double_jump_cost: DEFAULT_DOUBLE_JUMP_COST,
            shield_cost: DEFAULT_SHIELD_COST,
            starting_balance: DEFAULT_STARTING_BALANCE,
        }
    }
}

impl Tuning {
    /// Load from `path`, falling back to defaults if missing or unreadable
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(tuning) => {
                    log::info!("loaded tuning from {:?}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("tuning file {:?} unreadable ({}), using defaults", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no tuning file at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, text)
    }
}
