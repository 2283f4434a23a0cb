//! Simulation settings shared by every scenario

use serde::Deserialize;

/// Months after which a monthly loop gives up on an unpaid debt (50 years)
pub const DEFAULT_HORIZON_MONTHS: u32 = 600;

/// Largest horizon a caller may request (100 years)
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// Balances at or below this amount count as paid off
pub const PAYOFF_TOLERANCE: f64 = 0.01;

/// Smallest card payment ever requested, in currency units
pub const CARD_PAYMENT_FLOOR: f64 = 10.0;

/// Card minimums always retire at least this much principal
pub const CARD_INTEREST_MARGIN: f64 = 1.0;

/// Default directory holding the CSV/JSON datasets
pub const DEFAULT_DATA_PATH: &str = "data";

/// Configuration for a simulation run
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Safety cap on monthly iterations
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,

    #[serde(default = "default_payoff_tolerance")]
    pub payoff_tolerance: f64,

    #[serde(default = "default_card_payment_floor")]
    pub card_payment_floor: f64,

    #[serde(default = "default_card_interest_margin")]
    pub card_interest_margin: f64,
}

fn default_horizon_months() -> u32 { DEFAULT_HORIZON_MONTHS }
fn default_payoff_tolerance() -> f64 { PAYOFF_TOLERANCE }
fn default_card_payment_floor() -> f64 { CARD_PAYMENT_FLOOR }
fn default_card_interest_margin() -> f64 { CARD_INTEREST_MARGIN }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            payoff_tolerance: PAYOFF_TOLERANCE,
            card_payment_floor: CARD_PAYMENT_FLOOR,
            card_interest_margin: CARD_INTEREST_MARGIN,
        }
    }
}

impl SimulationConfig {
    /// Same settings with a different iteration horizon, capped at
    /// `MAX_HORIZON_MONTHS`
    pub fn with_horizon(mut self, months: u32) -> Self {
        self.horizon_months = months.min(MAX_HORIZON_MONTHS);
        self
    }
}
