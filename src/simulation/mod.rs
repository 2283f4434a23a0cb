//! Repayment simulators for the three scenarios

pub mod amortization;
mod state;
mod summary;
mod minimum;
mod optimized;
mod consolidation;

pub use state::{DebtState, MinimumRule};
pub use summary::{DebtAmortizationSummary, ScenarioSummary, ScenarioType};
pub use minimum::{simulate_card_minimum, simulate_loan_schedule, simulate_minimum_payment};
pub use optimized::{allocate_month, simulate_optimized_plan, MonthAllocation};
pub use consolidation::{
    evaluate_offer, evaluate_offers, select_best_offer, simulate_consolidation, OfferEvaluation,
    OfferOutcome,
};
