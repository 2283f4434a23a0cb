//! Debt Restructuring - Repayment scenario engine for consumer debt portfolios
//!
//! This library provides:
//! - Dataset ingestion (loans, cards, payment and score history, cashflow, bank offers)
//! - Per-customer portfolio assembly
//! - Minimum-payment, avalanche and consolidation simulations
//! - Scenario comparison against the minimum-payment baseline

pub mod config;
pub mod error;
pub mod portfolio;
pub mod simulation;
pub mod scenario;

// Re-export commonly used types
pub use config::SimulationConfig;
pub use error::DataError;
pub use portfolio::{build_customer_portfolio, list_customers, BankOffer, CustomerPortfolio, Dataset};
pub use simulation::{DebtAmortizationSummary, ScenarioSummary, ScenarioType};
pub use scenario::{compare_scenarios, ScenarioComparisonResult, ScenarioRunner, ScenarioSavings};
