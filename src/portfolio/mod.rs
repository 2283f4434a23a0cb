//! Customer portfolio data, dataset loading and per-customer assembly

mod data;
mod assemble;
pub mod offer;
pub mod loader;

pub use data::{
    BankOffer, Card, CreditScoreRecord, CustomerCashflow, CustomerPortfolio, DebtKind, Loan,
    PaymentRecord, ProductType,
};
pub use offer::{EligibilityRule, OfferRules};
pub use loader::Dataset;
pub use assemble::{build_customer_portfolio, latest_credit_score, list_customers};
