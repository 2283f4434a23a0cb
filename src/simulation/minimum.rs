//! Minimum-payment baseline: loans on schedule, cards at their minimum

use log::{debug, warn};

use crate::config::SimulationConfig;
use crate::portfolio::{Card, CustomerPortfolio, DebtKind, Loan};
use super::amortization::{fixed_installment, payment_count};
use super::state::DebtState;
use super::summary::{DebtAmortizationSummary, ScenarioSummary, ScenarioType};

/// Follow a loan's contractual schedule to the end
///
/// Closed form: the level installment times the number of payments.
pub fn simulate_loan_schedule(loan: &Loan) -> DebtAmortizationSummary {
    let installment = fixed_installment(loan.principal, loan.annual_rate_pct, loan.remaining_term_months);
    let payments = payment_count(loan.remaining_term_months);
    let total_paid = installment * payments as f64;

    DebtAmortizationSummary {
        product_id: loan.loan_id.clone(),
        product_type: DebtKind::Loan,
        starting_balance: loan.principal,
        total_paid,
        total_interest_paid: total_paid - loan.principal,
        months_to_payoff: payments,
        remaining_balance: 0.0,
        horizon_reached: false,
    }
}

/// Pay only the card minimum every month until the balance is gone
pub fn simulate_card_minimum(card: &Card, config: &SimulationConfig) -> DebtAmortizationSummary {
    let mut state = DebtState::from_card(card);

    while state.is_open(config) && state.months < config.horizon_months {
        let interest = state.monthly_interest();
        let payment = state.minimum_payment(interest, config);
        state.apply_payment(payment, interest);
    }

    let summary = state.into_summary(config);
    if summary.horizon_reached {
        warn!(
            "card {} still owes {:.2} after {} months of minimum payments",
            summary.product_id, summary.remaining_balance, summary.months_to_payoff
        );
    }
    summary
}

/// Scenario 1: the customer changes nothing
pub fn simulate_minimum_payment(portfolio: &CustomerPortfolio, config: &SimulationConfig) -> ScenarioSummary {
    let debts: Vec<_> = portfolio
        .loans
        .iter()
        .map(simulate_loan_schedule)
        .chain(portfolio.cards.iter().map(|card| simulate_card_minimum(card, config)))
        .collect();

    let scenario = ScenarioSummary::from_debts(&portfolio.customer_id, ScenarioType::MinimumPayment, debts);
    debug!(
        "minimum payment for {}: {} months, interest {:.2}",
        scenario.customer_id, scenario.total_months, scenario.total_interest_paid
    );
    scenario
}
