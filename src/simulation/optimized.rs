//! Optimized plan: the whole monthly budget goes to debt
//!
//! Each month every open debt first receives its required payment. When the
//! required payments exceed the budget they are all scaled down by the same
//! factor. Whatever budget is left then goes, entirely to principal, to the
//! debt with the highest annual rate (avalanche), re-targeting as debts close.

use log::{debug, warn};

use crate::config::SimulationConfig;
use crate::portfolio::CustomerPortfolio;
use super::state::DebtState;
use super::summary::{ScenarioSummary, ScenarioType};

/// How one month's budget was split
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthAllocation {
    /// Sum of unscaled required payments
    pub minimum_total: f64,

    /// Factor applied to every required payment (1.0 without shortfall)
    pub scale: f64,

    /// Paid straight to principal after required payments
    pub extra_paid: f64,

    /// Budget left over once every debt is closed
    pub unused: f64,
}

/// Index of the open debt with the highest rate; the first listed wins ties
fn avalanche_target(debts: &[DebtState], config: &SimulationConfig) -> Option<usize> {
    let mut target: Option<(usize, f64)> = None;
    for (idx, debt) in debts.iter().enumerate() {
        if !debt.is_open(config) {
            continue;
        }
        match target {
            Some((_, rate)) if rate >= debt.annual_rate_pct => {}
            _ => target = Some((idx, debt.annual_rate_pct)),
        }
    }
    target.map(|(idx, _)| idx)
}

/// Run one month of the plan against the given budget
pub fn allocate_month(debts: &mut [DebtState], budget: f64, config: &SimulationConfig) -> MonthAllocation {
    // (index, interest, required payment) for every open debt
    let mut dues = Vec::with_capacity(debts.len());
    for (idx, debt) in debts.iter().enumerate() {
        if !debt.is_open(config) {
            continue;
        }
        let interest = debt.monthly_interest();
        dues.push((idx, interest, debt.minimum_payment(interest, config)));
    }

    let minimum_total: f64 = dues.iter().map(|&(_, _, minimum)| minimum).sum();
    let scale = if minimum_total > budget && minimum_total > 0.0 {
        budget / minimum_total
    } else {
        1.0
    };

    for &(idx, interest, minimum) in &dues {
        let payment = minimum * scale;
        if payment > 0.0 {
            debts[idx].apply_payment(payment, interest);
        }
    }

    let mut cash = budget - minimum_total * scale;
    let mut extra_paid = 0.0;
    while cash > config.payoff_tolerance {
        let Some(idx) = avalanche_target(debts, config) else {
            break;
        };
        let extra = cash.min(debts[idx].balance);
        debts[idx].apply_extra(extra);
        extra_paid += extra;
        cash -= extra;
    }

    MonthAllocation {
        minimum_total,
        scale,
        extra_paid,
        unused: cash,
    }
}

/// Scenario 2: disciplined repayment with the whole available cashflow
pub fn simulate_optimized_plan(portfolio: &CustomerPortfolio, config: &SimulationConfig) -> ScenarioSummary {
    let budget = portfolio.available_cashflow();
    if budget <= 0.0 {
        debug!("optimized plan for {}: no available cashflow", portfolio.customer_id);
        return ScenarioSummary::empty(&portfolio.customer_id, ScenarioType::OptimizedPlan);
    }

    let mut debts: Vec<DebtState> = portfolio
        .loans
        .iter()
        .map(DebtState::from_loan)
        .chain(portfolio.cards.iter().map(DebtState::from_card))
        .collect();

    let mut month = 0;
    while month < config.horizon_months && debts.iter().any(|d| d.is_open(config)) {
        month += 1;
        allocate_month(&mut debts, budget, config);
    }

    let summaries: Vec<_> = debts
        .into_iter()
        .filter(|d| d.total_paid > 0.0 || d.is_open(config))
        .map(|d| d.into_summary(config))
        .collect();

    let scenario = ScenarioSummary::from_debts(&portfolio.customer_id, ScenarioType::OptimizedPlan, summaries);
    if scenario.horizon_reached {
        warn!(
            "optimized plan for {} not paid off within {} months",
            scenario.customer_id, config.horizon_months
        );
    }
    debug!(
        "optimized plan for {}: {} months, interest {:.2}",
        scenario.customer_id, scenario.total_months, scenario.total_interest_paid
    );
    scenario
}
