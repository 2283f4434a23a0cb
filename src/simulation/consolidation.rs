//! Consolidation: refinance eligible debts into the best bank offer

use log::debug;
use serde::Serialize;

use crate::portfolio::{BankOffer, CustomerPortfolio, DebtKind, ProductType};
use super::amortization::{fixed_installment, payment_count};
use super::summary::{DebtAmortizationSummary, ScenarioSummary, ScenarioType};

/// Why an offer was kept or discarded for a customer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OfferOutcome {
    /// None of the customer's debts are of an accepted product type
    NothingEligible,
    /// Eligible debt is above the offer's ceiling
    OverBalanceLimit { eligible_balance: f64, limit: f64 },
    /// The offer's score or delinquency gate rejected the customer
    FailedConditions { credit_score: Option<u32>, max_days_past_due: u32 },
    /// The new installment does not fit the available cashflow
    Unaffordable { installment: f64, available_cashflow: f64 },
    /// The offer can be taken
    Viable {
        eligible_balance: f64,
        installment: f64,
        total_paid: f64,
        total_interest: f64,
    },
}

/// Result of checking one offer against one portfolio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferEvaluation {
    pub offer_id: String,
    pub term_months: u32,
    #[serde(flatten)]
    pub outcome: OfferOutcome,
}

impl OfferEvaluation {
    /// Total interest if viable
    pub fn viable_interest(&self) -> Option<f64> {
        match self.outcome {
            OfferOutcome::Viable { total_interest, .. } => Some(total_interest),
            _ => None,
        }
    }
}

/// Check a single offer against eligibility, conditions and affordability
pub fn evaluate_offer(portfolio: &CustomerPortfolio, offer: &BankOffer) -> OfferEvaluation {
    let term_months = payment_count(offer.max_term_months);
    let evaluation = |outcome| OfferEvaluation {
        offer_id: offer.offer_id.clone(),
        term_months,
        outcome,
    };

    let mut eligible_balance = 0.0;
    let mut max_days_past_due = 0u32;

    for loan in portfolio.loans.iter().filter(|l| offer.accepts(l.product_type)) {
        eligible_balance += loan.principal;
        max_days_past_due = max_days_past_due.max(loan.days_past_due);
    }
    if offer.accepts(ProductType::Card) {
        for card in &portfolio.cards {
            eligible_balance += card.balance;
            max_days_past_due = max_days_past_due.max(card.days_past_due);
        }
    }

    if eligible_balance <= 0.0 {
        return evaluation(OfferOutcome::NothingEligible);
    }
    if eligible_balance > offer.max_consolidated_balance {
        return evaluation(OfferOutcome::OverBalanceLimit {
            eligible_balance,
            limit: offer.max_consolidated_balance,
        });
    }
    if !offer.rules.allows(portfolio.credit_score, max_days_past_due) {
        return evaluation(OfferOutcome::FailedConditions {
            credit_score: portfolio.credit_score,
            max_days_past_due,
        });
    }

    let installment = fixed_installment(eligible_balance, offer.new_rate_pct, offer.max_term_months);
    let available_cashflow = portfolio.available_cashflow();
    if installment > available_cashflow {
        return evaluation(OfferOutcome::Unaffordable {
            installment,
            available_cashflow,
        });
    }

    let total_paid = installment * term_months as f64;
    evaluation(OfferOutcome::Viable {
        eligible_balance,
        installment,
        total_paid,
        total_interest: total_paid - eligible_balance,
    })
}

/// Evaluate every offer, in the order given
pub fn evaluate_offers(portfolio: &CustomerPortfolio, offers: &[BankOffer]) -> Vec<OfferEvaluation> {
    offers.iter().map(|offer| evaluate_offer(portfolio, offer)).collect()
}

/// Pick the viable offer with the least interest, then the shortest term
///
/// On a full tie the earlier offer is kept.
pub fn select_best_offer(evaluations: &[OfferEvaluation]) -> Option<&OfferEvaluation> {
    let mut best: Option<(&OfferEvaluation, f64)> = None;
    for evaluation in evaluations {
        let Some(interest) = evaluation.viable_interest() else {
            continue;
        };
        let better = match best {
            None => true,
            Some((current, current_interest)) => {
                interest < current_interest
                    || (interest == current_interest && evaluation.term_months < current.term_months)
            }
        };
        if better {
            best = Some((evaluation, interest));
        }
    }
    best.map(|(evaluation, _)| evaluation)
}

/// Scenario 3: replace eligible debts with the best available offer
pub fn simulate_consolidation(portfolio: &CustomerPortfolio, offers: &[BankOffer]) -> ScenarioSummary {
    if portfolio.available_cashflow() <= 0.0 || offers.is_empty() {
        return ScenarioSummary::empty(&portfolio.customer_id, ScenarioType::Consolidation);
    }

    let evaluations = evaluate_offers(portfolio, offers);
    for evaluation in &evaluations {
        debug!("consolidation for {}: {:?}", portfolio.customer_id, evaluation);
    }

    let Some(best) = select_best_offer(&evaluations) else {
        return ScenarioSummary::empty(&portfolio.customer_id, ScenarioType::Consolidation);
    };
    let OfferOutcome::Viable { eligible_balance, total_paid, total_interest, .. } = best.outcome else {
        return ScenarioSummary::empty(&portfolio.customer_id, ScenarioType::Consolidation);
    };

    let consolidated = DebtAmortizationSummary {
        product_id: best.offer_id.clone(),
        product_type: DebtKind::Loan,
        starting_balance: eligible_balance,
        total_paid,
        total_interest_paid: total_interest,
        months_to_payoff: best.term_months,
        remaining_balance: 0.0,
        horizon_reached: false,
    };
    ScenarioSummary::from_debts(&portfolio.customer_id, ScenarioType::Consolidation, vec![consolidated])
}
