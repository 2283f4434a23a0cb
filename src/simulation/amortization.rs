//! Amortization primitives shared by every scenario

use crate::config::SimulationConfig;

/// Convert an annual percentage rate into a monthly decimal rate
///
/// 36.0 (36% a year) becomes 0.03 a month.
pub fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 100.0 / 12.0
}

/// Level payment that retires `principal` over `term_months` at the given rate
///
/// Standard annuity formula `P·r·(1+r)^n / ((1+r)^n − 1)`. A zero rate
/// splits the principal evenly; a term of zero or less makes the whole
/// principal due at once, whatever the rate.
pub fn fixed_installment(principal: f64, annual_rate_pct: f64, term_months: i32) -> f64 {
    if term_months <= 0 {
        return principal;
    }

    let r = monthly_rate(annual_rate_pct);
    let n = term_months as f64;

    if r == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + r).powi(term_months);
    principal * r * growth / (growth - 1.0)
}

/// Number of installments actually paid on a contract
///
/// A degenerate term still takes one payment.
pub fn payment_count(term_months: i32) -> u32 {
    term_months.max(1) as u32
}

/// Card minimum payment for the month, given the interest it accrues
///
/// The larger of the percentage of balance, interest plus the configured
/// margin, and the configured floor, but never more than what is owed.
pub fn card_minimum_payment(
    balance: f64,
    interest: f64,
    min_payment_pct: f64,
    config: &SimulationConfig,
) -> f64 {
    let pct_of_balance = balance * min_payment_pct / 100.0;
    let payment = pct_of_balance
        .max(interest + config.card_interest_margin)
        .max(config.card_payment_floor);

    payment.min(balance + interest)
}
