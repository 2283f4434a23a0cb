//! Running state of one debt during a monthly simulation

use crate::config::SimulationConfig;
use crate::portfolio::{Card, DebtKind, Loan};
use super::amortization::{card_minimum_payment, fixed_installment, monthly_rate};
use super::summary::DebtAmortizationSummary;

/// How the required monthly payment of a debt is determined
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinimumRule {
    /// Contractual level installment (loans)
    FixedInstallment(f64),
    /// Percentage of the current balance, with floors (cards)
    PercentOfBalance(f64),
}

/// State of a debt at a point in time during simulation
#[derive(Debug, Clone)]
pub struct DebtState {
    pub product_id: String,
    pub kind: DebtKind,

    /// Annual nominal rate, in percent
    pub annual_rate_pct: f64,

    pub rule: MinimumRule,

    /// Balance when the simulation started
    pub starting_balance: f64,

    /// Principal still owed; never increases
    pub balance: f64,

    pub total_paid: f64,
    pub total_interest: f64,

    /// Months in which a required payment was applied
    pub months: u32,
}

impl DebtState {
    /// Initialize state from a loan at simulation start
    pub fn from_loan(loan: &Loan) -> Self {
        let installment = fixed_installment(loan.principal, loan.annual_rate_pct, loan.remaining_term_months);
        Self::new(
            &loan.loan_id,
            DebtKind::Loan,
            loan.principal,
            loan.annual_rate_pct,
            MinimumRule::FixedInstallment(installment),
        )
    }

    /// Initialize state from a card at simulation start
    pub fn from_card(card: &Card) -> Self {
        Self::new(
            &card.card_id,
            DebtKind::Card,
            card.balance,
            card.annual_rate_pct,
            MinimumRule::PercentOfBalance(card.min_payment_pct),
        )
    }

    fn new(product_id: &str, kind: DebtKind, balance: f64, annual_rate_pct: f64, rule: MinimumRule) -> Self {
        Self {
            product_id: product_id.to_string(),
            kind,
            annual_rate_pct,
            rule,
            starting_balance: balance,
            balance,
            total_paid: 0.0,
            total_interest: 0.0,
            months: 0,
        }
    }

    /// Whether any meaningful balance remains
    pub fn is_open(&self, config: &SimulationConfig) -> bool {
        self.balance > config.payoff_tolerance
    }

    /// Interest the current balance accrues this month
    pub fn monthly_interest(&self) -> f64 {
        self.balance * monthly_rate(self.annual_rate_pct)
    }

    /// Required payment this month, never more than balance plus interest
    pub fn minimum_payment(&self, interest: f64, config: &SimulationConfig) -> f64 {
        match self.rule {
            MinimumRule::FixedInstallment(installment) => installment.min(self.balance + interest),
            MinimumRule::PercentOfBalance(pct) => card_minimum_payment(self.balance, interest, pct, config),
        }
    }

    /// Apply a required payment against this month's interest and principal
    ///
    /// A payment short of the interest retires no principal; the uncovered
    /// interest is neither charged nor added to the balance.
    pub fn apply_payment(&mut self, payment: f64, interest: f64) {
        let principal = (payment - interest).max(0.0);
        self.balance = (self.balance - principal).max(0.0);
        self.total_paid += payment;
        self.total_interest += interest.min(payment);
        self.months += 1;
    }

    /// Apply an extra payment straight to principal
    pub fn apply_extra(&mut self, amount: f64) {
        self.balance = (self.balance - amount).max(0.0);
        self.total_paid += amount;
    }

    /// Convert the final state into a per-debt summary
    pub fn into_summary(self, config: &SimulationConfig) -> DebtAmortizationSummary {
        let horizon_reached = self.is_open(config);
        DebtAmortizationSummary {
            product_id: self.product_id,
            product_type: self.kind,
            starting_balance: self.starting_balance,
            total_paid: self.total_paid,
            total_interest_paid: self.total_interest,
            months_to_payoff: self.months,
            remaining_balance: self.balance,
            horizon_reached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::ProductType;
    use approx::assert_abs_diff_eq;

    fn card() -> Card {
        Card {
            card_id: "K1".to_string(),
            customer_id: "C1".to_string(),
            balance: 1000.0,
            annual_rate_pct: 36.0,
            min_payment_pct: 5.0,
            payment_due_day: 15,
            days_past_due: 0,
        }
    }

    #[test]
    fn test_card_first_month() {
        let config = SimulationConfig::default();
        let mut state = DebtState::from_card(&card());

        let interest = state.monthly_interest();
        assert_abs_diff_eq!(interest, 30.0, epsilon = 1e-9);

        let payment = state.minimum_payment(interest, &config);
        assert_abs_diff_eq!(payment, 50.0, epsilon = 1e-9);

        state.apply_payment(payment, interest);
        assert_abs_diff_eq!(state.balance, 980.0, epsilon = 1e-9);
        assert_eq!(state.months, 1);
        assert_eq!(state.starting_balance, 1000.0);
    }

    #[test]
    fn test_loan_installment_capped_at_amount_owed() {
        let config = SimulationConfig::default();
        let loan = Loan {
            loan_id: "L1".to_string(),
            customer_id: "C1".to_string(),
            product_type: ProductType::Personal,
            principal: 1200.0,
            annual_rate_pct: 0.0,
            remaining_term_months: 12,
            collateral: false,
            days_past_due: 0,
        };
        let mut state = DebtState::from_loan(&loan);
        assert_eq!(state.rule, MinimumRule::FixedInstallment(100.0));

        state.balance = 40.0;
        assert_eq!(state.minimum_payment(0.0, &config), 40.0);
    }

    #[test]
    fn test_underpaid_interest_keeps_balance() {
        let mut state = DebtState::from_card(&card());
        state.apply_payment(10.0, 30.0);
        assert_eq!(state.balance, 1000.0);
        assert_eq!(state.total_interest, 10.0);
        assert_eq!(state.total_paid, 10.0);
    }

    #[test]
    fn test_extra_payment_is_principal_only() {
        let config = SimulationConfig::default();
        let mut state = DebtState::from_card(&card());
        state.apply_extra(1000.0);
        assert_eq!(state.balance, 0.0);
        assert_eq!(state.months, 0);
        assert!(!state.is_open(&config));

        let summary = state.into_summary(&config);
        assert_eq!(summary.total_interest_paid, 0.0);
        assert!(!summary.horizon_reached);
    }
}
