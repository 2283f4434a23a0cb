//! Output structures for scenario simulations

use serde::{Deserialize, Serialize};

use crate::portfolio::DebtKind;

/// Repayment strategy a summary describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    /// Loans on schedule, cards at their minimum
    MinimumPayment,
    /// Whole budget applied, surplus to the costliest debt
    OptimizedPlan,
    /// Eligible debts refinanced into one offer
    Consolidation,
}

impl ScenarioType {
    pub const ALL: [ScenarioType; 3] = [
        ScenarioType::MinimumPayment,
        ScenarioType::OptimizedPlan,
        ScenarioType::Consolidation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::MinimumPayment => "minimum_payment",
            ScenarioType::OptimizedPlan => "optimized_plan",
            ScenarioType::Consolidation => "consolidation",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        ScenarioType::ALL.into_iter().find(|s| s.as_str() == label)
    }
}

/// Repayment outcome of one debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtAmortizationSummary {
    pub product_id: String,
    pub product_type: DebtKind,
    pub starting_balance: f64,
    pub total_paid: f64,
    pub total_interest_paid: f64,
    pub months_to_payoff: u32,

    /// Principal still owed when the simulation stopped
    pub remaining_balance: f64,

    /// Stopped by the iteration horizon rather than by payoff
    pub horizon_reached: bool,
}

impl DebtAmortizationSummary {
    /// Principal retired over the simulation
    pub fn principal_paid(&self) -> f64 {
        self.starting_balance - self.remaining_balance
    }
}

/// Aggregated outcome of one strategy for one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub customer_id: String,
    pub scenario_type: ScenarioType,

    /// Longest months-to-payoff across debts
    pub total_months: u32,
    pub total_paid: f64,
    pub total_interest_paid: f64,

    /// True when any debt was cut off by the iteration horizon
    pub horizon_reached: bool,
    pub debts: Vec<DebtAmortizationSummary>,
}

impl ScenarioSummary {
    /// Scenario with nothing to report (no budget, no viable offer)
    pub fn empty(customer_id: impl Into<String>, scenario_type: ScenarioType) -> Self {
        Self::from_debts(customer_id, scenario_type, Vec::new())
    }

    /// Aggregate per-debt summaries into a scenario
    pub fn from_debts(
        customer_id: impl Into<String>,
        scenario_type: ScenarioType,
        debts: Vec<DebtAmortizationSummary>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            scenario_type,
            total_months: debts.iter().map(|d| d.months_to_payoff).max().unwrap_or(0),
            total_paid: debts.iter().fold(0.0, |acc, d| acc + d.total_paid),
            total_interest_paid: debts.iter().fold(0.0, |acc, d| acc + d.total_interest_paid),
            horizon_reached: debts.iter().any(|d| d.horizon_reached),
            debts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debt(id: &str, months: u32, paid: f64, interest: f64, truncated: bool) -> DebtAmortizationSummary {
        DebtAmortizationSummary {
            product_id: id.to_string(),
            product_type: DebtKind::Card,
            starting_balance: paid - interest,
            total_paid: paid,
            total_interest_paid: interest,
            months_to_payoff: months,
            remaining_balance: 0.0,
            horizon_reached: truncated,
        }
    }

    #[test]
    fn test_aggregation() {
        let summary = ScenarioSummary::from_debts(
            "C1",
            ScenarioType::MinimumPayment,
            vec![debt("A", 12, 1200.0, 200.0, false), debt("B", 30, 900.0, 100.0, false)],
        );
        assert_eq!(summary.total_months, 30);
        assert_eq!(summary.total_paid, 2100.0);
        assert_eq!(summary.total_interest_paid, 300.0);
        assert!(!summary.horizon_reached);
    }

    #[test]
    fn test_empty_scenario() {
        let summary = ScenarioSummary::empty("C1", ScenarioType::Consolidation);
        assert!(summary.is_empty());
        assert_eq!(summary.total_months, 0);
        assert_eq!(summary.total_paid, 0.0);
    }

    #[test]
    fn test_truncation_propagates() {
        let summary = ScenarioSummary::from_debts(
            "C1",
            ScenarioType::OptimizedPlan,
            vec![debt("A", 600, 6000.0, 5000.0, true), debt("B", 3, 90.0, 1.0, false)],
        );
        assert!(summary.horizon_reached);
    }

    #[test]
    fn test_scenario_labels() {
        assert_eq!(ScenarioType::from_label("optimized_plan"), Some(ScenarioType::OptimizedPlan));
        assert_eq!(ScenarioType::from_label("overview"), None);
        assert_eq!(
            serde_json::to_string(&ScenarioType::MinimumPayment).unwrap(),
            "\"minimum_payment\""
        );
    }
}
