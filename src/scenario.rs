//! Scenario runner and comparator
//!
//! Holds the offer book and settings once, then runs the three strategies for
//! any number of customers and expresses each against the minimum-payment
//! baseline.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::portfolio::{BankOffer, CustomerPortfolio, Dataset};
use crate::simulation::{
    simulate_consolidation, simulate_minimum_payment, simulate_optimized_plan, ScenarioSummary,
    ScenarioType,
};

/// One scenario's totals and its savings against the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSavings {
    pub scenario_type: ScenarioType,
    pub total_months: u32,
    pub total_paid: f64,
    pub total_interest_paid: f64,
    pub interest_savings_vs_minimum: f64,
    pub months_saved_vs_minimum: i64,

    /// False when the strategy produced nothing (no budget, no viable offer)
    pub available: bool,
    pub horizon_reached: bool,
}

/// All three scenarios for one customer, relative to the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparisonResult {
    pub customer_id: String,
    pub baseline_type: ScenarioType,
    pub baseline_total_months: u32,
    pub baseline_total_interest_paid: f64,
    pub scenarios: Vec<ScenarioSavings>,
}

impl ScenarioComparisonResult {
    pub fn scenario(&self, scenario_type: ScenarioType) -> Option<&ScenarioSavings> {
        self.scenarios.iter().find(|s| s.scenario_type == scenario_type)
    }

    /// Best alternative to the baseline
    ///
    /// Greatest interest savings first, then most months saved; the earlier
    /// scenario wins a full tie. Scenarios that produced nothing are skipped.
    pub fn recommended(&self) -> Option<&ScenarioSavings> {
        let mut best: Option<&ScenarioSavings> = None;
        for candidate in self
            .scenarios
            .iter()
            .filter(|s| s.scenario_type != self.baseline_type && s.available)
        {
            best = match best {
                Some(current)
                    if candidate.interest_savings_vs_minimum < current.interest_savings_vs_minimum
                        || (candidate.interest_savings_vs_minimum == current.interest_savings_vs_minimum
                            && candidate.months_saved_vs_minimum <= current.months_saved_vs_minimum) =>
                {
                    Some(current)
                }
                _ => Some(candidate),
            };
        }
        best
    }
}

/// Express each scenario against the minimum-payment baseline
///
/// The baseline itself, and any scenario that produced nothing, save exactly
/// zero.
pub fn compare_scenarios(baseline: &ScenarioSummary, alternatives: &[&ScenarioSummary]) -> ScenarioComparisonResult {
    let savings = |scenario: &ScenarioSummary| {
        let is_reference = scenario.scenario_type == baseline.scenario_type;
        let available = is_reference || !scenario.is_empty();
        let (interest_savings, months_saved) = if is_reference || !available {
            (0.0, 0)
        } else {
            (
                baseline.total_interest_paid - scenario.total_interest_paid,
                baseline.total_months as i64 - scenario.total_months as i64,
            )
        };

        ScenarioSavings {
            scenario_type: scenario.scenario_type,
            total_months: scenario.total_months,
            total_paid: scenario.total_paid,
            total_interest_paid: scenario.total_interest_paid,
            interest_savings_vs_minimum: interest_savings,
            months_saved_vs_minimum: months_saved,
            available,
            horizon_reached: scenario.horizon_reached,
        }
    };

    let mut scenarios = Vec::with_capacity(alternatives.len() + 1);
    scenarios.push(savings(baseline));
    scenarios.extend(alternatives.iter().map(|s| savings(*s)));

    ScenarioComparisonResult {
        customer_id: baseline.customer_id.clone(),
        baseline_type: baseline.scenario_type,
        baseline_total_months: baseline.total_months,
        baseline_total_interest_paid: baseline.total_interest_paid,
        scenarios,
    }
}

/// Pre-loaded scenario runner for efficient batch simulations
///
/// # Example
/// ```ignore
/// let dataset = Dataset::load_default()?;
/// let runner = ScenarioRunner::from_dataset(&dataset);
///
/// let portfolio = build_customer_portfolio(&dataset, "CU-001")?;
/// let overview = runner.compare(&portfolio);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    config: SimulationConfig,
    offers: Vec<BankOffer>,
}

impl ScenarioRunner {
    /// Create runner with default settings
    pub fn new(offers: Vec<BankOffer>) -> Self {
        Self::with_config(SimulationConfig::default(), offers)
    }

    pub fn with_config(config: SimulationConfig, offers: Vec<BankOffer>) -> Self {
        Self { config, offers }
    }

    /// Create runner using the offer book of a loaded dataset
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::new(dataset.bank_offers.clone())
    }

    /// Run a single scenario
    pub fn run(&self, portfolio: &CustomerPortfolio, scenario_type: ScenarioType) -> ScenarioSummary {
        match scenario_type {
            ScenarioType::MinimumPayment => simulate_minimum_payment(portfolio, &self.config),
            ScenarioType::OptimizedPlan => simulate_optimized_plan(portfolio, &self.config),
            ScenarioType::Consolidation => simulate_consolidation(portfolio, &self.offers),
        }
    }

    /// Run all three scenarios concurrently
    ///
    /// Returned in baseline, optimized, consolidation order.
    pub fn run_all(&self, portfolio: &CustomerPortfolio) -> [ScenarioSummary; 3] {
        let (minimum, (optimized, consolidation)) = rayon::join(
            || self.run(portfolio, ScenarioType::MinimumPayment),
            || {
                rayon::join(
                    || self.run(portfolio, ScenarioType::OptimizedPlan),
                    || self.run(portfolio, ScenarioType::Consolidation),
                )
            },
        );
        [minimum, optimized, consolidation]
    }

    /// Run all scenarios and compare them against the baseline
    pub fn compare(&self, portfolio: &CustomerPortfolio) -> ScenarioComparisonResult {
        let [minimum, optimized, consolidation] = self.run_all(portfolio);
        compare_scenarios(&minimum, &[&optimized, &consolidation])
    }

    /// Compare scenarios for many customers in parallel
    pub fn compare_batch(&self, portfolios: &[CustomerPortfolio]) -> Vec<ScenarioComparisonResult> {
        portfolios.par_iter().map(|p| self.compare(p)).collect()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn offers(&self) -> &[BankOffer] {
        &self.offers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{Card, CustomerCashflow, Loan, ProductType};
    use approx::assert_abs_diff_eq;

    fn portfolio(customer_id: &str, income: f64) -> CustomerPortfolio {
        CustomerPortfolio {
            customer_id: customer_id.to_string(),
            credit_score: Some(720),
            loans: vec![Loan {
                loan_id: format!("{}-L1", customer_id),
                customer_id: customer_id.to_string(),
                product_type: ProductType::Personal,
                principal: 6000.0,
                annual_rate_pct: 26.0,
                remaining_term_months: 36,
                collateral: false,
                days_past_due: 0,
            }],
            cards: vec![Card {
                card_id: format!("{}-K1", customer_id),
                customer_id: customer_id.to_string(),
                balance: 2500.0,
                annual_rate_pct: 52.0,
                min_payment_pct: 5.0,
                payment_due_day: 10,
                days_past_due: 0,
            }],
            cashflow: CustomerCashflow::new(customer_id, income, 6.0, 1800.0),
        }
    }

    fn offers() -> Vec<BankOffer> {
        vec![BankOffer::new(
            "CONSOL-24",
            vec![ProductType::Personal, ProductType::Card],
            20_000.0,
            15.0,
            36,
            "Score > 650, no mora > 30",
        )]
    }

    #[test]
    fn test_baseline_saves_exactly_zero() {
        let runner = ScenarioRunner::new(offers());
        let result = runner.compare(&portfolio("C1", 2700.0));

        let baseline = result.scenario(ScenarioType::MinimumPayment).unwrap();
        assert_eq!(baseline.interest_savings_vs_minimum, 0.0);
        assert_eq!(baseline.months_saved_vs_minimum, 0);
        assert_eq!(result.baseline_type, ScenarioType::MinimumPayment);
        assert_eq!(result.scenarios.len(), 3);
    }

    #[test]
    fn test_savings_are_differences_from_baseline() {
        let runner = ScenarioRunner::new(offers());
        let p = portfolio("C1", 2700.0);
        let [minimum, optimized, _] = runner.run_all(&p);
        let result = runner.compare(&p);

        let opt = result.scenario(ScenarioType::OptimizedPlan).unwrap();
        assert!(opt.available);
        assert_abs_diff_eq!(
            opt.interest_savings_vs_minimum,
            minimum.total_interest_paid - optimized.total_interest_paid,
            epsilon = 1e-9
        );
        assert_eq!(
            opt.months_saved_vs_minimum,
            minimum.total_months as i64 - optimized.total_months as i64
        );
        assert!(opt.interest_savings_vs_minimum > 0.0);
    }

    #[test]
    fn test_empty_scenarios_report_zero_savings() {
        // No offers and no spare cash: both alternatives are empty
        let runner = ScenarioRunner::new(Vec::new());
        let result = runner.compare(&portfolio("C1", 1800.0));

        for savings in result.scenarios.iter().skip(1) {
            assert!(!savings.available);
            assert_eq!(savings.interest_savings_vs_minimum, 0.0);
            assert_eq!(savings.months_saved_vs_minimum, 0);
        }
        assert!(result.recommended().is_none());
    }

    #[test]
    fn test_recommendation_prefers_interest_then_months() {
        let baseline = ScenarioSummary::empty("C1", ScenarioType::MinimumPayment);
        let mut result = compare_scenarios(&baseline, &[]);
        let entry = |scenario_type, interest, months| ScenarioSavings {
            scenario_type,
            total_months: 0,
            total_paid: 0.0,
            total_interest_paid: 0.0,
            interest_savings_vs_minimum: interest,
            months_saved_vs_minimum: months,
            available: true,
            horizon_reached: false,
        };

        result.scenarios.push(entry(ScenarioType::OptimizedPlan, 500.0, 10));
        result.scenarios.push(entry(ScenarioType::Consolidation, 500.0, 14));
        assert_eq!(result.recommended().unwrap().scenario_type, ScenarioType::Consolidation);

        result.scenarios[2].interest_savings_vs_minimum = 499.0;
        assert_eq!(result.recommended().unwrap().scenario_type, ScenarioType::OptimizedPlan);

        result.scenarios[2].interest_savings_vs_minimum = 500.0;
        result.scenarios[2].months_saved_vs_minimum = 10;
        assert_eq!(result.recommended().unwrap().scenario_type, ScenarioType::OptimizedPlan);
    }

    #[test]
    fn test_runner_horizon_applies_to_simulations() {
        let config = SimulationConfig::default().with_horizon(3);
        let runner = ScenarioRunner::with_config(config, offers());
        assert_eq!(runner.config().horizon_months, 3);
        assert_eq!(runner.offers().len(), 1);

        let summary = runner.run(&portfolio("C1", 2700.0), ScenarioType::MinimumPayment);
        let card = summary.debts.iter().find(|d| d.product_id == "C1-K1").unwrap();
        assert!(card.horizon_reached);
        assert_eq!(card.months_to_payoff, 3);
    }

    #[test]
    fn test_consolidation_runs_with_offer_book() {
        let runner = ScenarioRunner::new(offers());
        let summary = runner.run(&portfolio("C1", 2700.0), ScenarioType::Consolidation);
        assert_eq!(summary.debts.len(), 1);
        assert_eq!(summary.debts[0].product_id, "CONSOL-24");
        assert_eq!(summary.total_months, 36);
    }

    #[test]
    fn test_batch_keeps_customer_order() {
        let runner = ScenarioRunner::new(offers());
        let portfolios: Vec<_> = ["C1", "C2", "C3"]
            .iter()
            .map(|id| portfolio(id, 2700.0))
            .collect();

        let results = runner.compare_batch(&portfolios);
        let ids: Vec<_> = results.iter().map(|r| r.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2", "C3"]);
        assert_eq!(results[0], runner.compare(&portfolios[0]));
    }

    #[test]
    fn test_sample_dataset_overview() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let dataset = Dataset::load_from(dir).unwrap();
        let runner = ScenarioRunner::from_dataset(&dataset);

        let portfolios: Vec<_> = crate::portfolio::list_customers(&dataset)
            .iter()
            .map(|id| crate::portfolio::build_customer_portfolio(&dataset, id).unwrap())
            .collect();
        let results = runner.compare_batch(&portfolios);
        assert_eq!(results.len(), portfolios.len());

        for result in &results {
            assert_eq!(result.scenarios.len(), 3);
            assert_eq!(result.scenarios[0].interest_savings_vs_minimum, 0.0);
        }

        // Spends more than it earns: nothing beyond the baseline
        let stretched = results.iter().find(|r| r.customer_id == "CU-006").unwrap();
        assert!(stretched.recommended().is_none());
    }
}
