//! Portfolio data structures matching the customer dataset format

use serde::{Deserialize, Serialize};

use super::offer::OfferRules;

/// Credit product family a debt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Personal installment loan
    Personal,
    /// Micro-business installment loan
    Micro,
    /// Revolving credit card
    Card,
}

impl ProductType {
    /// Parse the lowercase label used in datasets and offers
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "personal" => Some(ProductType::Personal),
            "micro" => Some(ProductType::Micro),
            "card" => Some(ProductType::Card),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Personal => "personal",
            ProductType::Micro => "micro",
            ProductType::Card => "card",
        }
    }
}

/// Whether an obligation amortizes on a schedule or revolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtKind {
    Loan,
    Card,
}

/// An installment loan held by the customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: String,
    pub customer_id: String,

    /// Either `Personal` or `Micro`
    pub product_type: ProductType,

    /// Outstanding principal
    pub principal: f64,

    /// Annual nominal rate, in percent (36.0 = 36%)
    pub annual_rate_pct: f64,

    /// Installments left on the contract; zero or less means due now
    pub remaining_term_months: i32,

    pub collateral: bool,
    pub days_past_due: u32,
}

/// A revolving card balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub card_id: String,
    pub customer_id: String,
    pub balance: f64,

    /// Annual nominal rate, in percent
    pub annual_rate_pct: f64,

    /// Statutory minimum payment as a percent of balance
    pub min_payment_pct: f64,

    /// Day of month the statement is due
    pub payment_due_day: u8,

    pub days_past_due: u32,
}

/// A historical payment event (loaded for reference only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub product_id: String,
    pub product_type: DebtKind,
    pub customer_id: String,
    pub date: chrono::NaiveDate,
    pub amount: f64,
}

/// A dated credit bureau score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditScoreRecord {
    pub customer_id: String,
    pub date: chrono::NaiveDate,
    pub credit_score: u32,
}

/// Monthly income and spending profile of a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCashflow {
    pub customer_id: String,
    pub monthly_income_avg: f64,
    pub income_variability_pct: f64,
    pub essential_expenses_avg: f64,

    /// Income left after essentials, never negative
    pub available_cashflow: f64,
}

impl CustomerCashflow {
    /// Build a cashflow record, deriving the available amount
    pub fn new(
        customer_id: impl Into<String>,
        monthly_income_avg: f64,
        income_variability_pct: f64,
        essential_expenses_avg: f64,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            monthly_income_avg,
            income_variability_pct,
            essential_expenses_avg,
            available_cashflow: (monthly_income_avg - essential_expenses_avg).max(0.0),
        }
    }
}

/// A refinancing offer that can absorb several debts into one loan
#[derive(Debug, Clone, Serialize)]
pub struct BankOffer {
    pub offer_id: String,

    /// Product families this offer is willing to absorb
    pub product_types_eligible: Vec<ProductType>,

    pub max_consolidated_balance: f64,

    /// Annual nominal rate of the new loan, in percent
    pub new_rate_pct: f64,

    pub max_term_months: i32,

    /// Free-text conditions as published
    pub conditions: String,

    /// Conditions compiled into structured gates
    #[serde(skip)]
    pub rules: OfferRules,
}

impl BankOffer {
    /// Create an offer, compiling its condition text into rules
    pub fn new(
        offer_id: impl Into<String>,
        product_types_eligible: Vec<ProductType>,
        max_consolidated_balance: f64,
        new_rate_pct: f64,
        max_term_months: i32,
        conditions: impl Into<String>,
    ) -> Self {
        let conditions = conditions.into();
        let rules = OfferRules::parse(&conditions);

        Self {
            offer_id: offer_id.into(),
            product_types_eligible,
            max_consolidated_balance,
            new_rate_pct,
            max_term_months,
            conditions,
            rules,
        }
    }

    /// Whether debts of this product family can be consolidated
    pub fn accepts(&self, product_type: ProductType) -> bool {
        self.product_types_eligible.contains(&product_type)
    }
}

/// Everything the simulators need to know about one customer
#[derive(Debug, Clone, Serialize)]
pub struct CustomerPortfolio {
    pub customer_id: String,

    /// Most recent bureau score, if any
    pub credit_score: Option<u32>,

    pub loans: Vec<Loan>,
    pub cards: Vec<Card>,
    pub cashflow: CustomerCashflow,
}

impl CustomerPortfolio {
    /// Number of debts of either kind
    pub fn debt_count(&self) -> usize {
        self.loans.len() + self.cards.len()
    }

    /// Sum of outstanding loan principal and card balances
    pub fn total_debt(&self) -> f64 {
        self.loans.iter().map(|l| l.principal).sum::<f64>()
            + self.cards.iter().map(|c| c.balance).sum::<f64>()
    }

    pub fn available_cashflow(&self) -> f64 {
        self.cashflow.available_cashflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_cashflow_floored_at_zero() {
        let cf = CustomerCashflow::new("C1", 1500.0, 10.0, 1800.0);
        assert_eq!(cf.available_cashflow, 0.0);

        let cf = CustomerCashflow::new("C1", 2500.0, 10.0, 1800.0);
        assert_eq!(cf.available_cashflow, 700.0);
    }

    #[test]
    fn test_product_labels() {
        assert_eq!(ProductType::from_label(" Card "), Some(ProductType::Card));
        assert_eq!(ProductType::from_label("micro"), Some(ProductType::Micro));
        assert_eq!(ProductType::from_label("mortgage"), None);
        assert_eq!(ProductType::Personal.as_str(), "personal");
    }
}
