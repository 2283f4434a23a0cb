//! Resolve one customer's portfolio out of the loaded datasets

use super::{CreditScoreRecord, CustomerPortfolio, Dataset};
use crate::error::DataError;
use std::collections::BTreeSet;

/// Sorted ids of every customer holding at least one loan or card
pub fn list_customers(dataset: &Dataset) -> Vec<String> {
    dataset
        .loans
        .iter()
        .map(|l| l.customer_id.as_str())
        .chain(dataset.cards.iter().map(|c| c.customer_id.as_str()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Score from the most recent record for a customer
///
/// Records sharing the latest date resolve to the one listed last.
pub fn latest_credit_score(history: &[CreditScoreRecord], customer_id: &str) -> Option<u32> {
    history
        .iter()
        .filter(|r| r.customer_id == customer_id)
        .max_by_key(|r| r.date)
        .map(|r| r.credit_score)
}

/// Build the portfolio snapshot the simulators run against
pub fn build_customer_portfolio(dataset: &Dataset, customer_id: &str) -> Result<CustomerPortfolio, DataError> {
    let loans: Vec<_> = dataset
        .loans
        .iter()
        .filter(|l| l.customer_id == customer_id)
        .cloned()
        .collect();
    let cards: Vec<_> = dataset
        .cards
        .iter()
        .filter(|c| c.customer_id == customer_id)
        .cloned()
        .collect();

    if loans.is_empty() && cards.is_empty() {
        return Err(DataError::CustomerNotFound(customer_id.to_string()));
    }

    let cashflow = dataset
        .customer_cashflow
        .iter()
        .find(|cf| cf.customer_id == customer_id)
        .cloned()
        .ok_or_else(|| DataError::CashflowMissing(customer_id.to_string()))?;

    Ok(CustomerPortfolio {
        customer_id: customer_id.to_string(),
        credit_score: latest_credit_score(&dataset.credit_score_history, customer_id),
        loans,
        cards,
        cashflow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{Card, CustomerCashflow, Loan, ProductType};
    use chrono::NaiveDate;

    fn score(customer: &str, date: (i32, u32, u32), value: u32) -> CreditScoreRecord {
        CreditScoreRecord {
            customer_id: customer.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            credit_score: value,
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            loans: vec![Loan {
                loan_id: "L1".to_string(),
                customer_id: "C2".to_string(),
                product_type: ProductType::Personal,
                principal: 4000.0,
                annual_rate_pct: 20.0,
                remaining_term_months: 24,
                collateral: false,
                days_past_due: 0,
            }],
            cards: vec![
                Card {
                    card_id: "K1".to_string(),
                    customer_id: "C1".to_string(),
                    balance: 1000.0,
                    annual_rate_pct: 36.0,
                    min_payment_pct: 5.0,
                    payment_due_day: 10,
                    days_past_due: 0,
                },
                Card {
                    card_id: "K2".to_string(),
                    customer_id: "C3".to_string(),
                    balance: 300.0,
                    annual_rate_pct: 40.0,
                    min_payment_pct: 4.0,
                    payment_due_day: 5,
                    days_past_due: 12,
                },
            ],
            payments_history: Vec::new(),
            credit_score_history: vec![
                score("C1", (2024, 6, 1), 700),
                score("C1", (2023, 1, 1), 610),
                score("C1", (2024, 2, 1), 640),
            ],
            customer_cashflow: vec![
                CustomerCashflow::new("C1", 2000.0, 5.0, 1500.0),
                CustomerCashflow::new("C2", 1000.0, 5.0, 1200.0),
            ],
            bank_offers: Vec::new(),
        }
    }

    #[test]
    fn test_list_customers_sorted_union() {
        assert_eq!(list_customers(&dataset()), vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn test_latest_score_by_date_not_file_order() {
        let data = dataset();
        assert_eq!(latest_credit_score(&data.credit_score_history, "C1"), Some(700));
        assert_eq!(latest_credit_score(&data.credit_score_history, "C2"), None);
    }

    #[test]
    fn test_build_portfolio() {
        let portfolio = build_customer_portfolio(&dataset(), "C1").unwrap();
        assert_eq!(portfolio.cards.len(), 1);
        assert!(portfolio.loans.is_empty());
        assert_eq!(portfolio.credit_score, Some(700));
        assert_eq!(portfolio.available_cashflow(), 500.0);
        assert_eq!(portfolio.debt_count(), 1);
        assert_eq!(portfolio.total_debt(), 1000.0);

        let portfolio = build_customer_portfolio(&dataset(), "C2").unwrap();
        assert_eq!(portfolio.available_cashflow(), 0.0);
        assert_eq!(portfolio.credit_score, None);
    }

    #[test]
    fn test_unknown_customer_and_missing_cashflow() {
        assert!(matches!(
            build_customer_portfolio(&dataset(), "C9"),
            Err(DataError::CustomerNotFound(_))
        ));
        assert!(matches!(
            build_customer_portfolio(&dataset(), "C3"),
            Err(DataError::CashflowMissing(_))
        ));
    }
}
