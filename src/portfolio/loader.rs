//! Load customer datasets from CSV and JSON files
//!
//! Expected layout of the data directory:
//! - `loans.csv`, `cards.csv`, `payments_history.csv`,
//!   `credit_score_history.csv`, `customer_cashflow.csv`
//! - `bank_offers.json` (array, single object, or JSON Lines)

use super::{
    BankOffer, Card, CreditScoreRecord, CustomerCashflow, DebtKind, Loan, PaymentRecord,
    ProductType,
};
use crate::error::DataError;
use chrono::NaiveDate;
use csv::Reader;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw CSV row matching loans.csv columns
#[derive(Debug, Deserialize)]
struct LoanRow {
    loan_id: String,
    customer_id: String,
    product_type: String,
    principal: f64,
    annual_rate_pct: f64,
    remaining_term_months: i32,
    collateral: String,
    days_past_due: u32,
}

impl LoanRow {
    fn to_loan(self) -> Result<Loan, DataError> {
        let product_type = match ProductType::from_label(&self.product_type) {
            Some(p @ (ProductType::Personal | ProductType::Micro)) => p,
            _ => {
                return Err(DataError::InvalidRecord {
                    dataset: "loans",
                    reason: format!("loan {} has unknown product_type '{}'", self.loan_id, self.product_type),
                })
            }
        };

        Ok(Loan {
            loan_id: self.loan_id,
            customer_id: self.customer_id,
            product_type,
            principal: self.principal,
            annual_rate_pct: self.annual_rate_pct,
            remaining_term_months: self.remaining_term_months,
            collateral: self.collateral.trim().eq_ignore_ascii_case("true"),
            days_past_due: self.days_past_due,
        })
    }
}

/// Raw CSV row matching payments_history.csv columns
#[derive(Debug, Deserialize)]
struct PaymentRow {
    product_id: String,
    product_type: DebtKind,
    customer_id: String,
    date: String,
    amount: f64,
}

/// Raw CSV row matching credit_score_history.csv columns
#[derive(Debug, Deserialize)]
struct CreditScoreRow {
    customer_id: String,
    date: String,
    credit_score: u32,
}

/// Raw CSV row matching customer_cashflow.csv columns
///
/// Any `available_cashflow` column in the file is ignored and re-derived.
#[derive(Debug, Deserialize)]
struct CashflowRow {
    customer_id: String,
    monthly_income_avg: f64,
    income_variability_pct: f64,
    essential_expenses_avg: f64,
}

/// Raw offer object from bank_offers.json
#[derive(Debug, Deserialize)]
struct OfferRow {
    offer_id: String,
    product_types_eligible: Vec<String>,
    max_consolidated_balance: f64,
    new_rate_pct: f64,
    max_term_months: i32,
    #[serde(default)]
    conditions: String,
}

impl OfferRow {
    fn to_offer(self) -> BankOffer {
        let mut eligible = Vec::with_capacity(self.product_types_eligible.len());
        for label in &self.product_types_eligible {
            match ProductType::from_label(label) {
                Some(p) => eligible.push(p),
                None => warn!("offer {}: ignoring unknown product type '{}'", self.offer_id, label),
            }
        }

        let offer = BankOffer::new(
            self.offer_id,
            eligible,
            self.max_consolidated_balance,
            self.new_rate_pct,
            self.max_term_months,
            self.conditions,
        );
        if offer.rules.has_unrecognized() {
            warn!(
                "offer {}: condition clauses not recognized, treated as no constraint: {:?}",
                offer.offer_id, offer.rules.unrecognized
            );
        }
        offer
    }
}

fn parse_date(dataset: &'static str, value: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| DataError::InvalidDate {
        dataset,
        value: value.to_string(),
    })
}

/// Deserialize every row of a CSV dataset, rejecting empty files
fn read_rows<T: DeserializeOwned, R: Read>(reader: R, dataset: &'static str) -> Result<Vec<T>, DataError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.deserialize() {
        let row: T = result.map_err(DataError::csv(dataset))?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DataError::EmptyDataset(dataset));
    }
    Ok(rows)
}

fn open(dir: &Path, file_name: &str) -> Result<File, DataError> {
    let path = dir.join(file_name);
    File::open(&path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Load loans from any reader
pub fn load_loans_from_reader<R: Read>(reader: R) -> Result<Vec<Loan>, DataError> {
    read_rows::<LoanRow, _>(reader, "loans")?
        .into_iter()
        .map(LoanRow::to_loan)
        .collect()
}

/// Load cards from any reader
pub fn load_cards_from_reader<R: Read>(reader: R) -> Result<Vec<Card>, DataError> {
    read_rows(reader, "cards")
}

/// Load payment history from any reader
pub fn load_payments_from_reader<R: Read>(reader: R) -> Result<Vec<PaymentRecord>, DataError> {
    read_rows::<PaymentRow, _>(reader, "payments_history")?
        .into_iter()
        .map(|row| {
            Ok(PaymentRecord {
                date: parse_date("payments_history", &row.date)?,
                product_id: row.product_id,
                product_type: row.product_type,
                customer_id: row.customer_id,
                amount: row.amount,
            })
        })
        .collect()
}

/// Load credit score history from any reader
pub fn load_credit_scores_from_reader<R: Read>(reader: R) -> Result<Vec<CreditScoreRecord>, DataError> {
    read_rows::<CreditScoreRow, _>(reader, "credit_score_history")?
        .into_iter()
        .map(|row| {
            Ok(CreditScoreRecord {
                date: parse_date("credit_score_history", &row.date)?,
                customer_id: row.customer_id,
                credit_score: row.credit_score,
            })
        })
        .collect()
}

/// Load customer cashflows from any reader
pub fn load_cashflows_from_reader<R: Read>(reader: R) -> Result<Vec<CustomerCashflow>, DataError> {
    Ok(read_rows::<CashflowRow, _>(reader, "customer_cashflow")?
        .into_iter()
        .map(|row| {
            CustomerCashflow::new(
                row.customer_id,
                row.monthly_income_avg,
                row.income_variability_pct,
                row.essential_expenses_avg,
            )
        })
        .collect())
}

/// Parse bank offers from JSON text
///
/// Accepts a JSON array of offers, a single offer object, or one offer per
/// line (JSON Lines).
pub fn parse_offers(text: &str) -> Result<Vec<BankOffer>, DataError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DataError::EmptyDataset("bank_offers"));
    }

    let rows: Vec<OfferRow> = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(serde_json::from_value::<OfferRow>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DataError::json("bank_offers"))?,
        Ok(value @ serde_json::Value::Object(_)) => {
            vec![serde_json::from_value(value).map_err(DataError::json("bank_offers"))?]
        }
        Ok(_) => {
            return Err(DataError::InvalidRecord {
                dataset: "bank_offers",
                reason: "expected an offer object or an array of offers".to_string(),
            })
        }
        Err(_) => text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str::<OfferRow>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DataError::json("bank_offers"))?,
    };

    if rows.is_empty() {
        return Err(DataError::EmptyDataset("bank_offers"));
    }
    Ok(rows.into_iter().map(OfferRow::to_offer).collect())
}

/// Load bank offers from any reader
pub fn load_offers_from_reader<R: Read>(mut reader: R) -> Result<Vec<BankOffer>, DataError> {
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(|source| DataError::Io {
        path: "bank_offers".to_string(),
        source,
    })?;
    parse_offers(&text)
}

/// All datasets the simulators draw from
#[derive(Debug, Clone)]
pub struct Dataset {
    pub loans: Vec<Loan>,
    pub cards: Vec<Card>,
    pub payments_history: Vec<PaymentRecord>,
    pub credit_score_history: Vec<CreditScoreRecord>,
    pub customer_cashflow: Vec<CustomerCashflow>,
    pub bank_offers: Vec<BankOffer>,
}

impl Dataset {
    /// Load every dataset from a directory
    pub fn load_from<P: AsRef<Path>>(dir: P) -> Result<Self, DataError> {
        let dir = dir.as_ref();

        let dataset = Self {
            loans: load_loans_from_reader(open(dir, "loans.csv")?)?,
            cards: load_cards_from_reader(open(dir, "cards.csv")?)?,
            payments_history: load_payments_from_reader(open(dir, "payments_history.csv")?)?,
            credit_score_history: load_credit_scores_from_reader(open(dir, "credit_score_history.csv")?)?,
            customer_cashflow: load_cashflows_from_reader(open(dir, "customer_cashflow.csv")?)?,
            bank_offers: load_offers_from_reader(open(dir, "bank_offers.json")?)?,
        };

        info!("loaded datasets from {}: {:?}", dir.display(), dataset.row_counts());
        Ok(dataset)
    }

    /// Load from the default data directory
    pub fn load_default() -> Result<Self, DataError> {
        Self::load_from(crate::config::DEFAULT_DATA_PATH)
    }

    /// Number of records per dataset, keyed by dataset name
    pub fn row_counts(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            ("loans", self.loans.len()),
            ("cards", self.cards.len()),
            ("payments_history", self.payments_history.len()),
            ("credit_score_history", self.credit_score_history.len()),
            ("customer_cashflow", self.customer_cashflow.len()),
            ("bank_offers", self.bank_offers.len()),
        ])
    }
}
