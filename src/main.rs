//! Debt Restructuring CLI
//!
//! Command-line interface for inspecting the datasets and running repayment
//! scenarios for one customer or the whole book

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use debt_restructuring::config::{SimulationConfig, DEFAULT_DATA_PATH, DEFAULT_HORIZON_MONTHS};
use debt_restructuring::simulation::evaluate_offers;
use debt_restructuring::{
    build_customer_portfolio, list_customers, CustomerPortfolio, Dataset, ScenarioComparisonResult,
    ScenarioRunner, ScenarioType,
};

#[derive(Parser)]
#[command(name = "debt_restructuring")]
#[command(about = "Compare debt repayment scenarios for customers", long_about = None)]
struct Cli {
    /// Directory holding the CSV and JSON datasets
    #[arg(long, global = true, default_value = DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    /// Safety cap on simulated months
    #[arg(long, global = true, default_value_t = DEFAULT_HORIZON_MONTHS)]
    horizon_months: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how many records each dataset holds
    Datasets,

    /// List every customer with at least one debt
    Customers,

    /// Show the assembled portfolio of a customer
    Portfolio {
        customer_id: String,
    },

    /// Run the minimum-payment baseline
    Minimum {
        customer_id: String,
    },

    /// Run the avalanche plan with the whole available cashflow
    Optimized {
        customer_id: String,
    },

    /// Run the consolidation scenario
    Consolidation {
        customer_id: String,

        /// Also print why each offer was accepted or rejected
        #[arg(long)]
        explain: bool,
    },

    /// Compare all scenarios against the baseline
    Overview {
        customer_id: String,
    },

    /// Compare scenarios for every customer
    Batch {
        /// Write one row per customer and scenario to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Flat batch output row
#[derive(Debug, Serialize)]
struct BatchRow<'a> {
    customer_id: &'a str,
    scenario_type: &'static str,
    available: bool,
    total_months: u32,
    total_paid: f64,
    total_interest_paid: f64,
    interest_savings_vs_minimum: f64,
    months_saved_vs_minimum: i64,
    horizon_reached: bool,
    recommended: bool,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn portfolio_for(dataset: &Dataset, customer_id: &str) -> Result<CustomerPortfolio> {
    build_customer_portfolio(dataset, customer_id)
        .with_context(|| format!("Failed to build portfolio for {}", customer_id))
}

fn batch_rows(result: &ScenarioComparisonResult) -> Vec<BatchRow<'_>> {
    let recommended = result.recommended().map(|s| s.scenario_type);
    result
        .scenarios
        .iter()
        .map(|s| BatchRow {
            customer_id: &result.customer_id,
            scenario_type: s.scenario_type.as_str(),
            available: s.available,
            total_months: s.total_months,
            total_paid: s.total_paid,
            total_interest_paid: s.total_interest_paid,
            interest_savings_vs_minimum: s.interest_savings_vs_minimum,
            months_saved_vs_minimum: s.months_saved_vs_minimum,
            horizon_reached: s.horizon_reached,
            recommended: recommended == Some(s.scenario_type),
        })
        .collect()
}

fn run_batch(dataset: &Dataset, runner: &ScenarioRunner, output: Option<PathBuf>) -> Result<()> {
    let start = Instant::now();

    let mut portfolios = Vec::new();
    for customer_id in list_customers(dataset) {
        match build_customer_portfolio(dataset, &customer_id) {
            Ok(portfolio) => portfolios.push(portfolio),
            Err(e) => log::warn!("skipping {}: {}", customer_id, e),
        }
    }
    println!("Running scenarios for {} customers...", portfolios.len());

    let results = runner.compare_batch(&portfolios);
    println!("Completed in {:?}\n", start.elapsed());

    println!(
        "{:<12} {:<16} {:>7} {:>14} {:>14} {:>14} {:>8}",
        "Customer", "Scenario", "Months", "Total Paid", "Interest", "Int. Saved", "Mo. Saved"
    );
    println!("{}", "-".repeat(92));
    for result in &results {
        for row in batch_rows(result) {
            if !row.available {
                println!("{:<12} {:<16} {:>7}", row.customer_id, row.scenario_type, "n/a");
                continue;
            }
            println!(
                "{:<12} {:<16} {:>7} {:>14.2} {:>14.2} {:>14.2} {:>8}{}",
                row.customer_id,
                row.scenario_type,
                row.total_months,
                row.total_paid,
                row.total_interest_paid,
                row.interest_savings_vs_minimum,
                row.months_saved_vs_minimum,
                if row.recommended { "  *" } else { "" },
            );
        }
    }

    if let Some(path) = output {
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        for result in &results {
            for row in batch_rows(result) {
                writer.serialize(row)?;
            }
        }
        writer.flush()?;
        println!("\nResults written to: {}", path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dataset = Dataset::load_from(&cli.data_dir)
        .with_context(|| format!("Failed to load datasets from {}", cli.data_dir.display()))?;
    let config = SimulationConfig::default().with_horizon(cli.horizon_months);
    let runner = ScenarioRunner::with_config(config, dataset.bank_offers.clone());

    match cli.command {
        Commands::Datasets => {
            for (name, count) in dataset.row_counts() {
                println!("{:<22} {:>8}", name, count);
            }
        }
        Commands::Customers => {
            for customer_id in list_customers(&dataset) {
                println!("{}", customer_id);
            }
        }
        Commands::Portfolio { customer_id } => {
            let portfolio = portfolio_for(&dataset, &customer_id)?;
            print_json(&portfolio)?;
            println!("\nDebts: {}", portfolio.debt_count());
            println!("  Total Debt: ${:.2}", portfolio.total_debt());
            println!("  Available Cashflow: ${:.2}", portfolio.available_cashflow());
        }
        Commands::Minimum { customer_id } => {
            let portfolio = portfolio_for(&dataset, &customer_id)?;
            print_json(&runner.run(&portfolio, ScenarioType::MinimumPayment))?;
        }
        Commands::Optimized { customer_id } => {
            let portfolio = portfolio_for(&dataset, &customer_id)?;
            print_json(&runner.run(&portfolio, ScenarioType::OptimizedPlan))?;
        }
        Commands::Consolidation { customer_id, explain } => {
            let portfolio = portfolio_for(&dataset, &customer_id)?;
            if explain {
                print_json(&evaluate_offers(&portfolio, runner.offers()))?;
            }
            print_json(&runner.run(&portfolio, ScenarioType::Consolidation))?;
        }
        Commands::Overview { customer_id } => {
            let portfolio = portfolio_for(&dataset, &customer_id)?;
            print_json(&runner.compare(&portfolio))?;
        }
        Commands::Batch { output } => run_batch(&dataset, &runner, output)?,
    }

    Ok(())
}
