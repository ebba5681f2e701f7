use chrono::{DateTime, Utc};
use clap::Args;
use serde_json::Value;

use fleet_finance_core::records::DepreciationPolicy;
use fleet_finance_core::schedules::amortization::{self, AmortizationScheduleInput};
use fleet_finance_core::schedules::dashboard::{self, DashboardInput};
use fleet_finance_core::schedules::debt::{self, DebtScheduleInput};
use fleet_finance_core::schedules::depreciation::{self, DepreciationScheduleInput};

use crate::input;

/// Useful-life overrides shared by the depreciation-based reports
#[derive(Args)]
pub struct PolicyArgs {
    /// Useful life of trucks in years
    #[arg(long)]
    pub truck_life_years: Option<u32>,

    /// Useful life of trailers in years
    #[arg(long)]
    pub trailer_life_years: Option<u32>,
}

impl PolicyArgs {
    fn apply(&self, policy: &mut DepreciationPolicy) {
        if let Some(years) = self.truck_life_years {
            policy.truck_years = years;
        }
        if let Some(years) = self.trailer_life_years {
            policy.trailer_years = years;
        }
    }
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct AmortizationArgs {
    /// Path to a portfolio file (JSON/YAML); only `loans` is read
    #[arg(long)]
    pub input: Option<String>,

    /// Project a single loan
    #[arg(long)]
    pub loan_id: Option<String>,
}

/// Arguments for the per-company debt schedule
#[derive(Args)]
pub struct DebtScheduleArgs {
    /// Path to a portfolio file (JSON/YAML)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the depreciation schedule
#[derive(Args)]
pub struct DepreciationScheduleArgs {
    /// Path to a portfolio file (JSON/YAML); only `vehicles` is read
    #[arg(long)]
    pub input: Option<String>,

    /// Restrict to one company's vehicles
    #[arg(long)]
    pub company_id: Option<String>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Arguments for the dashboard rollup
#[derive(Args)]
pub struct DashboardArgs {
    /// Path to a portfolio file (JSON/YAML)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

pub fn run_amortization(args: AmortizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::load(args.input.as_deref(), "amortization schedules")?;
    let mut schedule_input: AmortizationScheduleInput = serde_json::from_value(data)?;
    if args.loan_id.is_some() {
        schedule_input.loan_id = args.loan_id;
    }

    let result = amortization::build_amortization_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_debt_schedule(args: DebtScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::load(args.input.as_deref(), "debt schedules")?;
    let schedule_input: DebtScheduleInput = serde_json::from_value(data)?;

    let result = debt::build_debt_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_depreciation_schedule(
    args: DepreciationScheduleArgs,
    as_of: Option<DateTime<Utc>>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::load(args.input.as_deref(), "depreciation schedules")?;
    let mut schedule_input: DepreciationScheduleInput =
        serde_json::from_value(input::with_as_of(data, as_of))?;
    if args.company_id.is_some() {
        schedule_input.company_id = args.company_id;
    }
    args.policy.apply(&mut schedule_input.policy);

    let result = depreciation::build_depreciation_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_dashboard(
    args: DashboardArgs,
    as_of: Option<DateTime<Utc>>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::load(args.input.as_deref(), "the dashboard")?;
    let mut dashboard_input: DashboardInput =
        serde_json::from_value(input::with_as_of(data, as_of))?;
    args.policy.apply(&mut dashboard_input.policy);

    let result = dashboard::build_dashboard(&dashboard_input)?;
    Ok(serde_json::to_value(result)?)
}
