use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FleetFinanceError;
use crate::records::{Company, DepreciationPolicy, Loan, Vehicle};
use crate::schedules::depreciation::depreciation_entry;
use crate::types::*;
use crate::FleetFinanceResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Portfolio-wide headline figures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_companies: usize,
    /// Every vehicle, whatever its status
    pub total_vehicles: usize,
    pub total_active_loans: usize,
    pub total_debt: Money,
    pub monthly_payments: Money,
    /// Depreciated book value across every vehicle
    pub total_asset_value: Money,
    /// `monthly_payments * 12`, with no allowance for loans maturing inside
    /// the year
    pub total_payments_year: Money,
}

pub fn dashboard_stats(
    companies: &[Company],
    vehicles: &[Vehicle],
    loans: &[Loan],
    policy: &DepreciationPolicy,
    as_of: DateTime<Utc>,
) -> FleetFinanceResult<DashboardStats> {
    let active: Vec<&Loan> = loans.iter().filter(|l| l.is_active()).collect();

    let total_debt = checked_total(active.iter().map(|l| l.remaining_balance), "total debt")?;
    let monthly_payments = checked_total(
        active.iter().map(|l| l.monthly_payment),
        "monthly payments",
    )?;

    let book_values = vehicles
        .iter()
        .map(|v| depreciation_entry(v, policy, as_of).map(|e| e.current_value))
        .collect::<FleetFinanceResult<Vec<Money>>>()?;
    let total_asset_value = checked_total(book_values, "total asset value")?;

    let total_payments_year = monthly_payments
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| FleetFinanceError::Overflow {
            context: "annualised payments".into(),
        })?;

    Ok(DashboardStats {
        total_companies: companies.len(),
        total_vehicles: vehicles.len(),
        total_active_loans: active.len(),
        total_debt: round_money(total_debt),
        monthly_payments: round_money(monthly_payments),
        total_asset_value: round_money(total_asset_value),
        total_payments_year: round_money(total_payments_year),
    })
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardInput {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub loans: Vec<Loan>,
    pub as_of: DateTime<Utc>,
    #[serde(default)]
    pub policy: DepreciationPolicy,
}

pub fn build_dashboard(
    input: &DashboardInput,
) -> FleetFinanceResult<ComputationOutput<DashboardStats>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // A tenant with no companies sees an empty dashboard.
    let stats = if input.companies.is_empty() {
        if !input.vehicles.is_empty() || !input.loans.is_empty() {
            warnings.push("No companies supplied; vehicles and loans were ignored".into());
        }
        DashboardStats::default()
    } else {
        dashboard_stats(
            &input.companies,
            &input.vehicles,
            &input.loans,
            &input.policy,
            input.as_of,
        )?
    };

    let maturing = input
        .loans
        .iter()
        .filter(|l| l.is_active())
        .filter(|l| {
            !l.monthly_payment.is_zero()
                && l
                    .monthly_payment
                    .checked_mul(MONTHS_PER_YEAR)
                    .map_or(true, |year| l.remaining_balance < year)
        })
        .count();
    if maturing > 0 && !input.companies.is_empty() {
        warnings.push(format!(
            "{maturing} loan(s) will be repaid within 12 months; total_payments_year overstates them"
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "debt": "active loans only",
        "asset_value": "straight-line book value over all vehicles",
        "annualisation": "monthly payments x 12",
        "as_of": input.as_of.to_rfc3339(),
    });

    Ok(with_metadata(
        "Fleet portfolio dashboard",
        &assumptions,
        warnings,
        elapsed,
        stats,
    ))
}
