use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::error::FleetFinanceError;
use crate::records::{Company, Loan, Vehicle};
use crate::types::*;
use crate::FleetFinanceResult;

/// Outstanding debt and fleet size for one company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtScheduleItem {
    pub company_name: String,
    /// Sum of remaining balances over active loans
    pub total_debt: Money,
    /// Sum of level payments over active loans
    pub monthly_payment: Money,
    /// Active vehicles only
    pub vehicles_count: usize,
}

#[derive(Default)]
struct CompanyTotals {
    debt: Money,
    monthly: Money,
    vehicles: usize,
}

fn overflow(company_id: &str, what: &str) -> FleetFinanceError {
    FleetFinanceError::Overflow {
        context: format!("{what} of company '{company_id}'"),
    }
}

/// Companies in input order with repeated ids dropped; the first record for
/// an id wins.
fn unique_companies(companies: &[Company]) -> Vec<&Company> {
    let mut seen = HashSet::new();
    companies
        .iter()
        .filter(|c| seen.insert(c.id.as_str()))
        .collect()
}

/// Roll up active debt and active vehicles per company, in the order the
/// companies are given, one row per company id. Paid-off loans contribute
/// to neither sum; records pointing at a company not in `companies` are
/// ignored.
pub fn debt_summary(
    companies: &[Company],
    loans: &[Loan],
    vehicles: &[Vehicle],
) -> FleetFinanceResult<Vec<DebtScheduleItem>> {
    let companies = unique_companies(companies);
    let mut totals: HashMap<&str, CompanyTotals> = companies
        .iter()
        .map(|c| (c.id.as_str(), CompanyTotals::default()))
        .collect();

    for loan in loans.iter().filter(|l| l.is_active()) {
        if let Some(t) = totals.get_mut(loan.company_id.as_str()) {
            t.debt = t
                .debt
                .checked_add(loan.remaining_balance)
                .ok_or_else(|| overflow(&loan.company_id, "total debt"))?;
            t.monthly = t
                .monthly
                .checked_add(loan.monthly_payment)
                .ok_or_else(|| overflow(&loan.company_id, "monthly payments"))?;
        }
    }

    for vehicle in vehicles.iter().filter(|v| v.is_active()) {
        if let Some(t) = totals.get_mut(vehicle.company_id.as_str()) {
            t.vehicles += 1;
        }
    }

    Ok(companies
        .iter()
        .map(|c| {
            let t = totals.get(c.id.as_str());
            DebtScheduleItem {
                company_name: c.name.clone(),
                total_debt: t.map_or(Decimal::ZERO, |t| round_money(t.debt)),
                monthly_payment: t.map_or(Decimal::ZERO, |t| round_money(t.monthly)),
                vehicles_count: t.map_or(0, |t| t.vehicles),
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtScheduleInput {
    pub companies: Vec<Company>,
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

pub fn build_debt_schedule(
    input: &DebtScheduleInput,
) -> FleetFinanceResult<ComputationOutput<Vec<DebtScheduleItem>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let orphaned = input
        .loans
        .iter()
        .filter(|l| !input.companies.iter().any(|c| c.id == l.company_id))
        .count();
    if orphaned > 0 {
        warnings.push(format!(
            "{orphaned} loan(s) reference companies outside this portfolio and were ignored"
        ));
    }

    let duplicates = input.companies.len() - unique_companies(&input.companies).len();
    if duplicates > 0 {
        warnings.push(format!(
            "{duplicates} repeated company record(s) dropped; the first record per id is reported"
        ));
    }

    let items = debt_summary(&input.companies, &input.loans, &input.vehicles)?;

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "loans": "active only",
        "vehicles": "active only",
    });

    Ok(with_metadata(
        "Debt summary by company",
        &assumptions,
        warnings,
        elapsed,
        items,
    ))
}
