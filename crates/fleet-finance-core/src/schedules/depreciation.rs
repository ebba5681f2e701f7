use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine;
use crate::records::{DepreciationPolicy, Vehicle};
use crate::types::*;
use crate::FleetFinanceResult;

/// Book value of one vehicle as of a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationEntry {
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub purchase_price: Money,
    pub current_value: Money,
    pub depreciation_amount: Money,
    pub age_years: Years,
}

pub fn depreciation_entry(
    vehicle: &Vehicle,
    policy: &DepreciationPolicy,
    as_of: DateTime<Utc>,
) -> FleetFinanceResult<DepreciationEntry> {
    let useful_life = policy.useful_life(vehicle.vehicle_type);
    let age_years = engine::asset_age_years(vehicle.purchase_date, as_of);
    let depreciation_amount =
        engine::straight_line_depreciation(vehicle.purchase_price, useful_life, age_years)?;
    let current_value = (vehicle.purchase_price - depreciation_amount).max(Decimal::ZERO);

    Ok(DepreciationEntry {
        vehicle_id: vehicle.id.clone(),
        vehicle_name: vehicle.display_name(),
        purchase_price: vehicle.purchase_price,
        current_value,
        depreciation_amount,
        age_years,
    })
}

/// Straight-line book values for every vehicle, in input order, regardless
/// of vehicle status.
pub fn depreciation_report(
    vehicles: &[Vehicle],
    policy: &DepreciationPolicy,
    as_of: DateTime<Utc>,
) -> FleetFinanceResult<Vec<DepreciationEntry>> {
    vehicles
        .iter()
        .map(|v| depreciation_entry(v, policy, as_of))
        .collect()
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationScheduleInput {
    pub vehicles: Vec<Vehicle>,
    pub as_of: DateTime<Utc>,
    /// Restrict the report to one company's vehicles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default)]
    pub policy: DepreciationPolicy,
}

pub fn build_depreciation_schedule(
    input: &DepreciationScheduleInput,
) -> FleetFinanceResult<ComputationOutput<Vec<DepreciationEntry>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let selected: Vec<Vehicle> = match input.company_id.as_deref() {
        Some(id) => input
            .vehicles
            .iter()
            .filter(|v| v.company_id == id)
            .cloned()
            .collect(),
        None => input.vehicles.clone(),
    };

    for v in selected.iter().filter(|v| v.purchase_date > input.as_of) {
        warnings.push(format!(
            "Vehicle '{}' purchase date {} is after the valuation date; no depreciation applied",
            v.id,
            v.purchase_date.date_naive()
        ));
    }

    let entries = depreciation_report(&selected, &input.policy, input.as_of)?;

    let fully = entries
        .iter()
        .filter(|e| e.current_value.is_zero() && !e.purchase_price.is_zero())
        .count();
    if fully > 0 {
        warnings.push(format!("{fully} vehicle(s) fully depreciated"));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "method": "straight-line, no salvage value",
        "truck_useful_life_years": input.policy.truck_years,
        "trailer_useful_life_years": input.policy.trailer_years,
        "year_length_days": "365.25",
        "as_of": input.as_of.to_rfc3339(),
    });

    Ok(with_metadata(
        "Straight-line depreciation",
        &assumptions,
        warnings,
        elapsed,
        entries,
    ))
}
