use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use fleet_finance_core::engine;
use fleet_finance_core::records::{DepreciationPolicy, VehicleType};

use super::parse_instant;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AssetClass {
    Truck,
    Trailer,
}

impl From<AssetClass> for VehicleType {
    fn from(c: AssetClass) -> Self {
        match c {
            AssetClass::Truck => VehicleType::Truck,
            AssetClass::Trailer => VehicleType::Trailer,
        }
    }
}

/// Arguments for straight-line depreciation of a single asset
#[derive(Args)]
pub struct DepreciationArgs {
    /// Purchase price
    #[arg(long)]
    pub price: Decimal,

    /// Age in years
    #[arg(long)]
    pub age: Decimal,

    /// Asset class; selects the policy useful life
    #[arg(long, value_enum, default_value = "truck")]
    pub asset_class: AssetClass,

    /// Useful life in years (overrides --asset-class)
    #[arg(long)]
    pub useful_life: Option<u32>,
}

/// Arguments for asset age
#[derive(Args)]
pub struct AssetAgeArgs {
    /// Purchase date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_instant)]
    pub purchase_date: DateTime<Utc>,
}

pub fn run_depreciation(args: DepreciationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let useful_life = args
        .useful_life
        .unwrap_or_else(|| DepreciationPolicy::default().useful_life(args.asset_class.into()));

    let depreciation = engine::straight_line_depreciation(args.price, useful_life, args.age)?;
    let current_value = (args.price - depreciation).max(Decimal::ZERO);

    Ok(json!({
        "useful_life_years": useful_life,
        "depreciation_amount": depreciation,
        "current_value": current_value,
    }))
}

pub fn run_asset_age(
    args: AssetAgeArgs,
    as_of: Option<DateTime<Utc>>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = as_of.unwrap_or_else(Utc::now);
    let age = engine::asset_age_years(args.purchase_date, as_of);
    Ok(json!({
        "age_years": age,
        "as_of": as_of.to_rfc3339(),
    }))
}
