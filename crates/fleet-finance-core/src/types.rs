use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::FleetFinanceError;
use crate::FleetFinanceResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual interest rates as stored on loans: percentages (6 = 6% p.a.),
/// not decimal fractions.
pub type Percent = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Number of decimal places kept on every derived monetary value.
pub const MONEY_SCALE: u32 = 2;

/// Round to the cent, midpoint away from zero.
pub fn round_money(value: Decimal) -> Money {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum monetary values, reporting `Overflow` instead of panicking on
/// amounts read from untrusted records.
pub fn checked_total<I>(values: I, context: &str) -> FleetFinanceResult<Money>
where
    I: IntoIterator<Item = Money>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| FleetFinanceError::Overflow {
            context: context.to_string(),
        })
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit_2dp".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_money(dec!(2.004999)), dec!(2.00));
    }

    #[test]
    fn test_checked_total_reports_overflow() {
        assert_eq!(checked_total([dec!(1.10), dec!(2.20)], "sum").unwrap(), dec!(3.30));
        assert_eq!(checked_total(Vec::new(), "sum").unwrap(), Decimal::ZERO);

        let err = checked_total([Decimal::MAX, dec!(1)], "fleet debt").unwrap_err();
        assert!(matches!(err, FleetFinanceError::Overflow { ref context } if context == "fleet debt"));
    }

    #[test]
    fn test_with_metadata_envelope() {
        let out = with_metadata(
            "test",
            &serde_json::json!({ "k": "v" }),
            vec!["w".into()],
            7,
            dec!(1.23),
        );
        assert_eq!(out.result, dec!(1.23));
        assert_eq!(out.warnings, vec!["w".to_string()]);
        assert_eq!(out.metadata.computation_time_us, 7);
        assert_eq!(out.assumptions["k"], "v");
    }
}
