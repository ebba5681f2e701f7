//! Loan and asset arithmetic.
//!
//! Level-payment (annuity) loan maths, the interest/principal split of a
//! single payment, and straight-line depreciation of fleet assets. Every
//! derived monetary value is rounded to the cent before it is returned, so
//! callers can chain these functions without accumulating sub-cent drift.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FleetFinanceError;
use crate::types::*;
use crate::FleetFinanceResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const DAYS_PER_YEAR: Decimal = dec!(365.25);
const SECONDS_PER_DAY: Decimal = dec!(86400);

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// Convert an annual percentage (6 = 6%) into the nominal monthly rate
/// (0.005). Not rounded.
pub fn monthly_rate(annual_rate: Percent) -> Decimal {
    annual_rate / dec!(100) / MONTHS_PER_YEAR
}

fn check_rate(annual_rate: Percent) -> FleetFinanceResult<()> {
    if annual_rate < Decimal::ZERO {
        return Err(FleetFinanceError::InvalidRate { rate: annual_rate });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Loan maths
// ---------------------------------------------------------------------------

/// Level monthly payment that amortises `principal` over `term_months`.
///
/// Zero-rate loans repay `principal / term_months` each month. Otherwise
/// `P * r * (1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate.
pub fn monthly_payment(
    principal: Money,
    annual_rate: Percent,
    term_months: u32,
) -> FleetFinanceResult<Money> {
    if term_months == 0 {
        return Err(FleetFinanceError::InvalidTerm { term_months });
    }
    check_rate(annual_rate)?;
    if principal < Decimal::ZERO {
        return Err(FleetFinanceError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must not be negative".into(),
        });
    }

    if annual_rate.is_zero() {
        return Ok(round_money(principal / Decimal::from(term_months)));
    }

    let rate = monthly_rate(annual_rate);
    let factor = (Decimal::ONE + rate)
        .checked_powu(u64::from(term_months))
        .ok_or_else(|| FleetFinanceError::Overflow {
            context: format!("compounding factor over {term_months} months"),
        })?;

    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        // Rate too small to register at 28 digits; behaves as zero-rate.
        return Ok(round_money(principal / Decimal::from(term_months)));
    }

    let payment = rate
        .checked_mul(factor)
        .and_then(|rf| principal.checked_mul(rf))
        .and_then(|numerator| numerator.checked_div(denominator))
        .ok_or_else(|| FleetFinanceError::Overflow {
            context: format!("monthly payment at {annual_rate}% over {term_months} months"),
        })?;

    Ok(round_money(payment))
}

/// Interest accrued for one month on `balance`, the balance before the
/// payment is applied.
pub fn interest_portion(balance: Money, annual_rate: Percent) -> FleetFinanceResult<Money> {
    check_rate(annual_rate)?;
    let interest = balance
        .checked_mul(monthly_rate(annual_rate))
        .ok_or_else(|| FleetFinanceError::Overflow {
            context: format!("interest on balance {balance}"),
        })?;
    Ok(round_money(interest))
}

/// Balance left after `principal_paid` is taken off. Never negative.
pub fn remaining_balance(balance: Money, principal_paid: Money) -> Money {
    round_money(balance.saturating_sub(principal_paid)).max(Decimal::ZERO)
}

/// How a single payment divides between interest and principal, and the
/// balance it leaves behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub new_balance: Money,
}

/// Apply a payment of `total_paid` against `balance`.
///
/// Interest is charged first. A payment that does not cover the accrued
/// interest is consumed entirely by interest and leaves the balance
/// unchanged.
pub fn apply_payment(
    balance: Money,
    total_paid: Money,
    annual_rate: Percent,
) -> FleetFinanceResult<PaymentSplit> {
    let mut interest_paid = interest_portion(balance, annual_rate)?;
    let mut principal_paid = total_paid
        .checked_sub(interest_paid)
        .ok_or_else(|| FleetFinanceError::Overflow {
            context: "principal portion of payment".into(),
        })?;

    if principal_paid < Decimal::ZERO {
        debug!(%balance, %total_paid, %interest_paid, "payment below accrued interest");
        principal_paid = Decimal::ZERO;
        interest_paid = total_paid;
    }

    Ok(PaymentSplit {
        principal_paid,
        interest_paid,
        new_balance: remaining_balance(balance, principal_paid),
    })
}

// ---------------------------------------------------------------------------
// Asset maths
// ---------------------------------------------------------------------------

/// Straight-line depreciation accumulated after `age_years`.
///
/// Capped at the purchase price; ages below zero depreciate nothing.
pub fn straight_line_depreciation(
    purchase_price: Money,
    useful_life_years: u32,
    age_years: Years,
) -> FleetFinanceResult<Money> {
    if useful_life_years == 0 {
        return Err(FleetFinanceError::InvalidUsefulLife {
            years: useful_life_years,
        });
    }
    if purchase_price < Decimal::ZERO {
        return Err(FleetFinanceError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must not be negative".into(),
        });
    }

    let life = Decimal::from(useful_life_years);
    if age_years >= life {
        return Ok(purchase_price);
    }

    // age < life keeps the product below the purchase price
    let total = purchase_price / life * age_years.max(Decimal::ZERO);
    Ok(round_money(total.min(purchase_price)))
}

/// Age in fractional years between `purchase_date` and `as_of`, using a
/// 365.25-day year. Negative when `purchase_date` is after `as_of`.
pub fn asset_age_years(purchase_date: DateTime<Utc>, as_of: DateTime<Utc>) -> Years {
    let seconds = Decimal::from((as_of - purchase_date).num_seconds());
    round_money(seconds / SECONDS_PER_DAY / DAYS_PER_YEAR)
}

// ---------------------------------------------------------------------------
// Loan payment quote
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPaymentInput {
    pub principal: Money,
    /// Annual rate as a percentage
    pub interest_rate: Percent,
    pub term_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPaymentOutput {
    pub monthly_payment: Money,
    /// Level payment times the term; the last projected payment may differ
    /// by rounding residue.
    pub total_paid: Money,
    pub total_interest: Money,
    pub monthly_rate: Decimal,
}

/// Quote the level payment for a set of loan terms.
pub fn calculate_loan_payment(
    input: &LoanPaymentInput,
) -> FleetFinanceResult<ComputationOutput<LoanPaymentOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let payment = monthly_payment(input.principal, input.interest_rate, input.term_months)?;
    let total_paid = payment
        .checked_mul(Decimal::from(input.term_months))
        .ok_or_else(|| FleetFinanceError::Overflow {
            context: format!("total paid over {} months", input.term_months),
        })?;
    let total_interest = (total_paid - input.principal).max(Decimal::ZERO);

    if input.interest_rate > dec!(100) {
        warnings.push(format!(
            "Interest rate {}% exceeds 100% p.a.; stored loans are limited to 0-100%",
            input.interest_rate
        ));
    }

    let output = LoanPaymentOutput {
        monthly_payment: payment,
        total_paid: round_money(total_paid),
        total_interest: round_money(total_interest),
        monthly_rate: monthly_rate(input.interest_rate),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "rate_basis": "annual percentage / 12",
        "rounding": "2dp, midpoint away from zero",
    });

    Ok(with_metadata(
        "Level-payment annuity",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_payment_known_answer() {
        // 24,000 at 6% over 24 months: r = 0.005, 1.005^24 = 1.12716
        let p = monthly_payment(dec!(24000), dec!(6), 24).unwrap();
        assert_eq!(p, dec!(1063.69));
    }

    #[test]
    fn test_monthly_payment_zero_rate() {
        assert_eq!(monthly_payment(dec!(1200), dec!(0), 12).unwrap(), dec!(100.00));
        // Rounded to the cent
        assert_eq!(monthly_payment(dec!(1000), dec!(0), 3).unwrap(), dec!(333.33));
    }

    #[test]
    fn test_monthly_payment_single_month() {
        // One month at 12%: principal plus one month of interest
        assert_eq!(monthly_payment(dec!(1000), dec!(12), 1).unwrap(), dec!(1010.00));
    }

    #[test]
    fn test_monthly_payment_zero_principal() {
        assert_eq!(monthly_payment(dec!(0), dec!(7.5), 60).unwrap(), dec!(0));
    }

    #[test]
    fn test_monthly_payment_zero_term_error() {
        let err = monthly_payment(dec!(1000), dec!(5), 0).unwrap_err();
        assert!(matches!(err, FleetFinanceError::InvalidTerm { term_months: 0 }));
    }

    #[test]
    fn test_monthly_payment_negative_rate_error() {
        let err = monthly_payment(dec!(1000), dec!(-1), 12).unwrap_err();
        assert!(matches!(err, FleetFinanceError::InvalidRate { .. }));
    }

    #[test]
    fn test_monthly_payment_negative_principal_error() {
        let err = monthly_payment(dec!(-1), dec!(5), 12).unwrap_err();
        assert!(matches!(err, FleetFinanceError::InvalidInput { .. }));
    }

    #[test]
    fn test_interest_portion() {
        assert_eq!(interest_portion(dec!(24000), dec!(6)).unwrap(), dec!(120.00));
        assert_eq!(interest_portion(dec!(1000), dec!(12)).unwrap(), dec!(10.00));
        // 1234.56 * 0.07 / 12 = 7.2016
        assert_eq!(interest_portion(dec!(1234.56), dec!(7)).unwrap(), dec!(7.20));
    }

    #[test]
    fn test_apply_payment_regular() {
        let split = apply_payment(dec!(24000), dec!(1063.69), dec!(6)).unwrap();
        assert_eq!(split.interest_paid, dec!(120.00));
        assert_eq!(split.principal_paid, dec!(943.69));
        assert_eq!(split.new_balance, dec!(23056.31));
    }

    #[test]
    fn test_apply_payment_below_interest_is_all_interest() {
        let split = apply_payment(dec!(1000), dec!(5), dec!(12)).unwrap();
        assert_eq!(split.principal_paid, dec!(0));
        assert_eq!(split.interest_paid, dec!(5));
        assert_eq!(split.new_balance, dec!(1000));
    }

    #[test]
    fn test_apply_payment_overpayment_clamps_balance() {
        let split = apply_payment(dec!(100), dec!(500), dec!(12)).unwrap();
        assert_eq!(split.interest_paid, dec!(1.00));
        assert_eq!(split.principal_paid, dec!(499.00));
        assert_eq!(split.new_balance, dec!(0));
    }

    #[test]
    fn test_remaining_balance_never_negative() {
        assert_eq!(remaining_balance(dec!(10), dec!(25)), dec!(0));
        assert_eq!(remaining_balance(dec!(10.555), dec!(0)), dec!(10.56));
    }

    #[test]
    fn test_depreciation_partial_life() {
        // 100k truck, 10-year life, 3 years old
        let d = straight_line_depreciation(dec!(100000), 10, dec!(3)).unwrap();
        assert_eq!(d, dec!(30000.00));
    }

    #[test]
    fn test_depreciation_caps_at_purchase_price() {
        for age in [dec!(15), dec!(15.01), dec!(40)] {
            let d = straight_line_depreciation(dec!(45000), 15, age).unwrap();
            assert_eq!(d, dec!(45000));
        }
    }

    #[test]
    fn test_depreciation_negative_age_is_zero() {
        let d = straight_line_depreciation(dec!(45000), 15, dec!(-0.5)).unwrap();
        assert_eq!(d, dec!(0));
    }

    #[test]
    fn test_depreciation_zero_life_error() {
        let err = straight_line_depreciation(dec!(1000), 0, dec!(1)).unwrap_err();
        assert!(matches!(err, FleetFinanceError::InvalidUsefulLife { years: 0 }));
    }

    #[test]
    fn test_asset_age_three_years() {
        let purchased = Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();
        let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let age = asset_age_years(purchased, as_of);
        assert!((age - dec!(3.00)).abs() <= dec!(0.01), "age was {age}");
    }

    #[test]
    fn test_asset_age_future_purchase_is_negative() {
        let purchased = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let as_of = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(asset_age_years(purchased, as_of) < Decimal::ZERO);
    }

    #[test]
    fn test_calculate_loan_payment_totals() {
        let input = LoanPaymentInput {
            principal: dec!(1200),
            interest_rate: dec!(0),
            term_months: 12,
        };
        let out = calculate_loan_payment(&input).unwrap();
        assert_eq!(out.result.monthly_payment, dec!(100.00));
        assert_eq!(out.result.total_paid, dec!(1200.00));
        assert_eq!(out.result.total_interest, dec!(0));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_extreme_rate_overflow_is_an_error() {
        // 1 + r = 9.33..., raised to 29 still fits; r * (1+r)^29 does not
        let err = monthly_payment(dec!(1), dec!(10000), 29).unwrap_err();
        assert!(matches!(err, FleetFinanceError::Overflow { .. }));

        let err = calculate_loan_payment(&LoanPaymentInput {
            principal: dec!(1),
            interest_rate: dec!(10000),
            term_months: 29,
        })
        .unwrap_err();
        assert!(matches!(err, FleetFinanceError::Overflow { .. }));
    }

    #[test]
    fn test_interest_on_huge_balance_overflows_cleanly() {
        let err = interest_portion(Decimal::MAX, dec!(2400)).unwrap_err();
        assert!(matches!(err, FleetFinanceError::Overflow { .. }));
        assert!(apply_payment(Decimal::MAX, dec!(1), dec!(2400)).is_err());
    }

    #[test]
    fn test_apply_payment_extreme_negative_amount_is_an_error() {
        let err = apply_payment(dec!(1000), Decimal::MIN, dec!(12)).unwrap_err();
        assert!(matches!(err, FleetFinanceError::Overflow { .. }));
    }

    #[test]
    fn test_depreciation_of_huge_price_past_life() {
        let price = Decimal::MAX;
        assert_eq!(straight_line_depreciation(price, 10, dec!(250000)).unwrap(), price);
        let half = straight_line_depreciation(dec!(1000000), 10, dec!(5)).unwrap();
        assert_eq!(half, dec!(500000.00));
    }
}
