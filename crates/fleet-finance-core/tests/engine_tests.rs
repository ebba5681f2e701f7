use chrono::{NaiveDate, TimeZone, Utc};
use fleet_finance_core::engine::{self, LoanPaymentInput};
use fleet_finance_core::records::{Loan, LoanTerms};
use fleet_finance_core::schedules::amortization::project_amortization;
use fleet_finance_core::FleetFinanceError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn is_cents(v: Decimal) -> bool {
    v.round_dp(2) == v
}

fn originate(principal: Decimal, rate: Decimal, term: u32) -> Loan {
    let terms = LoanTerms {
        principal_amount: principal,
        interest_rate: rate,
        term_months: term,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    };
    Loan::originate("loan", "co", "veh", "Lender", &terms).unwrap()
}

// ===========================================================================
// Monthly payment
// ===========================================================================

#[test]
fn test_zero_rate_payment() {
    assert_eq!(engine::monthly_payment(dec!(1200), dec!(0), 12).unwrap(), dec!(100.00));
}

#[test]
fn test_end_to_end_payment() {
    // 24k over 24 months at 6%
    assert_eq!(engine::monthly_payment(dec!(24000), dec!(6), 24).unwrap(), dec!(1063.69));
}

#[test]
fn test_typical_truck_loan_payment() {
    // 150k over 60 months at 7.5%: r = 0.00625, 1.00625^60 = 1.45329
    let p = engine::monthly_payment(dec!(150000), dec!(7.5), 60).unwrap();
    assert_eq!(p, dec!(3005.69));
}

#[test]
fn test_invalid_term_is_reported_not_nan() {
    let err = engine::monthly_payment(dec!(1), dec!(0), 0).unwrap_err();
    assert!(matches!(err, FleetFinanceError::InvalidTerm { term_months: 0 }));
}

#[test]
fn test_payment_quote_envelope() {
    let out = engine::calculate_loan_payment(&LoanPaymentInput {
        principal: dec!(24000),
        interest_rate: dec!(6),
        term_months: 24,
    })
    .unwrap();
    assert_eq!(out.result.monthly_payment, dec!(1063.69));
    assert_eq!(out.result.total_paid, dec!(25528.56));
    assert_eq!(out.result.total_interest, dec!(1528.56));
    assert_eq!(out.result.monthly_rate, dec!(0.005));
}

// ===========================================================================
// Payment application
// ===========================================================================

#[test]
fn test_apply_payment_shortfall_clamp() {
    let split = engine::apply_payment(dec!(1000), dec!(5), dec!(12)).unwrap();
    assert_eq!(split.principal_paid, dec!(0));
    assert_eq!(split.interest_paid, dec!(5));
    assert_eq!(split.new_balance, dec!(1000));
}

#[test]
fn test_recorded_payments_walk_loan_to_payoff() {
    let mut loan = originate(dec!(5000), dec!(9), 6);
    let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let mut previous = loan.remaining_balance;

    for n in 0..12 {
        if !loan.is_active() {
            break;
        }
        let payment = loan.record_payment(format!("p{n}"), loan.monthly_payment, date).unwrap();
        assert!(payment.remaining_balance < previous);
        assert_eq!(payment.principal_paid + payment.interest_paid, payment.total_paid);
        previous = payment.remaining_balance;
    }
    assert!(!loan.is_active());
    assert_eq!(loan.remaining_balance, dec!(0));
}

// ===========================================================================
// Amortization properties over a grid of terms
// ===========================================================================

#[test]
fn test_schedule_properties_across_terms() {
    let principals = [dec!(1000), dec!(24000), dec!(123456.78)];
    let rates = [dec!(0), dec!(3.5), dec!(6), dec!(12), dec!(24.99)];
    let terms = [1u32, 12, 36, 60];

    for &p in &principals {
        for &r in &rates {
            for &t in &terms {
                let loan = originate(p, r, t);
                let entries = project_amortization(&loan).unwrap();
                let ctx = format!("P={p} R={r} T={t}");

                assert!(!entries.is_empty(), "{ctx}");
                assert!(entries.len() <= t as usize, "{ctx}");
                assert_eq!(entries.last().unwrap().remaining_balance, dec!(0), "{ctx}");

                for e in &entries {
                    assert!(e.remaining_balance >= Decimal::ZERO, "{ctx}");
                    assert!(is_cents(e.principal_payment), "{ctx}");
                    assert!(is_cents(e.interest_payment), "{ctx}");
                    assert!(is_cents(e.total_payment), "{ctx}");
                    assert!(is_cents(e.remaining_balance), "{ctx}");
                }

                let principal_repaid: Decimal = entries.iter().map(|e| e.principal_payment).sum();
                assert_eq!(principal_repaid, p, "{ctx}");

                // payment * T ~ principal + interest, up to rounding residue
                let paid: Decimal = entries.iter().map(|e| e.total_payment).sum();
                let level = loan.monthly_payment * Decimal::from(t);
                assert!((paid - level).abs() <= dec!(1.00), "{ctx}: {paid} vs {level}");
            }
        }
    }
}

#[test]
fn test_extreme_rate_still_settles_at_term() {
    let loan = originate(dec!(123456.78), dec!(100), 360);
    let entries = project_amortization(&loan).unwrap();
    assert!(entries.len() <= 360);
    assert_eq!(entries.last().unwrap().remaining_balance, dec!(0));
    assert!(entries.iter().all(|e| e.remaining_balance >= Decimal::ZERO));
}

// ===========================================================================
// Depreciation and age
// ===========================================================================

#[test]
fn test_depreciation_never_exceeds_price() {
    let price = dec!(87654.32);
    for life in [10u32, 15] {
        for tenth in 0..=400 {
            let age = Decimal::new(tenth, 1);
            let d = engine::straight_line_depreciation(price, life, age).unwrap();
            assert!(d >= Decimal::ZERO && d <= price);
            assert!(is_cents(d));
            if age >= Decimal::from(life) {
                assert_eq!(d, price);
            }
        }
    }
}

#[test]
fn test_asset_age_three_years_before() {
    let as_of = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
    let purchased = Utc.with_ymd_and_hms(2022, 3, 10, 12, 0, 0).unwrap();
    let age = engine::asset_age_years(purchased, as_of);
    assert!((age - dec!(3.00)).abs() <= dec!(0.01));
}
