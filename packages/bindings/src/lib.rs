use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use fleet_finance_core::records::Loan;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_payment(input_json: String) -> NapiResult<String> {
    let input: fleet_finance_core::engine::LoanPaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fleet_finance_core::engine::calculate_loan_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ApplyPaymentRequest {
    balance: Decimal,
    total_paid: Decimal,
    interest_rate: Decimal,
}

#[napi]
pub fn apply_payment(input_json: String) -> NapiResult<String> {
    let req: ApplyPaymentRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let split =
        fleet_finance_core::engine::apply_payment(req.balance, req.total_paid, req.interest_rate)
            .map_err(to_napi_error)?;
    serde_json::to_string(&split).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct RecordPaymentRequest {
    loan: Loan,
    #[serde(default = "default_payment_id")]
    payment_id: String,
    total_paid: Decimal,
    payment_date: NaiveDate,
}

fn default_payment_id() -> String {
    "payment".into()
}

/// Returns `{ "payment": ..., "loan": ... }` with the loan's balance and
/// status updated.
#[napi]
pub fn record_payment(input_json: String) -> NapiResult<String> {
    let req: RecordPaymentRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let mut loan = req.loan;
    let payment = loan
        .record_payment(req.payment_id, req.total_paid, req.payment_date)
        .map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({ "payment": payment, "loan": loan }))
        .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: fleet_finance_core::schedules::amortization::AmortizationScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fleet_finance_core::schedules::amortization::build_amortization_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn debt_schedule(input_json: String) -> NapiResult<String> {
    let input: fleet_finance_core::schedules::debt::DebtScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fleet_finance_core::schedules::debt::build_debt_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn depreciation_schedule(input_json: String) -> NapiResult<String> {
    let input: fleet_finance_core::schedules::depreciation::DepreciationScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fleet_finance_core::schedules::depreciation::build_depreciation_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn dashboard_stats(input_json: String) -> NapiResult<String> {
    let input: fleet_finance_core::schedules::dashboard::DashboardInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fleet_finance_core::schedules::dashboard::build_dashboard(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
