use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use fleet_finance_core::engine::{self, LoanPaymentInput};
use fleet_finance_core::records::Loan;

use crate::input;

/// Arguments for a level monthly payment quote
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PaymentArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a percentage (6 = 6%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "term-months")]
    pub term: Option<u32>,
}

/// Arguments for splitting a single payment
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ApplyPaymentArgs {
    /// Balance before the payment
    #[arg(long)]
    pub balance: Decimal,

    /// Amount paid
    #[arg(long)]
    pub total_paid: Decimal,

    /// Annual interest rate as a percentage
    #[arg(long)]
    pub rate: Decimal,
}

/// Arguments for recording a payment against a stored loan
#[derive(Args)]
pub struct RecordPaymentArgs {
    /// Path to the loan record (JSON/YAML); stdin when omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Amount paid
    #[arg(long)]
    pub amount: Decimal,

    /// Payment date (defaults to the --as-of date)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Identifier to give the payment record
    #[arg(long, default_value = "payment")]
    pub payment_id: String,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let quote: LoanPaymentInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if args.principal.is_some() || args.rate.is_some() || args.term.is_some() {
        LoanPaymentInput {
            principal: args.principal.ok_or("--principal is required (or provide --input)")?,
            interest_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--principal, --rate and --term are required (or provide --input)".into());
    };

    let result = engine::calculate_loan_payment(&quote)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_apply_payment(args: ApplyPaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let split = engine::apply_payment(args.balance, args.total_paid, args.rate)?;
    Ok(serde_json::to_value(split)?)
}

pub fn run_record_payment(
    args: RecordPaymentArgs,
    as_of: Option<DateTime<Utc>>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::load(args.input.as_deref(), "recording a payment")?;
    let mut loan: Loan = serde_json::from_value(data)?;
    let date = args
        .date
        .unwrap_or_else(|| as_of.unwrap_or_else(Utc::now).date_naive());

    let payment = loan.record_payment(args.payment_id, args.amount, date)?;
    tracing::info!(loan_id = %loan.id, status = ?loan.status, "payment recorded");

    Ok(json!({
        "payment": payment,
        "loan": loan,
    }))
}
