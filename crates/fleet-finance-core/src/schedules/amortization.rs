use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::engine;
use crate::error::FleetFinanceError;
use crate::records::Loan;
use crate::types::*;
use crate::FleetFinanceResult;

/// One projected month of a loan's repayment schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub payment_number: u32,
    pub payment_date: NaiveDate,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub total_payment: Money,
    pub remaining_balance: Money,
}

/// Project the remaining repayment schedule of a loan.
///
/// Starts from the loan's current balance, not its original principal, and
/// stops as soon as the balance is cleared. The payment due in the final
/// month of the term settles whatever balance is left.
pub fn project_amortization(loan: &Loan) -> FleetFinanceResult<Vec<AmortizationEntry>> {
    if loan.term_months == 0 {
        return Err(FleetFinanceError::InvalidTerm {
            term_months: loan.term_months,
        });
    }

    let mut balance = loan.remaining_balance;
    let mut entries = Vec::with_capacity(loan.term_months as usize);

    for payment_number in 1..=loan.term_months {
        if balance <= Decimal::ZERO {
            break;
        }

        let interest = engine::interest_portion(balance, loan.interest_rate)?;
        let payoff = balance
            .checked_add(interest)
            .ok_or_else(|| FleetFinanceError::Overflow {
                context: format!("payoff of loan '{}'", loan.id),
            })?;
        let due = if payment_number == loan.term_months {
            payoff
        } else {
            loan.monthly_payment.min(payoff)
        };

        let split = engine::apply_payment(balance, due, loan.interest_rate)?;
        let payment_date = loan
            .start_date
            .checked_add_months(Months::new(payment_number - 1))
            .ok_or_else(|| {
                FleetFinanceError::DateError(format!(
                    "{} plus {} months is out of range",
                    loan.start_date,
                    payment_number - 1
                ))
            })?;

        entries.push(AmortizationEntry {
            payment_number,
            payment_date,
            principal_payment: split.principal_paid,
            interest_payment: split.interest_paid,
            total_payment: due,
            remaining_balance: split.new_balance,
        });
        balance = split.new_balance;
    }

    debug!(loan_id = %loan.id, periods = entries.len(), "amortization projected");
    Ok(entries)
}

/// Concatenate the schedules of every active loan, in input order.
/// `loan_id` narrows the projection to a single loan.
pub fn project_portfolio_amortization(
    loans: &[Loan],
    loan_id: Option<&str>,
) -> FleetFinanceResult<Vec<AmortizationEntry>> {
    let mut entries = Vec::new();
    for loan in loans
        .iter()
        .filter(|l| l.is_active())
        .filter(|l| loan_id.map_or(true, |id| l.id == id))
    {
        entries.extend(project_amortization(loan)?);
    }
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationScheduleInput {
    pub loans: Vec<Loan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
}

pub fn build_amortization_schedule(
    input: &AmortizationScheduleInput,
) -> FleetFinanceResult<ComputationOutput<Vec<AmortizationEntry>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let loan_id = input.loan_id.as_deref();

    if let Some(id) = loan_id {
        match input.loans.iter().find(|l| l.id == id) {
            None => warnings.push(format!("Loan '{id}' not found; schedule is empty")),
            Some(l) if !l.is_active() => {
                warnings.push(format!("Loan '{id}' is paid off; schedule is empty"))
            }
            Some(_) => {}
        }
    } else {
        let skipped = input.loans.iter().filter(|l| !l.is_active()).count();
        if skipped > 0 {
            warnings.push(format!("{skipped} paid-off loan(s) excluded"));
        }
    }

    for loan in input
        .loans
        .iter()
        .filter(|l| l.is_active())
        .filter(|l| loan_id.map_or(true, |id| l.id == id))
    {
        let interest = engine::interest_portion(loan.remaining_balance, loan.interest_rate)?;
        if loan.remaining_balance > Decimal::ZERO && loan.monthly_payment <= interest {
            warnings.push(format!(
                "Loan '{}': monthly payment {} does not cover first-month interest {}; \
                 balance is settled in the final month",
                loan.id, loan.monthly_payment, interest
            ));
        }
    }

    let entries = project_portfolio_amortization(&input.loans, loan_id)?;

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "start_balance": "current remaining balance",
        "payment_dates": "start date + (n - 1) months, clamped to month end",
        "final_period": "settles residual balance",
    });

    Ok(with_metadata(
        "Level-payment amortization projection",
        &assumptions,
        warnings,
        elapsed,
        entries,
    ))
}
