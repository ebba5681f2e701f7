//! Stored record shapes and the loan lifecycle.
//!
//! These are the already-fetched, already-scoped records a storage layer
//! hands to the schedule builders. Identifiers are opaque strings; the core
//! never resolves them against a database.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine;
use crate::error::FleetFinanceError;
use crate::types::{Money, Percent};
use crate::FleetFinanceResult;

const MAX_ANNUAL_RATE: Decimal = dec!(100);
const MIN_MODEL_YEAR: i32 = 1900;
const MAX_MODEL_YEAR: i32 = 2030;

fn invalid(field: &str, reason: &str) -> FleetFinanceError {
    FleetFinanceError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Active,
    PaidOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Truck,
    Trailer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    #[default]
    Active,
    Inactive,
    Sold,
}

// ---------------------------------------------------------------------------
// Depreciation policy
// ---------------------------------------------------------------------------

/// Useful life, in whole years, per asset class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationPolicy {
    pub truck_years: u32,
    pub trailer_years: u32,
}

impl Default for DepreciationPolicy {
    fn default() -> Self {
        Self {
            truck_years: 10,
            trailer_years: 15,
        }
    }
}

impl DepreciationPolicy {
    pub fn useful_life(&self, vehicle_type: VehicleType) -> u32 {
        match vehicle_type {
            VehicleType::Truck => self.truck_years,
            VehicleType::Trailer => self.trailer_years,
        }
    }
}

// ---------------------------------------------------------------------------
// Company
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    /// Employer identification number
    pub ein: String,
    #[serde(default)]
    pub address: String,
}

impl Company {
    pub fn validate(&self) -> FleetFinanceResult<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("name", "Company name is required"));
        }
        if self.ein.trim().is_empty() {
            return Err(invalid("ein", "EIN is required"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Vehicle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub company_id: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub purchase_price: Money,
    pub purchase_date: DateTime<Utc>,
    #[serde(default)]
    pub status: VehicleStatus,
}

impl Vehicle {
    pub fn validate(&self) -> FleetFinanceResult<()> {
        if self.vin.trim().is_empty() {
            return Err(invalid("vin", "VIN is required"));
        }
        if self.make.trim().is_empty() {
            return Err(invalid("make", "Make is required"));
        }
        if self.model.trim().is_empty() {
            return Err(invalid("model", "Model is required"));
        }
        if !(MIN_MODEL_YEAR..=MAX_MODEL_YEAR).contains(&self.year) {
            return Err(invalid(
                "year",
                &format!("Model year must be between {MIN_MODEL_YEAR} and {MAX_MODEL_YEAR}"),
            ));
        }
        if self.purchase_price < Decimal::ZERO {
            return Err(invalid("purchase_price", "Purchase price must not be negative"));
        }
        Ok(())
    }

    /// "Make Model (Year)", as shown on depreciation reports.
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.make, self.model, self.year)
    }

    pub fn is_active(&self) -> bool {
        self.status == VehicleStatus::Active
    }
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

/// The static terms a loan is written on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal_amount: Money,
    /// Annual rate as a percentage
    pub interest_rate: Percent,
    pub term_months: u32,
    pub start_date: NaiveDate,
}

impl LoanTerms {
    pub fn validate(&self) -> FleetFinanceResult<()> {
        if self.principal_amount < Decimal::ZERO {
            return Err(invalid("principal_amount", "Principal must not be negative"));
        }
        if self.interest_rate < Decimal::ZERO || self.interest_rate > MAX_ANNUAL_RATE {
            return Err(invalid("interest_rate", "Interest rate must be between 0 and 100"));
        }
        if self.term_months == 0 {
            return Err(invalid("term_months", "Term must be at least 1 month"));
        }
        Ok(())
    }

    pub fn monthly_payment(&self) -> FleetFinanceResult<Money> {
        engine::monthly_payment(self.principal_amount, self.interest_rate, self.term_months)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub company_id: String,
    pub vehicle_id: String,
    pub lender: String,
    pub principal_amount: Money,
    /// Annual rate as a percentage
    pub interest_rate: Percent,
    pub term_months: u32,
    pub start_date: NaiveDate,
    pub monthly_payment: Money,
    pub remaining_balance: Money,
    #[serde(default)]
    pub status: LoanStatus,
}

impl Loan {
    /// Write a new loan: validates the terms, derives the level payment and
    /// opens the balance at the full principal.
    pub fn originate(
        id: impl Into<String>,
        company_id: impl Into<String>,
        vehicle_id: impl Into<String>,
        lender: impl Into<String>,
        terms: &LoanTerms,
    ) -> FleetFinanceResult<Self> {
        let lender = lender.into();
        if lender.trim().is_empty() {
            return Err(invalid("lender", "Lender is required"));
        }
        terms.validate()?;
        let monthly_payment = terms.monthly_payment()?;

        Ok(Self {
            id: id.into(),
            company_id: company_id.into(),
            vehicle_id: vehicle_id.into(),
            lender,
            principal_amount: terms.principal_amount,
            interest_rate: terms.interest_rate,
            term_months: terms.term_months,
            start_date: terms.start_date,
            monthly_payment,
            remaining_balance: terms.principal_amount,
            status: LoanStatus::Active,
        })
    }

    pub fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal_amount: self.principal_amount,
            interest_rate: self.interest_rate,
            term_months: self.term_months,
            start_date: self.start_date,
        }
    }

    /// Replace the terms and re-derive the level payment. The outstanding
    /// balance and status are left as they are.
    pub fn revise_terms(&mut self, terms: &LoanTerms) -> FleetFinanceResult<()> {
        terms.validate()?;
        let monthly_payment = terms.monthly_payment()?;

        self.principal_amount = terms.principal_amount;
        self.interest_rate = terms.interest_rate;
        self.term_months = terms.term_months;
        self.start_date = terms.start_date;
        self.monthly_payment = monthly_payment;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    /// Apply a payment against the current balance and return the payment
    /// record. The loan becomes paid off once its balance reaches zero, after
    /// which further payments are rejected.
    pub fn record_payment(
        &mut self,
        payment_id: impl Into<String>,
        total_paid: Money,
        payment_date: NaiveDate,
    ) -> FleetFinanceResult<Payment> {
        if total_paid <= Decimal::ZERO {
            return Err(invalid("total_paid", "Payment amount must be positive"));
        }
        if !self.is_active() || self.remaining_balance <= Decimal::ZERO {
            return Err(invalid("loan", "Loan is paid off; nothing is owed"));
        }

        let split = engine::apply_payment(self.remaining_balance, total_paid, self.interest_rate)?;
        debug!(
            loan_id = %self.id,
            principal = %split.principal_paid,
            interest = %split.interest_paid,
            balance = %split.new_balance,
            "payment applied"
        );

        self.remaining_balance = split.new_balance;
        if self.remaining_balance.is_zero() {
            info!(loan_id = %self.id, "loan paid off");
            self.status = LoanStatus::PaidOff;
        }

        Ok(Payment {
            id: payment_id.into(),
            loan_id: self.id.clone(),
            payment_date,
            principal_paid: split.principal_paid,
            interest_paid: split.interest_paid,
            total_paid,
            remaining_balance: split.new_balance,
        })
    }
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub loan_id: String,
    pub payment_date: NaiveDate,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub total_paid: Money,
    pub remaining_balance: Money,
}
