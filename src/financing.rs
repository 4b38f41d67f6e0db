//! Financing request intake: validation of what the client asked for and derivation
//! of the financed amount and installment value.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{FinancingError, InvalidScheduleError};
use crate::installment::Installment;
use crate::schedule::{self, MONEY_DP};

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FinancingRequest {
    pub vehicle_value: Decimal,
    pub down_payment: Decimal,
    pub installment_count: u32,
    /// Monthly interest rate in percent (`1.5` is 1.5% a month).
    pub monthly_rate: Decimal,
    pub monthly_income: Decimal,
}

impl FinancingRequest {
    pub fn validate(&self) -> Result<(), FinancingError> {
        if self.vehicle_value <= Decimal::ZERO {
            return Err(invalid("vehicle_value", "must be positive"));
        }
        if self.down_payment < Decimal::ZERO {
            return Err(invalid("down_payment", "must not be negative"));
        }
        if self.down_payment >= self.vehicle_value {
            return Err(invalid(
                "down_payment",
                format!(
                    "{} leaves nothing to finance on a {} vehicle",
                    self.down_payment, self.vehicle_value
                ),
            ));
        }
        if self.installment_count < 1 {
            return Err(invalid("installment_count", "must be at least 1"));
        }
        if self.monthly_rate < Decimal::ZERO {
            return Err(invalid("monthly_rate", "must not be negative"));
        }
        if self.monthly_income < Decimal::ZERO {
            return Err(invalid("monthly_income", "must not be negative"));
        }
        Ok(())
    }

    pub fn financed_amount(&self) -> Decimal {
        self.vehicle_value - self.down_payment
    }

    pub fn installment_value(&self) -> Result<Decimal, FinancingError> {
        self.validate()?;
        level_payment(
            self.financed_amount(),
            self.monthly_rate,
            self.installment_count,
        )
    }

    pub fn terms(&self, first_due_date: NaiveDate) -> Result<FinancingTerms, FinancingError> {
        let installment_value = self.installment_value()?;
        let financed_amount = self.financed_amount();
        let total_payable = if self.monthly_rate.is_zero() {
            financed_amount
        } else {
            installment_value
                .checked_mul(Decimal::from(self.installment_count))
                .ok_or_else(|| invalid("vehicle_value", "total payable is out of range"))?
        };
        let terms = FinancingTerms {
            financed_amount,
            down_payment: self.down_payment,
            monthly_rate: self.monthly_rate,
            installment_count: self.installment_count,
            installment_value,
            first_due_date,
            total_payable,
        };
        debug!(
            "financing {} in {} x {} from {}",
            terms.financed_amount, terms.installment_count, installment_value, first_due_date
        );
        Ok(terms)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FinancingTerms {
    pub financed_amount: Decimal,
    pub down_payment: Decimal,
    pub monthly_rate: Decimal,
    pub installment_count: u32,
    pub installment_value: Decimal,
    pub first_due_date: NaiveDate,
    total_payable: Decimal,
}

impl FinancingTerms {
    pub fn is_interest_free(&self) -> bool {
        self.monthly_rate.is_zero()
    }

    /// Interest-free terms split the financed amount exactly; otherwise every
    /// installment carries the level payment.
    pub fn schedule(&self) -> Result<Vec<Installment>, InvalidScheduleError> {
        if self.is_interest_free() {
            schedule::generate_schedule_for_total(
                self.first_due_date,
                self.financed_amount,
                self.installment_count,
            )
        } else {
            schedule::generate_schedule(
                self.first_due_date,
                self.installment_value,
                self.installment_count,
            )
        }
    }

    /// What the client pays over the life of the contract, down payment excluded.
    pub fn total_payable(&self) -> Decimal {
        self.total_payable
    }

    pub fn total_interest(&self) -> Decimal {
        self.total_payable() - self.financed_amount
    }
}

/// Level payment that amortises `principal` over `count` months at `monthly_rate`
/// percent: `P * r * (1 + r)^n / ((1 + r)^n - 1)`, rounded to cents.
///
/// A zero rate splits the principal evenly, cut down to cents.
pub fn level_payment(
    principal: Decimal,
    monthly_rate: Decimal,
    count: u32,
) -> Result<Decimal, FinancingError> {
    if count < 1 {
        return Err(invalid("installment_count", "must be at least 1"));
    }
    if monthly_rate.is_zero() {
        return Ok(schedule::split_evenly(principal, count));
    }

    let rate = monthly_rate / dec!(100);
    let factor = (Decimal::ONE + rate)
        .checked_powu(u64::from(count))
        .ok_or_else(|| invalid("monthly_rate", "too large for the installment count"))?;
    if factor == Decimal::ONE {
        return Err(invalid(
            "monthly_rate",
            format!("{} is below decimal precision, use 0 for interest-free", monthly_rate),
        ));
    }
    let pmt = principal
        .checked_mul(rate)
        .and_then(|amt| amt.checked_mul(factor))
        .and_then(|amt| amt.checked_div(factor - Decimal::ONE))
        .ok_or_else(|| invalid("vehicle_value", "installment value is out of range"))?;

    Ok(pmt.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero))
}

fn invalid(field: &'static str, reason: impl Into<String>) -> FinancingError {
    FinancingError::InvalidRequest {
        field,
        reason: reason.into(),
    }
}
