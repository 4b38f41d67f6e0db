//! Error types for schedule generation, registration, request intake and the contract
//! workflow.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::contract::ContractStatus;

/// Bad input to the schedule generator. No partial schedule is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidScheduleError {
    #[error("a schedule needs at least one installment")]
    NoInstallments,

    #[error("installment value must be positive, got {0}")]
    NonPositiveValue(Decimal),

    #[error("total to schedule must be positive, got {0}")]
    NonPositiveTotal(Decimal),

    #[error("{total} split over {count} installments leaves nothing per installment")]
    ValueTooSmall { total: Decimal, count: u32 },

    #[error("{from} advanced by {months} months is outside the supported calendar")]
    DateOutOfRange { from: NaiveDate, months: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallmentError {
    #[error("installment {0} is already paid")]
    AlreadyPaid(u32),

    #[error("payment amount must be positive, got {0}")]
    NonPositivePayment(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinancingError {
    #[error("invalid {field}: {reason}")]
    InvalidRequest {
        field: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("request was already processed, current status: {status}")]
    AlreadyProcessed { status: ContractStatus },

    #[error("requested vehicle value {requested} does not match the vehicle's {vehicle}")]
    VehicleValueMismatch { requested: Decimal, vehicle: Decimal },

    #[error("{0} is out of range")]
    AmountOverflow(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    #[error("CPF {0} is already registered")]
    DuplicateCpf(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VehicleError {
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinanceError {
    #[error(transparent)]
    Schedule(#[from] InvalidScheduleError),

    #[error(transparent)]
    Installment(#[from] InstallmentError),

    #[error(transparent)]
    Financing(#[from] FinancingError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Vehicle(#[from] VehicleError),
}

pub type Result<T> = std::result::Result<T, FinanceError>;
