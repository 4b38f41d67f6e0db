use chrono::NaiveDate;
use log::{info, warn};
use rust_decimal::Decimal;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{ContractError, Result};
use crate::financing::{FinancingRequest, FinancingTerms};
use crate::installment::Installment;
use crate::vehicle::Vehicle;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ContractStatus {
    /// Financing request awaiting an admin decision.
    Pending,
    Active,
    Rejected,
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractStatus::Pending => "pending",
            ContractStatus::Active => "active",
            ContractStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contract {
    pub number: String,
    pub client_id: u64,
    pub issued_on: NaiveDate,
    pub vehicle: Vehicle,
    pub terms: FinancingTerms,
    installments: Vec<Installment>,
    status: ContractStatus,
    rejection_reason: Option<String>,
}

impl Contract {
    /// Opens a pending contract for `client` financing `vehicle` on `request`'s terms,
    /// with its full installment schedule. Nothing is built unless every part is valid.
    pub fn open(
        number: impl Into<String>,
        client: &Client,
        issued_on: NaiveDate,
        vehicle: Vehicle,
        request: &FinancingRequest,
        first_due_date: NaiveDate,
    ) -> Result<Self> {
        vehicle.validate()?;
        if request.vehicle_value != vehicle.value {
            return Err(ContractError::VehicleValueMismatch {
                requested: request.vehicle_value,
                vehicle: vehicle.value,
            }
            .into());
        }
        let terms = request.terms(first_due_date)?;
        let installments = terms.schedule()?;
        let client_id = client.id;
        let contract = Self {
            number: number.into(),
            client_id,
            issued_on,
            vehicle,
            terms,
            installments,
            status: ContractStatus::Pending,
            rejection_reason: None,
        };
        info!(
            "contract {} opened for client {} ({} {}): {} installments of {}",
            contract.number,
            client_id,
            contract.vehicle.brand,
            contract.vehicle.model,
            contract.installments.len(),
            contract.terms.installment_value
        );
        Ok(contract)
    }

    pub fn status(&self) -> ContractStatus {
        self.status
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn approve(&mut self) -> std::result::Result<(), ContractError> {
        self.ensure_pending()?;
        self.status = ContractStatus::Active;
        info!("contract {} approved", self.number);
        Ok(())
    }

    pub fn reject(&mut self, reason: Option<String>) -> std::result::Result<(), ContractError> {
        self.ensure_pending()?;
        info!(
            "contract {} rejected: {}",
            self.number,
            reason.as_deref().unwrap_or("no reason given")
        );
        self.status = ContractStatus::Rejected;
        self.rejection_reason = reason;
        Ok(())
    }

    fn ensure_pending(&self) -> std::result::Result<(), ContractError> {
        if self.status != ContractStatus::Pending {
            warn!(
                "contract {} already processed (status {})",
                self.number, self.status
            );
            return Err(ContractError::AlreadyProcessed {
                status: self.status,
            });
        }
        Ok(())
    }

    /// The schedule, ordered by installment number.
    pub fn installments(&self) -> &[Installment] {
        &self.installments
    }

    /// Due date of the last installment.
    pub fn term_end(&self) -> Option<NaiveDate> {
        self.installments.last().map(|inst| inst.due_date)
    }

    pub fn installment_mut(&mut self, number: u32) -> Option<&mut Installment> {
        self.installments
            .iter_mut()
            .find(|inst| inst.number == number)
    }

    pub fn overdue_installments(&self, as_of: NaiveDate) -> impl Iterator<Item = &Installment> {
        self.installments
            .iter()
            .filter(move |inst| inst.is_overdue(as_of))
    }
}

/// Figures for the admin dashboard.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PortfolioMetrics {
    pub pending_requests: usize,
    pub active_contracts: usize,
    /// Financed amount summed over active contracts.
    pub total_financed: Decimal,
    pub overdue_count: usize,
    pub overdue_value: Decimal,
}

impl PortfolioMetrics {
    /// Overdue figures only look at active contracts.
    pub fn collect(
        contracts: &[Contract],
        as_of: NaiveDate,
    ) -> std::result::Result<Self, ContractError> {
        let mut metrics = Self::default();
        for contract in contracts {
            match contract.status {
                ContractStatus::Pending => metrics.pending_requests += 1,
                ContractStatus::Rejected => {}
                ContractStatus::Active => {
                    metrics.active_contracts += 1;
                    metrics.total_financed = metrics
                        .total_financed
                        .checked_add(contract.terms.financed_amount)
                        .ok_or(ContractError::AmountOverflow("total financed"))?;
                    for inst in contract.overdue_installments(as_of) {
                        metrics.overdue_count += 1;
                        metrics.overdue_value = metrics
                            .overdue_value
                            .checked_add(inst.value)
                            .ok_or(ContractError::AmountOverflow("overdue value"))?;
                    }
                }
            }
        }
        Ok(metrics)
    }
}
