//! Vehicle financing core: client registration, financing request intake, installment
//! schedules and the admin approval workflow for financed contracts.

pub mod client;
pub mod contract;
pub mod error;
pub mod financing;
pub mod installment;
pub mod schedule;
pub mod vehicle;

pub use client::{Address, Client, ClientRegistration, ClientRegistry};
pub use contract::{Contract, ContractStatus, PortfolioMetrics};
pub use error::{FinanceError, InvalidScheduleError, Result};
pub use financing::{FinancingRequest, FinancingTerms};
pub use installment::{Installment, InstallmentStatus};
pub use schedule::{generate_schedule, generate_schedule_for_total};
pub use vehicle::Vehicle;
