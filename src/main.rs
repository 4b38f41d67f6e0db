use chrono::NaiveDate;
use log::info;
use rust_decimal_macros::dec;
use simple_logger::SimpleLogger;
use std::error::Error;
use vehicle_finance::{
    Address, ClientRegistration, ClientRegistry, Contract, FinancingRequest, PortfolioMetrics,
    Vehicle,
};

fn main() -> Result<(), Box<dyn Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let issued_on = NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("invalid issue date")?;
    let first_due = NaiveDate::from_ymd_opt(2024, 1, 31).ok_or("invalid first due date")?;

    let mut registry = ClientRegistry::new();
    let client = registry.register(
        &ClientRegistration {
            name: "Maria Souza".to_string(),
            cpf: "123.456.789-01".to_string(),
            email: "maria@example.com".to_string(),
            phone: "(11) 99999-9999".to_string(),
            monthly_income: dec!(5000),
            address: Address {
                street: "Rua das Flores".to_string(),
                number: "123".to_string(),
                district: "Centro".to_string(),
                city: "Sao Paulo".to_string(),
                state: "SP".to_string(),
                postal_code: "01234-567".to_string(),
            },
        },
        issued_on,
    )?;

    let vehicle = Vehicle {
        brand: "Fiat".to_string(),
        model: "Uno".to_string(),
        manufacture_year: 2023,
        model_year: 2024,
        color: "Branco".to_string(),
        plate: "ABC1D23".to_string(),
        chassis: "9BWZZZ377VT004251".to_string(),
        renavam: "12345678901".to_string(),
        value: dec!(50000),
    };
    let request = FinancingRequest {
        vehicle_value: vehicle.value,
        down_payment: dec!(10000),
        installment_count: 36,
        monthly_rate: dec!(1.5),
        monthly_income: client.monthly_income,
    };

    let mut contract =
        Contract::open("CTR-2024-0001", client, issued_on, vehicle, &request, first_due)?;
    contract.approve()?;

    for inst in contract.installments() {
        info!("{}", inst);
    }
    info!(
        "total payable {}, interest {}, term ends {:?}",
        contract.terms.total_payable(),
        contract.terms.total_interest(),
        contract.term_end()
    );
    info!("{:?}", PortfolioMetrics::collect(&[contract], issued_on)?);

    Ok(())
}

// verifies that types can implement the gated traits below
#[allow(dead_code)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<vehicle_finance::Installment>();
    is_normal::<vehicle_finance::Contract>();
    is_normal::<vehicle_finance::Client>();
    is_normal::<vehicle_finance::ClientRegistry>();
    is_normal::<vehicle_finance::FinancingTerms>();
    is_normal::<vehicle_finance::InvalidScheduleError>();
}
