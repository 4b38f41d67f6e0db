//! Client registration: field validation and the CPF uniqueness check.

use chrono::NaiveDate;
use log::{info, warn};
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Address {
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    /// Two-letter state code, e.g. `SP`.
    pub state: String,
    /// CEP, eight digits; a `-` separator is accepted.
    pub postal_code: String,
}

/// What a client submits to sign up. Nothing is stored until every field checks out.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClientRegistration {
    pub name: String,
    /// Eleven digits; `.`, `-` and spaces are stripped.
    pub cpf: String,
    pub email: String,
    pub phone: String,
    pub monthly_income: Decimal,
    pub address: Address,
}

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Client {
    pub id: u64,
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub phone: String,
    pub monthly_income: Decimal,
    pub address: Address,
    pub registered_on: NaiveDate,
}

impl ClientRegistration {
    /// Checks every field and returns the registration with CPF, phone, state and
    /// postal code in their stored form.
    pub fn normalized(&self) -> Result<ClientRegistration, ClientError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid("name", "must not be empty"));
        }
        let cpf = digits_only("cpf", &self.cpf, &[11])?;
        let email = self.email.trim();
        if !looks_like_email(email) {
            return Err(invalid("email", format!("{:?} is not an e-mail address", email)));
        }
        let phone = digits_only("phone", &self.phone, &[10, 11])?;
        if self.monthly_income < Decimal::ZERO {
            return Err(invalid("monthly_income", "must not be negative"));
        }

        let addr = &self.address;
        for (field, value) in [
            ("street", &addr.street),
            ("number", &addr.number),
            ("district", &addr.district),
            ("city", &addr.city),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }
        let state = addr.state.trim().to_ascii_uppercase();
        if state.len() != 2 || !state.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(invalid("state", format!("{:?} is not a state code", addr.state)));
        }
        let postal_code = digits_only("postal_code", &addr.postal_code, &[8])?;

        Ok(ClientRegistration {
            name: name.to_string(),
            cpf,
            email: email.to_string(),
            phone,
            monthly_income: self.monthly_income,
            address: Address {
                street: addr.street.trim().to_string(),
                number: addr.number.trim().to_string(),
                district: addr.district.trim().to_string(),
                city: addr.city.trim().to_string(),
                state,
                postal_code,
            },
        })
    }
}

/// Registered clients, keyed by CPF. The host loads it from its own store.
#[derive(Clone, Debug, Default)]
pub struct ClientRegistry {
    clients: Vec<Client>,
    next_id: u64,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from clients that already exist; new ids continue after the largest one.
    pub fn with_clients(clients: Vec<Client>) -> Self {
        let next_id = clients.iter().map(|c| c.id).max().unwrap_or(0);
        Self { clients, next_id }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn find_by_cpf(&self, cpf: &str) -> Option<&Client> {
        let cpf = digits_only("cpf", cpf, &[11]).ok()?;
        self.clients.iter().find(|c| c.cpf == cpf)
    }

    /// Validates `registration` and adds the client, or leaves the registry untouched.
    pub fn register(
        &mut self,
        registration: &ClientRegistration,
        registered_on: NaiveDate,
    ) -> Result<&Client, ClientError> {
        let reg = registration.normalized()?;
        if self.find_by_cpf(&reg.cpf).is_some() {
            warn!("registration refused, CPF {} already registered", reg.cpf);
            return Err(ClientError::DuplicateCpf(reg.cpf));
        }

        self.next_id += 1;
        let client = Client {
            id: self.next_id,
            name: reg.name,
            cpf: reg.cpf,
            email: reg.email,
            phone: reg.phone,
            monthly_income: reg.monthly_income,
            address: reg.address,
            registered_on,
        };
        info!("client {} registered as #{}", client.name, client.id);
        self.clients.push(client);
        Ok(&self.clients[self.clients.len() - 1])
    }
}

fn digits_only(field: &'static str, raw: &str, lengths: &[usize]) -> Result<String, ClientError> {
    let kept: String = raw
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' ' | '(' | ')'))
        .collect();
    if !kept.chars().all(|c| c.is_ascii_digit()) || !lengths.contains(&kept.len()) {
        return Err(invalid(field, format!("{:?} is not a valid {}", raw, field)));
    }
    Ok(kept)
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((user, domain)) => {
            !user.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ClientError {
    ClientError::InvalidField {
        field,
        reason: reason.into(),
    }
}
