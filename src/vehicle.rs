use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::VehicleError;

/// The financed vehicle, as recorded on the contract.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vehicle {
    pub brand: String,
    pub model: String,
    pub manufacture_year: i32,
    pub model_year: i32,
    pub color: String,
    /// `ABC1234`, or the Mercosul `ABC1D23`.
    pub plate: String,
    /// 17-character VIN.
    pub chassis: String,
    pub renavam: String,
    pub value: Decimal,
}

impl Vehicle {
    pub fn validate(&self) -> Result<(), VehicleError> {
        for (field, value) in [
            ("brand", &self.brand),
            ("model", &self.model),
            ("color", &self.color),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }
        // a model year may run one ahead of the manufacture year
        if self.model_year != self.manufacture_year && self.model_year != self.manufacture_year + 1
        {
            return Err(invalid(
                "model_year",
                format!(
                    "{} does not fit manufacture year {}",
                    self.model_year, self.manufacture_year
                ),
            ));
        }
        if !is_plate(&self.plate) {
            return Err(invalid("plate", format!("{:?} is not a plate", self.plate)));
        }
        if !is_vin(&self.chassis) {
            return Err(invalid(
                "chassis",
                format!("{:?} is not a 17-character VIN", self.chassis),
            ));
        }
        if self.renavam.len() != 11 || !self.renavam.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(
                "renavam",
                format!("{:?} is not an 11-digit RENAVAM", self.renavam),
            ));
        }
        if self.value <= Decimal::ZERO {
            return Err(invalid("value", "must be positive"));
        }
        Ok(())
    }
}

fn is_plate(plate: &str) -> bool {
    let b = plate.as_bytes();
    b.len() == 7
        && b[..3].iter().all(u8::is_ascii_uppercase)
        && b[3].is_ascii_digit()
        && (b[4].is_ascii_digit() || b[4].is_ascii_uppercase())
        && b[5..].iter().all(u8::is_ascii_digit)
}

fn is_vin(vin: &str) -> bool {
    vin.len() == 17
        && vin
            .bytes()
            .all(|b| (b.is_ascii_digit() || b.is_ascii_uppercase()) && !matches!(b, b'I' | b'O' | b'Q'))
}

fn invalid(field: &'static str, reason: impl Into<String>) -> VehicleError {
    VehicleError::InvalidField {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::Vehicle;
    use crate::error::VehicleError;
    use rust_decimal_macros::dec;
    use test_log::test;

    fn vehicle() -> Vehicle {
        Vehicle {
            brand: "Fiat".to_string(),
            model: "Uno".to_string(),
            manufacture_year: 2023,
            model_year: 2024,
            color: "Branco".to_string(),
            plate: "ABC1234".to_string(),
            chassis: "9BW12345678901234".to_string(),
            renavam: "12345678901".to_string(),
            value: dec!(50000),
        }
    }

    fn field_of(err: VehicleError) -> &'static str {
        match err {
            VehicleError::InvalidField { field, .. } => field,
        }
    }

    #[test]
    fn test_valid_vehicle() {
        assert!(vehicle().validate().is_ok());

        let mercosul = Vehicle {
            plate: "BRA2E19".to_string(),
            model_year: 2023,
            ..vehicle()
        };
        assert!(mercosul.validate().is_ok());
    }

    #[test]
    fn test_invalid_vehicle() {
        let cases = [
            (
                Vehicle {
                    brand: String::new(),
                    ..vehicle()
                },
                "brand",
            ),
            (
                Vehicle {
                    model_year: 2025,
                    ..vehicle()
                },
                "model_year",
            ),
            (
                Vehicle {
                    model_year: 2022,
                    ..vehicle()
                },
                "model_year",
            ),
            (
                Vehicle {
                    plate: "AB12345".to_string(),
                    ..vehicle()
                },
                "plate",
            ),
            (
                Vehicle {
                    plate: "abc1234".to_string(),
                    ..vehicle()
                },
                "plate",
            ),
            (
                Vehicle {
                    chassis: "9BW1234567890123".to_string(),
                    ..vehicle()
                },
                "chassis",
            ),
            (
                Vehicle {
                    chassis: "9BW1234567890123O".to_string(),
                    ..vehicle()
                },
                "chassis",
            ),
            (
                Vehicle {
                    renavam: "1234567890".to_string(),
                    ..vehicle()
                },
                "renavam",
            ),
            (
                Vehicle {
                    value: dec!(0),
                    ..vehicle()
                },
                "value",
            ),
        ];

        for (v, field) in cases {
            assert_eq!(field_of(v.validate().unwrap_err()), field);
        }
    }
}
