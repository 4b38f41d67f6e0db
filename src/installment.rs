use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::InstallmentError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InstallmentStatus {
    Pending,
    Paid,
    Late,
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallmentStatus::Pending => "pending",
            InstallmentStatus::Paid => "paid",
            InstallmentStatus::Late => "late",
        };
        f.write_str(name)
    }
}

/// One scheduled payment of a financed contract.
///
/// `payment_date` and `paid_amount` stay `None` until a payment is recorded.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Installment {
    pub number: u32,
    pub value: Decimal,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub paid_amount: Option<Decimal>,
    pub status: InstallmentStatus,
}

impl Installment {
    pub fn pending(number: u32, value: Decimal, due_date: NaiveDate) -> Self {
        Self {
            number,
            value,
            due_date,
            payment_date: None,
            paid_amount: None,
            status: InstallmentStatus::Pending,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    /// Late installments, and pending ones whose due date is already behind `as_of`.
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        match self.status {
            InstallmentStatus::Late => true,
            InstallmentStatus::Pending => self.due_date < as_of,
            InstallmentStatus::Paid => false,
        }
    }

    pub fn record_payment(
        &mut self,
        paid_on: NaiveDate,
        amount: Decimal,
    ) -> Result<(), InstallmentError> {
        if self.is_paid() {
            warn!("installment {} already paid, payment refused", self.number);
            return Err(InstallmentError::AlreadyPaid(self.number));
        }
        if amount <= Decimal::ZERO {
            return Err(InstallmentError::NonPositivePayment(amount));
        }

        debug!(
            "installment {} paid on {} ({} of {})",
            self.number, paid_on, amount, self.value
        );
        self.payment_date = Some(paid_on);
        self.paid_amount = Some(amount);
        self.status = InstallmentStatus::Paid;
        Ok(())
    }

    pub fn mark_late(&mut self) -> Result<(), InstallmentError> {
        match self.status {
            InstallmentStatus::Paid => Err(InstallmentError::AlreadyPaid(self.number)),
            InstallmentStatus::Late => Ok(()),
            InstallmentStatus::Pending => {
                debug!("installment {} due {} flagged late", self.number, self.due_date);
                self.status = InstallmentStatus::Late;
                Ok(())
            }
        }
    }
}

impl fmt::Display for Installment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "installment {}, due {}, value ${:.2}, {}",
            self.number, self.due_date, self.value, self.status
        )?;
        if let (Some(paid_on), Some(amount)) = (self.payment_date, self.paid_amount) {
            write!(f, " on {} (${:.2})", paid_on, amount)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Installment, InstallmentStatus};
    use crate::error::InstallmentError;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use test_log::test;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_pending_has_no_payment() {
        let inst = Installment::pending(1, dec!(250.00), date(2024, 3, 10));

        assert_eq!(inst.status, InstallmentStatus::Pending);
        assert_eq!(inst.payment_date, None);
        assert_eq!(inst.paid_amount, None);
        assert_eq!(
            inst.to_string(),
            "installment 1, due 2024-03-10, value $250.00, pending"
        );
    }

    #[test]
    fn test_record_payment() {
        let mut inst = Installment::pending(3, dec!(250.00), date(2024, 3, 10));
        inst.record_payment(date(2024, 3, 8), dec!(250.00)).unwrap();

        assert!(inst.is_paid());
        assert_eq!(inst.payment_date, Some(date(2024, 3, 8)));
        assert_eq!(inst.paid_amount, Some(dec!(250.00)));
        assert_eq!(
            inst.to_string(),
            "installment 3, due 2024-03-10, value $250.00, paid on 2024-03-08 ($250.00)"
        );

        assert_eq!(
            inst.record_payment(date(2024, 3, 9), dec!(250.00)),
            Err(InstallmentError::AlreadyPaid(3))
        );
        assert_eq!(inst.payment_date, Some(date(2024, 3, 8)));
    }

    #[test]
    fn test_record_payment_rejects_non_positive_amount() {
        let mut inst = Installment::pending(1, dec!(100), date(2024, 3, 10));

        assert_eq!(
            inst.record_payment(date(2024, 3, 10), dec!(0)),
            Err(InstallmentError::NonPositivePayment(dec!(0)))
        );
        assert_eq!(inst.status, InstallmentStatus::Pending);
    }

    #[test]
    fn test_late_installment_can_still_be_paid() {
        let mut inst = Installment::pending(2, dec!(100), date(2024, 3, 10));
        inst.mark_late().unwrap();
        inst.mark_late().unwrap();
        assert_eq!(inst.status, InstallmentStatus::Late);

        inst.record_payment(date(2024, 4, 2), dec!(100)).unwrap();
        assert_eq!(inst.status, InstallmentStatus::Paid);
        assert_eq!(inst.mark_late(), Err(InstallmentError::AlreadyPaid(2)));
    }

    #[test]
    fn test_is_overdue() {
        let mut inst = Installment::pending(1, dec!(100), date(2024, 3, 10));

        assert!(!inst.is_overdue(date(2024, 3, 10)));
        assert!(inst.is_overdue(date(2024, 3, 11)));

        inst.mark_late().unwrap();
        assert!(inst.is_overdue(date(2024, 1, 1)));

        inst.record_payment(date(2024, 3, 20), dec!(100)).unwrap();
        assert!(!inst.is_overdue(date(2024, 12, 31)));
    }
}
