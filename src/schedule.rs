use chrono::{Datelike, NaiveDate};
use log::{debug, trace};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::InvalidScheduleError;
use crate::installment::Installment;

/// Decimal places money values are carried to.
pub const MONEY_DP: u32 = 2;

/// Builds `count` monthly installments of `installment_value`, the first one due on
/// `first_due_date`.
///
/// Installment `i` falls `i - 1` months after `first_due_date`. Every date is stepped
/// from the first one, so a day clamped in a short month (31st -> 29th of February)
/// comes back to the original day in the months after it.
pub fn generate_schedule(
    first_due_date: NaiveDate,
    installment_value: Decimal,
    count: u32,
) -> Result<Vec<Installment>, InvalidScheduleError> {
    if count < 1 {
        return Err(InvalidScheduleError::NoInstallments);
    }
    if installment_value <= Decimal::ZERO {
        return Err(InvalidScheduleError::NonPositiveValue(installment_value));
    }

    // the last due date bounds every earlier one, so check it before allocating
    let out_of_range = |months| InvalidScheduleError::DateOutOfRange {
        from: first_due_date,
        months,
    };
    add_months(first_due_date, count - 1).ok_or_else(|| out_of_range(count - 1))?;

    let mut schedule = Vec::with_capacity(count as usize);
    for number in 1..=count {
        let months = number - 1;
        let due_date = add_months(first_due_date, months).ok_or_else(|| out_of_range(months))?;
        trace!(
            "installment # {}, due {}, value {}",
            number,
            due_date,
            installment_value
        );
        schedule.push(Installment::pending(number, installment_value, due_date));
    }
    Ok(schedule)
}

/// Splits `total` into `count` monthly installments that add up to `total` exactly.
///
/// Every installment carries `total / count` cut down to cents, and the last one
/// takes whatever is left over.
pub fn generate_schedule_for_total(
    first_due_date: NaiveDate,
    total: Decimal,
    count: u32,
) -> Result<Vec<Installment>, InvalidScheduleError> {
    if count < 1 {
        return Err(InvalidScheduleError::NoInstallments);
    }
    if total <= Decimal::ZERO {
        return Err(InvalidScheduleError::NonPositiveTotal(total));
    }

    let base = split_evenly(total, count);
    if base <= Decimal::ZERO {
        return Err(InvalidScheduleError::ValueTooSmall { total, count });
    }

    let mut schedule = generate_schedule(first_due_date, base, count)?;
    let last = total - base * Decimal::from(count - 1);
    debug!(
        "{} over {} installments: {} each, last {}",
        total, count, base, last
    );
    if let Some(inst) = schedule.last_mut() {
        inst.value = last;
    }
    Ok(schedule)
}

/// Sum of the nominal values, `None` if it does not fit in a `Decimal`.
pub fn schedule_total(schedule: &[Installment]) -> Option<Decimal> {
    schedule
        .iter()
        .try_fold(Decimal::ZERO, |acc, inst| acc.checked_add(inst.value))
}

/// `total / count` truncated to [`MONEY_DP`] places.
pub(crate) fn split_evenly(total: Decimal, count: u32) -> Decimal {
    (total / Decimal::from(count)).round_dp_with_strategy(MONEY_DP, RoundingStrategy::ToZero)
}

/// Advances `date` by whole calendar months, clamping the day to the last day of the
/// target month when it is shorter. `None` when the result leaves chrono's range.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let offset = i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(i64::from(date.year()) + offset / 12).ok()?;
    let month = (offset % 12) as u32 + 1;
    let day = date.day().min(last_day_of_month(year, month)?);

    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        _ => None,
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}
