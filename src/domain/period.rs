//! Billing periods and the month labels services are tagged with.

use std::fmt::{Display, Formatter};

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;
use crate::domain::window::{ReportWindow, UpperBound};

/// Calendar month a billing clerk is looking at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

impl BillingPeriod {
    /// Validates a `(month, year)` pair. Years must have four digits.
    pub fn new(month: u32, year: i32) -> Result<Self, TypeConstraintError> {
        if !(1..=12).contains(&month) {
            return Err(TypeConstraintError::InvalidMonth);
        }
        if !(1000..=9999).contains(&year) {
            return Err(TypeConstraintError::InvalidYear);
        }
        Ok(Self { year, month })
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    /// Number of months since year zero, used for block arithmetic.
    pub const fn month_index(self) -> i32 {
        month_index(self.year, self.month)
    }

    /// First day of the period.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Label services carry in their billing months, e.g. `Oct 2025`.
    pub fn due_tag(self) -> DueTag {
        const NAMES: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        let name = NAMES[(self.month - 1) as usize];
        DueTag(format!("{name} {}", self.year))
    }

    /// The exact calendar month `[01 00:00, next 01 00:00)`.
    pub fn calendar_window(self) -> Option<ReportWindow> {
        let start = month_start(self.month_index())?;
        let end = month_start(self.month_index() + 1)?;
        Some(ReportWindow {
            start,
            end,
            upper: UpperBound::Exclusive,
        })
    }
}

impl Display for BillingPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Month label of the form `Mon YYYY`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DueTag(String);

impl DueTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for DueTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BillingPeriod> for DueTag {
    fn from(period: BillingPeriod) -> Self {
        period.due_tag()
    }
}

pub(crate) const fn month_index(year: i32, month: u32) -> i32 {
    year * 12 + month as i32 - 1
}

pub(crate) fn date_month_index(date: NaiveDate) -> i32 {
    month_index(date.year(), date.month())
}

/// Midnight on the first day of the month with the given index.
pub(crate) fn month_start(index: i32) -> Option<NaiveDateTime> {
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).map(|date| date.and_time(NaiveTime::MIN))
}
