//! Search window resolution for billing cycles.
//!
//! A window is the span of time a visit report must fall into to count as
//! evidence for a service card in a billing period. Multi-month cadences are
//! sliced into blocks anchored at the contract start month, while cadences
//! shorter than a month are resolved around the reference instant `now`.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::domain::frequency::{Frequency, WindowRule};
use crate::domain::period::{BillingPeriod, date_month_index, month_start};

/// Width of a fortnightly chunk in days. A chunk ends just before the next
/// one starts, so the next chunk's first instant is not part of it.
pub const FORTNIGHT_DAYS: i64 = 14;

/// Closed search window: both `start` and `end` belong to it.
///
/// `end` is the last representable instant before the next window begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SearchWindow {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }

    /// Window used by the report matcher with an inclusive upper bound.
    pub fn inclusive(self) -> ReportWindow {
        ReportWindow {
            start: self.start,
            end: self.end,
            upper: UpperBound::Inclusive,
        }
    }
}

/// Whether the upper end of a [`ReportWindow`] is part of the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpperBound {
    Inclusive,
    Exclusive,
}

/// Date range passed to the report matcher. The lower bound is always
/// inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub upper: UpperBound,
}

impl ReportWindow {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        if at < self.start {
            return false;
        }
        match self.upper {
            UpperBound::Inclusive => at <= self.end,
            UpperBound::Exclusive => at < self.end,
        }
    }
}

/// Computes the window a visit must fall into for `frequency` to be billed in
/// `period`.
///
/// Block and chunk indices that would be negative (period or `now` before the
/// contract start) are clamped to the first block. Returns `None` only when
/// a boundary falls outside of the supported calendar range.
pub fn resolve_window(
    frequency: &Frequency,
    contract_start: NaiveDate,
    period: BillingPeriod,
    now: NaiveDateTime,
) -> Option<SearchWindow> {
    match frequency.window_rule() {
        WindowRule::CalendarMonth => month_span(period.month_index(), 1),
        WindowRule::MonthBlock { months } => {
            let span = months as i32;
            let anchor = date_month_index(contract_start);
            let elapsed = (period.month_index() - anchor).max(0);
            let block = elapsed.div_euclid(span);
            month_span(anchor + block * span, span)
        }
        WindowRule::Fortnight => {
            let anchor = contract_start.and_time(NaiveTime::MIN);
            let elapsed = now.signed_duration_since(anchor).num_days().max(0);
            let chunk = elapsed / FORTNIGHT_DAYS;
            let offset = u64::try_from(chunk * FORTNIGHT_DAYS).ok()?;
            let start = anchor.checked_add_days(Days::new(offset))?;
            day_span(start, FORTNIGHT_DAYS as u64)
        }
        WindowRule::ContractWeek => {
            let week_starts_on = contract_start.weekday().num_days_from_sunday();
            let today = now.weekday().num_days_from_sunday();
            let back = (today + 7 - week_starts_on) % 7;
            let start = now
                .date()
                .checked_sub_days(Days::new(back.into()))?
                .and_time(NaiveTime::MIN);
            day_span(start, 7)
        }
        WindowRule::Day => day_span(now.date().and_time(NaiveTime::MIN), 1),
    }
}

fn month_span(first_month: i32, months: i32) -> Option<SearchWindow> {
    closed(month_start(first_month)?, month_start(first_month + months)?)
}

fn day_span(start: NaiveDateTime, days: u64) -> Option<SearchWindow> {
    closed(start, start.checked_add_days(Days::new(days))?)
}

fn closed(start: NaiveDateTime, next: NaiveDateTime) -> Option<SearchWindow> {
    let end = next.checked_sub_signed(TimeDelta::nanoseconds(1))?;
    Some(SearchWindow { start, end })
}
