//! Catalog of visit cadences a service can be contracted for.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Recurrence kind of a service card, as written on the contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Monthly,
    ThriceAMonth,
    AsAndWhenCalled,
    AlternateMonthly,
    Quarterly,
    ThreeServicesInFourMonths,
    TwoServicesInSixMonths,
    Fortnightly,
    Weekly,
    TwiceAWeek,
    ThriceAWeek,
    Daily,
    AlternateDays,
    /// Label not in the catalog. Billed on the calendar month.
    Other(String),
}

/// How the search window of a frequency is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowRule {
    /// Calendar month of the viewing period.
    CalendarMonth,
    /// Block of `months` calendar months anchored at the contract start.
    MonthBlock { months: u32 },
    /// 14-day chunk anchored at the contract start, containing `now`.
    Fortnight,
    /// Week containing `now`, starting on the contract start weekday.
    ContractWeek,
    /// Calendar day of `now`.
    Day,
}

impl Frequency {
    /// Lookup from recurrence kind to window rule.
    pub fn window_rule(&self) -> WindowRule {
        match self {
            Frequency::Monthly
            | Frequency::ThriceAMonth
            | Frequency::AsAndWhenCalled
            | Frequency::Other(_) => WindowRule::CalendarMonth,
            Frequency::AlternateMonthly => WindowRule::MonthBlock { months: 2 },
            Frequency::Quarterly => WindowRule::MonthBlock { months: 3 },
            Frequency::ThreeServicesInFourMonths => WindowRule::MonthBlock { months: 4 },
            Frequency::TwoServicesInSixMonths => WindowRule::MonthBlock { months: 6 },
            Frequency::Fortnightly => WindowRule::Fortnight,
            Frequency::Weekly | Frequency::TwiceAWeek | Frequency::ThriceAWeek => {
                WindowRule::ContractWeek
            }
            Frequency::Daily | Frequency::AlternateDays => WindowRule::Day,
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Monthly => write!(f, "Monthly"),
            Frequency::ThriceAMonth => write!(f, "Thrice A Month"),
            Frequency::AsAndWhenCalled => write!(f, "As An When Called"),
            Frequency::AlternateMonthly => write!(f, "Alternate Monthly"),
            Frequency::Quarterly => write!(f, "Quarterly"),
            Frequency::ThreeServicesInFourMonths => write!(f, "3 Services Once In 4 Months"),
            Frequency::TwoServicesInSixMonths => write!(f, "2 Services Once In 6 Months"),
            Frequency::Fortnightly => write!(f, "Fortnightly"),
            Frequency::Weekly => write!(f, "Weekly"),
            Frequency::TwiceAWeek => write!(f, "Twice A Week"),
            Frequency::ThriceAWeek => write!(f, "Thrice A Week"),
            Frequency::Daily => write!(f, "Daily"),
            Frequency::AlternateDays => write!(f, "Alternate Days"),
            Frequency::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Frequency {
    fn from(s: &str) -> Self {
        match s.trim() {
            "Monthly" => Frequency::Monthly,
            "Thrice A Month" => Frequency::ThriceAMonth,
            "As An When Called" | "As And When Called" => Frequency::AsAndWhenCalled,
            "Alternate Monthly" => Frequency::AlternateMonthly,
            "Quarterly" => Frequency::Quarterly,
            "3 Services Once In 4 Months" => Frequency::ThreeServicesInFourMonths,
            "2 Services Once In 6 Months" => Frequency::TwoServicesInSixMonths,
            "Fortnightly" => Frequency::Fortnightly,
            "Weekly" => Frequency::Weekly,
            "Twice A Week" => Frequency::TwiceAWeek,
            "Thrice A Week" => Frequency::ThriceAWeek,
            "Daily" => Frequency::Daily,
            "Alternate Days" => Frequency::AlternateDays,
            other => Frequency::Other(other.to_string()),
        }
    }
}

impl From<String> for Frequency {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.to_string()
    }
}
