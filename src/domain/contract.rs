use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::service::Service;
use crate::domain::types::{ContractId, ContractNo};

/// Frequency type literal of contracts billed once a visit is done.
pub const BILL_AFTER_JOB: &str = "Bill After Job";

/// Which of the two billing configs of a contract is in use.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BillingMode {
    Single,
    Multi,
}

impl Display for BillingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingMode::Single => write!(f, "single"),
            BillingMode::Multi => write!(f, "multi"),
        }
    }
}

impl From<&str> for BillingMode {
    fn from(s: &str) -> Self {
        match s {
            "multi" => BillingMode::Multi,
            _ => BillingMode::Single,
        }
    }
}

/// Frequency type carried by a billing configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BillingCycle {
    /// Billed as soon as a completed visit is recorded.
    AfterJob,
    /// Billed on the service's calendar cadence.
    Scheduled(String),
}

impl Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingCycle::AfterJob => write!(f, "{BILL_AFTER_JOB}"),
            BillingCycle::Scheduled(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for BillingCycle {
    fn from(s: &str) -> Self {
        if s.trim() == BILL_AFTER_JOB {
            BillingCycle::AfterJob
        } else {
            BillingCycle::Scheduled(s.trim().to_string())
        }
    }
}

impl From<String> for BillingCycle {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

/// Single and multi billing configs of a contract. Either may be unset.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingConfig {
    pub mode: BillingMode,
    pub single: Option<BillingCycle>,
    pub multi: Option<BillingCycle>,
}

impl BillingConfig {
    /// Contract billed through its single config only.
    pub fn single(cycle: BillingCycle) -> Self {
        Self {
            mode: BillingMode::Single,
            single: Some(cycle),
            multi: None,
        }
    }

    /// Contract billed through its multi config only.
    pub fn multi(cycle: BillingCycle) -> Self {
        Self {
            mode: BillingMode::Multi,
            single: None,
            multi: Some(cycle),
        }
    }

    #[must_use]
    pub fn with_single(mut self, cycle: BillingCycle) -> Self {
        self.single = Some(cycle);
        self
    }

    #[must_use]
    pub fn with_multi(mut self, cycle: BillingCycle) -> Self {
        self.multi = Some(cycle);
        self
    }

    /// True when either config carries `cycle`.
    pub fn has_cycle(&self, cycle: &BillingCycle) -> bool {
        self.single.as_ref() == Some(cycle) || self.multi.as_ref() == Some(cycle)
    }

    pub fn is_after_job(&self) -> bool {
        self.has_cycle(&BillingCycle::AfterJob)
    }
}

/// Person invoices are addressed to.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BillToContact {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contract {
    pub id: ContractId,
    pub contract_no: ContractNo,
    pub start_date: NaiveDate,
    pub billing: BillingConfig,
    /// Display name of the billing address snapshot.
    pub bill_to: Option<String>,
    /// Display name of the shipping address snapshot.
    pub ship_to: Option<String>,
    pub contact: BillToContact,
}

/// Contract with its services eagerly loaded, ordered by card number.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ContractWithServices {
    pub contract: Contract,
    pub services: Vec<Service>,
}

impl ContractWithServices {
    pub fn total_cards(&self) -> usize {
        self.services.len()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewContract {
    pub contract_no: ContractNo,
    pub start_date: NaiveDate,
    pub billing: BillingConfig,
    pub bill_to: Option<String>,
    pub ship_to: Option<String>,
    pub contact: BillToContact,
}

impl NewContract {
    #[must_use]
    pub fn new(contract_no: ContractNo, start_date: NaiveDate, billing: BillingConfig) -> Self {
        Self {
            contract_no,
            start_date,
            billing,
            bill_to: None,
            ship_to: None,
            contact: BillToContact::default(),
        }
    }

    #[must_use]
    pub fn bill_to(mut self, name: impl Into<String>) -> Self {
        self.bill_to = Some(name.into()).filter(|s: &String| !s.trim().is_empty());
        self
    }

    #[must_use]
    pub fn ship_to(mut self, name: impl Into<String>) -> Self {
        self.ship_to = Some(name.into()).filter(|s: &String| !s.trim().is_empty());
        self
    }

    #[must_use]
    pub fn contact(mut self, name: Option<String>, email: Option<String>) -> Self {
        self.contact = BillToContact {
            name: name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            email: email
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_cycle_recognizes_after_job_literal() {
        assert_eq!(BillingCycle::from("Bill After Job"), BillingCycle::AfterJob);
        assert_eq!(
            BillingCycle::from("Monthly"),
            BillingCycle::Scheduled("Monthly".to_string())
        );
        assert_eq!(BillingCycle::AfterJob.to_string(), BILL_AFTER_JOB);
    }

    #[test]
    fn new_contract_normalizes_contact() {
        let contract = NewContract::new(
            ContractNo::new("A/10").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            BillingConfig::single(BillingCycle::AfterJob),
        )
        .bill_to("  ")
        .contact(Some(" Ann ".into()), Some(" Ann@Example.COM ".into()));

        assert_eq!(contract.bill_to, None);
        assert_eq!(contract.contact.name.as_deref(), Some("Ann"));
        assert_eq!(contract.contact.email.as_deref(), Some("ann@example.com"));
    }

    #[test]
    fn either_config_can_bill_after_job() {
        let scheduled = BillingCycle::from("Monthly");

        let multi_only = BillingConfig::single(scheduled.clone()).with_multi(BillingCycle::AfterJob);
        assert_eq!(multi_only.mode, BillingMode::Single);
        assert!(multi_only.is_after_job());
        assert!(multi_only.has_cycle(&scheduled));

        assert!(!BillingConfig::multi(scheduled).is_after_job());
        assert!(BillingConfig::multi(BillingCycle::AfterJob).is_after_job());
    }
}
