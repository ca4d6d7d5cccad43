//! Billing cards: the per-service records handed to billing clerks.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::contract::{BILL_AFTER_JOB, Contract};
use crate::domain::service::Service;
use crate::domain::service_report::ServiceReport;
use crate::domain::types::{CardNumber, ContractId, ContractNo, ServiceId, ServiceReportId};

/// Latest visit report that backs a card.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CardEvidence {
    pub report_id: ServiceReportId,
    pub back_image: Option<String>,
    pub service_date: NaiveDateTime,
}

impl From<ServiceReport> for CardEvidence {
    fn from(report: ServiceReport) -> Self {
        Self {
            report_id: report.id,
            back_image: report.images.into_iter().next(),
            service_date: report.service_date,
        }
    }
}

/// Derived per-service billing record. Never persisted.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BillingCard {
    pub service_id: ServiceId,
    pub contract_id: ContractId,
    pub contract_no: ContractNo,
    pub card_number: CardNumber,
    pub total_cards: usize,
    pub label: String,
    pub bill_to: String,
    pub ship_to: String,
    pub frequency: String,
    pub front_image: Option<String>,
    pub evidence: Option<CardEvidence>,
}

/// Formats `{contract_no} ({card_number}/{total_cards})`.
pub fn card_label(contract_no: &ContractNo, card_number: CardNumber, total_cards: usize) -> String {
    format!("{contract_no} ({card_number}/{total_cards})")
}

impl BillingCard {
    /// Card of a scheduled service. Evidence is optional.
    pub fn due(
        contract: &Contract,
        total_cards: usize,
        service: &Service,
        report: Option<ServiceReport>,
    ) -> Self {
        Self::build(
            contract,
            total_cards,
            service,
            service.frequency.to_string(),
            report.map(CardEvidence::from),
        )
    }

    /// Card of a "Bill After Job" contract, which only exists once a visit
    /// was recorded.
    pub fn after_job(
        contract: &Contract,
        total_cards: usize,
        service: &Service,
        report: ServiceReport,
    ) -> Self {
        Self::build(
            contract,
            total_cards,
            service,
            BILL_AFTER_JOB.to_string(),
            Some(report.into()),
        )
    }

    fn build(
        contract: &Contract,
        total_cards: usize,
        service: &Service,
        frequency: String,
        evidence: Option<CardEvidence>,
    ) -> Self {
        Self {
            service_id: service.id,
            contract_id: contract.id,
            contract_no: contract.contract_no.clone(),
            card_number: service.card_number,
            total_cards,
            label: card_label(&contract.contract_no, service.card_number, total_cards),
            bill_to: contract.bill_to.clone().unwrap_or_default(),
            ship_to: contract.ship_to.clone().unwrap_or_default(),
            frequency,
            front_image: service.card_image.clone(),
            evidence,
        }
    }

    pub fn service_date(&self) -> Option<NaiveDateTime> {
        self.evidence.as_ref().map(|e| e.service_date)
    }

    pub fn back_image(&self) -> Option<&str> {
        self.evidence.as_ref().and_then(|e| e.back_image.as_deref())
    }
}

/// Sorts by contract number (case-sensitive) then card number.
pub fn sort_cards(cards: &mut [BillingCard]) {
    cards.sort_by(|a, b| {
        a.contract_no
            .cmp(&b.contract_no)
            .then(a.card_number.cmp(&b.card_number))
    });
}
