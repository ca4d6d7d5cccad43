//! Diesel models for service contracts.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::contract::{
    BillToContact, BillingConfig, BillingCycle, BillingMode, Contract as DomainContract,
    NewContract as DomainNewContract,
};
use crate::domain::types::{ContractId, ContractNo, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contracts)]
/// Diesel model for [`crate::domain::contract::Contract`].
pub struct Contract {
    pub id: i32,
    pub contract_no: String,
    pub start_date: NaiveDate,
    pub billing_mode: String,
    pub single_frequency_type: Option<String>,
    pub multi_frequency_type: Option<String>,
    pub bill_to_name: Option<String>,
    pub ship_to_name: Option<String>,
    pub bill_to_contact_name: Option<String>,
    pub bill_to_contact_email: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contracts)]
/// Insertable form of [`Contract`].
pub struct NewContract<'a> {
    pub contract_no: &'a str,
    pub start_date: NaiveDate,
    pub billing_mode: String,
    pub single_frequency_type: Option<String>,
    pub multi_frequency_type: Option<String>,
    pub bill_to_name: Option<&'a str>,
    pub ship_to_name: Option<&'a str>,
    pub bill_to_contact_name: Option<&'a str>,
    pub bill_to_contact_email: Option<&'a str>,
}

impl TryFrom<Contract> for DomainContract {
    type Error = TypeConstraintError;

    fn try_from(contract: Contract) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContractId::new(contract.id)?,
            contract_no: ContractNo::new(contract.contract_no)?,
            start_date: contract.start_date,
            billing: BillingConfig {
                mode: BillingMode::from(contract.billing_mode.as_str()),
                single: contract.single_frequency_type.map(BillingCycle::from),
                multi: contract.multi_frequency_type.map(BillingCycle::from),
            },
            bill_to: contract.bill_to_name,
            ship_to: contract.ship_to_name,
            contact: BillToContact {
                name: contract.bill_to_contact_name,
                email: contract.bill_to_contact_email,
            },
        })
    }
}

impl<'a> From<&'a DomainNewContract> for NewContract<'a> {
    fn from(contract: &'a DomainNewContract) -> Self {
        Self {
            contract_no: contract.contract_no.as_str(),
            start_date: contract.start_date,
            billing_mode: contract.billing.mode.to_string(),
            single_frequency_type: contract.billing.single.as_ref().map(ToString::to_string),
            multi_frequency_type: contract.billing.multi.as_ref().map(ToString::to_string),
            bill_to_name: contract.bill_to.as_deref(),
            ship_to_name: contract.ship_to.as_deref(),
            bill_to_contact_name: contract.contact.name.as_deref(),
            bill_to_contact_email: contract.contact.email.as_deref(),
        }
    }
}
