//! Diesel models for service cards and their due months.

use std::collections::BTreeSet;

use diesel::prelude::*;

use crate::domain::service::{NewService as DomainNewService, Service as DomainService};
use crate::domain::types::{CardNumber, ContractId, ServiceId, TypeConstraintError};
use crate::models::contract::Contract;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Contract, foreign_key = contract_id))]
#[diesel(table_name = crate::schema::services)]
pub struct Service {
    pub id: i32,
    pub contract_id: i32,
    pub service_card_number: i32,
    pub frequency: String,
    pub card_image: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::services)]
pub struct NewService<'a> {
    pub contract_id: i32,
    pub service_card_number: i32,
    pub frequency: String,
    pub card_image: Option<&'a str>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable, Associations)]
#[diesel(belongs_to(Service, foreign_key = service_id))]
#[diesel(table_name = crate::schema::service_billing_months)]
#[diesel(primary_key(service_id, label))]
pub struct ServiceBillingMonth {
    pub service_id: i32,
    pub label: String,
}

impl Service {
    /// Converts the row into the domain type, attaching its due months.
    pub fn into_domain(
        self,
        billing_months: BTreeSet<String>,
    ) -> Result<DomainService, TypeConstraintError> {
        Ok(DomainService {
            id: ServiceId::new(self.id)?,
            contract_id: ContractId::new(self.contract_id)?,
            card_number: CardNumber::new(self.service_card_number)?,
            frequency: self.frequency.into(),
            card_image: self.card_image,
            billing_months,
        })
    }
}

impl<'a> From<&'a DomainNewService> for NewService<'a> {
    fn from(service: &'a DomainNewService) -> Self {
        Self {
            contract_id: service.contract_id.get(),
            service_card_number: service.card_number.get(),
            frequency: service.frequency.to_string(),
            card_image: service.card_image.as_deref(),
        }
    }
}
