//! Repository implementation for service cards.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::period::DueTag;
use crate::domain::service::{NewService, Service};
use crate::models::service::{
    NewService as DbNewService, Service as DbService, ServiceBillingMonth as DbServiceBillingMonth,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ServiceReader, ServiceWriter};

/// Loads the billing months of `db_services` and converts them into domain
/// services, preserving the input order.
pub(crate) fn attach_billing_months(
    conn: &mut SqliteConnection,
    db_services: Vec<DbService>,
) -> RepositoryResult<Vec<Service>> {
    let months = DbServiceBillingMonth::belonging_to(&db_services)
        .select(DbServiceBillingMonth::as_select())
        .load::<DbServiceBillingMonth>(conn)?
        .grouped_by(&db_services);

    db_services
        .into_iter()
        .zip(months)
        .map(|(service, months)| {
            let labels = months.into_iter().map(|m| m.label).collect();
            service.into_domain(labels).map_err(RepositoryError::from)
        })
        .collect()
}

impl ServiceReader for DieselRepository {
    fn list_services_due(&self, tag: &DueTag) -> RepositoryResult<Vec<Service>> {
        use crate::schema::{service_billing_months, services};

        let mut conn = self.conn()?;

        let db_services = services::table
            .inner_join(service_billing_months::table)
            .filter(service_billing_months::label.eq(tag.as_str()))
            .select(DbService::as_select())
            .order((services::contract_id.asc(), services::service_card_number.asc()))
            .load::<DbService>(&mut conn)?;

        attach_billing_months(&mut conn, db_services)
    }
}

impl ServiceWriter for DieselRepository {
    fn create_service(&self, new_service: &NewService) -> RepositoryResult<Service> {
        use crate::schema::{service_billing_months, services};

        let mut conn = self.conn()?;

        let db_new_service: DbNewService = new_service.into();

        conn.transaction::<Service, RepositoryError, _>(|conn| {
            let db_service = diesel::insert_into(services::table)
                .values(&db_new_service)
                .get_result::<DbService>(conn)?;

            let months = new_service
                .billing_months
                .iter()
                .map(|label| DbServiceBillingMonth {
                    service_id: db_service.id,
                    label: label.clone(),
                })
                .collect::<Vec<_>>();

            if !months.is_empty() {
                diesel::insert_into(service_billing_months::table)
                    .values(&months)
                    .execute(conn)?;
            }

            let service = db_service.into_domain(new_service.billing_months.clone())?;
            Ok(service)
        })
    }
}
