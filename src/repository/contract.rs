//! Repository implementation for service contracts.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::contract::{BillingCycle, Contract, ContractWithServices, NewContract};
use crate::domain::service::Service;
use crate::domain::types::{ContractId, ContractNo};
use crate::models::contract::{Contract as DbContract, NewContract as DbNewContract};
use crate::models::service::Service as DbService;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::service::attach_billing_months;
use crate::repository::{ContractReader, ContractWriter, DieselRepository};

/// Eagerly loads the services of every contract, ordered by card number.
fn attach_services(
    conn: &mut SqliteConnection,
    db_contracts: Vec<DbContract>,
) -> RepositoryResult<Vec<ContractWithServices>> {
    use crate::schema::services;

    if db_contracts.is_empty() {
        return Ok(Vec::new());
    }

    let db_services = DbService::belonging_to(&db_contracts)
        .select(DbService::as_select())
        .order(services::service_card_number.asc())
        .load::<DbService>(conn)?;

    let mut by_contract: HashMap<ContractId, Vec<Service>> = HashMap::new();
    for service in attach_billing_months(conn, db_services)? {
        by_contract
            .entry(service.contract_id)
            .or_default()
            .push(service);
    }

    db_contracts
        .into_iter()
        .map(|db_contract| {
            let contract = Contract::try_from(db_contract)?;
            let services = by_contract.remove(&contract.id).unwrap_or_default();
            Ok(ContractWithServices { contract, services })
        })
        .collect()
}

impl ContractReader for DieselRepository {
    fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<ContractWithServices>> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;

        let db_contract = contracts::table
            .filter(contracts::id.eq(id.get()))
            .first::<DbContract>(&mut conn)
            .optional()?;

        match db_contract {
            Some(db_contract) => Ok(attach_services(&mut conn, vec![db_contract])?.pop()),
            None => Ok(None),
        }
    }

    fn get_contract_by_number(
        &self,
        contract_no: &ContractNo,
    ) -> RepositoryResult<Option<ContractWithServices>> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;

        let db_contract = contracts::table
            .filter(contracts::contract_no.eq(contract_no.as_str()))
            .first::<DbContract>(&mut conn)
            .optional()?;

        match db_contract {
            Some(db_contract) => Ok(attach_services(&mut conn, vec![db_contract])?.pop()),
            None => Ok(None),
        }
    }

    fn list_contracts_with_services(
        &self,
        ids: &[ContractId],
    ) -> RepositoryResult<Vec<ContractWithServices>> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;

        let ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let db_contracts = contracts::table
            .filter(contracts::id.eq_any(ids))
            .order(contracts::contract_no.asc())
            .load::<DbContract>(&mut conn)?;

        attach_services(&mut conn, db_contracts)
    }

    fn list_contracts_by_cycle(
        &self,
        cycle: &BillingCycle,
    ) -> RepositoryResult<Vec<ContractWithServices>> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;

        let cycle = cycle.to_string();

        let db_contracts = contracts::table
            .filter(
                contracts::single_frequency_type
                    .eq(cycle.as_str())
                    .or(contracts::multi_frequency_type.eq(cycle.as_str())),
            )
            .order(contracts::contract_no.asc())
            .load::<DbContract>(&mut conn)?;

        attach_services(&mut conn, db_contracts)
    }
}

impl ContractWriter for DieselRepository {
    fn create_contract(&self, new_contract: &NewContract) -> RepositoryResult<Contract> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;

        let db_new_contract: DbNewContract = new_contract.into();

        let db_contract = diesel::insert_into(contracts::table)
            .values(&db_new_contract)
            .get_result::<DbContract>(&mut conn)?;

        Contract::try_from(db_contract).map_err(RepositoryError::from)
    }
}
