//! Storage traits consumed by the billing services and their Diesel backend.

use crate::db::{DbConnection, DbPool};
use crate::domain::billing_activity::{ActivityKind, BillingActivity, NewBillingActivity};
use crate::domain::contract::{BillingCycle, Contract, ContractWithServices, NewContract};
use crate::domain::period::{BillingPeriod, DueTag};
use crate::domain::service::{NewService, Service};
use crate::domain::service_report::{NewServiceReport, ServiceReport};
use crate::domain::types::{ContractId, ContractNo, ServiceId};
use crate::domain::window::ReportWindow;
use crate::repository::errors::RepositoryResult;

pub mod billing_activity;
pub mod contract;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod service;
pub mod service_report;

/// Number of ledger entries returned per page.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 50;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        ((self.page.max(1) - 1) * self.per_page) as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityListQuery {
    pub period: Option<BillingPeriod>,
    pub action: Option<ActivityKind>,
    pub pagination: Option<Pagination>,
}

impl ActivityListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(mut self, period: BillingPeriod) -> Self {
        self.period = Some(period);
        self
    }

    pub fn action(mut self, action: ActivityKind) -> Self {
        self.action = Some(action);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ContractReader {
    fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<ContractWithServices>>;
    fn get_contract_by_number(
        &self,
        contract_no: &ContractNo,
    ) -> RepositoryResult<Option<ContractWithServices>>;
    /// Loads the requested contracts with their services ordered by card
    /// number. Unknown ids are silently absent from the result.
    fn list_contracts_with_services(
        &self,
        ids: &[ContractId],
    ) -> RepositoryResult<Vec<ContractWithServices>>;
    fn list_contracts_by_cycle(
        &self,
        cycle: &BillingCycle,
    ) -> RepositoryResult<Vec<ContractWithServices>>;
}

pub trait ContractWriter {
    fn create_contract(&self, new_contract: &NewContract) -> RepositoryResult<Contract>;
}

pub trait ServiceReader {
    /// Services whose billing months contain `tag`.
    fn list_services_due(&self, tag: &DueTag) -> RepositoryResult<Vec<Service>>;
}

pub trait ServiceWriter {
    fn create_service(&self, new_service: &NewService) -> RepositoryResult<Service>;
}

pub trait ServiceReportReader {
    /// Most recent report of `service_id` dated inside `window`.
    fn find_latest_report(
        &self,
        service_id: ServiceId,
        window: &ReportWindow,
    ) -> RepositoryResult<Option<ServiceReport>>;
}

pub trait ServiceReportWriter {
    fn create_service_report(&self, report: &NewServiceReport) -> RepositoryResult<ServiceReport>;
}

pub trait BillingActivityReader {
    fn list_activities(
        &self,
        query: ActivityListQuery,
    ) -> RepositoryResult<(usize, Vec<BillingActivity>)>;
}

pub trait BillingActivityWriter {
    fn create_activity(&self, activity: &NewBillingActivity) -> RepositoryResult<BillingActivity>;
}

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_offsets_from_first_page() {
        let first = Pagination {
            page: 1,
            per_page: 50,
        };
        assert_eq!(first.offset(), 0);

        let zero = Pagination {
            page: 0,
            per_page: 50,
        };
        assert_eq!(zero.offset(), 0);

        let third = Pagination {
            page: 3,
            per_page: 50,
        };
        assert_eq!(third.offset(), 100);
        assert_eq!(third.limit(), 50);
    }
}
