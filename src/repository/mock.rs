//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::billing_activity::{BillingActivity, NewBillingActivity};
use crate::domain::contract::{BillingCycle, Contract, ContractWithServices, NewContract};
use crate::domain::period::DueTag;
use crate::domain::service::{NewService, Service};
use crate::domain::service_report::{NewServiceReport, ServiceReport};
use crate::domain::types::{ContractId, ContractNo, ServiceId};
use crate::domain::window::ReportWindow;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ActivityListQuery, BillingActivityReader, BillingActivityWriter, ContractReader,
    ContractWriter, ServiceReader, ServiceReportReader, ServiceReportWriter, ServiceWriter,
};

mock! {
    pub Repository {}

    impl ContractReader for Repository {
        fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<ContractWithServices>>;
        fn get_contract_by_number(
            &self,
            contract_no: &ContractNo,
        ) -> RepositoryResult<Option<ContractWithServices>>;
        fn list_contracts_with_services(
            &self,
            ids: &[ContractId],
        ) -> RepositoryResult<Vec<ContractWithServices>>;
        fn list_contracts_by_cycle(
            &self,
            cycle: &BillingCycle,
        ) -> RepositoryResult<Vec<ContractWithServices>>;
    }

    impl ContractWriter for Repository {
        fn create_contract(&self, new_contract: &NewContract) -> RepositoryResult<Contract>;
    }

    impl ServiceReader for Repository {
        fn list_services_due(&self, tag: &DueTag) -> RepositoryResult<Vec<Service>>;
    }

    impl ServiceWriter for Repository {
        fn create_service(&self, new_service: &NewService) -> RepositoryResult<Service>;
    }

    impl ServiceReportReader for Repository {
        fn find_latest_report(
            &self,
            service_id: ServiceId,
            window: &ReportWindow,
        ) -> RepositoryResult<Option<ServiceReport>>;
    }

    impl ServiceReportWriter for Repository {
        fn create_service_report(&self, report: &NewServiceReport) -> RepositoryResult<ServiceReport>;
    }

    impl BillingActivityReader for Repository {
        fn list_activities(
            &self,
            query: ActivityListQuery,
        ) -> RepositoryResult<(usize, Vec<BillingActivity>)>;
    }

    impl BillingActivityWriter for Repository {
        fn create_activity(&self, activity: &NewBillingActivity) -> RepositoryResult<BillingActivity>;
    }
}
