//! Repository implementation for visit reports.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::service_report::{NewServiceReport, ServiceReport};
use crate::domain::types::ServiceId;
use crate::domain::window::{ReportWindow, UpperBound};
use crate::models::service_report::{
    NewServiceReport as DbNewServiceReport, ServiceReport as DbServiceReport,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ServiceReportReader, ServiceReportWriter};

impl ServiceReportReader for DieselRepository {
    fn find_latest_report(
        &self,
        service_id: ServiceId,
        window: &ReportWindow,
    ) -> RepositoryResult<Option<ServiceReport>> {
        use crate::schema::service_reports;

        let mut conn = self.conn()?;

        let mut query = service_reports::table
            .filter(service_reports::service_id.eq(service_id.get()))
            .filter(service_reports::service_date.ge(window.start))
            .into_boxed::<Sqlite>();

        query = match window.upper {
            UpperBound::Inclusive => query.filter(service_reports::service_date.le(window.end)),
            UpperBound::Exclusive => query.filter(service_reports::service_date.lt(window.end)),
        };

        let db_report = query
            .order((
                service_reports::service_date.desc(),
                service_reports::id.desc(),
            ))
            .first::<DbServiceReport>(&mut conn)
            .optional()?;

        match db_report {
            Some(db_report) => Ok(Some(
                ServiceReport::try_from(db_report).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }
}

impl ServiceReportWriter for DieselRepository {
    fn create_service_report(&self, report: &NewServiceReport) -> RepositoryResult<ServiceReport> {
        use crate::schema::service_reports;

        let mut conn = self.conn()?;

        let db_new_report: DbNewServiceReport = report.into();

        let db_report = diesel::insert_into(service_reports::table)
            .values(&db_new_report)
            .get_result::<DbServiceReport>(&mut conn)?;

        ServiceReport::try_from(db_report).map_err(RepositoryError::from)
    }
}
