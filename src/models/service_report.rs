//! Diesel models for recorded visit reports.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::service_report::{
    NewServiceReport as DomainNewServiceReport, ServiceReport as DomainServiceReport,
};
use crate::domain::types::{ServiceId, ServiceReportId, TypeConstraintError};
use crate::models::service::Service;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Service, foreign_key = service_id))]
#[diesel(table_name = crate::schema::service_reports)]
pub struct ServiceReport {
    pub id: i32,
    pub service_id: i32,
    pub service_date: NaiveDateTime,
    pub images: String, // JSON array of image paths
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::service_reports)]
pub struct NewServiceReport {
    pub service_id: i32,
    pub service_date: NaiveDateTime,
    pub images: String,
}

impl TryFrom<ServiceReport> for DomainServiceReport {
    type Error = TypeConstraintError;

    fn try_from(report: ServiceReport) -> Result<Self, Self::Error> {
        let images: Vec<String> = serde_json::from_str(&report.images).unwrap_or_default();

        Ok(Self {
            id: ServiceReportId::new(report.id)?,
            service_id: ServiceId::new(report.service_id)?,
            service_date: report.service_date,
            images,
        })
    }
}

impl<'a> From<&'a DomainNewServiceReport> for NewServiceReport {
    fn from(report: &'a DomainNewServiceReport) -> Self {
        Self {
            service_id: report.service_id.get(),
            service_date: report.service_date,
            images: serde_json::Value::from(report.images.clone()).to_string(),
        }
    }
}
