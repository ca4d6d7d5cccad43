#![allow(dead_code)]

use std::ops::DerefMut;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_billing::db::{DbPool, establish_connection_pool};
use pushkind_billing::domain::contract::{BillingConfig, BillingCycle, Contract, NewContract};
use pushkind_billing::domain::frequency::Frequency;
use pushkind_billing::domain::service::{NewService, Service};
use pushkind_billing::domain::service_report::{NewServiceReport, ServiceReport};
use pushkind_billing::domain::types::{CardNumber, ContractNo};
use pushkind_billing::repository::{
    ContractWriter, DieselRepository, ServiceReportWriter, ServiceWriter,
};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("create pool");

        let mut conn = pool.get().expect("get connection");
        let conn: &mut SqliteConnection = conn.deref_mut();
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

pub fn create_contract(
    repo: &DieselRepository,
    no: &str,
    start: NaiveDate,
    cycle: &str,
) -> Contract {
    let billing = BillingConfig::single(BillingCycle::from(cycle));
    let new_contract = NewContract::new(ContractNo::new(no).unwrap(), start, billing)
        .bill_to("Acme Ltd")
        .ship_to("Acme Plant")
        .contact(Some("Jane Doe".into()), Some("AP@Acme.test".into()));
    repo.create_contract(&new_contract).unwrap()
}

pub fn create_service(
    repo: &DieselRepository,
    contract: &Contract,
    card: i32,
    frequency: Frequency,
    months: &[&str],
) -> Service {
    let new_service = NewService::new(
        contract.id,
        CardNumber::new(card).unwrap(),
        frequency,
        months.iter().copied(),
    )
    .card_image(format!("/uploads/cards/{}-{card}.jpg", contract.id));
    repo.create_service(&new_service).unwrap()
}

pub fn create_report(
    repo: &DieselRepository,
    service: &Service,
    when: NaiveDateTime,
    images: &[&str],
) -> ServiceReport {
    let report = images
        .iter()
        .fold(NewServiceReport::new(service.id, when), |report, image| {
            report.image(*image)
        });
    repo.create_service_report(&report).unwrap()
}
