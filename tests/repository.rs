use pushkind_billing::domain::billing_activity::{ActivityKind, Actor, NewBillingActivity};
use pushkind_billing::domain::contract::{
    BillingConfig, BillingCycle, BillingMode, NewContract,
};
use pushkind_billing::domain::frequency::Frequency;
use pushkind_billing::domain::period::BillingPeriod;
use pushkind_billing::domain::types::{ContractId, ContractNo};
use pushkind_billing::domain::window::{ReportWindow, UpperBound};
use pushkind_billing::repository::errors::RepositoryError;
use pushkind_billing::repository::{
    ActivityListQuery, BillingActivityReader, BillingActivityWriter, ContractReader,
    ContractWriter, ServiceReader, ServiceReportReader,
};

mod common;

use common::{TestDb, at, create_contract, create_report, create_service, date};

#[test]
fn test_contract_loads_services_in_card_order() {
    let test_db = TestDb::new("test_contract_loads_services_in_card_order.db");
    let repo = test_db.repo();

    let contract = create_contract(&repo, "G/182", date(2025, 9, 1), "Monthly");
    create_service(&repo, &contract, 2, Frequency::Fortnightly, &["Oct 2025"]);
    create_service(&repo, &contract, 1, Frequency::Monthly, &["Oct 2025", "Nov 2025"]);

    let loaded = repo
        .get_contract_by_number(&ContractNo::new("G/182").unwrap())
        .unwrap()
        .unwrap();

    assert_eq!(loaded.contract, contract);
    assert_eq!(loaded.contract.contact.email.as_deref(), Some("ap@acme.test"));
    assert_eq!(loaded.total_cards(), 2);
    let cards: Vec<i32> = loaded.services.iter().map(|s| s.card_number.get()).collect();
    assert_eq!(cards, vec![1, 2]);
    assert_eq!(loaded.services[0].billing_months.len(), 2);
    assert_eq!(loaded.services[1].frequency, Frequency::Fortnightly);

    let by_id = repo.get_contract_by_id(contract.id).unwrap().unwrap();
    assert_eq!(by_id, loaded);

    assert!(
        repo.get_contract_by_number(&ContractNo::new("X/1").unwrap())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_duplicate_contract_number_is_a_constraint_violation() {
    let test_db = TestDb::new("test_duplicate_contract_number.db");
    let repo = test_db.repo();

    create_contract(&repo, "G/182", date(2025, 9, 1), "Monthly");

    let duplicate = NewContract::new(
        ContractNo::new("G/182").unwrap(),
        date(2025, 1, 1),
        BillingConfig::multi(BillingCycle::AfterJob),
    );

    assert!(matches!(
        repo.create_contract(&duplicate),
        Err(RepositoryError::ConstraintViolation(_))
    ));
}

#[test]
fn test_contract_listings() {
    let test_db = TestDb::new("test_contract_listings.db");
    let repo = test_db.repo();

    let scheduled = create_contract(&repo, "G/182", date(2025, 9, 1), "Monthly");
    let after_job = create_contract(&repo, "A/10", date(2025, 1, 15), "Bill After Job");
    create_service(&repo, &after_job, 1, Frequency::AsAndWhenCalled, &[]);

    let by_cycle = repo
        .list_contracts_by_cycle(&BillingCycle::AfterJob)
        .unwrap();
    assert_eq!(by_cycle.len(), 1);
    assert_eq!(by_cycle[0].contract.id, after_job.id);
    assert!(by_cycle[0].contract.billing.is_after_job());
    assert_eq!(by_cycle[0].services.len(), 1);

    let by_monthly = repo
        .list_contracts_by_cycle(&BillingCycle::from("Monthly"))
        .unwrap();
    assert_eq!(by_monthly.len(), 1);
    assert_eq!(by_monthly[0].contract.id, scheduled.id);

    let by_ids = repo
        .list_contracts_with_services(&[scheduled.id, ContractId::new(999).unwrap()])
        .unwrap();
    assert_eq!(by_ids.len(), 1);
    assert_eq!(by_ids[0].contract.contract_no.as_str(), "G/182");
    assert!(by_ids[0].services.is_empty());
}

#[test]
fn test_after_job_listing_matches_either_billing_config() {
    let test_db = TestDb::new("test_after_job_listing_matches_either_config.db");
    let repo = test_db.repo();

    create_contract(&repo, "G/182", date(2025, 9, 1), "Monthly");
    let multi_only = repo
        .create_contract(&NewContract::new(
            ContractNo::new("M/3").unwrap(),
            date(2025, 2, 1),
            BillingConfig::multi(BillingCycle::AfterJob)
                .with_single(BillingCycle::from("Quarterly")),
        ))
        .unwrap();
    assert_eq!(multi_only.billing.mode, BillingMode::Multi);
    assert_eq!(
        multi_only.billing.single,
        Some(BillingCycle::Scheduled("Quarterly".into()))
    );

    let after_job = repo
        .list_contracts_by_cycle(&BillingCycle::AfterJob)
        .unwrap();
    let numbers: Vec<&str> = after_job
        .iter()
        .map(|c| c.contract.contract_no.as_str())
        .collect();
    assert_eq!(numbers, vec!["M/3"]);

    let quarterly = repo
        .list_contracts_by_cycle(&BillingCycle::from("Quarterly"))
        .unwrap();
    assert_eq!(quarterly.len(), 1);
    assert_eq!(quarterly[0].contract.id, multi_only.id);
}

#[test]
fn test_services_due_by_month_label() {
    let test_db = TestDb::new("test_services_due_by_month_label.db");
    let repo = test_db.repo();

    let contract = create_contract(&repo, "G/182", date(2025, 9, 1), "Monthly");
    let october = create_service(&repo, &contract, 1, Frequency::Monthly, &["Oct 2025"]);
    create_service(&repo, &contract, 2, Frequency::Quarterly, &["Nov 2025"]);

    let due = repo
        .list_services_due(&BillingPeriod::new(10, 2025).unwrap().due_tag())
        .unwrap();
    assert_eq!(due, vec![october]);

    let none = repo
        .list_services_due(&BillingPeriod::new(3, 2026).unwrap().due_tag())
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_latest_report_respects_window_bounds() {
    let test_db = TestDb::new("test_latest_report_respects_window_bounds.db");
    let repo = test_db.repo();

    let contract = create_contract(&repo, "A/10", date(2025, 1, 15), "Bill After Job");
    let service = create_service(&repo, &contract, 1, Frequency::AsAndWhenCalled, &[]);

    create_report(&repo, &service, at(2025, 10, 31, 18), &["/uploads/r/oct.jpg"]);
    create_report(&repo, &service, at(2025, 11, 3, 9), &["/uploads/r/early.jpg"]);
    let latest = create_report(
        &repo,
        &service,
        at(2025, 11, 21, 9),
        &["/uploads/r/back.jpg", "/uploads/r/extra.jpg"],
    );
    create_report(&repo, &service, at(2025, 12, 1, 0), &["/uploads/r/dec.jpg"]);

    let november = BillingPeriod::new(11, 2025)
        .unwrap()
        .calendar_window()
        .unwrap();
    assert_eq!(november.upper, UpperBound::Exclusive);

    let found = repo
        .find_latest_report(service.id, &november)
        .unwrap()
        .unwrap();
    assert_eq!(found, latest);
    assert_eq!(found.back_image(), Some("/uploads/r/back.jpg"));

    let inclusive = ReportWindow {
        start: at(2025, 11, 1, 0),
        end: at(2025, 12, 1, 0),
        upper: UpperBound::Inclusive,
    };
    let found = repo
        .find_latest_report(service.id, &inclusive)
        .unwrap()
        .unwrap();
    assert_eq!(found.service_date, at(2025, 12, 1, 0));

    let empty = BillingPeriod::new(2, 2025)
        .unwrap()
        .calendar_window()
        .unwrap();
    assert!(repo.find_latest_report(service.id, &empty).unwrap().is_none());
}

#[test]
fn test_activity_ledger_filters_and_pages() {
    let test_db = TestDb::new("test_activity_ledger_filters_and_pages.db");
    let repo = test_db.repo();

    let actor = Actor {
        id: "42".into(),
        name: "Clerk".into(),
        email: "clerk@example.com".into(),
    };

    let mut october = NewBillingActivity::new(actor.clone(), ActivityKind::UploadBill)
        .contract_no(Some("G/182".into()))
        .detail("Uploaded 1 bill file(s) for Oct 2025");
    october.created_at = at(2025, 10, 20, 12);
    repo.create_activity(&october).unwrap();

    for day in 1..=3 {
        let mut login = NewBillingActivity::new(actor.clone(), ActivityKind::Login);
        login.created_at = at(2025, 11, day, 8);
        repo.create_activity(&login).unwrap();
    }

    let (total, all) = repo.list_activities(ActivityListQuery::new()).unwrap();
    assert_eq!(total, 4);
    assert_eq!(all[0].created_at, at(2025, 11, 3, 8));

    let (total, uploads) = repo
        .list_activities(ActivityListQuery::new().action(ActivityKind::UploadBill))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(uploads[0].contract_no.as_deref(), Some("G/182"));
    assert_eq!(uploads[0].actor, actor);

    let (total, page) = repo
        .list_activities(
            ActivityListQuery::new()
                .period(BillingPeriod::new(11, 2025).unwrap())
                .paginate(2, 2),
        )
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].created_at, at(2025, 11, 1, 8));
}
