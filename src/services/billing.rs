//! Due-card and after-job aggregation.
//!
//! Both aggregators resolve the candidate services first, then run one
//! report lookup per service on the blocking pool, at most `workers` at a
//! time, and finally sort the collected cards.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use futures::{StreamExt, TryStreamExt, stream};

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::billing_card::{BillingCard, sort_cards};
use crate::domain::contract::{BillingCycle, ContractWithServices};
use crate::domain::period::{BillingPeriod, DueTag};
use crate::domain::service::Service;
use crate::domain::types::ContractId;
use crate::domain::window::{ReportWindow, resolve_window};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ContractReader, ServiceReader, ServiceReportReader};
use crate::services::{ServiceError, ServiceResult};

/// Outcome of [`load_due_cards`].
#[derive(Debug, PartialEq)]
pub enum DueCards {
    Cards(Vec<BillingCard>),
    /// Nothing is billable in the period.
    NoneDue(DueTag),
}

impl DueCards {
    pub fn message(&self) -> Option<String> {
        match self {
            DueCards::Cards(_) => None,
            DueCards::NoneDue(tag) => Some(format!("No billing cards due for {tag}.")),
        }
    }

    pub fn into_cards(self) -> Vec<BillingCard> {
        match self {
            DueCards::Cards(cards) => cards,
            DueCards::NoneDue(_) => Vec::new(),
        }
    }
}

/// Runs a synchronous repository call on the blocking thread pool.
pub(crate) async fn run_blocking<T, F>(task: F) -> ServiceResult<T>
where
    F: FnOnce() -> RepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| ServiceError::Internal(format!("Blocking task failed: {err}")))?
        .map_err(ServiceError::from)
}

struct CardJob {
    contract: Arc<ContractWithServices>,
    service: Service,
}

async fn match_cards<R, F>(
    repo: Arc<R>,
    jobs: Vec<CardJob>,
    workers: usize,
    matcher: F,
) -> ServiceResult<Vec<BillingCard>>
where
    R: ServiceReportReader + Send + Sync + 'static,
    F: Fn(&R, CardJob) -> RepositoryResult<Option<BillingCard>> + Copy + Send + 'static,
{
    let matched: Vec<Option<BillingCard>> = stream::iter(jobs)
        .map(|job| {
            let repo = Arc::clone(&repo);
            run_blocking(move || matcher(repo.as_ref(), job))
        })
        .buffer_unordered(workers.max(1))
        .try_collect()
        .await?;

    let mut cards: Vec<BillingCard> = matched.into_iter().flatten().collect();
    sort_cards(&mut cards);
    Ok(cards)
}

fn due_card<R>(
    repo: &R,
    job: CardJob,
    period: BillingPeriod,
    now: NaiveDateTime,
) -> RepositoryResult<Option<BillingCard>>
where
    R: ServiceReportReader + ?Sized,
{
    let CardJob { contract, service } = job;

    let Some(window) = resolve_window(
        &service.frequency,
        contract.contract.start_date,
        period,
        now,
    ) else {
        log::warn!(
            "Cannot resolve the {} window of service {} for {period}",
            service.frequency,
            service.id
        );
        return Ok(None);
    };

    let report = repo.find_latest_report(service.id, &window.inclusive())?;

    Ok(Some(BillingCard::due(
        &contract.contract,
        contract.total_cards(),
        &service,
        report,
    )))
}

fn after_job_card<R>(
    repo: &R,
    job: CardJob,
    window: ReportWindow,
) -> RepositoryResult<Option<BillingCard>>
where
    R: ServiceReportReader + ?Sized,
{
    let CardJob { contract, service } = job;

    let report = repo.find_latest_report(service.id, &window)?;

    Ok(report.map(|report| {
        BillingCard::after_job(&contract.contract, contract.total_cards(), &service, report)
    }))
}

/// Lists the cards scheduled for `period` with their latest evidence.
///
/// `now` anchors the fortnightly, weekly and daily windows.
pub async fn load_due_cards<R>(
    repo: Arc<R>,
    user: &AuthenticatedUser,
    period: BillingPeriod,
    now: NaiveDateTime,
    workers: usize,
) -> ServiceResult<DueCards>
where
    R: ServiceReader + ContractReader + ServiceReportReader + Send + Sync + 'static,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let tag = period.due_tag();

    let services = {
        let repo = Arc::clone(&repo);
        let tag = tag.clone();
        run_blocking(move || repo.list_services_due(&tag)).await?
    };

    if services.is_empty() {
        return Ok(DueCards::NoneDue(tag));
    }

    let mut contract_ids: Vec<ContractId> = services.iter().map(|s| s.contract_id).collect();
    contract_ids.sort();
    contract_ids.dedup();

    let contracts: HashMap<ContractId, Arc<ContractWithServices>> = {
        let repo = Arc::clone(&repo);
        run_blocking(move || repo.list_contracts_with_services(&contract_ids)).await?
    }
    .into_iter()
    .map(|contract| (contract.contract.id, Arc::new(contract)))
    .collect();

    let mut orphaned = 0usize;
    let mut jobs = Vec::with_capacity(services.len());
    for service in services {
        match contracts.get(&service.contract_id) {
            Some(contract) => jobs.push(CardJob {
                contract: Arc::clone(contract),
                service,
            }),
            None => {
                orphaned += 1;
                log::warn!(
                    "Service {} references missing contract {}",
                    service.id,
                    service.contract_id
                );
            }
        }
    }

    if orphaned > 0 {
        log::warn!("Skipped {orphaned} orphaned services while loading cards for {tag}");
    }

    let cards = match_cards(repo, jobs, workers, move |repo, job| {
        due_card(repo, job, period, now)
    })
    .await?;

    if cards.is_empty() {
        return Ok(DueCards::NoneDue(tag));
    }

    log::info!("Loaded {} billing cards for {tag}", cards.len());

    Ok(DueCards::Cards(cards))
}

/// Lists the cards of "Bill After Job" contracts that have a visit
/// recorded within the calendar month of `period`.
pub async fn load_after_job_cards<R>(
    repo: Arc<R>,
    user: &AuthenticatedUser,
    period: BillingPeriod,
    workers: usize,
) -> ServiceResult<Vec<BillingCard>>
where
    R: ContractReader + ServiceReportReader + Send + Sync + 'static,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let window = period
        .calendar_window()
        .ok_or_else(|| ServiceError::Internal(format!("Period {period} is out of range")))?;

    let contracts = {
        let repo = Arc::clone(&repo);
        run_blocking(move || repo.list_contracts_by_cycle(&BillingCycle::AfterJob)).await?
    };

    let mut jobs = Vec::new();
    for contract in contracts.into_iter().map(Arc::new) {
        for service in &contract.services {
            jobs.push(CardJob {
                contract: Arc::clone(&contract),
                service: service.clone(),
            });
        }
    }

    match_cards(repo, jobs, workers, move |repo, job| {
        after_job_card(repo, job, window)
    })
    .await
}

/// Front images of every card of `contract` followed by the back images
/// matched for `period` under the due-card window rules.
pub fn collect_card_paths<R>(
    repo: &R,
    contract: &ContractWithServices,
    period: BillingPeriod,
    now: NaiveDateTime,
) -> RepositoryResult<Vec<String>>
where
    R: ServiceReportReader + ?Sized,
{
    let mut paths: Vec<String> = contract
        .services
        .iter()
        .filter_map(|service| service.card_image.clone())
        .collect();

    for service in &contract.services {
        let Some(window) = resolve_window(
            &service.frequency,
            contract.contract.start_date,
            period,
            now,
        ) else {
            continue;
        };

        if let Some(report) = repo.find_latest_report(service.id, &window.inclusive())?
            && let Some(back) = report.back_image()
        {
            paths.push(back.to_string());
        }
    }

    Ok(paths)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::SERVICE_ADMIN_ROLE;
    use crate::domain::contract::{BillToContact, BillingConfig, Contract};
    use crate::domain::frequency::Frequency;
    use crate::domain::service_report::ServiceReport;
    use crate::domain::types::{CardNumber, ContractNo, ServiceId, ServiceReportId};
    use crate::domain::window::UpperBound;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn clerk() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "clerk@example.com".to_string(),
            name: "Clerk".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    fn outsider() -> AuthenticatedUser {
        AuthenticatedUser {
            roles: vec![SERVICE_ADMIN_ROLE.to_string()],
            ..clerk()
        }
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn service(id: i32, contract_id: i32, card: i32, frequency: Frequency) -> Service {
        Service {
            id: ServiceId::new(id).unwrap(),
            contract_id: ContractId::new(contract_id).unwrap(),
            card_number: CardNumber::new(card).unwrap(),
            frequency,
            card_image: Some(format!("/uploads/cards/{id}-front.jpg")),
            billing_months: BTreeSet::from(["Oct 2025".to_string()]),
        }
    }

    fn contract(id: i32, no: &str, cycle: BillingCycle, services: Vec<Service>) -> ContractWithServices {
        ContractWithServices {
            contract: Contract {
                id: ContractId::new(id).unwrap(),
                contract_no: ContractNo::new(no).unwrap(),
                start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                billing: BillingConfig::single(cycle),
                bill_to: Some("Acme".into()),
                ship_to: Some("Acme Plant".into()),
                contact: BillToContact::default(),
            },
            services,
        }
    }

    fn report(service_id: i32, date: NaiveDateTime) -> ServiceReport {
        ServiceReport {
            id: ServiceReportId::new(service_id * 10).unwrap(),
            service_id: ServiceId::new(service_id).unwrap(),
            service_date: date,
            images: vec![format!("/uploads/reports/{service_id}-back.jpg")],
        }
    }

    #[actix_web::test]
    async fn due_cards_require_access_role() {
        let mut repo = MockRepository::new();
        repo.expect_list_services_due().times(0);

        let result = load_due_cards(
            Arc::new(repo),
            &outsider(),
            BillingPeriod::new(10, 2025).unwrap(),
            at(2025, 10, 15),
            4,
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[actix_web::test]
    async fn empty_schedule_is_reported_as_none_due() {
        let mut repo = MockRepository::new();
        repo.expect_list_services_due()
            .withf(|tag| tag.as_str() == "Oct 2025")
            .returning(|_| Ok(vec![]));
        repo.expect_list_contracts_with_services().times(0);

        let result = load_due_cards(
            Arc::new(repo),
            &clerk(),
            BillingPeriod::new(10, 2025).unwrap(),
            at(2025, 10, 15),
            4,
        )
        .await
        .unwrap();

        assert_eq!(
            result.message().as_deref(),
            Some("No billing cards due for Oct 2025.")
        );
        assert!(result.into_cards().is_empty());
    }

    #[actix_web::test]
    async fn orphaned_services_are_skipped_and_cards_sorted() {
        let mut repo = MockRepository::new();
        repo.expect_list_services_due().returning(|_| {
            Ok(vec![
                service(3, 1, 2, Frequency::Monthly),
                service(9, 99, 1, Frequency::Monthly),
                service(2, 1, 1, Frequency::Quarterly),
            ])
        });
        repo.expect_list_contracts_with_services()
            .withf(|ids| ids == [ContractId::new(1).unwrap(), ContractId::new(99).unwrap()])
            .returning(|_| {
                Ok(vec![contract(
                    1,
                    "G/182",
                    BillingCycle::Scheduled("Monthly".into()),
                    vec![
                        service(2, 1, 1, Frequency::Quarterly),
                        service(3, 1, 2, Frequency::Monthly),
                    ],
                )])
            });
        repo.expect_find_latest_report()
            .withf(|_, window| window.upper == UpperBound::Inclusive)
            .returning(|service_id, _| {
                if service_id.get() == 2 {
                    Ok(Some(report(2, at(2025, 9, 3))))
                } else {
                    Ok(None)
                }
            });

        let cards = load_due_cards(
            Arc::new(repo),
            &clerk(),
            BillingPeriod::new(10, 2025).unwrap(),
            at(2025, 10, 15),
            2,
        )
        .await
        .unwrap()
        .into_cards();

        let labels: Vec<_> = cards.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["G/182 (1/2)", "G/182 (2/2)"]);
        assert_eq!(cards[0].back_image(), Some("/uploads/reports/2-back.jpg"));
        assert_eq!(cards[1].service_date(), None);
    }

    #[actix_web::test]
    async fn store_failure_aborts_the_aggregation() {
        let mut repo = MockRepository::new();
        repo.expect_list_services_due()
            .returning(|_| Ok(vec![service(2, 1, 1, Frequency::Monthly)]));
        repo.expect_list_contracts_with_services().returning(|_| {
            Ok(vec![contract(
                1,
                "G/182",
                BillingCycle::Scheduled("Monthly".into()),
                vec![service(2, 1, 1, Frequency::Monthly)],
            )])
        });
        repo.expect_find_latest_report()
            .returning(|_, _| Err(RepositoryError::ConnectionError("down".into())));

        let result = load_due_cards(
            Arc::new(repo),
            &clerk(),
            BillingPeriod::new(10, 2025).unwrap(),
            at(2025, 10, 15),
            4,
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }

    #[actix_web::test]
    async fn after_job_cards_need_evidence_in_the_month() {
        let mut repo = MockRepository::new();
        repo.expect_list_contracts_by_cycle()
            .withf(|cycle| *cycle == BillingCycle::AfterJob)
            .returning(|_| {
                Ok(vec![contract(
                    5,
                    "A/10",
                    BillingCycle::AfterJob,
                    vec![
                        service(11, 5, 1, Frequency::AsAndWhenCalled),
                        service(12, 5, 2, Frequency::AsAndWhenCalled),
                    ],
                )])
            });
        repo.expect_find_latest_report()
            .withf(|_, window| window.upper == UpperBound::Exclusive)
            .returning(|service_id, _| {
                if service_id.get() == 12 {
                    Ok(Some(report(12, at(2025, 11, 20))))
                } else {
                    Ok(None)
                }
            });

        let cards = load_after_job_cards(
            Arc::new(repo),
            &clerk(),
            BillingPeriod::new(11, 2025).unwrap(),
            4,
        )
        .await
        .unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].label, "A/10 (2/2)");
        assert_eq!(cards[0].frequency, "Bill After Job");
    }

    #[test]
    fn card_paths_list_fronts_then_matched_backs() {
        let mut repo = MockRepository::new();
        repo.expect_find_latest_report().returning(|service_id, _| {
            if service_id.get() == 3 {
                Ok(Some(report(3, at(2025, 10, 2))))
            } else {
                Ok(None)
            }
        });
        let contract = contract(
            1,
            "G/182",
            BillingCycle::Scheduled("Monthly".into()),
            vec![
                service(2, 1, 1, Frequency::Monthly),
                service(3, 1, 2, Frequency::Monthly),
            ],
        );

        let paths = collect_card_paths(
            &repo,
            &contract,
            BillingPeriod::new(10, 2025).unwrap(),
            at(2025, 10, 15),
        )
        .unwrap();

        assert_eq!(
            paths,
            vec![
                "/uploads/cards/2-front.jpg",
                "/uploads/cards/3-front.jpg",
                "/uploads/reports/3-back.jpg",
            ]
        );
    }
}
