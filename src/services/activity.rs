//! Activity ledger workflows.

use std::sync::Arc;

use validator::Validate;

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::billing_activity::{ActivityKind, BillingActivity, NewBillingActivity};
use crate::dto::activity::{ActivityDto, ActivityPage};
use crate::forms::activity::{ActivityForm, ActivityListParams};
use crate::forms::billing::DownloadCardForm;
use crate::repository::{
    ActivityListQuery, BillingActivityReader, BillingActivityWriter, DEFAULT_ITEMS_PER_PAGE,
};
use crate::services::{ServiceError, ServiceResult};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Writes `activity` in the background. Failures are logged and dropped.
pub fn spawn_activity<R>(repo: Arc<R>, activity: NewBillingActivity)
where
    R: BillingActivityWriter + Send + Sync + 'static + ?Sized,
{
    let task = move || {
        if let Err(err) = repo.create_activity(&activity) {
            log::error!(
                "Failed to record {} activity of {}: {err}",
                activity.action,
                activity.actor.email
            );
        }
    };

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(task);
        }
        Err(_) => task(),
    }
}

/// Logs a login or logout of `user`. Sessions are issued upstream.
pub fn record_session_event<R>(repo: Arc<R>, user: &AuthenticatedUser, kind: ActivityKind)
where
    R: BillingActivityWriter + Send + Sync + 'static,
{
    spawn_activity(repo, NewBillingActivity::new(user.actor(), kind));
}

/// Logs that a card image was saved by the client.
pub fn log_card_download<R>(
    repo: Arc<R>,
    user: &AuthenticatedUser,
    form: DownloadCardForm,
) -> ServiceResult<()>
where
    R: BillingActivityWriter + Send + Sync + 'static,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate card download: {err}");
        return Err(ServiceError::Form(
            "Contract number and card path are required.".to_string(),
        ));
    }

    let detail = format!(
        "Downloaded {} card for contract {}, path: {}",
        form.card_side.as_str(),
        form.contract_no,
        form.card_path
    );

    spawn_activity(
        repo,
        NewBillingActivity::new(user.actor(), form.card_side.activity())
            .contract_no(Some(form.contract_no))
            .detail(detail),
    );

    Ok(())
}

/// Records an activity posted explicitly by the client.
pub fn record_activity<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ActivityForm,
) -> ServiceResult<BillingActivity>
where
    R: BillingActivityWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let activity = form
        .into_activity(user)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_activity(&activity).map_err(|err| {
        log::error!("Failed to record activity: {err}");
        ServiceError::from(err)
    })
}

/// Lists ledger entries for administrators.
pub fn list_activities<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ActivityListParams,
) -> ServiceResult<ActivityPage>
where
    R: BillingActivityReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let page = params.page.unwrap_or(1).max(1);

    let mut query = ActivityListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(period) = params
        .period()
        .map_err(|err| ServiceError::Form(err.to_string()))?
    {
        query = query.period(period);
    }

    if let Some(action) = params
        .action()
        .map_err(|err| ServiceError::Form(err.to_string()))?
    {
        query = query.action(action);
    }

    let (total, items) = repo.list_activities(query)?;

    Ok(ActivityPage {
        total,
        page,
        items: items.into_iter().map(ActivityDto::from).collect(),
    })
}
