//! Bill upload and email dispatch.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::billing_activity::{ActivityKind, NewBillingActivity};
use crate::domain::types::ContractNo;
use crate::dto::bills::{SendBillEmailResponse, UploadBillResponse};
use crate::forms::bills::{SendBillEmailForm, UploadBillPayload};
use crate::mailer::{BillEmail, BillMailer};
use crate::repository::{BillingActivityWriter, ContractReader, ServiceReportReader};
use crate::services::activity::spawn_activity;
use crate::services::billing::collect_card_paths;
use crate::services::{ServiceError, ServiceResult};

/// Public URL prefix of `upload_dir`.
pub const UPLOADS_PREFIX: &str = "/uploads";
const BILLS_DIR: &str = "bills";

/// `{timestamp}-{uuid}-{name}` with any directory part of `original` removed.
fn stored_file_name(now: NaiveDateTime, original: &str) -> String {
    let name = original
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or("bill");

    format!(
        "{}-{}-{}",
        now.and_utc().timestamp_millis(),
        Uuid::new_v4(),
        name
    )
}

/// Stores the uploaded bills and lists the card images that go with them.
pub fn upload_bill<R>(
    repo: Arc<R>,
    user: &AuthenticatedUser,
    payload: UploadBillPayload,
    upload_dir: &Path,
    now: NaiveDateTime,
) -> ServiceResult<UploadBillResponse>
where
    R: ContractReader + ServiceReportReader + BillingActivityWriter + Send + Sync + 'static,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let contract = repo
        .get_contract_by_number(&payload.contract_no)?
        .ok_or(ServiceError::NotFound)?;

    let bills_dir = upload_dir.join(BILLS_DIR);
    fs::create_dir_all(&bills_dir).map_err(|err| {
        log::error!("Failed to create {}: {err}", bills_dir.display());
        ServiceError::Internal(format!("Cannot store bills: {err}"))
    })?;

    let mut bill_paths = Vec::with_capacity(payload.files.len());
    for file in &payload.files {
        let stored = stored_file_name(now, &file.file_name);
        fs::copy(&file.source, bills_dir.join(&stored)).map_err(|err| {
            log::error!("Failed to store bill {}: {err}", file.file_name);
            ServiceError::Internal(format!("Cannot store bill {}: {err}", file.file_name))
        })?;
        bill_paths.push(format!("{UPLOADS_PREFIX}/{BILLS_DIR}/{stored}"));
    }

    let card_paths = collect_card_paths(repo.as_ref(), &contract, payload.period, now)?;

    spawn_activity(
        repo,
        NewBillingActivity::new(user.actor(), ActivityKind::UploadBill)
            .contract_no(Some(payload.contract_no.to_string()))
            .detail(format!(
                "Uploaded {} bill file(s) for {}",
                bill_paths.len(),
                payload.period.due_tag()
            )),
    );

    Ok(UploadBillResponse {
        success: true,
        message: "Bill uploaded successfully.".to_string(),
        bill_paths,
        card_paths,
        contract_no: payload.contract_no.into_inner(),
    })
}

fn email_body(contact_name: Option<&str>, contract_no: &ContractNo) -> String {
    format!(
        "Dear {},\n\nPlease find attached the invoice and service report for contract {contract_no}.\n\nRegards,\nBilling Team",
        contact_name.unwrap_or("Customer")
    )
}

/// Emails the stored bills and cards to the contract's bill-to contact.
pub fn send_bill_email<R>(
    repo: Arc<R>,
    mailer: &dyn BillMailer,
    user: &AuthenticatedUser,
    form: SendBillEmailForm,
) -> ServiceResult<SendBillEmailResponse>
where
    R: ContractReader + BillingActivityWriter + Send + Sync + 'static,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate bill email request: {err}");
        let outside_uploads = err
            .field_errors()
            .values()
            .any(|errors| errors.iter().any(|e| e.code == "upload_path"));
        let message = if outside_uploads {
            format!("Attachments must be stored under {UPLOADS_PREFIX}/.")
        } else {
            "Contract number and at least one bill file are required.".to_string()
        };
        return Err(ServiceError::Form(message));
    }

    let contract_no = ContractNo::new(form.contract_no)?;

    let contract = repo
        .get_contract_by_number(&contract_no)?
        .ok_or(ServiceError::NotFound)?
        .contract;

    let to = contract.contact.email.clone().ok_or_else(|| {
        ServiceError::Form(format!("Contract {contract_no} has no bill-to email."))
    })?;

    let mut attachments = form.file_paths;
    attachments.extend(form.card_paths);

    let email = BillEmail {
        to,
        subject: format!("Invoice & Service Report for Contract {contract_no}"),
        body: email_body(contract.contact.name.as_deref(), &contract_no),
        attachments,
    };

    mailer.send(&email).map_err(|err| {
        log::error!("Failed to send bill email for {contract_no}: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    spawn_activity(
        repo,
        NewBillingActivity::new(user.actor(), ActivityKind::SendEmail)
            .contract_no(Some(contract_no.to_string()))
            .detail(format!(
                "Sent bill email to {} with {} attachment(s)",
                email.to,
                email.attachments.len()
            )),
    );

    Ok(SendBillEmailResponse {
        success: true,
        message: format!("Bill email sent to {}.", email.to),
    })
}
