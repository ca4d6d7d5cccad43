use std::path::Path;

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::domain::period::BillingPeriod;
use crate::dto::billing::CardsResponse;
use crate::forms::billing::{DownloadCardForm, PeriodQuery};
use crate::forms::bills::{SendBillEmailForm, UploadBillForm, UploadBillPayload};
use crate::mailer::BillMailer;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::{
    ServiceError, activity as activity_service, billing as billing_service,
    bills as bills_service,
};

fn parse_period(query: &PeriodQuery) -> Result<BillingPeriod, ServiceError> {
    BillingPeriod::try_from(query).map_err(|err| ServiceError::Form(err.to_string()))
}

#[get("/billing/due-cards")]
pub async fn due_cards(
    user: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let period = match parse_period(&query) {
        Ok(period) => period,
        Err(err) => return error_response(err),
    };

    match billing_service::load_due_cards(
        repo.into_inner(),
        &user,
        period,
        Utc::now().naive_utc(),
        server_config.match_workers,
    )
    .await
    {
        Ok(due) => {
            let message = due.message();
            HttpResponse::Ok().json(CardsResponse::new(due.into_cards(), message))
        }
        Err(err) => {
            log::error!("Failed to load due cards for {period}: {err}");
            error_response(err)
        }
    }
}

#[get("/billing/after-job")]
pub async fn after_job_cards(
    user: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let period = match parse_period(&query) {
        Ok(period) => period,
        Err(err) => return error_response(err),
    };

    match billing_service::load_after_job_cards(
        repo.into_inner(),
        &user,
        period,
        server_config.match_workers,
    )
    .await
    {
        Ok(cards) => HttpResponse::Ok().json(CardsResponse::new(cards, None)),
        Err(err) => {
            log::error!("Failed to load after-job cards for {period}: {err}");
            error_response(err)
        }
    }
}

#[post("/billing/download-card")]
pub async fn download_card(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<DownloadCardForm>,
) -> impl Responder {
    match activity_service::log_card_download(repo.into_inner(), &user, form) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(err) => error_response(err),
    }
}

#[post("/billing/upload-bill")]
pub async fn upload_bill(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<UploadBillForm>,
) -> impl Responder {
    let payload = match UploadBillPayload::try_from(&form) {
        Ok(payload) => payload,
        Err(err) => return error_response(ServiceError::Form(err.to_string())),
    };

    match bills_service::upload_bill(
        repo.into_inner(),
        &user,
        payload,
        Path::new(&server_config.upload_dir),
        Utc::now().naive_utc(),
    ) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[post("/billing/send-bill-email")]
pub async fn send_bill_email(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    mailer: web::Data<dyn BillMailer>,
    web::Json(form): web::Json<SendBillEmailForm>,
) -> impl Responder {
    match bills_service::send_bill_email(repo.into_inner(), mailer.get_ref(), &user, form) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}
