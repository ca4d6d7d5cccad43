//! HTTP handlers of the billing API.

use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::services::ServiceError;

pub mod activity;
pub mod auth;
pub mod billing;

/// Registers every API handler under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(auth::login)
            .service(auth::logout)
            .service(billing::due_cards)
            .service(billing::after_job_cards)
            .service(billing::download_card)
            .service(billing::upload_bill)
            .service(billing::send_bill_email)
            .service(activity::list_activities)
            .service(activity::create_activity),
    );
}

fn message(status: &mut actix_web::HttpResponseBuilder, msg: &str) -> HttpResponse {
    status.json(json!({ "msg": msg }))
}

/// Maps a service failure onto the API's `{"msg": ...}` error responses.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => message(&mut HttpResponse::Unauthorized(), "Unauthorized."),
        ServiceError::Forbidden => {
            message(&mut HttpResponse::Forbidden(), "Insufficient permissions.")
        }
        ServiceError::NotFound => message(&mut HttpResponse::NotFound(), "Not found."),
        ServiceError::Form(msg) | ServiceError::TypeConstraint(msg) => {
            message(&mut HttpResponse::BadRequest(), &msg)
        }
        ServiceError::Repository(err) => {
            log::error!("Repository failure: {err}");
            message(
                &mut HttpResponse::InternalServerError(),
                "Internal server error.",
            )
        }
        ServiceError::Internal(err) => {
            log::error!("Internal failure: {err}");
            message(
                &mut HttpResponse::InternalServerError(),
                "Internal server error.",
            )
        }
    }
}
