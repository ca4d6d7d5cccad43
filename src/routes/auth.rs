use actix_web::{HttpResponse, Responder, post, web};
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::domain::billing_activity::ActivityKind;
use crate::repository::DieselRepository;
use crate::services::activity as activity_service;

/// Acknowledges a session issued by the auth service and logs it.
#[post("/auth/login")]
pub async fn login(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    activity_service::record_session_event(repo.into_inner(), &user, ActivityKind::Login);

    HttpResponse::Ok().json(json!({
        "id": user.sub,
        "name": user.name,
        "email": user.email,
        "roles": user.roles,
    }))
}

#[post("/auth/logout")]
pub async fn logout(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    activity_service::record_session_event(repo.into_inner(), &user, ActivityKind::Logout);

    HttpResponse::Ok().json(json!({ "success": true }))
}
