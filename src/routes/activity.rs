use actix_web::{HttpResponse, Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::dto::activity::ActivityDto;
use crate::forms::activity::{ActivityForm, ActivityListParams};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::activity as activity_service;

#[get("/activity")]
pub async fn list_activities(
    user: AuthenticatedUser,
    params: web::Query<ActivityListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match activity_service::list_activities(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err),
    }
}

#[post("/activity")]
pub async fn create_activity(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ActivityForm>,
) -> impl Responder {
    match activity_service::record_activity(repo.get_ref(), &user, form) {
        Ok(activity) => HttpResponse::Created().json(ActivityDto::from(activity)),
        Err(err) => error_response(err),
    }
}
