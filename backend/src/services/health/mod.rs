use actix_web::web::{get, scope};
use actix_web::{HttpResponse, Responder, Scope};
use inventory_common::model::health::HealthStatus;

pub fn configure_routes() -> Scope {
    scope("/health").route("", get().to(process))
}

/// Always `{"status": "running"}`; touches neither configuration nor the sheet.
async fn process() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus::running())
}
