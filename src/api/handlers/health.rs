use actix_web::{
    web::{self, Data},
    HttpResponse, Scope,
};
use serde_json::json;

use crate::core::services::health::HealthService;

pub fn scope() -> Scope {
    web::scope("/health").service(web::resource("").route(web::get().to(health)))
}

async fn health(service: Data<HealthService>) -> HttpResponse {
    let metrics = service.get_metrics();

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "uptime_seconds": metrics.uptime_seconds,
        "processed_requests": metrics.processed_requests,
    }))
}
