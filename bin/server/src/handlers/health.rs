use actix_web::{get, HttpResponse, Responder};
use common::HealthResponse;

/// Health check endpoint
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    })
}
