use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::Utc;
use log::info;
use serde_json::json;

use crate::batch;
use crate::error::ApiError;
use crate::inference::InferenceService;
use crate::models::BookingFeatures;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(welcome)
        .service(health)
        .service(model_info)
        .service(predict)
        .service(predict_batch);
}

#[get("/")]
pub async fn welcome() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to the Hotel Cancellation Prediction API",
    }))
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[get("/model-info")]
pub async fn model_info(service: web::Data<InferenceService>) -> impl Responder {
    HttpResponse::Ok().json(service.model_info())
}

#[post("/predict")]
pub async fn predict(
    service: web::Data<InferenceService>,
    payload: web::Json<BookingFeatures>,
) -> Result<HttpResponse, ApiError> {
    let features = payload.into_inner();
    let result = web::block(move || service.predict(&features))
        .await
        .map_err(|e| ApiError::PredictionFailed(e.to_string()))??;

    info!(
        "prediction: {:?} ({:.2}%)",
        result.prediction, result.probability
    );
    Ok(HttpResponse::Ok().json(result))
}

#[post("/predict/batch")]
pub async fn predict_batch(
    service: web::Data<InferenceService>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let rows = batch::parse_csv(body.as_ref())?;
    if rows.is_empty() {
        return Err(ApiError::InvalidInput("CSV contains no data rows".into()));
    }

    info!("batch prediction over {} rows", rows.len());
    let results = web::block(move || service.predict_batch(&rows))
        .await
        .map_err(|e| ApiError::PredictionFailed(e.to_string()))??;

    Ok(HttpResponse::Ok().json(results))
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": "unknown endpoint",
        "kind": "not_found",
    }))
}
