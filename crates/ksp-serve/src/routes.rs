//! HTTP routes.

use actix_web::{HttpResponse, web};
use ksp_model::CampaignFeatures;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ServeError};
use crate::state::ModelService;

pub const WELCOME_MESSAGE: &str = "Welcome to the Kickstarter Success Prediction App";

/// Register every endpoint, including the JSON extractor that turns body
/// errors into 400 responses.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(welcome))
        .route("/home", web::get().to(welcome))
        .route("/health", web::get().to(health))
        .route("/options", web::get().to(options))
        .route("/predict", web::post().to(predict))
        .route("/reload", web::post().to(reload));
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ServeError::InvalidRequest(err.to_string()).into())
}

#[derive(Debug, Serialize)]
struct Welcome {
    message: &'static str,
}

async fn welcome() -> HttpResponse {
    HttpResponse::Ok().json(Welcome {
        message: WELCOME_MESSAGE,
    })
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
    model_path: String,
    model_digest: String,
    loaded_at: String,
    trained_at: String,
    accuracy: Option<f64>,
    f1: Option<f64>,
}

async fn health(service: web::Data<ModelService>) -> HttpResponse {
    let model = service.current();
    let metadata = model.pipeline.metadata();
    HttpResponse::Ok().json(HealthStatus {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model_path: service.model_path().display().to_string(),
        model_digest: model.digest.clone(),
        loaded_at: model.loaded_at.clone(),
        trained_at: metadata.trained_at.clone(),
        accuracy: metadata.metrics.map(|m| m.accuracy),
        f1: metadata.metrics.map(|m| m.f1),
    })
}

async fn options(service: web::Data<ModelService>) -> HttpResponse {
    HttpResponse::Ok().json(service.options())
}

/// Returns the label as a JSON string, `"1"` for success and `"0"` otherwise.
async fn predict(
    service: web::Data<ModelService>,
    body: web::Json<CampaignFeatures>,
) -> Result<HttpResponse> {
    let outcome = service.predict(&body)?;
    debug!(
        country = %body.country,
        parent_category = %body.parent_category,
        outcome = outcome.label(),
        "prediction served"
    );
    Ok(HttpResponse::Ok().json(outcome.to_string()))
}

#[derive(Debug, Serialize)]
struct Reloaded {
    model_digest: String,
    loaded_at: String,
}

async fn reload(service: web::Data<ModelService>) -> Result<HttpResponse> {
    let model = service.reload()?;
    Ok(HttpResponse::Ok().json(Reloaded {
        model_digest: model.digest.clone(),
        loaded_at: model.loaded_at.clone(),
    }))
}
