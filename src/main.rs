pub mod batch;
pub mod config;
pub mod error;
pub mod inference;
pub mod models;
pub mod routes;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use log::{error, info};

use crate::config::Config;
use crate::error::ApiError;
use crate::inference::{InferenceService, OnnxClassifier};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                e.to_string(),
            ));
        }
    };

    info!("starting hotel cancellation prediction API");

    // The artifact is loaded exactly once; every worker shares the same
    // read-only plan.
    let classifier = match OnnxClassifier::load(&config.model_path) {
        Ok(classifier) => {
            info!("model loaded from {}", config.model_path);
            classifier
        }
        Err(e) => {
            error!("{e}");
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                e.to_string(),
            ));
        }
    };

    let service = web::Data::new(InferenceService::new(
        Arc::new(classifier),
        config.decision_threshold,
    ));

    let bind_address = format!("{}:{}", config.host, config.port);
    info!("listening on http://{}", bind_address);
    info!("decision threshold: {}", config.decision_threshold);
    info!("endpoints:");
    info!("  GET  /              - welcome");
    info!("  GET  /health        - health check");
    info!("  GET  /model-info    - feature order, schema version, threshold");
    info!("  POST /predict       - single prediction (JSON feature record)");
    info!("  POST /predict/batch - batch prediction (CSV body)");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .wrap(cors)
            .app_data(service.clone())
            .app_data(
                web::JsonConfig::default()
                    .limit(1024 * 1024)
                    .error_handler(|err, _req| ApiError::InvalidInput(err.to_string()).into()),
            )
            .configure(routes::configure)
            .default_service(web::route().to(routes::not_found))
    })
    .workers(config.workers)
    .bind(&bind_address)?
    .run()
    .await
}
