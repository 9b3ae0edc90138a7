use std::env;

use crate::error::ApiError;
use crate::inference::DEFAULT_THRESHOLD;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub model_path: String,
    pub decision_threshold: f32,
}

impl Config {
    pub fn from_env() -> Result<Self, ApiError> {
        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),

            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|e| ApiError::Config(format!("PORT: {e}")))?,

            workers: match env::var("WORKERS") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|e| ApiError::Config(format!("WORKERS: {e}")))?,
                Err(_) => num_cpus::get(),
            },

            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "models/hotel_cancellation.onnx".to_string()),

            decision_threshold: env::var("DECISION_THRESHOLD")
                .unwrap_or_else(|_| DEFAULT_THRESHOLD.to_string())
                .parse()
                .map_err(|e| ApiError::Config(format!("DECISION_THRESHOLD: {e}")))?,
        };

        if !(0.0..=1.0).contains(&config.decision_threshold) {
            return Err(ApiError::Config(format!(
                "DECISION_THRESHOLD must be between 0 and 1 (got {})",
                config.decision_threshold
            )));
        }

        Ok(config)
    }
}
