use anyhow::{Context, Result};
use std::env;

use crate::response::formatter::DEFAULT_SUCCESS_MESSAGE;
use crate::response::RenderSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub response: ResponseConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub instance_id: String,
}

#[derive(Debug, Clone)]
pub struct ResponseConfig {
    pub success_message: String,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
                instance_id: env::var("INSTANCE_ID")
                    .or_else(|_| env::var("HOSTNAME"))
                    .unwrap_or_else(|_| "unknown".to_string()),
            },
            response: ResponseConfig {
                success_message: env::var("RESPONSE_SUCCESS_MESSAGE")
                    .unwrap_or_else(|_| DEFAULT_SUCCESS_MESSAGE.to_string()),
                max_body_bytes: env::var("RESPONSE_MAX_BODY_BYTES")
                    .unwrap_or_else(|_| "16777216".to_string())
                    .parse()
                    .context("RESPONSE_MAX_BODY_BYTES must be a valid number")?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            success_message: self.response.success_message.clone(),
            max_body_bytes: self.response.max_body_bytes,
        }
    }
}
