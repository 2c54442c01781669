use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub postgrest_url: String,
    pub postgrest_api_key: String,
    pub bind_addr: String,
    pub mail_relay_url: String,
    pub mail_send_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            postgrest_url: env::var("POSTGREST_URL").unwrap_or_else(|_| {
                warn!("POSTGREST_URL not set, using empty value");
                String::new()
            }),
            postgrest_api_key: env::var("POSTGREST_API_KEY").unwrap_or_else(|_| {
                warn!("POSTGREST_API_KEY not set, using empty value");
                String::new()
            }),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            mail_relay_url: env::var("MAIL_RELAY_URL").unwrap_or_else(|_| {
                warn!("MAIL_RELAY_URL not set, notification delivery disabled");
                String::new()
            }),
            mail_send_timeout_secs: env::var("MAIL_SEND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.postgrest_url.is_empty() && !self.postgrest_api_key.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.mail_relay_url.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            postgrest_url: String::new(),
            postgrest_api_key: String::new(),
            bind_addr: "0.0.0.0:3000".to_string(),
            mail_relay_url: String::new(),
            mail_send_timeout_secs: 10,
        }
    }
}
