use circlecare_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Secret used to verify the HS256 access tokens issued by the
    /// identity provider
    pub access_token_secret: String,
    /// Webhook to POST due-reminder events to. When unset, events are
    /// only written to the log.
    pub reminder_webhook_url: Option<String>,
    /// Key sent along with webhook deliveries so the receiver can verify
    /// the sender
    pub reminder_webhook_key: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        let access_token_secret = match std::env::var("ACCESS_TOKEN_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find ACCESS_TOKEN_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(32);
                info!(
                    "Access token secret was generated and set to: {}",
                    secret
                );
                secret
            }
        };
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };
        Self {
            port,
            access_token_secret,
            reminder_webhook_url: std::env::var("REMINDER_WEBHOOK_URL").ok(),
            reminder_webhook_key: std::env::var("REMINDER_WEBHOOK_KEY").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
