use salon_notifier_domain::REMINDER_WINDOW;
use salon_notifier_utils::create_random_secret;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct EmailProviderConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct SmsProviderConfig {
    pub api_url: String,
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Postgres connection string, the repositories are kept in memory when missing
    pub database_url: Option<String>,
    /// Key expected in the `x-api-key` header of the dispatch and job routes
    pub api_key: String,
    /// Key expected in the `x-webhook-key` header of the email webhook, if any
    pub email_webhook_key: Option<String>,
    pub email_dry_run: bool,
    pub sms_dry_run: bool,
    pub email_provider: Option<EmailProviderConfig>,
    pub sms_provider: Option<SmsProviderConfig>,
    pub send_timeout_secs: u64,
    /// Maximum number of appointments a job notifies at the same time
    pub job_concurrency: usize,
    pub job_schedulers_enabled: bool,
    /// Width in millis of the reminder window, which is also how often the
    /// reminder job runs
    pub reminder_window: i64,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parses the variable or falls back to `default` with a warning
fn parse_env_var<T: FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match env_var(name) {
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        None => default,
    }
}

fn parse_flag(name: &str, default: bool) -> bool {
    match env_var(name) {
        Some(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                warn!(
                    "The given {}: {} is not a boolean, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        None => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let api_key = match env_var("NOTIFIER_API_KEY") {
            Some(key) => key,
            None => {
                info!("Did not find NOTIFIER_API_KEY environment variable. Going to create one.");
                let key = create_random_secret(32);
                info!("Api key for the protected routes was generated and set to: {}", key);
                key
            }
        };

        let email_provider = match (env_var("EMAIL_API_KEY"), env_var("EMAIL_FROM")) {
            (Some(api_key), Some(from)) => Some(EmailProviderConfig {
                api_url: env_var("EMAIL_API_URL").unwrap_or_else(|| "https://api.resend.com".into()),
                api_key,
                from,
            }),
            _ => None,
        };
        let sms_provider = match (
            env_var("SMS_ACCOUNT_SID"),
            env_var("SMS_AUTH_TOKEN"),
            env_var("SMS_FROM_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(SmsProviderConfig {
                api_url: env_var("SMS_API_URL")
                    .unwrap_or_else(|| "https://api.twilio.com/2010-04-01".into()),
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        let job_concurrency = match parse_env_var("JOB_CONCURRENCY", 4_usize) {
            0 => {
                warn!("JOB_CONCURRENCY must be positive, falling back to 1.");
                1
            }
            n => n,
        };

        Self {
            port: parse_env_var("PORT", 5000),
            database_url: env_var("DATABASE_URL"),
            api_key,
            email_webhook_key: env_var("EMAIL_WEBHOOK_KEY"),
            email_dry_run: parse_flag("EMAIL_DRY_RUN", false),
            sms_dry_run: parse_flag("SMS_DRY_RUN", false),
            email_provider,
            sms_provider,
            send_timeout_secs: parse_env_var("SEND_TIMEOUT_SECS", 10),
            job_concurrency,
            job_schedulers_enabled: parse_flag("JOB_SCHEDULERS_ENABLED", true),
            reminder_window: REMINDER_WINDOW,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        std::env::set_var("SALON_NOTIFIER_TEST_FLAG_ON", "TRUE");
        std::env::set_var("SALON_NOTIFIER_TEST_FLAG_BAD", "maybe");
        assert!(parse_flag("SALON_NOTIFIER_TEST_FLAG_ON", false));
        assert!(!parse_flag("SALON_NOTIFIER_TEST_FLAG_BAD", false));
        assert!(parse_flag("SALON_NOTIFIER_TEST_FLAG_MISSING", true));
    }

    #[test]
    fn invalid_numbers_fall_back_to_default() {
        std::env::set_var("SALON_NOTIFIER_TEST_PORT", "eighty");
        assert_eq!(parse_env_var("SALON_NOTIFIER_TEST_PORT", 5000_usize), 5000);
        std::env::set_var("SALON_NOTIFIER_TEST_TIMEOUT", "3");
        assert_eq!(parse_env_var("SALON_NOTIFIER_TEST_TIMEOUT", 10_u64), 3);
    }
}
