mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, EmailProviderConfig, SmsProviderConfig};
pub use repos::{
    IAppointmentRepo, IClientRepo, IEmailEventRepo, ISalonRepo, ISalonServiceRepo, IStylistRepo,
    Repos,
};
pub use services::*;
use std::sync::Arc;
use std::time::Duration;
pub use system::{ISys, RealSys, VirtualSys};
use tracing::{error, info, warn};

/// The outbound notification channels
#[derive(Clone)]
pub struct Senders {
    pub email: Arc<dyn IEmailSender>,
    pub sms: Arc<dyn ISmsSender>,
}

impl Senders {
    /// Picks a sender per channel: dry run when asked for, the HTTP provider
    /// when credentials are present and a disabled sender otherwise.
    /// A misconfigured channel never takes the other one down.
    pub fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.send_timeout_secs);

        let email: Arc<dyn IEmailSender> = match (&config.email_provider, config.email_dry_run) {
            (_, true) => {
                warn!("EMAIL_DRY_RUN is enabled, emails are logged instead of sent");
                Arc::new(DryRunEmailSender {})
            }
            (Some(provider), false) => Arc::new(HttpEmailSender::new(
                &provider.api_url,
                &provider.api_key,
                &provider.from,
                timeout,
            )),
            (None, false) => {
                error!("Email provider credentials are missing, confirmation emails are disabled");
                Arc::new(DisabledEmailSender {})
            }
        };

        let sms: Arc<dyn ISmsSender> = match (&config.sms_provider, config.sms_dry_run) {
            (_, true) => {
                warn!("SMS_DRY_RUN is enabled, sms are logged instead of sent");
                Arc::new(DryRunSmsSender {})
            }
            (Some(provider), false) => Arc::new(HttpSmsSender::new(
                &provider.api_url,
                &provider.account_sid,
                &provider.auth_token,
                &provider.from_number,
                timeout,
            )),
            (None, false) => {
                error!("Sms provider credentials are missing, sms notifications are disabled");
                Arc::new(DisabledSmsSender {})
            }
        };

        Self { email, sms }
    }

    pub fn dry_run() -> Self {
        Self {
            email: Arc::new(DryRunEmailSender {}),
            sms: Arc::new(DryRunSmsSender {}),
        }
    }
}

#[derive(Clone)]
pub struct NotifierContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub senders: Senders,
}

impl NotifierContext {
    /// Context with inmemory repositories and dry run senders
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            senders: Senders::dry_run(),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<NotifierContext> {
    let config = Config::new();
    let repos = match &config.database_url {
        Some(connection_string) => Repos::create_postgres(connection_string).await?,
        None => {
            warn!("DATABASE_URL is not set, using inmemory repositories");
            Repos::create_inmemory()
        }
    };
    let senders = Senders::from_config(&config);
    info!("Infrastructure context is ready");
    Ok(NotifierContext {
        repos,
        senders,
        config,
        sys: Arc::new(RealSys {}),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channels_are_configured_independently() {
        let mut config = Config::new();
        config.email_provider = None;
        config.email_dry_run = false;
        config.sms_provider = None;
        config.sms_dry_run = true;
        let senders = Senders::from_config(&config);

        let sms = senders.sms.send("+33612345678", "Bonjour").await;
        assert!(sms.is_ok());
        let email = senders
            .email
            .send(&EmailMessage {
                to: "colette@example.com".into(),
                subject: "Confirmation".into(),
                html: String::new(),
                text: None,
                tags: Vec::new(),
                metadata: Default::default(),
            })
            .await;
        assert_eq!(email, Err(SendError::NotConfigured("email")));
    }
}
