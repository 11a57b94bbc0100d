use chrono::Utc;
use salon_notifier_api::Application;
use salon_notifier_domain::{Appointment, Client, Salon, SalonService, HOUR_MILLIS};
use salon_notifier_infra::{InMemoryEmailSender, InMemorySmsSender, NotifierContext, Senders};
use std::sync::Arc;

pub const API_KEY: &str = "test-api-key";

pub struct TestApp {
    pub address: String,
    pub ctx: NotifierContext,
    pub email: Arc<InMemoryEmailSender>,
    pub sms: Arc<InMemorySmsSender>,
    pub client: Client,
    pub http: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }

    /// Authenticated POST without a body
    pub async fn post(&self, path: &str) -> reqwest::Response {
        self.http
            .post(self.url(path))
            .header("x-api-key", API_KEY)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Stores an appointment of the seeded client booked now
    pub async fn book(&self, lead_time_hours: i64) -> Appointment {
        let service = SalonService::new(self.client.salon_id.clone(), "Balayage", 60);
        self.ctx.repos.salon_services.insert(&service).await.unwrap();
        let now = Utc::now().timestamp_millis();
        let start = now + lead_time_hours * HOUR_MILLIS;
        let appointment = Appointment::new(
            self.client.salon_id.clone(),
            self.client.id.clone(),
            service.id,
            start,
            start + HOUR_MILLIS,
            now,
        );
        self.ctx.repos.appointments.insert(&appointment).await.unwrap();
        appointment
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    let email = Arc::new(InMemoryEmailSender::new());
    let sms = Arc::new(InMemorySmsSender::new());

    let mut ctx = NotifierContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.api_key = API_KEY.into();
    ctx.config.email_webhook_key = None;
    ctx.config.job_schedulers_enabled = false;
    ctx.senders = Senders {
        email: email.clone(),
        sms: sms.clone(),
    };

    let salon = Salon::new("HairPlay", chrono_tz::Europe::Paris);
    let mut client = Client::new(salon.id.clone(), "Colette", "Martin");
    client.email = Some("colette@example.com".into());
    client.phone = Some("+33612345678".into());
    ctx.repos.salons.insert(&salon).await.unwrap();
    ctx.repos.clients.insert(&client).await.unwrap();

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp {
        address,
        ctx,
        email,
        sms,
        client,
        http: reqwest::Client::new(),
    }
}
