use chrono::{TimeZone, Utc};
use salon_notifier_domain::{Appointment, Client, Salon, SalonService};
use salon_notifier_infra::{
    InMemoryEmailSender, InMemorySmsSender, NotifierContext, Senders, VirtualSys,
};
use std::sync::Arc;

/// An inmemory context on a virtual clock with recording senders and one
/// salon, client and service already stored
pub struct TestEnv {
    pub ctx: NotifierContext,
    pub sys: Arc<VirtualSys>,
    pub email: Arc<InMemoryEmailSender>,
    pub sms: Arc<InMemorySmsSender>,
    pub salon: Salon,
    pub client: Client,
    pub service: SalonService,
}

impl TestEnv {
    pub fn now(&self) -> i64 {
        use salon_notifier_infra::ISys;
        self.sys.get_timestamp_millis()
    }

    /// An appointment booked now and starting `lead_time` millis later
    pub fn new_appointment(&self, lead_time: i64) -> Appointment {
        Appointment::new(
            self.salon.id.clone(),
            self.client.id.clone(),
            self.service.id.clone(),
            self.now() + lead_time,
            self.now() + lead_time + 45 * 60 * 1000,
            self.now(),
        )
    }

    pub async fn book(&self, lead_time: i64) -> Appointment {
        let appointment = self.new_appointment(lead_time);
        self.ctx.repos.appointments.insert(&appointment).await.unwrap();
        appointment
    }

    /// Stores another client of the salon with its own phone and email
    pub async fn add_client(&self, first_name: &str, phone: &str) -> Client {
        let mut client = Client::new(self.salon.id.clone(), first_name, "Durand");
        client.phone = Some(phone.into());
        client.email = Some(format!("{}@example.com", first_name.to_lowercase()));
        self.ctx.repos.clients.insert(&client).await.unwrap();
        client
    }

    pub async fn find(&self, appointment: &Appointment) -> Appointment {
        self.ctx
            .repos
            .appointments
            .find(&appointment.id)
            .await
            .unwrap()
    }
}

pub async fn setup() -> TestEnv {
    // Monday 2025-03-10 09:00 UTC
    let now = Utc
        .with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
        .unwrap()
        .timestamp_millis();
    let sys = Arc::new(VirtualSys::new(now));
    let email = Arc::new(InMemoryEmailSender::new());
    let sms = Arc::new(InMemorySmsSender::new());

    let mut ctx = NotifierContext::create_inmemory();
    ctx.sys = sys.clone();
    ctx.senders = Senders {
        email: email.clone(),
        sms: sms.clone(),
    };
    ctx.config.job_concurrency = 2;

    let salon = Salon::new("HairPlay", chrono_tz::Europe::Paris);
    let mut client = Client::new(salon.id.clone(), "Colette", "Martin");
    client.email = Some("colette@example.com".into());
    client.phone = Some("+33612345678".into());
    let service = SalonService::new(salon.id.clone(), "Coupe", 45);
    ctx.repos.salons.insert(&salon).await.unwrap();
    ctx.repos.clients.insert(&client).await.unwrap();
    ctx.repos.salon_services.insert(&service).await.unwrap();

    TestEnv {
        ctx,
        sys,
        email,
        sms,
        salon,
        client,
        service,
    }
}
