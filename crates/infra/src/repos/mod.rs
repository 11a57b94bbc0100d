mod appointment;
mod client;
mod email_event;
mod salon;
mod salon_service;
mod shared;
mod stylist;

pub use appointment::IAppointmentRepo;
use appointment::{InMemoryAppointmentRepo, PostgresAppointmentRepo};
pub use client::IClientRepo;
use client::{InMemoryClientRepo, PostgresClientRepo};
pub use email_event::IEmailEventRepo;
use email_event::{InMemoryEmailEventRepo, PostgresEmailEventRepo};
pub use salon::ISalonRepo;
use salon::{InMemorySalonRepo, PostgresSalonRepo};
pub use salon_service::ISalonServiceRepo;
use salon_service::{InMemorySalonServiceRepo, PostgresSalonServiceRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use stylist::IStylistRepo;
use stylist::{InMemoryStylistRepo, PostgresStylistRepo};
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub appointments: Arc<dyn IAppointmentRepo>,
    pub email_events: Arc<dyn IEmailEventRepo>,
    pub clients: Arc<dyn IClientRepo>,
    pub salons: Arc<dyn ISalonRepo>,
    pub salon_services: Arc<dyn ISalonServiceRepo>,
    pub stylists: Arc<dyn IStylistRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB MIGRATIONS ... [done]");

        Ok(Self {
            appointments: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            email_events: Arc::new(PostgresEmailEventRepo::new(pool.clone())),
            clients: Arc::new(PostgresClientRepo::new(pool.clone())),
            salons: Arc::new(PostgresSalonRepo::new(pool.clone())),
            salon_services: Arc::new(PostgresSalonServiceRepo::new(pool.clone())),
            stylists: Arc::new(PostgresStylistRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            appointments: Arc::new(InMemoryAppointmentRepo::new()),
            email_events: Arc::new(InMemoryEmailEventRepo::new()),
            clients: Arc::new(InMemoryClientRepo::new()),
            salons: Arc::new(InMemorySalonRepo::new()),
            salon_services: Arc::new(InMemorySalonServiceRepo::new()),
            stylists: Arc::new(InMemoryStylistRepo::new()),
        }
    }
}
