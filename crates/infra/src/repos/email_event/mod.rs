mod inmemory;
mod postgres;

pub use inmemory::InMemoryEmailEventRepo;
pub use postgres::PostgresEmailEventRepo;
use salon_notifier_domain::{EmailEvent, ID};

/// Append only log of `EmailEvent`s
#[async_trait::async_trait]
pub trait IEmailEventRepo: Send + Sync {
    async fn insert(&self, event: &EmailEvent) -> anyhow::Result<()>;
    /// Events of the given appointment, oldest first
    async fn find_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<Vec<EmailEvent>>;
}
