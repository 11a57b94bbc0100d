mod inmemory;
mod postgres;

pub use inmemory::InMemoryClientRepo;
pub use postgres::PostgresClientRepo;
use salon_notifier_domain::{Client, ID};

#[async_trait::async_trait]
pub trait IClientRepo: Send + Sync {
    async fn insert(&self, client: &Client) -> anyhow::Result<()>;
    async fn find(&self, client_id: &ID) -> Option<Client>;
    /// Clients whose email matches case insensitively, across all salons
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Vec<Client>>;
}
