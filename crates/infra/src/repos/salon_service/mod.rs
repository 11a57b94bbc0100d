mod inmemory;
mod postgres;

pub use inmemory::InMemorySalonServiceRepo;
pub use postgres::PostgresSalonServiceRepo;
use salon_notifier_domain::{SalonService, ID};

#[async_trait::async_trait]
pub trait ISalonServiceRepo: Send + Sync {
    async fn insert(&self, service: &SalonService) -> anyhow::Result<()>;
    async fn find(&self, service_id: &ID) -> Option<SalonService>;
}
