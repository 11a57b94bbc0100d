mod inmemory;
mod postgres;

pub use inmemory::InMemoryStylistRepo;
pub use postgres::PostgresStylistRepo;
use salon_notifier_domain::{Stylist, ID};

#[async_trait::async_trait]
pub trait IStylistRepo: Send + Sync {
    async fn insert(&self, stylist: &Stylist) -> anyhow::Result<()>;
    async fn find(&self, stylist_id: &ID) -> Option<Stylist>;
}
