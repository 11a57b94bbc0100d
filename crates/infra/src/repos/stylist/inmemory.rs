use super::IStylistRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_notifier_domain::{Stylist, ID};

pub struct InMemoryStylistRepo {
    stylists: std::sync::Mutex<Vec<Stylist>>,
}

impl InMemoryStylistRepo {
    pub fn new() -> Self {
        Self {
            stylists: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IStylistRepo for InMemoryStylistRepo {
    async fn insert(&self, stylist: &Stylist) -> anyhow::Result<()> {
        insert(stylist, &self.stylists);
        Ok(())
    }

    async fn find(&self, stylist_id: &ID) -> Option<Stylist> {
        find(stylist_id, &self.stylists)
    }
}
