use super::ISalonRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_notifier_domain::{Salon, ID};

pub struct InMemorySalonRepo {
    salons: std::sync::Mutex<Vec<Salon>>,
}

impl InMemorySalonRepo {
    pub fn new() -> Self {
        Self {
            salons: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ISalonRepo for InMemorySalonRepo {
    async fn insert(&self, salon: &Salon) -> anyhow::Result<()> {
        insert(salon, &self.salons);
        Ok(())
    }

    async fn find(&self, salon_id: &ID) -> Option<Salon> {
        find(salon_id, &self.salons)
    }
}
