use super::ISalonServiceRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_notifier_domain::{SalonService, ID};

pub struct InMemorySalonServiceRepo {
    services: std::sync::Mutex<Vec<SalonService>>,
}

impl InMemorySalonServiceRepo {
    pub fn new() -> Self {
        Self {
            services: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ISalonServiceRepo for InMemorySalonServiceRepo {
    async fn insert(&self, service: &SalonService) -> anyhow::Result<()> {
        insert(service, &self.services);
        Ok(())
    }

    async fn find(&self, service_id: &ID) -> Option<SalonService> {
        find(service_id, &self.services)
    }
}
