use super::IEmailEventRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_notifier_domain::{EmailEvent, ID};

pub struct InMemoryEmailEventRepo {
    events: std::sync::Mutex<Vec<EmailEvent>>,
}

impl InMemoryEmailEventRepo {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEmailEventRepo for InMemoryEmailEventRepo {
    async fn insert(&self, event: &EmailEvent) -> anyhow::Result<()> {
        insert(event, &self.events);
        Ok(())
    }

    async fn find_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<Vec<EmailEvent>> {
        let mut events = find_by(&self.events, |e| &e.appointment_id == appointment_id);
        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }
}
