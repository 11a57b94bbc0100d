use super::IClientRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_notifier_domain::{Client, ID};

pub struct InMemoryClientRepo {
    clients: std::sync::Mutex<Vec<Client>>,
}

impl InMemoryClientRepo {
    pub fn new() -> Self {
        Self {
            clients: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IClientRepo for InMemoryClientRepo {
    async fn insert(&self, client: &Client) -> anyhow::Result<()> {
        insert(client, &self.clients);
        Ok(())
    }

    async fn find(&self, client_id: &ID) -> Option<Client> {
        find(client_id, &self.clients)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Vec<Client>> {
        Ok(find_by(&self.clients, |c| match &c.email {
            Some(client_email) => client_email.eq_ignore_ascii_case(email),
            None => false,
        }))
    }
}
