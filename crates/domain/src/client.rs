use crate::shared::entity::{Entity, ID};

/// A customer of a `Salon`
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: ID,
    pub salon_id: ID,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    /// E.164 formatted phone number
    pub phone: Option<String>,
}

impl Client {
    pub fn new(salon_id: ID, first_name: &str, last_name: &str) -> Self {
        Self {
            id: Default::default(),
            salon_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl Entity for Client {
    fn id(&self) -> &ID {
        &self.id
    }
}
