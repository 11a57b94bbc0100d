use crate::shared::entity::{Entity, ID};
use chrono_tz::Tz;

#[derive(Debug, Clone, PartialEq)]
pub struct Salon {
    pub id: ID,
    pub name: String,
    /// Appointment times are rendered in this timezone
    pub timezone: Tz,
    pub phone: Option<String>,
}

impl Salon {
    pub fn new(name: &str, timezone: Tz) -> Self {
        Self {
            id: Default::default(),
            name: name.into(),
            timezone,
            phone: None,
        }
    }
}

impl Entity for Salon {
    fn id(&self) -> &ID {
        &self.id
    }
}
