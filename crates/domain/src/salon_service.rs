use crate::shared::entity::{Entity, ID};

/// A service offered by a `Salon`, e.g. a haircut or a coloring
#[derive(Debug, Clone, PartialEq)]
pub struct SalonService {
    pub id: ID,
    pub salon_id: ID,
    pub name: String,
    pub duration_minutes: i32,
}

impl SalonService {
    pub fn new(salon_id: ID, name: &str, duration_minutes: i32) -> Self {
        Self {
            id: Default::default(),
            salon_id,
            name: name.into(),
            duration_minutes,
        }
    }
}

impl Entity for SalonService {
    fn id(&self) -> &ID {
        &self.id
    }
}
