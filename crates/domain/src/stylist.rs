use crate::shared::entity::{Entity, ID};

#[derive(Debug, Clone, PartialEq)]
pub struct Stylist {
    pub id: ID,
    pub salon_id: ID,
    pub name: String,
}

impl Stylist {
    pub fn new(salon_id: ID, name: &str) -> Self {
        Self {
            id: Default::default(),
            salon_id,
            name: name.into(),
        }
    }
}

impl Entity for Stylist {
    fn id(&self) -> &ID {
        &self.id
    }
}
