use crate::error::NotifierError;
use salon_notifier_domain::ID;

pub struct Guard {}

impl Guard {
    pub fn against_malformed_id(val: &str) -> Result<ID, NotifierError> {
        val.parse()
            .map_err(|e| NotifierError::BadClientData(format!("{}", e)))
    }
}
