use crate::dtos::JobReportDTO;

pub mod send_deferred_confirmation_sms {
    use super::*;

    pub type APIResponse = JobReportDTO;
}

pub mod send_reminder_sms {
    use super::*;

    pub type APIResponse = JobReportDTO;
}
