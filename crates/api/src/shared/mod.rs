pub mod auth;
pub mod guard;
pub mod notification_context;
pub mod sms_delivery;
pub mod usecase;

#[cfg(test)]
pub mod test_helpers;
