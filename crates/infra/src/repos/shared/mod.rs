pub mod inmemory_repo;

/// SQL condition restricting a query to appointments that may still be notified
pub const NOTIFIABLE_STATUS_SQL: &str = "status IN ('scheduled', 'confirmed')";
