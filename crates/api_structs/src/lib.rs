mod appointment;
mod job;
mod status;
mod webhook;

pub mod dtos {
    pub use crate::job::dtos::*;
    pub use crate::webhook::dtos::*;
}

pub use crate::appointment::api::*;
pub use crate::job::api::*;
pub use crate::status::api::*;
pub use crate::webhook::api::*;
