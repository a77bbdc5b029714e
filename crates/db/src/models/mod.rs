//! Row models and DTOs, one module per table.

pub mod monthly_setting;
pub mod notification;
pub mod point_record;
pub mod submission;
pub mod task;
pub mod user;
