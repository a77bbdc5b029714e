//! Repository structs, one per table. All methods are static and take the
//! pool (or a transaction) explicitly.

pub mod monthly_setting_repo;
pub mod notification_repo;
pub mod point_repo;
pub mod submission_repo;
pub mod task_repo;
pub mod user_repo;

pub use monthly_setting_repo::MonthlySettingRepo;
pub use notification_repo::NotificationRepo;
pub use point_repo::PointRepo;
pub use submission_repo::SubmissionRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
