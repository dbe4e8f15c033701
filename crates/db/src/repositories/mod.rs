//! Repository layer: one zero-sized struct per table, each method taking a pool.

pub mod app_setting_repo;
pub mod job_repo;
pub mod user_repo;

pub use app_setting_repo::AppSettingRepo;
pub use job_repo::JobRepo;
pub use user_repo::UserRepo;
