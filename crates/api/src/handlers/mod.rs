pub mod auth;
pub mod jobs;
pub mod reports;
pub mod retention;
pub mod settings;
pub mod tracking;
pub mod users;
