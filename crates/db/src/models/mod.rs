//! Row types for each table and their conversions into core types.

pub mod app_setting;
pub mod job;
pub mod user;
