//! Scheduled sync runs for the gallery catalog.
//!
//! This crate provides:
//! - A cron scheduler that triggers a full sync run on `worker.sync_schedule`
//! - A single-run helper shared by the schedule and the startup trigger

pub mod job;
pub mod scheduler;

pub use job::run_sync_job;
pub use scheduler::CronScheduler;
