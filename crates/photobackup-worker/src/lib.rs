//! Background job processing and scheduled tasks for PhotoBackup.
//!
//! This crate provides:
//! - An in-memory job queue holding delayed backup work
//! - The [`WorkerScheduler`], which coalesces notification requests per
//!   folder and implements the service layer's work-scheduling contract
//! - A job executor that dispatches jobs to the correct handler
//! - A worker runner that polls the queue and executes due jobs
//! - A cron scheduler for periodic error history pruning

pub mod backup_scheduler;
pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use backup_scheduler::WorkerScheduler;
pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use queue::JobQueue;
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
