//! Daily attendance status for the HRM system: check-in/check-out tracking,
//! the status classifier, and the job that finalizes each closed day.

pub mod api;
pub mod classifier;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod jobs;
pub mod model;
pub mod routes;
pub mod store;
pub mod telemetry;
pub mod utils;
pub mod view;
