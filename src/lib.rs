#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod dashboard;
pub mod error;
pub mod outcome;
pub mod stats;
pub mod telemetry;
pub mod types;
pub mod util;
pub mod view;
pub mod zbx_client;

pub type Result<T> = std::result::Result<T, error::Error>;
