//! Feature assembly and prediction dispatch for the Haryali parali price service.

pub mod config;
pub mod error;
pub mod features;
pub mod models;
pub mod serving;
pub mod telemetry;
