//! Database models shared across the billing repository.

pub mod billing_activity;
#[cfg(feature = "server")]
pub mod config;
pub mod contract;
pub mod service;
pub mod service_report;
#[cfg(feature = "server")]
pub mod zmq;
