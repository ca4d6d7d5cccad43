//! Domain aggregates and the billing-cycle rules exposed by the service layer.

pub mod billing_activity;
pub mod billing_card;
pub mod contract;
pub mod frequency;
pub mod period;
pub mod service;
pub mod service_report;
pub mod types;
pub mod window;
