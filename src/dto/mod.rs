//! JSON payloads returned by the billing API.

pub mod activity;
pub mod billing;
pub mod bills;
