//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_match_workers() -> usize {
    8
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// HS256 key shared with the auth service that issues bearer tokens.
    pub secret: String,
    /// Root directory of stored uploads, served under `/uploads`.
    pub upload_dir: String,
    pub zmq_emailer_pub: String,
    /// Upper bound of concurrent report lookups per aggregation.
    #[serde(default = "default_match_workers")]
    pub match_workers: usize,
    pub mail_from: String,
}
