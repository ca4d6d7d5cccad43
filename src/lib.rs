#[cfg(feature = "server")]
use std::sync::Arc;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::mailer::{BillMailer, ZmqMailer};
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::services::bills::UPLOADS_PREFIX;

#[cfg(feature = "server")]
pub mod auth;
pub mod db;
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod mailer;
pub mod models;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

pub const SERVICE_ACCESS_ROLE: &str = "billing";
pub const SERVICE_ADMIN_ROLE: &str = "billing_admin";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Outbound bill emails are published to the emailer service over ZeroMQ.
    let mailer = ZmqMailer::connect(
        &server_config.zmq_emailer_pub,
        server_config.mail_from.clone(),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to start ZMQ mailer: {e}")))?;
    let mailer: Arc<dyn BillMailer> = Arc::new(mailer);

    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    std::fs::create_dir_all(&server_config.upload_dir)?;

    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!(
        "Starting billing service on {}:{}",
        bind_address.0,
        bind_address.1
    );

    let repo = web::Data::new(repo);
    let mailer: web::Data<dyn BillMailer> = web::Data::from(mailer);
    let config = web::Data::new(server_config);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new(UPLOADS_PREFIX, &config.upload_dir))
            .configure(routes::configure)
            .app_data(repo.clone())
            .app_data(mailer.clone())
            .app_data(config.clone())
    })
    .bind(bind_address)?
    .run()
    .await
}
