//! HTTP server startup.

use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::config::ServeConfig;
use crate::error::{Result, ServeError};
use crate::routes::configure_routes;
use crate::state::ModelService;

/// Load the model and serve until the server is stopped.
///
/// Must run inside an actix system (`#[actix_web::main]` or
/// `actix_web::rt::System`).
pub async fn run(config: ServeConfig) -> Result<()> {
    let service = web::Data::new(ModelService::load(&config.model_path)?);
    let address = config.bind_address();

    info!("Starting HTTP server on {}", address);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", "ksp-serve")))
            .configure(configure_routes)
    })
    .bind(&address)
    .map_err(|source| ServeError::Bind {
        address: address.clone(),
        source,
    })?
    .run();

    info!("HTTP server listening on {}", address);
    server.await.map_err(ServeError::Server)?;
    info!("HTTP server stopped");
    Ok(())
}
