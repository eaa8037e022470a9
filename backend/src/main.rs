mod config;
mod error;
mod services;
mod sheets;
mod state;

use crate::config::Config;
use crate::sheets::google::GoogleConnector;
use crate::state::AppState;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let connector = GoogleConnector::new(config.sheets_timeout).map_err(std::io::Error::other)?;

    info!("Serving from install directory {}", config.install_dir.display());
    match &config.sheet_id {
        Some(_) => info!("Spreadsheet configured"),
        None => warn!("SHEET_ID is not set; /items will be empty and /submit_count will fail"),
    }
    match &config.credentials {
        Some(source) => info!("Service account credentials from {}", source.describe()),
        None => warn!("No service account credentials configured"),
    }
    if config.shared_pin.is_none() {
        warn!("SHARED_PIN is not set; /submit_count accepts submissions from anyone");
    }

    let bind = (config.host.clone(), config.port);
    let state = AppState::new(config, Arc::new(connector));

    info!("Server running at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(services::cors(&state.config))
            .wrap(Logger::default())
            .app_data(services::json_config())
            .app_data(web::Data::new(state.clone()))
            .service(services::health::configure_routes())
            .service(services::items::configure_routes())
            .service(services::counts::configure_routes())
            .service(services::index::configure_routes())
    })
    .bind(bind)?
    .run()
    .await
}
