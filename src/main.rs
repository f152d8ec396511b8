use std::{process::ExitCode, time::Duration};

use crate::{
    backend::ReservationBackend, configuration::Configuration,
    configuration_handler::ConfigurationHandler, database_interface::DatabaseInterface,
    http::create_app, local_reservations::LocalReservations,
    reservation_manager::ReservationManager,
};
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod backend;
mod booking_rules;
mod booking_validator;
mod configuration;
mod configuration_handler;
mod database_interface;
mod http;
mod local_reservations;
mod reservation_manager;
mod schema;
mod slot_status;
#[cfg(test)]
mod testutils;
mod types;

#[derive(Clone)]
struct AppState<T: ReservationBackend> {
    reservation_manager: ReservationManager<T>,
    website_title: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("######################");
    println!("# Study Room Booking #");
    println!("######################");

    let configuration = ConfigurationHandler::parse_arguments();
    let rules = match configuration.booking_rules() {
        Ok(rules) => rules,
        Err(err) => {
            error!(%err, "Invalid booking rules");
            return ExitCode::FAILURE;
        }
    };
    info!(
        slots = ?rules.catalog().labels(),
        capacity = rules.capacity(),
        celebration_date = ?rules.celebration_date(),
        "Booking rules loaded"
    );

    let address = format!("0.0.0.0:{}", configuration.port());
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%err, "Failed to bind {address}");
            return ExitCode::FAILURE;
        }
    };
    println!("Accessable at:\n{address}");

    let website_title = configuration.website_title();
    let app = if let Some(database_url) = configuration.database_url() {
        let backend = loop {
            match DatabaseInterface::new(&database_url) {
                Ok(backend) => {
                    info!("Successfully connected to database");
                    break backend;
                }
                Err(err) => {
                    error!(?err, "Failed to establish database connection. Retry in 1 sec. You may want to restart it with database disabled (impersistent reservations).");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        create_app(AppState {
            reservation_manager: ReservationManager::new(backend, rules),
            website_title,
        })
    } else {
        warn!("No database configured, reservations are kept in memory only");
        create_app(AppState {
            reservation_manager: ReservationManager::new(LocalReservations::default(), rules),
            website_title,
        })
    };

    if let Err(err) = axum::serve(listener, app).await {
        error!(%err, "Server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
