use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use volunteer_engine::config::Config;
use volunteer_engine::services::VolunteerService;
use volunteer_engine::store::VolunteerStore;
use volunteer_engine::{handlers, metrics};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .json()
        .init();

    info!("Starting Volunteer Engine...");

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    info!("Configuration loaded successfully");

    if let Err(e) = metrics::register_metrics(prometheus::default_registry()) {
        warn!("Metrics registration failed: {}", e);
    }

    let store = Arc::new(VolunteerStore::new());
    let service = Arc::new(VolunteerService::new(store));

    info!("Volunteer service initialized successfully");

    let server_config = config.server.clone();
    let service_data = web::Data::new(service);
    let leaderboard_config = web::Data::new(config.leaderboard.clone());

    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(service_data.clone())
            .app_data(leaderboard_config.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(handlers::configure_routes)
    })
    .workers(server_config.workers)
    .bind((server_config.host, server_config.port))?
    .run()
    .await
}
