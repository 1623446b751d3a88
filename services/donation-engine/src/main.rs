use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use donation_engine::collaborators::{LocalReceiptRenderer, LoggingMailer, LoggingNotifier};
use donation_engine::config::Config;
use donation_engine::receipt::ReceiptSequencer;
use donation_engine::services::DonationService;
use donation_engine::store::DonationStore;
use donation_engine::{handlers, metrics};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

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

    info!("Starting Donation Engine...");

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    info!("Configuration loaded successfully");

    if let Err(e) = metrics::register_metrics(prometheus::default_registry()) {
        warn!("Metrics registration failed: {}", e);
    }

    // Initialize store, sequencer and collaborators
    let store = Arc::new(DonationStore::new());
    let sequencer = Arc::new(ReceiptSequencer::new());
    let renderer = Arc::new(LocalReceiptRenderer::new(config.receipts.base_url.clone()));

    let service = Arc::new(DonationService::new(
        store,
        sequencer,
        renderer,
        Arc::new(LoggingMailer),
        Arc::new(LoggingNotifier),
        Duration::from_secs(config.receipts.side_effect_timeout_secs),
    ));

    info!("Donation service initialized successfully");

    let server_config = config.server.clone();
    let service_data = web::Data::new(service);

    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(service_data.clone())
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
