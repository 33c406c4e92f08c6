//! Keygate server - Main entry point.
//!
//! Starts the Actix-web server with the configured API key gate in front of
//! the protected scope.

use actix_web::{App, HttpServer, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use keygate::api;
use keygate::auth::build_gate;
use keygate::config::{Config, GateSettings};
use keygate::middleware::{ApiKeyFilter, RequestLogger};

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    // Simple check - just verify we can load config
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        if health_check() {
            std::process::exit(0);
        } else {
            std::process::exit(1);
        }
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - KEYGATE_MODE=plain needs KEYGATE_API_KEY");
            error!("  - KEYGATE_MODE=encrypted needs KEYGATE_AES_SECRET and KEYGATE_API_KEY_DIGEST");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Keygate Server");
    info!("  Environment: {}", config.environment);
    info!("  Gate: {}", config.gate.mode());
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for the API key and AES secret");
    }

    if let GateSettings::Encrypted(encrypted) = &config.gate {
        info!(
            "Encrypted gate: digest encoding {}, malformed credentials {}",
            encrypted.digest_encoding, encrypted.malformed_policy
        );
    }

    // Gate configuration is read-only and shared across workers
    let bind_address = config.bind_address();
    let gate_mode = config.gate.mode();
    let filter = ApiKeyFilter::new(build_gate(&config.gate));

    let worker_count = if config.is_development() {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        App::new()
            // Add request logging middleware
            .wrap(RequestLogger)
            .app_data(web::Data::new(gate_mode))
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .service(
                        web::scope("/protected")
                            .wrap(filter.clone())
                            .configure(api::configure_protected_routes),
                    ),
            )
    });

    server.workers(worker_count).bind(&bind_address)?.run().await
}
