mod config;
mod error;
mod loader;
mod services;
mod session_controller;
mod state;
mod store;

use crate::config::AppConfig;
use crate::services::certificates::capture::{DocumentEncoder, GenPdfEncoder, RasterCapture};
use crate::services::certificates::export::ArtifactExporter;
use crate::services::messages::provider::{GeminiClient, TextGenerator};
use crate::services::results::resolve::RecordResolver;
use crate::session_controller::state::{start_session_sweeper, SessionsState};
use crate::state::AppState;
use crate::store::SqliteStore;
use actix_web::{web, App, HttpServer};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info, warn};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "backend", about = "Course results and certificates service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default).
    Serve,
    /// Load participant records from a JSON array or a CSV file.
    Import {
        file: PathBuf,
        /// Database to write to; defaults to CERTS_DB_PATH.
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Import { file, db } => {
            let db = db.unwrap_or_else(|| config.db_path.clone());
            let report = loader::run(&file, &db).map_err(|e| {
                error!("Import failed: {}", e);
                io::Error::other(e.to_string())
            })?;
            info!(
                "{} records imported in {} batch(es), {} skipped",
                report.imported, report.batches, report.skipped
            );
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> io::Result<()> {
    let store = SqliteStore::open(&config.db_path).map_err(|e| {
        error!("Cannot open {}: {}", config.db_path.display(), e);
        io::Error::other(e.to_string())
    })?;

    // Missing credentials disable generation; every flow then settles on the advisory.
    let generator: Option<Arc<dyn TextGenerator>> = match GeminiClient::from_config(&config.provider)
    {
        Ok(client) => {
            info!("Message generation enabled (model {})", config.provider.model);
            Some(Arc::new(client))
        }
        Err(e) => {
            error!("Message generation disabled: {}", e);
            None
        }
    };

    let encoder: Option<Arc<dyn DocumentEncoder>> = match GenPdfEncoder::new(&config.fonts_dir) {
        Ok(encoder) => Some(Arc::new(encoder)),
        Err(e) => {
            warn!("Document export disabled: {}", e);
            None
        }
    };
    let exporter = Arc::new(ArtifactExporter::new(
        Some(Arc::new(RasterCapture)),
        encoder,
        config.export_label.clone(),
    ));

    let sessions = SessionsState::new(generator, config.provider.timeout);

    // Start session sweeper task
    let sweeper_state = sessions.clone();
    let ttl = config.session_ttl;
    tokio::spawn(async move {
        start_session_sweeper(sweeper_state, ttl).await;
    });

    let state = web::Data::new(AppState {
        resolver: RecordResolver::new(Arc::new(store.clone()), config.store_timeout),
        settings: store,
        exporter,
        sessions,
    });

    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB surfaces
            .app_data(state.clone())
            // Scopes under /api/sessions/{id}/... go before /api/sessions itself.
            .service(services::certificates::configure_routes())
            .service(services::messages::configure_routes())
            .service(services::sessions::configure_routes())
            .service(services::results::configure_routes())
            .service(services::settings::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
