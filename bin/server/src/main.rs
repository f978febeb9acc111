mod config;
mod constants;
mod handlers;
mod messages;
mod state;

use actix_web::{web, App, HttpServer};
use config::ServerConfig;
use messages::Catalog;
use state::AppState;
use storage::{DocError, DocumentStore, MetaRegistry, FILE_SYSTEM};
use tracing::{error, info};

fn fatal(e: DocError) -> std::io::Error {
    error!("Startup failed: {}", e);
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing with env filter
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting document archive server (PID: {})",
        std::process::id()
    );

    let cfg = ServerConfig::load()?;

    let mut store = DocumentStore::new(&cfg.data_dir).map_err(fatal)?;
    store.set_lookback_years(cfg.lookback_years);
    store.set_existback_years(cfg.existback_years);
    info!(
        "Document store initialized: root={:?}, lookback={}, existback={}",
        cfg.data_dir, cfg.lookback_years, cfg.existback_years
    );

    // Factory wiring is a startup concern; a broken registry is fatal
    // here, never at request time.
    let metas = MetaRegistry::with_defaults().map_err(fatal)?;
    let meta_creator = metas.get(FILE_SYSTEM).ok_or_else(|| {
        fatal(DocError::InvalidConfig(format!(
            "no metadata factory registered as {}",
            FILE_SYSTEM
        )))
    })?;

    let state = web::Data::new(AppState::new(
        store,
        meta_creator,
        Catalog::new(&cfg.locale_dir),
        cfg.ui_language.clone(),
        cfg.max_file_size,
        cfg.max_meta_size,
    ));

    let bind_address = cfg.bind_address();
    let payload_limit = cfg.max_file_size;

    info!("Starting server on http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(payload_limit))
            .service(handlers::health::health)
            .service(handlers::upload::upload_document)
            .service(handlers::meta::upload_meta_default)
            .service(handlers::meta::upload_meta_lang)
            // Explicit HEAD probes must come before the GET routes that
            // would otherwise answer HEAD requests.
            .service(handlers::exists::exists_exact)
            .service(handlers::exists::exists_lookback)
            .service(handlers::fetch::fetch_document_exact)
            .service(handlers::fetch::fetch_document_exact_lang)
            .service(handlers::fetch::fetch_document_lookback)
            .service(handlers::fetch::fetch_document_lookback_lang)
            .service(handlers::meta::fetch_meta_exact)
            .service(handlers::meta::fetch_meta_exact_lang)
            .service(handlers::meta::fetch_meta_lookback)
            .service(handlers::meta::fetch_meta_lookback_lang)
    })
    .bind(&bind_address)
    .map_err(|e| {
        error!("Failed to bind to {}: {}", bind_address, e);
        e
    })?
    .run()
    .await
}
