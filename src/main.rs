use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use civic_match::config::{LogFormat, LoggingSettings, Settings};
use civic_match::core::{Matcher, PromptLimits, SchemeCatalog};
use civic_match::routes::{self, AppState};
use civic_match::services::{ChromaClient, EmbeddingClient, LlmClient, Retriever, Synthesizer};
use std::io;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.log_format() {
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }
}

fn startup_error(what: &str, e: impl std::fmt::Display) -> io::Error {
    error!("Failed to initialize {}: {}", what, e);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", what, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting civic scheme matching service...");

    let catalog = Arc::new(SchemeCatalog::standard().map_err(|e| startup_error("scheme catalog", e))?);
    info!("Scheme catalog loaded ({} schemes)", catalog.len());

    let matcher = Matcher::with_standard_rules();

    let llm = LlmClient::new(settings.llm.clone()).map_err(|e| startup_error("LLM client", e))?;
    if llm.is_configured() {
        info!("LLM provider '{}' configured", llm.provider().as_str());
    } else {
        info!("LLM provider '{}' has no credentials, using local fallback", llm.provider().as_str());
    }

    let limits = PromptLimits {
        max_profile_chars: settings.synthesis.max_profile_chars,
        max_context_chars: settings.synthesis.max_context_chars,
    };
    let synthesizer = Arc::new(Synthesizer::new(llm, limits, settings.retrieval.max_snippet_chars));

    let embedder = EmbeddingClient::new(&settings.embedding).map_err(|e| startup_error("embedding client", e))?;
    let store = ChromaClient::new(&settings.vector_store).map_err(|e| startup_error("vector store client", e))?;
    let retriever = Arc::new(Retriever::new(
        Arc::new(embedder),
        Arc::new(store),
        settings.retrieval.top_k,
        settings.retrieval.max_snippet_chars,
    ));

    info!(
        "Retriever initialized (collection: {}, top_k: {})",
        retriever.collection(),
        settings.retrieval.top_k
    );

    // Build application state
    let app_state = AppState {
        catalog,
        matcher,
        synthesizer,
        retriever,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
