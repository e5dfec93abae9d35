use actix_web::{web, HttpResponse, Responder};
use crate::core::{Matcher, SchemeCatalog};
use crate::models::{HealthResponse, RetrieveRequest, RetrieveResponse, SynthesizeRequest, SynthesizeResponse};
use crate::services::{Retriever, Synthesizer};
use std::sync::Arc;
use tracing::Instrument;

/// Application state shared across all handlers
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SchemeCatalog>,
    pub matcher: Matcher,
    pub synthesizer: Arc<Synthesizer>,
    pub retriever: Arc<Retriever>,
}

/// Configure rule-based matching and synthesis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/retrieve", web::post().to(retrieve))
        .route("/synthesize", web::post().to(synthesize));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let llm = state.synthesizer.llm();

    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        provider: llm.provider().as_str().to_string(),
        llm_configured: llm.is_configured(),
        gemini_configured: llm.gemini_configured(),
        collection: state.retriever.collection().to_string(),
        schemes: state.catalog.len(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rule-based retrieval endpoint
///
/// POST /retrieve
///
/// Request body:
/// ```json
/// {
///   "profile": {"age": 34, "state": "Telangana", "occupation": "farmer"}
/// }
/// ```
async fn retrieve(state: web::Data<AppState>, req: web::Json<RetrieveRequest>) -> impl Responder {
    let result = state.matcher.find_matches(&req.profile, &state.catalog);

    tracing::info!(
        "Matched {} of {} schemes",
        result.matches.len(),
        result.total_schemes
    );

    HttpResponse::Ok().json(RetrieveResponse {
        schemes: result.matches,
    })
}

/// Explanation endpoint
///
/// POST /synthesize
async fn synthesize(state: web::Data<AppState>, req: web::Json<SynthesizeRequest>) -> impl Responder {
    let span = tracing::info_span!("synthesize", request_id = %uuid::Uuid::new_v4());
    let req = req.into_inner();

    let text = async {
        tracing::info!("Synthesizing {} schemes (language: {})", req.schemes.len(), req.language);
        state
            .synthesizer
            .synthesize(&req.profile, &req.schemes, &req.language)
            .await
    }
    .instrument(span)
    .await;

    HttpResponse::Ok().json(SynthesizeResponse { text })
}
