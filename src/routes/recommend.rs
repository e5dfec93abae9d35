use actix_web::{web, HttpResponse, Responder};
use crate::core::recommendations_from_chunks;
use crate::models::{Profile, RecommendResponse};
use crate::routes::schemes::AppState;
use tracing::Instrument;

/// Configure the vector-store recommendation route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/recommend", web::post().to(recommend));
}

/// Retrieval-augmented recommendation endpoint
///
/// POST /recommend
///
/// The body is the profile itself. Store and model failures degrade to
/// grouped snippets or an empty list, never to an error status.
async fn recommend(state: web::Data<AppState>, profile: web::Json<Profile>) -> impl Responder {
    let span = tracing::info_span!("recommend", request_id = %uuid::Uuid::new_v4());
    let profile = profile.into_inner();

    let response = async {
        let chunks = state.retriever.retrieve_for_profile(&profile).await;
        tracing::info!("Retrieved {} chunks", chunks.len());

        let parsed = state.synthesizer.synthesize_recommendations(&profile, &chunks).await;

        let recommendations = if parsed.recommendations.is_empty() {
            recommendations_from_chunks(&chunks, state.retriever.max_snippet_chars())
        } else {
            parsed.recommendations
        };

        RecommendResponse {
            profile: profile.clone(),
            recommendations,
            llm_text: parsed.llm_text,
        }
    }
    .instrument(span)
    .await;

    HttpResponse::Ok().json(response)
}
