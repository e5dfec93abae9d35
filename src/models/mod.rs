// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    EligibilityLabel, Jurisdiction, Profile, Recommendation, RecommendationSnippet, RetrievedChunk,
    Scheme, SchemeMatch, NATIONWIDE_MARKER,
};
pub use requests::{RetrieveRequest, SynthesizeRequest};
pub use responses::{ErrorResponse, HealthResponse, RecommendResponse, RetrieveResponse, SynthesizeResponse};
