//! Civic Match - eligibility matching and explanation service for welfare schemes
//!
//! This library matches citizen profiles against a catalog of government
//! schemes with per-scheme rules, explains the matches through an external
//! language model with a deterministic local fallback, and offers a
//! retrieval-augmented recommendation pipeline over a vector store.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, RuleTable, RuleVerdict, SchemeCatalog};
pub use models::{Profile, Recommendation, Scheme, SchemeMatch, RetrieveRequest, SynthesizeRequest};
