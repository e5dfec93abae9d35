// Core pipeline exports
pub mod catalog;
pub mod fallback;
pub mod filters;
pub mod matcher;
pub mod normalizer;
pub mod prompts;
pub mod recommendations;
pub mod rules;

pub use catalog::{CatalogError, SchemeCatalog};
pub use fallback::{local_explanation, no_schemes_text};
pub use filters::passes_jurisdiction_gate;
pub use matcher::{MatchResult, Matcher};
pub use normalizer::{normalize_profile, NormalizedProfile};
pub use prompts::{build_recommendation_prompt, build_synthesis_prompt, PromptLimits};
pub use recommendations::{parse_llm_recommendations, recommendations_from_chunks, ParsedRecommendations};
pub use rules::{EligibilityRule, RuleTable, RuleVerdict};
