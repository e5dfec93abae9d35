use crate::models::{Profile, SchemeMatch};
use crate::core::{
    catalog::SchemeCatalog,
    filters::{passes_jurisdiction_gate, GATE_BASELINE_SCORE},
    normalizer::normalize_profile,
    rules::{RuleTable, RuleVerdict},
};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<SchemeMatch>,
    pub total_schemes: usize,
}

/// Eligibility matcher - evaluates every catalog scheme against a profile
///
/// # Pipeline Stages
/// 1. Profile normalization
/// 2. Jurisdiction gate (baseline score)
/// 3. Scheme-specific rule
/// 4. Inclusion and ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    rules: RuleTable,
}

impl Matcher {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn with_standard_rules() -> Self {
        Self {
            rules: RuleTable::standard(),
        }
    }

    /// Find the schemes a profile is eligible for
    ///
    /// Schemes are evaluated independently; the output is ordered by
    /// descending score with catalog order kept among equal scores.
    pub fn find_matches(&self, profile: &Profile, catalog: &SchemeCatalog) -> MatchResult {
        let normalized = normalize_profile(profile);

        let mut matches: Vec<SchemeMatch> = catalog
            .iter()
            // Stage 2: jurisdiction gate
            .filter(|scheme| passes_jurisdiction_gate(&scheme.jurisdiction, normalized.state.as_deref()))
            // Stage 3: per-scheme rule
            .filter_map(|scheme| {
                let mut score = GATE_BASELINE_SCORE;
                let mut is_eligible = false;

                if let Some(rule) = self.rules.get(&scheme.id) {
                    match rule(&normalized) {
                        RuleVerdict::Eligible(rule_score) => {
                            score = rule_score;
                            is_eligible = true;
                        }
                        RuleVerdict::Ineligible => is_eligible = false,
                        RuleVerdict::Unmatched => {}
                    }
                }

                // Stage 4: inclusion
                if is_eligible && score > 0.0 {
                    Some(SchemeMatch {
                        scheme: scheme.clone(),
                        match_score: score,
                        is_eligible,
                    })
                } else {
                    None
                }
            })
            .collect();

        // Stable sort keeps catalog order for ties
        matches.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        tracing::debug!(
            "Matched {} of {} schemes",
            matches.len(),
            catalog.len()
        );

        MatchResult {
            matches,
            total_schemes: catalog.len(),
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_standard_rules()
    }
}
