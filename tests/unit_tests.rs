// Unit tests for Civic Match

use civic_match::core::{
    fallback::{local_explanation, NO_SCHEMES_EN},
    filters::passes_jurisdiction_gate,
    normalizer::normalize_profile,
    prompts::{build_synthesis_prompt, PromptLimits},
    Matcher, SchemeCatalog,
};
use civic_match::models::{Jurisdiction, Profile, SchemeMatch};
use serde_json::json;

fn profile(value: serde_json::Value) -> Profile {
    serde_json::from_value(value).unwrap()
}

fn matches_for(value: serde_json::Value) -> Vec<SchemeMatch> {
    let catalog = SchemeCatalog::standard().unwrap();
    Matcher::with_standard_rules()
        .find_matches(&profile(value), &catalog)
        .matches
}

fn score_of(matches: &[SchemeMatch], id: &str) -> Option<f64> {
    matches.iter().find(|m| m.scheme.id == id).map(|m| m.match_score)
}

fn ids(matches: &[SchemeMatch]) -> Vec<&str> {
    matches.iter().map(|m| m.scheme.id.as_str()).collect()
}

#[test]
fn test_farmer_gets_nationwide_scheme() {
    for occupation in ["farmer", "Farmer", "  small FARMER ", "dairy farmer"] {
        let matches = matches_for(json!({"occupation": occupation}));
        assert_eq!(score_of(&matches, "pm_kisan"), Some(0.90), "occupation {:?}", occupation);
    }
}

#[test]
fn test_pension_age_bounds() {
    assert_eq!(score_of(&matches_for(json!({"age": 18})), "atal_pension_yojana"), Some(0.85));
    assert_eq!(score_of(&matches_for(json!({"age": 40})), "atal_pension_yojana"), Some(0.85));
    assert_eq!(score_of(&matches_for(json!({"age": 17})), "atal_pension_yojana"), None);
    assert_eq!(score_of(&matches_for(json!({"age": 41})), "atal_pension_yojana"), None);
    assert_eq!(score_of(&matches_for(json!({})), "atal_pension_yojana"), None);
}

#[test]
fn test_girl_child_scheme() {
    assert_eq!(
        score_of(&matches_for(json!({"gender": "female", "age": 10})), "sukanya_samriddhi"),
        Some(0.95)
    );
    assert_eq!(
        score_of(&matches_for(json!({"gender": "F", "age": 3})), "sukanya_samriddhi"),
        Some(0.95)
    );
    assert_eq!(score_of(&matches_for(json!({"gender": "female", "age": 11})), "sukanya_samriddhi"), None);
    assert_eq!(score_of(&matches_for(json!({"gender": "male", "age": 5})), "sukanya_samriddhi"), None);
}

#[test]
fn test_regional_schemes_need_matching_state() {
    // Every predicate of the Telangana farming scheme holds except the state
    assert_eq!(score_of(&matches_for(json!({"occupation": "farmer"})), "rythu_bandhu"), None);
    assert_eq!(
        score_of(&matches_for(json!({"occupation": "farmer", "state": "Karnataka"})), "rythu_bandhu"),
        None
    );
    assert_eq!(
        score_of(&matches_for(json!({"occupation": "farmer", "state": "telangana"})), "rythu_bandhu"),
        None
    );
    assert_eq!(score_of(&matches_for(json!({"state": "Karnataka"})), "gruha_jyothi"), Some(0.90));
}

#[test]
fn test_higher_score_first() {
    let matches = matches_for(json!({"occupation": "farmer", "state": "Telangana", "income": 100000}));

    assert_eq!(ids(&matches), vec!["rythu_bandhu", "pm_kisan", "ayushman_bharat"]);
    assert!(matches.windows(2).all(|w| w[0].match_score >= w[1].match_score));
}

#[test]
fn test_matching_is_idempotent() {
    let input = json!({"gender": "female", "age": 30, "state": "Madhya Pradesh", "income": 120000});
    let first = matches_for(input.clone());
    let second = matches_for(input);

    assert_eq!(ids(&first), ids(&second));
    assert_eq!(
        first.iter().map(|m| m.match_score).collect::<Vec<_>>(),
        second.iter().map(|m| m.match_score).collect::<Vec<_>>()
    );
}

#[test]
fn test_telangana_farmer_example() {
    let matches = matches_for(json!({"occupation": "farmer", "state": "Telangana"}));

    assert_eq!(ids(&matches), vec!["rythu_bandhu", "pm_kisan"]);
    assert_eq!(matches[0].match_score, 0.95);
    assert_eq!(matches[1].match_score, 0.90);
    assert!(matches.iter().all(|m| m.is_eligible));
}

#[test]
fn test_west_bengal_student_example() {
    let matches = matches_for(json!({"gender": "female", "age": 15, "occupation": "student", "state": "West Bengal"}));
    assert_eq!(score_of(&matches, "kanyashree"), Some(0.95));

    let matches = matches_for(json!({"gender": "female", "age": 15, "occupation": "farmer", "state": "West Bengal"}));
    assert_eq!(score_of(&matches, "kanyashree"), None);
    assert_eq!(score_of(&matches, "pm_kisan"), Some(0.90));
}

#[test]
fn test_malformed_fields_act_as_missing() {
    let matches = matches_for(json!({"age": "thirty", "income": "lots", "occupation": null}));
    assert!(matches.is_empty());
}

#[test]
fn test_normalizer_accepts_numeric_strings() {
    let normalized = normalize_profile(&profile(json!({"age": " 34 ", "annual_income": "125000.5"})));
    assert_eq!(normalized.age, Some(34));
    assert_eq!(normalized.income, Some(125000.5));
}

#[test]
fn test_nationwide_gate() {
    assert!(passes_jurisdiction_gate(&Jurisdiction::Nationwide, None));
    assert!(passes_jurisdiction_gate(&Jurisdiction::Nationwide, Some("Kerala")));
    assert!(!passes_jurisdiction_gate(&Jurisdiction::region("Kerala"), None));
}

#[test]
fn test_empty_scheme_explanation() {
    assert_eq!(local_explanation(&[], "en"), NO_SCHEMES_EN);
}

#[test]
fn test_synthesis_prompt_names_language() {
    let catalog = SchemeCatalog::standard().unwrap();
    let schemes: Vec<_> = catalog.iter().take(2).cloned().collect();

    let prompt = build_synthesis_prompt(&Profile::default(), &schemes, "hi", &PromptLimits::default());

    assert!(prompt.contains("Hindi"));
    assert!(prompt.contains(&schemes[0].name));
}
