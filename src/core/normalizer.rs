use serde_json::Value;
use crate::models::Profile;

/// Profile fields in the canonical form the eligibility rules read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedProfile {
    pub age: Option<i64>,
    pub income: Option<f64>,
    /// Lower-cased and trimmed, empty when absent
    pub occupation: String,
    pub gender: Option<String>,
    pub state: Option<String>,
}

impl NormalizedProfile {
    /// Only the first character of gender is inspected
    #[inline]
    pub fn is_female(&self) -> bool {
        self.gender
            .as_deref()
            .and_then(|g| g.chars().next())
            .map(|c| c.eq_ignore_ascii_case(&'f'))
            .unwrap_or(false)
    }

    #[inline]
    pub fn age_between(&self, min: i64, max: i64) -> bool {
        self.age.map(|age| age >= min && age <= max).unwrap_or(false)
    }

    #[inline]
    pub fn income_below(&self, limit: f64) -> bool {
        self.income.map(|income| income < limit).unwrap_or(false)
    }
}

/// Normalize a raw profile
///
/// Malformed values behave exactly like missing ones; this never fails.
pub fn normalize_profile(profile: &Profile) -> NormalizedProfile {
    NormalizedProfile {
        age: profile.age.as_ref().and_then(parse_age),
        income: profile.income_value().and_then(parse_income),
        occupation: profile
            .occupation
            .as_deref()
            .map(|o| o.trim().to_lowercase())
            .unwrap_or_default(),
        gender: profile.gender.clone(),
        state: profile.resident_state().map(str::to_string),
    }
}

/// Integers pass through, floats truncate, strings must hold an integer
fn parse_age(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn parse_income(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: Value) -> Profile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numeric_fields() {
        let p = normalize_profile(&profile(json!({"age": 34, "income": 120000.5})));
        assert_eq!(p.age, Some(34));
        assert_eq!(p.income, Some(120000.5));
    }

    #[test]
    fn test_string_numbers() {
        let p = normalize_profile(&profile(json!({"age": " 21 ", "annual_income": "240000"})));
        assert_eq!(p.age, Some(21));
        assert_eq!(p.income, Some(240000.0));
    }

    #[test]
    fn test_malformed_numbers_are_absent() {
        let p = normalize_profile(&profile(json!({"age": "twenty", "income": [1, 2]})));
        assert_eq!(p.age, None);
        assert_eq!(p.income, None);

        let p = normalize_profile(&profile(json!({"age": true, "income": "NaN"})));
        assert_eq!(p.age, None);
        assert_eq!(p.income, None);
    }

    #[test]
    fn test_float_age_truncates() {
        let p = normalize_profile(&profile(json!({"age": 40.9})));
        assert_eq!(p.age, Some(40));
    }

    #[test]
    fn test_occupation_lowercased() {
        let p = normalize_profile(&profile(json!({"occupation": "  Dairy FARMER "})));
        assert_eq!(p.occupation, "dairy farmer");

        let empty = normalize_profile(&Profile::default());
        assert_eq!(empty.occupation, "");
    }

    #[test]
    fn test_state_and_income_spellings() {
        let p = normalize_profile(&profile(json!({"state": "Telangana", "jurisdiction": "Telangana"})));
        assert_eq!(p.state.as_deref(), Some("Telangana"));

        let p = normalize_profile(&profile(json!({"jurisdiction": "Kerala", "income": 1000, "annual_income": 1000})));
        assert_eq!(p.state.as_deref(), Some("Kerala"));
        assert_eq!(p.income, Some(1000.0));

        let p = normalize_profile(&profile(json!({"income": "lots", "annual_income": 5000})));
        assert_eq!(p.income, None);
    }

    #[test]
    fn test_non_string_occupation_is_empty() {
        let p = normalize_profile(&profile(json!({"occupation": 42, "gender": ["f"], "age": 5})));
        assert_eq!(p.occupation, "");
        assert!(!p.is_female());
        assert_eq!(p.age, Some(5));
    }

    #[test]
    fn test_is_female_checks_first_char() {
        let p = normalize_profile(&profile(json!({"gender": "Female"})));
        assert!(p.is_female());
        let p = normalize_profile(&profile(json!({"gender": "f"})));
        assert!(p.is_female());
        let p = normalize_profile(&profile(json!({"gender": "male"})));
        assert!(!p.is_female());
        let p = normalize_profile(&profile(json!({"gender": ""})));
        assert!(!p.is_female());
    }
}
