use std::collections::HashMap;
use crate::core::normalizer::NormalizedProfile;

/// Outcome of a scheme-specific eligibility rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleVerdict {
    /// Eligible with a fixed confidence score
    Eligible(f64),
    /// Explicitly ineligible, overriding any baseline
    Ineligible,
    /// Predicate not satisfied; eligibility stays as initialized
    Unmatched,
}

/// Pure predicate-plus-score function for one scheme
pub type EligibilityRule = fn(&NormalizedProfile) -> RuleVerdict;

/// Mapping from scheme id to its eligibility rule
#[derive(Clone)]
pub struct RuleTable {
    rules: HashMap<&'static str, EligibilityRule>,
}

impl std::fmt::Debug for RuleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.rules.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("RuleTable").field("schemes", &ids).finish()
    }
}

impl RuleTable {
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Rules for the built-in catalog
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.insert("pm_kisan", farmer_support);
        table.insert("rythu_bandhu", regional_farmer_support);
        table.insert("pm_svanidhi", street_vendor_credit);
        table.insert("ayushman_bharat", health_coverage);
        table.insert("atal_pension_yojana", pension_enrolment);
        table.insert("sukanya_samriddhi", girl_child_savings);
        table.insert("ladli_behna", women_welfare);
        table.insert("kanyashree", girl_student_scholarship);
        table.insert("gruha_jyothi", utility_subsidy);
        table
    }

    pub fn insert(&mut self, scheme_id: &'static str, rule: EligibilityRule) {
        self.rules.insert(scheme_id, rule);
    }

    pub fn get(&self, scheme_id: &str) -> Option<EligibilityRule> {
        self.rules.get(scheme_id).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn farmer_support(profile: &NormalizedProfile) -> RuleVerdict {
    if profile.occupation.contains("farmer") {
        RuleVerdict::Eligible(0.90)
    } else {
        RuleVerdict::Unmatched
    }
}

/// Same predicate as [`farmer_support`], scored higher since the region gate already passed
pub fn regional_farmer_support(profile: &NormalizedProfile) -> RuleVerdict {
    if profile.occupation.contains("farmer") {
        RuleVerdict::Eligible(0.95)
    } else {
        RuleVerdict::Unmatched
    }
}

pub fn street_vendor_credit(profile: &NormalizedProfile) -> RuleVerdict {
    if profile.occupation.contains("vendor") || profile.occupation.contains("street") {
        RuleVerdict::Eligible(0.90)
    } else {
        RuleVerdict::Unmatched
    }
}

pub fn health_coverage(profile: &NormalizedProfile) -> RuleVerdict {
    if profile.income_below(500_000.0) {
        RuleVerdict::Eligible(0.80)
    } else {
        RuleVerdict::Unmatched
    }
}

pub fn pension_enrolment(profile: &NormalizedProfile) -> RuleVerdict {
    if profile.age_between(18, 40) {
        RuleVerdict::Eligible(0.85)
    } else {
        RuleVerdict::Unmatched
    }
}

pub fn girl_child_savings(profile: &NormalizedProfile) -> RuleVerdict {
    if profile.is_female() && profile.age.map(|age| age <= 10).unwrap_or(false) {
        RuleVerdict::Eligible(0.95)
    } else {
        RuleVerdict::Unmatched
    }
}

pub fn women_welfare(profile: &NormalizedProfile) -> RuleVerdict {
    if profile.is_female() && profile.age_between(21, 60) && profile.income_below(250_000.0) {
        RuleVerdict::Eligible(0.95)
    } else {
        RuleVerdict::Ineligible
    }
}

pub fn girl_student_scholarship(profile: &NormalizedProfile) -> RuleVerdict {
    if profile.is_female() && profile.occupation == "student" && profile.age_between(13, 18) {
        RuleVerdict::Eligible(0.95)
    } else {
        RuleVerdict::Ineligible
    }
}

/// Reached only after the region gate matched, so no further condition
pub fn utility_subsidy(_profile: &NormalizedProfile) -> RuleVerdict {
    RuleVerdict::Eligible(0.90)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> NormalizedProfile {
        NormalizedProfile::default()
    }

    #[test]
    fn test_farmer_rules() {
        let mut p = profile();
        p.occupation = "tenant farmer".to_string();
        assert_eq!(farmer_support(&p), RuleVerdict::Eligible(0.90));
        assert_eq!(regional_farmer_support(&p), RuleVerdict::Eligible(0.95));

        p.occupation = "teacher".to_string();
        assert_eq!(farmer_support(&p), RuleVerdict::Unmatched);
    }

    #[test]
    fn test_vendor_rule() {
        let mut p = profile();
        p.occupation = "street food seller".to_string();
        assert_eq!(street_vendor_credit(&p), RuleVerdict::Eligible(0.90));
        p.occupation = "fruit vendor".to_string();
        assert_eq!(street_vendor_credit(&p), RuleVerdict::Eligible(0.90));
    }

    #[test]
    fn test_health_income_limit_is_strict() {
        let mut p = profile();
        assert_eq!(health_coverage(&p), RuleVerdict::Unmatched);
        p.income = Some(499_999.0);
        assert_eq!(health_coverage(&p), RuleVerdict::Eligible(0.80));
        p.income = Some(500_000.0);
        assert_eq!(health_coverage(&p), RuleVerdict::Unmatched);
    }

    #[test]
    fn test_pension_age_bounds() {
        let mut p = profile();
        for (age, expected) in [(17, false), (18, true), (40, true), (41, false)] {
            p.age = Some(age);
            assert_eq!(pension_enrolment(&p) == RuleVerdict::Eligible(0.85), expected, "age {}", age);
        }
    }

    #[test]
    fn test_girl_child_savings() {
        let mut p = profile();
        p.gender = Some("F".to_string());
        p.age = Some(10);
        assert_eq!(girl_child_savings(&p), RuleVerdict::Eligible(0.95));
        p.age = Some(11);
        assert_eq!(girl_child_savings(&p), RuleVerdict::Unmatched);
        p.age = Some(5);
        p.gender = Some("male".to_string());
        assert_eq!(girl_child_savings(&p), RuleVerdict::Unmatched);
    }

    #[test]
    fn test_women_welfare_requires_all_conditions() {
        let mut p = profile();
        p.gender = Some("female".to_string());
        p.age = Some(30);
        p.income = Some(200_000.0);
        assert_eq!(women_welfare(&p), RuleVerdict::Eligible(0.95));

        p.income = Some(250_000.0);
        assert_eq!(women_welfare(&p), RuleVerdict::Ineligible);

        p.income = None;
        assert_eq!(women_welfare(&p), RuleVerdict::Ineligible);
    }

    #[test]
    fn test_scholarship_requires_exact_student() {
        let mut p = profile();
        p.gender = Some("female".to_string());
        p.age = Some(15);
        p.occupation = "student".to_string();
        assert_eq!(girl_student_scholarship(&p), RuleVerdict::Eligible(0.95));

        p.occupation = "college student".to_string();
        assert_eq!(girl_student_scholarship(&p), RuleVerdict::Ineligible);
    }

    #[test]
    fn test_standard_table_covers_ruled_schemes() {
        let table = RuleTable::standard();
        assert_eq!(table.len(), 9);
        assert!(table.get("gruha_jyothi").is_some());
        assert!(table.get("pmay_gramin").is_none());
    }
}
