//! Deterministic explanation text used when no language model answers

use crate::core::prompts::is_hindi;
use crate::models::Scheme;

pub const NO_SCHEMES_EN: &str = "No schemes provided.";
pub const NO_SCHEMES_HI: &str = "कोई योजना प्रदान नहीं की गई।";

const NEXT_STEPS_EN: [&str; 2] = [
    "- Next step: keep your documents ready and verified (Aadhaar, income certificate, bank account details).",
    "- Next step: apply through the official scheme portal or visit the nearest helpdesk / Common Service Centre.",
];

const NEXT_STEPS_HI: [&str; 2] = [
    "- अगला कदम: अपने दस्तावेज़ (आधार, आय प्रमाण पत्र, बैंक खाते का विवरण) तैयार और सत्यापित रखें।",
    "- अगला कदम: आधिकारिक योजना पोर्टल से आवेदन करें या नजदीकी सहायता केंद्र / कॉमन सर्विस सेंटर पर जाएं।",
];

/// Phrase fragments replaced for Hindi output, longest first
const HINDI_PHRASES: &[(&str, &str)] = &[
    ("Matches some published eligibility criteria", "कुछ प्रकाशित पात्रता मानदंडों से मेल खाता है"),
    ("scholarship", "छात्रवृत्ति"),
    ("electricity", "बिजली"),
    ("Telangana", "तेलंगाना"),
    ("Karnataka", "कर्नाटक"),
    ("Madhya Pradesh", "मध्य प्रदेश"),
    ("West Bengal", "पश्चिम बंगाल"),
    ("eligible", "पात्र"),
    ("pension", "पेंशन"),
    ("student", "छात्रा"),
    ("farmer", "किसान"),
    ("income", "आय"),
    ("health", "स्वास्थ्य"),
    ("scheme", "योजना"),
    ("woman", "महिला"),
    ("girl", "बालिका"),
    ("loan", "ऋण"),
];

/// Canned one-sentence reason for the built-in schemes
pub fn canned_reason(scheme_id: &str) -> Option<&'static str> {
    let reason = match scheme_id {
        "pm_kisan" => "Your occupation is farming, and this scheme gives yearly income support to farmer families.",
        "rythu_bandhu" => "You are a farmer in Telangana, and this scheme gives per-acre investment support every season.",
        "pm_svanidhi" => "You work as a street vendor, and this scheme gives collateral-free working capital loans.",
        "ayushman_bharat" => "Your annual income is below the limit for free hospital health cover for your family.",
        "atal_pension_yojana" => "Your age is between 18 and 40, so you can join this guaranteed pension scheme.",
        "sukanya_samriddhi" => "A girl aged 10 or below can open this high-interest savings account.",
        "ladli_behna" => "You are a woman aged 21 to 60 in Madhya Pradesh with family income below the limit.",
        "kanyashree" => "You are a girl student aged 13 to 18 in West Bengal, so this scholarship is open to you.",
        "gruha_jyothi" => "You live in Karnataka, where households get free electricity up to the monthly limit.",
        _ => return None,
    };
    Some(reason)
}

/// Reason for one scheme, falling back to its published criteria
pub fn scheme_reason(scheme: &Scheme) -> String {
    match canned_reason(&scheme.id) {
        Some(reason) => reason.to_string(),
        None => format!(
            "Matches some published eligibility criteria: {}",
            scheme.eligibility.join(", ")
        ),
    }
}

/// Fixed sentence returned when no schemes were supplied
pub fn no_schemes_text(language: &str) -> &'static str {
    if is_hindi(language) {
        NO_SCHEMES_HI
    } else {
        NO_SCHEMES_EN
    }
}

/// Best-effort phrase substitution, not a translation
pub fn substitute_hindi(line: &str) -> String {
    HINDI_PHRASES
        .iter()
        .fold(line.to_string(), |acc, (en, hi)| acc.replace(en, hi))
}

/// Build the local explanation: one line per scheme plus next steps
pub fn local_explanation(schemes: &[Scheme], language: &str) -> String {
    if schemes.is_empty() {
        return no_schemes_text(language).to_string();
    }

    let hindi = is_hindi(language);

    let mut lines: Vec<String> = schemes
        .iter()
        .map(|scheme| format!("- {}: {}", scheme.name, scheme_reason(scheme)))
        .map(|line| if hindi { substitute_hindi(&line) } else { line })
        .collect();

    let next_steps = if hindi { NEXT_STEPS_HI } else { NEXT_STEPS_EN };
    lines.extend(next_steps.iter().map(|s| s.to_string()));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme(id: &str, name: &str) -> Scheme {
        Scheme {
            id: id.to_string(),
            name: name.to_string(),
            eligibility: vec!["Resident".to_string(), "Low income".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_schemes() {
        assert_eq!(local_explanation(&[], "en"), "No schemes provided.");
        assert_eq!(local_explanation(&[], "HI"), NO_SCHEMES_HI);
    }

    #[test]
    fn test_english_lines() {
        let text = local_explanation(&[scheme("pm_kisan", "PM-KISAN"), scheme("custom", "Custom")], "en");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "- PM-KISAN: Your occupation is farming, and this scheme gives yearly income support to farmer families."
        );
        assert_eq!(
            lines[1],
            "- Custom: Matches some published eligibility criteria: Resident, Low income"
        );
        assert_eq!(lines[2], NEXT_STEPS_EN[0]);
        assert_eq!(lines[3], NEXT_STEPS_EN[1]);
    }

    #[test]
    fn test_hindi_substitution() {
        let text = local_explanation(&[scheme("custom", "Custom")], "hi");

        // Criteria text goes through the same substitution
        assert!(text.starts_with("- Custom: कुछ प्रकाशित पात्रता मानदंडों से मेल खाता है: Resident, Low आय"));
        assert!(text.ends_with(NEXT_STEPS_HI[1]));
        assert!(!text.contains("Next step"));
    }

    #[test]
    fn test_substitute_hindi_is_crude() {
        assert_eq!(substitute_hindi("farmer income"), "किसान आय");
    }
}
