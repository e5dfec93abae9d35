use crate::models::Jurisdiction;

/// Baseline score assigned to schemes that pass the jurisdiction gate
pub const GATE_BASELINE_SCORE: f64 = 0.5;

/// Check whether a scheme is open to a profile's declared state
///
/// Regional schemes require an exact, case-sensitive match; a missing state
/// never passes a regional gate.
#[inline]
pub fn passes_jurisdiction_gate(jurisdiction: &Jurisdiction, state: Option<&str>) -> bool {
    match jurisdiction {
        Jurisdiction::Nationwide => true,
        Jurisdiction::Region(region) => state == Some(region.as_str()),
    }
}
