// 📍 Place Classifier
// Tells the national finals pseudo-place apart from ordinary cities

/// Label the views use to request the finals grouping
pub const FINALS_LABEL: &str = "National Finals";

/// Recognized finals spellings, already trimmed and lowercased
const FINALS_TOKENS: &[&str] = &[
    "finale",
    "finales",
    "finale nationale",
    "finales nationales",
    "final",
    "finals",
    "national final",
    "national finals",
];

/// True iff `place` is one of the finals spellings
///
/// Matching is on the trimmed, lowercased text only; accents are not
/// folded here.
pub fn is_finals_place(place: &str) -> bool {
    let key = place.trim().to_lowercase();
    key == FINALS_LABEL.to_lowercase() || FINALS_TOKENS.contains(&key.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_spellings() {
        assert!(is_finals_place("Finale"));
        assert!(is_finals_place("finales"));
        assert!(is_finals_place("Finale Nationale"));
        assert!(is_finals_place("FINALES NATIONALES"));
        assert!(is_finals_place("National Finals"));
        assert!(is_finals_place("finals"));
    }

    #[test]
    fn test_trims_whitespace() {
        assert!(is_finals_place("  Finales Nationales\t"));
    }

    #[test]
    fn test_cities_are_not_finals() {
        assert!(!is_finals_place("Lyon"));
        assert!(!is_finals_place("Finale Ligure"));
        assert!(!is_finals_place(""));
    }

    #[test]
    fn test_accents_are_not_folded() {
        assert!(!is_finals_place("Finalé"));
    }

    #[test]
    fn test_label_is_recognized() {
        assert!(is_finals_place(FINALS_LABEL));
    }
}
