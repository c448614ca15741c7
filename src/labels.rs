// 🏷️ Level Catalog
// Full display names for the competition levels

use crate::classify::{extract_number, LEVEL_SENTINEL};
use crate::entry::LevelValue;

/// Known levels, ordered by id
const LEVEL_NAMES: &[(i64, &str)] = &[
    (3, "Level 3 — Initiation 1"),
    (4, "Level 4 — Initiation 2"),
    (5, "Level 5 — Preparatory 1"),
    (6, "Level 6 — Preparatory 2"),
    (7, "Level 7 — End of First Cycle"),
    (8, "Level 8 — Elementary 1"),
    (9, "Level 9 — Elementary 2"),
    (10, "Level 10 — Intermediate"),
    (11, "Level 11 — Advanced"),
    (12, "Level 12 — Excellence"),
];

/// Display name for a numeric level id, if it is one of the known levels
pub fn known_label(id: i64) -> Option<&'static str> {
    LEVEL_NAMES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| *name)
}

/// Label for a raw level value
///
/// Unparseable input falls back to the sentinel id, so this always
/// returns something printable.
pub fn label_for(level: Option<&LevelValue>) -> String {
    let id = extract_number(level, LEVEL_SENTINEL);
    match known_label(id) {
        Some(name) => name.to_string(),
        None => format!("Level {}", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_levels() {
        assert_eq!(label_for(Some(&LevelValue::Int(3))), "Level 3 — Initiation 1");
        assert_eq!(label_for(Some(&LevelValue::Int(11))), "Level 11 — Advanced");
        assert_eq!(label_for(Some(&LevelValue::Int(12))), "Level 12 — Excellence");
    }

    #[test]
    fn test_text_level_is_parsed() {
        let level = LevelValue::Text("Niveau 10 - Moyen".to_string());
        assert_eq!(label_for(Some(&level)), "Level 10 — Intermediate");
    }

    #[test]
    fn test_unknown_level_is_synthesized() {
        assert_eq!(label_for(Some(&LevelValue::Int(2))), "Level 2");
        assert_eq!(label_for(Some(&LevelValue::Int(42))), "Level 42");
    }

    #[test]
    fn test_unparseable_level_uses_sentinel() {
        assert_eq!(label_for(None), "Level 999");
        let level = LevelValue::Text("Open".to_string());
        assert_eq!(label_for(Some(&level)), "Level 999");
    }

    #[test]
    fn test_table_covers_three_to_twelve() {
        for id in 3..=12 {
            assert!(known_label(id).is_some(), "missing level {}", id);
        }
        assert_eq!(LEVEL_NAMES.len(), 10);
    }
}
