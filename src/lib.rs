// Trophée Palmarès - Core Library
// Exposes all modules for use in CLI, TUI, API server, and tests

pub mod entry;
pub mod classify;   // Level numbers, finalist detection, distinction scoring
pub mod labels;     // Level display names
pub mod places;     // National finals vs. cities
pub mod index;      // Years and places for navigation
pub mod ranking;    // Filter, order and group result tables
pub mod view;       // Navigation state
pub mod snapshot;   // data.json loader
pub mod convert;    // Spreadsheet CSV → data.json
pub mod config;

// Re-export commonly used types
pub use entry::{Entry, LevelValue};
pub use classify::{
    DistinctionMatch, DistinctionRule, DistinctionScorer,
    distinction_rank, extract_number, is_finalist_text, level_rank,
    LEVEL_SENTINEL,
};
pub use labels::label_for;
pub use places::{is_finals_place, FINALS_LABEL};
pub use index::{places_for_year, years_present};
pub use ranking::{
    LevelGroup, ResultRow,
    ranked_for_selection, ranked_results, sort_entries,
};
pub use view::{View, ViewSelection, ViewState};
pub use snapshot::Snapshot;
pub use convert::{convert_files, convert_workbook, write_snapshot, ConvertReport};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_end_to_end_from_json() {
        let snapshot = Snapshot::from_json_str(
            r#"{"entries": [
                {"annee": 2024, "ville": "Lyon", "niveau": 5, "candidat": "B", "distinction": "Bronze Medal"},
                {"annee": 2024, "ville": "Lyon", "niveau": 5, "candidat": "A", "distinction": "Bronze Medal"},
                {"annee": 2024, "ville": "Finales Nationales", "finale": true, "niveau": "Niveau 11", "candidat": "C", "distinction": "Trophée DMA"},
                {"annee": 2021, "ville": "Paris", "niveau": 3, "candidat": "D"},
                {"annee": null, "candidat": "E"}
            ]}"#,
            "inline",
        )
        .unwrap();
        let entries = snapshot.entries();

        assert_eq!(years_present(entries), vec![2024, 2021]);
        assert_eq!(places_for_year(entries, 2024), vec!["Finales Nationales", "Lyon"]);

        let lyon = ranked_results(entries, 2024, "Lyon");
        let names: Vec<&str> = lyon[0].rows.iter().map(|r| r.candidate.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        // Only the label selects the finals group; the raw spelling is a
        // city query and finds nothing
        assert!(ranked_results(entries, 2024, "Finales Nationales").is_empty());

        let state = ViewState::years().select_year(2024).select_place(FINALS_LABEL);
        let finals = ranked_for_selection(entries, &state.selection);
        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].label, "Level 11 — Advanced");
        assert_eq!(finals[0].rows[0].candidate, "C");
    }
}
