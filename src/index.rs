// 🗂️ Data Index
// Distinct years and places used to build the navigation

use std::collections::BTreeSet;

use crate::classify::collate;
use crate::entry::Entry;

/// Distinct years, most recent first; missing and zero years are skipped
pub fn years_present(entries: &[Entry]) -> Vec<i64> {
    let years: BTreeSet<i64> = entries
        .iter()
        .filter_map(|e| e.year)
        .filter(|y| *y != 0)
        .collect();

    years.into_iter().rev().collect()
}

/// Distinct places for `year`, exactly as stored, in collation order
///
/// Finals spellings are listed like any other place; finals grouping only
/// happens when results are ranked.
pub fn places_for_year(entries: &[Entry], year: i64) -> Vec<String> {
    let mut places: Vec<String> = Vec::new();

    for entry in entries.iter().filter(|e| e.year == Some(year)) {
        match entry.place.as_deref() {
            Some(place) if !place.is_empty() => {
                if !places.iter().any(|p| p == place) {
                    places.push(place.to_string());
                }
            }
            _ => {}
        }
    }

    places.sort_by(|a, b| collate(a, b));
    places
}
