// 🏆 Result Ranker
// Filters one year+place, orders candidates and groups them by level
//
// Order, primary key first:
//   1. level rank, ascending
//   2. distinction rank, descending
//   3. tie-break: finalists keep load order among themselves, everyone
//      else goes by candidate name; load order settles the rest

use serde::Serialize;
use std::cmp::Ordering;

use crate::classify::{collate, distinction_rank, is_finalist_text, level_rank};
use crate::entry::Entry;
use crate::labels::label_for;
use crate::places::FINALS_LABEL;
use crate::view::ViewSelection;

/// One painted line of a results table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub candidate: String,
    pub teacher: String,
    pub distinction: String,
}

impl From<&Entry> for ResultRow {
    fn from(entry: &Entry) -> Self {
        ResultRow {
            candidate: entry.candidate().to_string(),
            teacher: entry.teacher().to_string(),
            distinction: entry.distinction().to_string(),
        }
    }
}

/// Rows of one level, under their header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelGroup {
    pub level: i64,
    pub label: String,
    pub rows: Vec<ResultRow>,
}

/// Precomputed sort keys for one entry
struct Keyed<'a> {
    level: i64,
    distinction: u32,
    finalist: bool,
    entry: &'a Entry,
}

impl<'a> Keyed<'a> {
    fn new(entry: &'a Entry) -> Self {
        Keyed {
            level: level_rank(entry.level.as_ref()),
            distinction: distinction_rank(entry.distinction_text.as_deref()),
            finalist: is_finalist_text(entry.distinction_text.as_deref()),
            entry,
        }
    }

    fn same_tier(&self, other: &Keyed) -> bool {
        self.level == other.level && self.distinction == other.distinction
    }
}

/// Does `entry` belong to the table for `year` and `place`?
///
/// `place == FINALS_LABEL` selects the finals group; any other place
/// selects that exact city and never a finals entry.
pub fn is_selected(entry: &Entry, year: i64, place: &str) -> bool {
    if entry.year != Some(year) {
        return false;
    }

    if place == FINALS_LABEL {
        entry.is_finals()
    } else {
        !entry.is_finals() && entry.place.as_deref() == Some(place)
    }
}

fn by_name(a: &Entry, b: &Entry) -> Ordering {
    collate(a.candidate(), b.candidate()).then(a.original_index.cmp(&b.original_index))
}

/// Order one run of entries that tie on level and distinction
///
/// Finalists are kept in load order, the others are ordered by name, and
/// the two lists are merged by name so each rule holds within its list.
fn break_ties<'a>(run: Vec<Keyed<'a>>) -> Vec<Keyed<'a>> {
    let (mut finalists, mut others): (Vec<Keyed>, Vec<Keyed>) =
        run.into_iter().partition(|k| k.finalist);

    finalists.sort_by_key(|k| k.entry.original_index);
    others.sort_by(|a, b| by_name(a.entry, b.entry));

    if finalists.is_empty() {
        return others;
    }
    if others.is_empty() {
        return finalists;
    }

    let mut merged = Vec::with_capacity(finalists.len() + others.len());
    let mut finalists = finalists.into_iter().peekable();
    let mut others = others.into_iter().peekable();

    loop {
        let take_finalist = match (finalists.peek(), others.peek()) {
            (Some(f), Some(o)) => by_name(f.entry, o.entry) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        let next = if take_finalist { finalists.next() } else { others.next() };
        merged.extend(next);
    }

    merged
}

/// Entries in display order
pub fn sort_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Vec<&'a Entry> {
    let mut keyed: Vec<Keyed> = entries.into_iter().map(Keyed::new).collect();

    keyed.sort_by(|a, b| {
        a.level
            .cmp(&b.level)
            .then(b.distinction.cmp(&a.distinction))
            .then(a.entry.original_index.cmp(&b.entry.original_index))
    });

    let mut ordered = Vec::with_capacity(keyed.len());
    let mut run: Vec<Keyed> = Vec::new();

    for k in keyed {
        if run.last().map(|last| !last.same_tier(&k)).unwrap_or(false) {
            ordered.extend(break_ties(std::mem::take(&mut run)));
        }
        run.push(k);
    }
    ordered.extend(break_ties(run));

    ordered.into_iter().map(|k| k.entry).collect()
}

/// Ranked, level-grouped table for one year and place
///
/// An empty selection gives an empty list; the view shows its own
/// empty-state message.
pub fn ranked_results(entries: &[Entry], year: i64, place: &str) -> Vec<LevelGroup> {
    let selected = entries.iter().filter(|e| is_selected(e, year, place));

    let mut groups: Vec<LevelGroup> = Vec::new();
    for entry in sort_entries(selected) {
        let level = level_rank(entry.level.as_ref());

        match groups.last_mut() {
            Some(group) if group.level == level => group.rows.push(entry.into()),
            _ => groups.push(LevelGroup {
                level,
                label: label_for(entry.level.as_ref()),
                rows: vec![entry.into()],
            }),
        }
    }

    groups
}

/// `ranked_results` for a view selection; incomplete selections are empty
pub fn ranked_for_selection(entries: &[Entry], selection: &ViewSelection) -> Vec<LevelGroup> {
    match (selection.year, selection.place.as_deref()) {
        (Some(year), Some(place)) => ranked_results(entries, year, place),
        _ => Vec::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LevelValue;

    fn entry(
        index: usize,
        place: &str,
        level: i64,
        candidate: &str,
        distinction: &str,
    ) -> Entry {
        Entry {
            year: Some(2024),
            place: Some(place.to_string()),
            candidate_name: Some(candidate.to_string()),
            teacher_name: Some(format!("Teacher of {}", candidate)),
            level: Some(LevelValue::Int(level)),
            distinction_text: Some(distinction.to_string()),
            original_index: index,
            ..Entry::default()
        }
    }

    fn names(groups: &[LevelGroup]) -> Vec<&str> {
        groups
            .iter()
            .flat_map(|g| g.rows.iter().map(|r| r.candidate.as_str()))
            .collect()
    }

    #[test]
    fn test_name_tie_break_without_finalists() {
        let entries = vec![
            entry(0, "Lyon", 5, "B", "Bronze Medal"),
            entry(1, "Lyon", 5, "A", "Bronze Medal"),
        ];

        let groups = ranked_results(&entries, 2024, "Lyon");
        assert_eq!(names(&groups), vec!["A", "B"]);
    }

    #[test]
    fn test_finalists_keep_load_order() {
        let entries = vec![
            entry(0, "Lyon", 5, "Zoé", "Finalist"),
            entry(1, "Lyon", 5, "Adam", "Finalist"),
            entry(2, "Lyon", 5, "Marc", "Médaille de finaliste"),
        ];

        let groups = ranked_results(&entries, 2024, "Lyon");
        assert_eq!(names(&groups), vec!["Zoé", "Adam", "Marc"]);
    }

    #[test]
    fn test_levels_then_distinctions() {
        let entries = vec![
            entry(0, "Lyon", 7, "Cleo", "Silver Medal"),
            entry(1, "Lyon", 5, "Dan", "Bronze Medal"),
            entry(2, "Lyon", 5, "Eve", "Trophy"),
            entry(3, "Lyon", 7, "Finn", "1st Prize — Gold Plaque"),
            entry(4, "Lyon", 5, "Gus", ""),
        ];

        let groups = ranked_results(&entries, 2024, "Lyon");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].level, 5);
        assert_eq!(groups[0].label, "Level 5 — Preparatory 1");
        assert_eq!(groups[1].level, 7);
        assert_eq!(groups[1].label, "Level 7 — End of First Cycle");
        assert_eq!(names(&groups), vec!["Eve", "Dan", "Gus", "Finn", "Cleo"]);
    }

    #[test]
    fn test_unknown_level_sorts_last() {
        let mut open = entry(0, "Lyon", 0, "Hal", "Trophy");
        open.level = Some(LevelValue::Text("Hors niveau".to_string()));
        let entries = vec![open, entry(1, "Lyon", 12, "Ivy", "Bronze Medal")];

        let groups = ranked_results(&entries, 2024, "Lyon");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].level, 12);
        assert_eq!(groups[1].level, 999);
        assert_eq!(groups[1].label, "Level 999");
    }

    #[test]
    fn test_mixed_level_spellings_share_one_group() {
        let mut text_level = entry(0, "Lyon", 0, "Jon", "Bronze Medal");
        text_level.level = Some(LevelValue::Text("Niveau 6 - Préparatoire 2".to_string()));
        let entries = vec![
            text_level,
            entry(1, "Lyon", 6, "Kim", "Trophy"),
            entry(2, "Lyon", 6, "Lea", "Finalist"),
        ];

        let groups = ranked_results(&entries, 2024, "Lyon");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].rows.len(), 3);
        assert_eq!(names(&groups), vec!["Kim", "Jon", "Lea"]);
    }

    #[test]
    fn test_groups_are_never_split() {
        let mut entries = Vec::new();
        for i in 0..30 {
            let level = 3 + (i % 4) as i64;
            let distinction = match i % 3 {
                0 => "Finalist",
                1 => "Bronze Medal",
                _ => "",
            };
            entries.push(entry(i, "Lyon", level, &format!("C{:02}", i), distinction));
        }

        let groups = ranked_results(&entries, 2024, "Lyon");
        let levels: Vec<i64> = groups.iter().map(|g| g.level).collect();

        assert_eq!(levels, vec![3, 4, 5, 6]);
        assert_eq!(groups.iter().map(|g| g.rows.len()).sum::<usize>(), 30);
    }

    #[test]
    fn test_finals_by_flag_or_place() {
        let mut flagged = entry(0, "Lyon", 5, "Flag", "Finalist");
        flagged.final_flag = true;
        let entries = vec![
            flagged,
            entry(1, "Finales Nationales", 5, "Spelled", "Finalist"),
            entry(2, "Lyon", 5, "City", "Finalist"),
        ];

        let finals = ranked_results(&entries, 2024, FINALS_LABEL);
        assert_eq!(names(&finals), vec!["Flag", "Spelled"]);

        let lyon = ranked_results(&entries, 2024, "Lyon");
        assert_eq!(names(&lyon), vec!["City"]);
    }

    #[test]
    fn test_finals_and_cities_are_exclusive() {
        let mut entries = Vec::new();
        let places = ["Lyon", "Paris", "finale", "Finales Nationales", "Lyon"];
        for (i, place) in places.iter().enumerate() {
            let mut e = entry(i, place, 5, &format!("N{}", i), "Bronze Medal");
            e.final_flag = i == 4;
            entries.push(e);
        }

        let in_finals: Vec<String> = names(&ranked_results(&entries, 2024, FINALS_LABEL))
            .into_iter()
            .map(String::from)
            .collect();

        for place in ["Lyon", "Paris", "finale", "Finales Nationales"] {
            for name in names(&ranked_results(&entries, 2024, place)) {
                assert!(!in_finals.iter().any(|n| n == name), "{} listed twice", name);
            }
        }
        assert_eq!(in_finals, vec!["N2", "N3", "N4"]);
    }

    #[test]
    fn test_city_match_is_exact() {
        let entries = vec![
            entry(0, "Lyon", 5, "A", ""),
            entry(1, "lyon", 5, "B", ""),
            entry(2, "Lyon ", 5, "C", ""),
        ];

        assert_eq!(names(&ranked_results(&entries, 2024, "Lyon")), vec!["A"]);
    }

    #[test]
    fn test_other_years_are_excluded() {
        let mut old = entry(0, "Lyon", 5, "Old", "");
        old.year = Some(2023);
        let entries = vec![old, entry(1, "Lyon", 5, "New", "")];

        assert_eq!(names(&ranked_results(&entries, 2024, "Lyon")), vec!["New"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(ranked_results(&[], 2024, "Lyon").is_empty());
        assert!(ranked_results(&[], 2024, FINALS_LABEL).is_empty());
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let entries = vec![Entry {
            year: Some(2024),
            place: Some("Lyon".to_string()),
            ..Entry::default()
        }];

        let groups = ranked_results(&entries, 2024, "Lyon");
        assert_eq!(
            groups[0].rows[0],
            ResultRow {
                candidate: String::new(),
                teacher: String::new(),
                distinction: String::new(),
            }
        );
    }

    #[test]
    fn test_idempotent() {
        let entries = vec![
            entry(0, "Lyon", 5, "B", "Finalist"),
            entry(1, "Lyon", 4, "A", "Silver Medal"),
            entry(2, "Lyon", 5, "C", "Finalist"),
            entry(3, "Lyon", 5, "D", "Bronze Medal"),
        ];

        let first = ranked_results(&entries, 2024, "Lyon");
        let second = ranked_results(&entries, 2024, "Lyon");
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_does_not_depend_on_input_order() {
        let entries = vec![
            entry(0, "Lyon", 5, "Bea", "Bronze Medal"),
            entry(1, "Lyon", 5, "Al", "Bronze Medal"),
            entry(2, "Lyon", 5, "Cy", "Finalist"),
            entry(3, "Lyon", 4, "Di", "Finalist"),
        ];
        let mut reversed = entries.clone();
        reversed.reverse();

        assert_eq!(
            ranked_results(&entries, 2024, "Lyon"),
            ranked_results(&reversed, 2024, "Lyon")
        );
    }

    #[test]
    fn test_same_name_falls_back_to_load_order() {
        let entries = vec![
            entry(5, "Lyon", 5, "Sam", "Bronze Medal"),
            entry(2, "Lyon", 5, "Sam", "Bronze Medal"),
        ];

        let ordered = sort_entries(&entries);
        assert_eq!(ordered[0].original_index, 2);
        assert_eq!(ordered[1].original_index, 5);
    }

    #[test]
    fn test_finalists_merge_with_named_rows_in_same_tier() {
        // Both rows score as bronze; only one mentions finalist
        let entries = vec![
            entry(0, "Lyon", 5, "Zed", "Finaliste, médaille de bronze"),
            entry(1, "Lyon", 5, "Amy", "Bronze Medal"),
            entry(2, "Lyon", 5, "Bo", "Finalist bronze medal"),
        ];

        let groups = ranked_results(&entries, 2024, "Lyon");
        let ordered = names(&groups);

        // finalists keep load order: Zed before Bo
        let zed = ordered.iter().position(|n| *n == "Zed").unwrap();
        let bo = ordered.iter().position(|n| *n == "Bo").unwrap();
        assert!(zed < bo);
        assert_eq!(ordered[0], "Amy");
    }

    #[test]
    fn test_ranked_for_selection() {
        let entries = vec![entry(0, "Lyon", 5, "A", "")];

        let full = ViewSelection {
            year: Some(2024),
            place: Some("Lyon".to_string()),
        };
        assert_eq!(ranked_for_selection(&entries, &full).len(), 1);

        let partial = ViewSelection {
            year: Some(2024),
            place: None,
        };
        assert!(ranked_for_selection(&entries, &partial).is_empty());
    }
}
