// 🧭 Navigation State
// home → years → places → results, as plain values
//
// Every transition returns a new state; nothing here is shared or mutated
// behind the caller's back.

use serde::{Deserialize, Serialize};

use crate::places::{is_finals_place, FINALS_LABEL};

pub const EMPTY_YEARS: &str = "No year available.";
pub const EMPTY_PLACES: &str = "No place for this year.";
pub const EMPTY_RESULTS: &str = "No result for this selection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Home,
    Years,
    Places,
    Results,
}

impl View {
    pub fn title(&self) -> &str {
        match self {
            View::Home => "Welcome",
            View::Years => "Results",
            View::Places => "Places",
            View::Results => "Ranking",
        }
    }
}

/// What the user has picked so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSelection {
    pub year: Option<i64>,
    pub place: Option<String>,
}

impl ViewSelection {
    pub fn is_finals(&self) -> bool {
        self.place.as_deref() == Some(FINALS_LABEL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub view: View,
    pub selection: ViewSelection,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::home()
    }
}

impl ViewState {
    pub fn home() -> Self {
        ViewState {
            view: View::Home,
            selection: ViewSelection::default(),
        }
    }

    pub fn years() -> Self {
        ViewState {
            view: View::Years,
            selection: ViewSelection::default(),
        }
    }

    pub fn select_year(&self, year: i64) -> Self {
        ViewState {
            view: View::Places,
            selection: ViewSelection {
                year: Some(year),
                place: None,
            },
        }
    }

    /// Open the results table; without a year there is nothing to show
    ///
    /// A finals spelling picked from the places list opens the finals
    /// table under its label.
    pub fn select_place(&self, place: impl Into<String>) -> Self {
        if self.selection.year.is_none() {
            return self.clone();
        }

        let place = place.into();
        let place = if is_finals_place(&place) {
            FINALS_LABEL.to_string()
        } else {
            place
        };

        ViewState {
            view: View::Results,
            selection: ViewSelection {
                year: self.selection.year,
                place: Some(place),
            },
        }
    }

    /// One step up the navigation
    pub fn back(&self) -> Self {
        match self.view {
            View::Results => ViewState {
                view: View::Places,
                selection: ViewSelection {
                    year: self.selection.year,
                    place: None,
                },
            },
            View::Places => ViewState::years(),
            View::Years | View::Home => ViewState::home(),
        }
    }

    /// Trail shown above the places list and results table
    pub fn breadcrumb(&self) -> String {
        let mut parts = vec![View::Years.title().to_string()];

        if matches!(self.view, View::Places | View::Results) {
            if let Some(year) = self.selection.year {
                parts.push(year.to_string());
            }
        }
        if self.view == View::Results {
            if let Some(place) = &self.selection.place {
                parts.push(place.clone());
            }
        }

        parts.join(" › ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_navigation() {
        let state = ViewState::years().select_year(2024).select_place("Lyon");

        assert_eq!(state.view, View::Results);
        assert_eq!(state.selection.year, Some(2024));
        assert_eq!(state.selection.place.as_deref(), Some("Lyon"));
    }

    #[test]
    fn test_selecting_a_year_clears_the_place() {
        let state = ViewState::years()
            .select_year(2024)
            .select_place("Lyon")
            .select_year(2023);

        assert_eq!(state.view, View::Places);
        assert_eq!(state.selection.place, None);
    }

    #[test]
    fn test_place_needs_a_year() {
        let state = ViewState::years().select_place("Lyon");
        assert_eq!(state, ViewState::years());
    }

    #[test]
    fn test_back_walks_up() {
        let results = ViewState::years().select_year(2024).select_place("Lyon");

        let places = results.back();
        assert_eq!(places.view, View::Places);
        assert_eq!(places.selection.year, Some(2024));
        assert_eq!(places.selection.place, None);

        let years = places.back();
        assert_eq!(years, ViewState::years());

        assert_eq!(years.back(), ViewState::home());
        assert_eq!(ViewState::home().back(), ViewState::home());
    }

    #[test]
    fn test_transitions_leave_original_untouched() {
        let places = ViewState::years().select_year(2024);
        let _ = places.select_place("Lyon");
        assert_eq!(places.view, View::Places);
        assert_eq!(places.selection.place, None);
    }

    #[test]
    fn test_breadcrumb() {
        let places = ViewState::years().select_year(2024);
        assert_eq!(places.breadcrumb(), "Results › 2024");

        let results = places.select_place(FINALS_LABEL);
        assert_eq!(results.breadcrumb(), "Results › 2024 › National Finals");
        assert!(results.selection.is_finals());
    }

    #[test]
    fn test_finals_spelling_opens_finals_table() {
        let state = ViewState::years()
            .select_year(2024)
            .select_place("Finales Nationales");

        assert_eq!(state.selection.place.as_deref(), Some(FINALS_LABEL));
    }
}
