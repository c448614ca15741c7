// 🔎 Text Classifiers - Rules as Data
// Numeric extraction for loosely typed levels, finalist detection and
// distinction scoring through an ordered rule table (first match wins).

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::entry::LevelValue;

/// Fallback rank for levels that carry no number: they sort after every
/// real level
pub const LEVEL_SENTINEL: i64 = 999;

// ============================================================================
// NUMERIC EXTRACTION
// ============================================================================

/// First run of ASCII digits anywhere in `text`, parsed as an integer
pub fn first_integer(text: &str) -> Option<i64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = {
        let rest = &text[start..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    digits.parse().ok()
}

/// Numeric value of a level field, or `fallback` when there is none
///
/// "Level 11 - Advanced" → 11, `7` → 7, `5.5` → 5, missing or digit-free
/// text → `fallback`. Levels are whole ids, so fractions are dropped.
pub fn extract_number(value: Option<&LevelValue>, fallback: i64) -> i64 {
    match value {
        None => fallback,
        Some(LevelValue::Int(n)) => *n,
        Some(LevelValue::Float(f)) if f.is_finite() => f.trunc() as i64,
        Some(LevelValue::Float(_)) => fallback,
        Some(LevelValue::Text(s)) => first_integer(s).unwrap_or(fallback),
    }
}

/// Sort key for a level: lower first, unparseable last
pub fn level_rank(level: Option<&LevelValue>) -> i64 {
    extract_number(level, LEVEL_SENTINEL)
}

// ============================================================================
// TEXT NORMALIZATION
// ============================================================================

/// Lowercase with diacritics removed ("Trophée" → "trophee")
pub fn fold_text(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Locale-aware string ordering
///
/// Base letters first, then accents (unaccented first), then case
/// (lowercase first). "Élodie" sorts next to "Elodie" rather than after
/// "Zoé".
pub fn collate(a: &str, b: &str) -> Ordering {
    fold_text(a)
        .cmp(&fold_text(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| swap_case(a).cmp(&swap_case(b)))
}

fn swap_case(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                c.to_uppercase().collect::<Vec<_>>()
            }
        })
        .collect()
}

// ============================================================================
// FINALIST DETECTION
// ============================================================================

/// Case-insensitive "finalist" mention (French "finaliste" included)
pub fn is_finalist_text(text: Option<&str>) -> bool {
    match text {
        Some(t) if !t.is_empty() => t.to_lowercase().contains("finalist"),
        _ => false,
    }
}

// ============================================================================
// DISTINCTION RULES
// ============================================================================

/// Score for text that matched no rule
pub const SCORE_OTHER: u32 = 5;

/// Score for missing or empty text
pub const SCORE_NONE: u32 = 0;

/// One scoring rule: pattern over folded text, and the score it grants
#[derive(Debug, Clone)]
pub struct DistinctionRule {
    pub id: &'static str,
    pub score: u32,
    pattern: Regex,
}

impl DistinctionRule {
    fn new(id: &'static str, score: u32, pattern: &str) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|err| panic!("invalid pattern for rule {}: {}", id, err));
        DistinctionRule { id, score, pattern }
    }

    /// Check the rule against already folded text
    pub fn matches(&self, folded: &str) -> bool {
        self.pattern.is_match(folded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinctionMatch {
    pub score: u32,
    /// Rule that produced the score; `None` for the "other" and "empty" tiers
    pub rule_id: Option<&'static str>,
}

/// Ordered rule table, evaluated top-down
pub struct DistinctionScorer {
    rules: Vec<DistinctionRule>,
}

const FIRST: &str = r"\b1(?:st|ere|re|er)?";
const SECOND: &str = r"\b2(?:nd|eme|e)?";
const THIRD: &str = r"\b3(?:rd|eme|e)?";
const FOURTH: &str = r"\b4(?:th|eme|e)?";
const PRIZE: &str = r"\s*(?:prix|prize)";

impl DistinctionScorer {
    /// Build the standard table, highest award first
    pub fn new() -> Self {
        let plaque = |ordinal: &str| format!("{}{}.*plaque", ordinal, PRIZE);

        let rules = vec![
            DistinctionRule::new("trophy", 100, r"troph(?:y|ies|ee|ees)"),
            DistinctionRule::new("plaque_1", 90, &plaque(FIRST)),
            DistinctionRule::new("plaque_2", 80, &plaque(SECOND)),
            DistinctionRule::new("plaque_3", 70, &plaque(THIRD)),
            DistinctionRule::new("plaque_4", 60, &plaque(FOURTH)),
            DistinctionRule::new(
                "gold_medal_1",
                50,
                &format!(r"{}{}.*(?:medaille.*or|gold\s*medal|medal.*gold)", FIRST, PRIZE),
            ),
            DistinctionRule::new("silver_medal", 30, r"medaille.*argent|silver\s*medal|medal.*silver"),
            DistinctionRule::new("bronze_medal", 20, r"medaille.*bronze|bronze\s*medal|medal.*bronze"),
            DistinctionRule::new("finalist", 10, r"finalist"),
        ];

        DistinctionScorer { rules }
    }

    /// Shared instance, compiled on first use
    pub fn global() -> &'static DistinctionScorer {
        static SCORER: OnceLock<DistinctionScorer> = OnceLock::new();
        SCORER.get_or_init(DistinctionScorer::new)
    }

    pub fn rules(&self) -> &[DistinctionRule] {
        &self.rules
    }

    /// Score a distinction text and report which rule fired
    pub fn classify(&self, text: Option<&str>) -> DistinctionMatch {
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => {
                return DistinctionMatch {
                    score: SCORE_NONE,
                    rule_id: None,
                }
            }
        };

        let folded = fold_text(text);
        for rule in &self.rules {
            if rule.matches(&folded) {
                return DistinctionMatch {
                    score: rule.score,
                    rule_id: Some(rule.id),
                };
            }
        }

        DistinctionMatch {
            score: SCORE_OTHER,
            rule_id: None,
        }
    }

    pub fn score(&self, text: Option<&str>) -> u32 {
        self.classify(text).score
    }
}

impl Default for DistinctionScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rank of a distinction text, higher is better
pub fn distinction_rank(text: Option<&str>) -> u32 {
    DistinctionScorer::global().score(text)
}

// ============================================================================
// TESTS
// ============================================================================
