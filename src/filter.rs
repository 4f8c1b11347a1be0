//! Log Filtering
//!
//! Client-local search/weight predicate applied to the fetched entry set
//! before rendering. Filtering never touches server state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::FoodLogEntry;

/// Portion sizes offered by the weight selectors
pub const WEIGHT_OPTIONS: [u32; 8] = [50, 100, 150, 200, 250, 300, 400, 500];

/// Portion size preselected for a new analysis
pub const DEFAULT_WEIGHT: u32 = 100;

/// Weight selector value: either every entry or an exact gram amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightFilter {
    #[default]
    All,
    Grams(u32),
}

impl WeightFilter {
    pub fn matches(&self, weight: Option<u32>) -> bool {
        match self {
            WeightFilter::All => true,
            WeightFilter::Grams(wanted) => weight == Some(*wanted),
        }
    }
}

impl fmt::Display for WeightFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightFilter::All => f.write_str("all"),
            WeightFilter::Grams(g) => write!(f, "{}", g),
        }
    }
}

impl FromStr for WeightFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(WeightFilter::All);
        }
        s.trim_end_matches('g')
            .parse::<u32>()
            .map(WeightFilter::Grams)
            .map_err(|_| format!("Invalid weight filter: {}. Use: all, 100, 200g", s))
    }
}

/// Search text plus weight selector, rebuilt from the controls on each render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: String,
    pub weight_filter: WeightFilter,
}

impl FilterState {
    pub fn new(search_text: impl Into<String>, weight_filter: WeightFilter) -> Self {
        Self {
            search_text: search_text.into(),
            weight_filter,
        }
    }

    /// An entry is shown iff its name contains the search text (ignoring
    /// case) and its weight passes the weight selector.
    pub fn matches(&self, entry: &FoodLogEntry) -> bool {
        self.name_matches(&entry.food_name) && self.weight_filter.matches(entry.weight)
    }

    /// Filter `entries`, preserving their order
    pub fn apply<'a>(&self, entries: &'a [FoodLogEntry]) -> Vec<&'a FoodLogEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }

    fn name_matches(&self, food_name: &str) -> bool {
        food_name
            .to_lowercase()
            .contains(&self.search_text.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrition;

    fn entry(id: i64, name: &str, weight: Option<u32>) -> FoodLogEntry {
        FoodLogEntry {
            id,
            food_name: name.to_string(),
            confidence: 0.8,
            weight,
            nutrition: Nutrition::new(100.0, 5.0, 10.0, 2.0),
            timestamp: None,
        }
    }

    fn sample() -> Vec<FoodLogEntry> {
        vec![
            entry(1, "Pizza", Some(200)),
            entry(2, "Salad", Some(100)),
            entry(3, "caesar_salad", Some(200)),
            entry(4, "pizza", None),
        ]
    }

    fn ids(entries: &[&FoodLogEntry]) -> Vec<i64> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let entries = vec![entry(1, "Pizza", Some(200)), entry(2, "Salad", Some(100))];
        let filter = FilterState::new("pizza", WeightFilter::All);
        assert_eq!(ids(&filter.apply(&entries)), vec![1]);
    }

    #[test]
    fn test_weight_only() {
        let filter = FilterState::new("", WeightFilter::Grams(200));
        assert_eq!(ids(&filter.apply(&sample())), vec![1, 3]);
    }

    #[test]
    fn test_search_and_weight_combined() {
        let filter = FilterState::new("SALAD", WeightFilter::Grams(200));
        assert_eq!(ids(&filter.apply(&sample())), vec![3]);
    }

    #[test]
    fn test_missing_weight_never_matches_grams() {
        let filter = FilterState::new("pizza", WeightFilter::Grams(200));
        assert_eq!(ids(&filter.apply(&sample())), vec![1]);

        let filter = FilterState::new("pizza", WeightFilter::All);
        assert_eq!(ids(&filter.apply(&sample())), vec![1, 4]);
    }

    #[test]
    fn test_apply_agrees_with_matches() {
        let entries = sample();
        let filters = [
            FilterState::default(),
            FilterState::new("a", WeightFilter::All),
            FilterState::new("za", WeightFilter::Grams(200)),
            FilterState::new("x", WeightFilter::Grams(100)),
            FilterState::new("", WeightFilter::Grams(999)),
        ];

        for filter in &filters {
            let expected: Vec<i64> = entries
                .iter()
                .filter(|e| filter.matches(e))
                .map(|e| e.id)
                .collect();
            assert_eq!(ids(&filter.apply(&entries)), expected, "{:?}", filter);
        }
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = FilterState::default();
        assert_eq!(filter.weight_filter, WeightFilter::All);
        assert_eq!(filter.apply(&sample()).len(), 4);
    }

    #[test]
    fn test_weight_filter_parse() {
        assert_eq!("all".parse::<WeightFilter>().unwrap(), WeightFilter::All);
        assert_eq!("".parse::<WeightFilter>().unwrap(), WeightFilter::All);
        assert_eq!("200".parse::<WeightFilter>().unwrap(), WeightFilter::Grams(200));
        assert_eq!("150g".parse::<WeightFilter>().unwrap(), WeightFilter::Grams(150));
        assert!("heavy".parse::<WeightFilter>().is_err());
        assert_eq!(WeightFilter::Grams(200).to_string(), "200");
    }
}
