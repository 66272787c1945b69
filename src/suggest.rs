//! Type-ahead suggestions over the filterable categories.
//!
//! [`suggest`] narrows a candidate domain by a partial query. A filter value is
//! only ever taken from a narrowed candidate list, never from the raw query.

use crate::calendar::{month_abbreviation, weekday_position};
use crate::record::Dataset;
use std::collections::BTreeSet;

/// Returns every element of `domain` containing `query` case-insensitively,
/// in domain order. A blank query suggests nothing.
pub fn suggest<S: AsRef<str>>(query: &str, domain: &[S]) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    domain
        .iter()
        .map(|candidate| -> &str { candidate.as_ref() })
        .filter(|candidate| candidate.to_lowercase().contains(&query))
        .map(str::to_string)
        .collect()
}

/// Extracts the month number from a `"{number} - {name}"` label.
pub fn month_from_label(label: &str) -> Option<u32> {
    label.split(" - ").next()?.trim().parse().ok()
}

fn month_label(month: u32) -> String {
    match month_abbreviation(month) {
        Some(name) => format!("{month} - {name}"),
        None => format!("{month} - {month}"),
    }
}

/// Candidate domains derived from the values present in a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionIndex {
    months: Vec<String>,
    days: Vec<String>,
    weekdays: Vec<String>,
}

impl SuggestionIndex {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let records = dataset.records();

        let months: BTreeSet<u32> = records.iter().map(|r| r.month).collect();
        let days: BTreeSet<u32> = records.iter().map(|r| r.day).collect();
        let weekday_set: BTreeSet<&str> = records.iter().map(|r| r.weekday.as_str()).collect();

        // Values outside the canonical week come first, alphabetically.
        let mut weekdays: Vec<String> = weekday_set.into_iter().map(str::to_string).collect();
        weekdays.sort_by_key(|w| weekday_position(w).map_or((0, 0), |i| (1, i)));

        Self {
            months: months.into_iter().map(month_label).collect(),
            days: days.into_iter().map(|d| d.to_string()).collect(),
            weekdays,
        }
    }

    pub fn month_domain(&self) -> &[String] {
        &self.months
    }

    pub fn day_domain(&self) -> &[String] {
        &self.days
    }

    pub fn weekday_domain(&self) -> &[String] {
        &self.weekdays
    }

    pub fn months(&self, query: &str) -> Vec<String> {
        suggest(query, &self.months)
    }

    pub fn days(&self, query: &str) -> Vec<String> {
        suggest(query, &self.days)
    }

    pub fn weekdays(&self, query: &str) -> Vec<String> {
        suggest(query, &self.weekdays)
    }

    /// Confirms the first month candidate for `query`.
    pub fn pick_month(&self, query: &str) -> Option<u32> {
        self.months(query).first().and_then(|label| month_from_label(label))
    }

    /// Confirms the first day candidate for `query`.
    pub fn pick_day(&self, query: &str) -> Option<u32> {
        self.days(query).first().and_then(|day| day.parse().ok())
    }

    /// Confirms the first weekday candidate for `query`.
    pub fn pick_weekday(&self, query: &str) -> Option<String> {
        self.weekdays(query).into_iter().next()
    }
}
