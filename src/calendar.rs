//! Fixed category orderings shared by suggestions and aggregate views.

/// Canonical weekday order, Monday first.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Month numbers in calendar order.
pub const MONTHS: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three-letter English name of `month`, or `None` outside 1..=12.
pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_ABBREVIATIONS.get(i as usize))
        .copied()
}

/// Position of `name` in [`WEEKDAYS`], requiring an exact match.
pub fn weekday_position(name: &str) -> Option<usize> {
    WEEKDAYS.iter().position(|w| *w == name)
}

/// Position of `name` in [`WEEKDAYS`], ignoring case and surrounding whitespace.
pub fn weekday_position_loose(name: &str) -> Option<usize> {
    let name = name.trim();
    WEEKDAYS.iter().position(|w| w.eq_ignore_ascii_case(name))
}
