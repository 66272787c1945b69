//! Data types produced by the aggregation pipeline.

use crate::calendar::{MONTHS, WEEKDAYS};
use serde::Serialize;

/// Trips summed over one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    pub month: u32,
    pub label: &'static str,
    pub trips: u64,
}

/// Trips summed over one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayTotal {
    pub weekday: &'static str,
    pub trips: u64,
}

/// Dense weekday×month grid of trip sums; rows Monday..Sunday, columns Jan..Dec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayMonthMatrix {
    pub weekdays: [&'static str; 7],
    pub months: [u32; 12],
    pub cells: [[u64; 12]; 7],
}

impl WeekdayMonthMatrix {
    pub(crate) fn from_cells(cells: [[u64; 12]; 7]) -> Self {
        Self {
            weekdays: WEEKDAYS,
            months: MONTHS,
            cells,
        }
    }

    /// Cell for `weekday` (0 = Monday) and `month` (1..=12).
    pub fn get(&self, weekday: usize, month: u32) -> Option<u64> {
        let column = month.checked_sub(1)? as usize;
        self.cells.get(weekday)?.get(column).copied()
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().fold(0u64, |acc, &c| acc.saturating_add(c))
    }
}

/// Active vehicles and trips of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VehicleTripPair {
    pub active_vehicles: u64,
    pub trips: u64,
}

/// One equal-width bucket of the trip distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Least-squares line of trips against active vehicles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trendline {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Every chart view for one render cycle, all from the same subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateViews {
    pub month_totals: Vec<MonthTotal>,
    pub weekday_totals: Vec<WeekdayTotal>,
    pub weekday_month_matrix: WeekdayMonthMatrix,
    /// The matrix sums to zero; render a placeholder instead.
    pub matrix_is_empty: bool,
    pub trip_sample: Vec<u64>,
    pub histogram: Vec<HistogramBin>,
    pub vehicle_trip_pairs: Vec<VehicleTripPair>,
    /// No pairs to correlate; render a placeholder instead.
    pub pairs_is_empty: bool,
    pub trendline: Option<Trendline>,
    /// Trips on rows whose weekday is not one of the seven canonical names.
    pub unmatched_weekday_trips: u64,
}

/// Scalar KPIs for one render cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_trips: u64,
    pub total_active_vehicles: u64,
    pub unique_bases: usize,
    pub avg_trips_per_row: f64,
}
