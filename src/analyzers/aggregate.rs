use crate::analyzers::types::{
    AggregateViews, HistogramBin, MonthTotal, Trendline, VehicleTripPair, WeekdayMonthMatrix,
    WeekdayTotal,
};
use crate::analyzers::utility::mean;
use crate::calendar::{MONTHS, WEEKDAYS, month_abbreviation, weekday_position_loose};
use crate::filter::ResolvedSubset;

/// Bucket count of the trip distribution unless configured otherwise.
pub const DEFAULT_HISTOGRAM_BINS: usize = 25;

/// Builds every chart view from `subset` with the default histogram size.
pub fn aggregate(subset: &ResolvedSubset) -> AggregateViews {
    aggregate_with_bins(subset, DEFAULT_HISTOGRAM_BINS)
}

/// Builds every chart view from `subset` in a single pass.
///
/// Month and weekday views always list all twelve months and all seven
/// weekdays in calendar order; categories absent from the subset are zero.
pub fn aggregate_with_bins(subset: &ResolvedSubset, bins: usize) -> AggregateViews {
    let mut by_month = [0u64; 12];
    let mut by_weekday = [0u64; 7];
    let mut cells = [[0u64; 12]; 7];
    let mut unmatched_weekday_trips = 0u64;

    let mut trip_sample = Vec::with_capacity(subset.len());
    let mut vehicle_trip_pairs = Vec::with_capacity(subset.len());

    for row in subset.iter() {
        trip_sample.push(row.trips);
        vehicle_trip_pairs.push(VehicleTripPair {
            active_vehicles: row.active_vehicles,
            trips: row.trips,
        });

        let month = month_column(row.month);
        if let Some(m) = month {
            by_month[m] = by_month[m].saturating_add(row.trips);
        }

        match weekday_position_loose(&row.weekday) {
            Some(w) => {
                by_weekday[w] = by_weekday[w].saturating_add(row.trips);
                if let Some(m) = month {
                    cells[w][m] = cells[w][m].saturating_add(row.trips);
                }
            }
            None => unmatched_weekday_trips = unmatched_weekday_trips.saturating_add(row.trips),
        }
    }

    let month_totals = MONTHS
        .iter()
        .zip(by_month)
        .map(|(&month, trips)| MonthTotal {
            month,
            label: month_abbreviation(month).unwrap_or_default(),
            trips,
        })
        .collect();

    let weekday_totals = WEEKDAYS
        .iter()
        .zip(by_weekday)
        .map(|(&weekday, trips)| WeekdayTotal { weekday, trips })
        .collect();

    let weekday_month_matrix = WeekdayMonthMatrix::from_cells(cells);
    let matrix_is_empty = weekday_month_matrix.total() == 0;

    let histogram = histogram(&trip_sample, bins);
    let trendline = trendline(&vehicle_trip_pairs);
    let pairs_is_empty = vehicle_trip_pairs.is_empty();

    AggregateViews {
        month_totals,
        weekday_totals,
        weekday_month_matrix,
        matrix_is_empty,
        trip_sample,
        histogram,
        vehicle_trip_pairs,
        pairs_is_empty,
        trendline,
        unmatched_weekday_trips,
    }
}

fn month_column(month: u32) -> Option<usize> {
    (1..=12).contains(&month).then(|| (month - 1) as usize)
}

/// Splits `sample` into `bins` equal-width buckets between its min and max.
///
/// The last bucket is closed on the right. A constant sample yields a single
/// bucket and an empty sample none.
pub fn histogram(sample: &[u64], bins: usize) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (sample.iter().min(), sample.iter().max()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let (lo, hi) = (min as f64, max as f64);
    if min == max {
        return vec![HistogramBin {
            lower: lo,
            upper: hi,
            count: sample.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &value in sample {
        let idx = ((value as f64 - lo) / width) as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

/// Ordinary least squares of trips on active vehicles.
///
/// `None` with fewer than two points or when every point has the same
/// vehicle count.
pub fn trendline(pairs: &[VehicleTripPair]) -> Option<Trendline> {
    if pairs.len() < 2 {
        return None;
    }

    let xs: Vec<f64> = pairs.iter().map(|p| p.active_vehicles as f64).collect();
    let ys: Vec<f64> = pairs.iter().map(|p| p.trips as f64).collect();
    let (mean_x, mean_y) = (mean(&xs), mean(&ys));

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(&ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    // Constant trips: the horizontal line fits exactly.
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };

    Some(Trendline {
        slope,
        intercept: mean_y - slope * mean_x,
        r_squared,
    })
}
