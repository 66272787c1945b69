//! Output formatting and persistence for dashboard snapshots.
//!
//! Supports pretty-printing, JSON serialization, a plain-text report, and CSV
//! export of the tabular views.

use anyhow::Result;
use tracing::{debug, info};

use crate::analyzers::types::{AggregateViews, WeekdayMonthMatrix};
use crate::dashboard::DashboardSnapshot;
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Logs a snapshot using Rust's debug pretty-print format.
pub fn print_pretty(snapshot: &DashboardSnapshot) {
    debug!("{:#?}", snapshot);
}

/// Serializes a snapshot as pretty-printed JSON.
pub fn render_json(snapshot: &DashboardSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Writes `rows` to a fresh CSV file at `path`, header first.
pub fn write_records<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the weekday×month grid as one row per weekday and one column per month.
pub fn write_matrix(path: &Path, matrix: &WeekdayMonthMatrix) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;

    let mut header = vec!["weekday".to_string()];
    header.extend(matrix.months.iter().map(u32::to_string));
    writer.write_record(&header)?;

    for (weekday, cells) in matrix.weekdays.iter().zip(&matrix.cells) {
        let mut record = vec![weekday.to_string()];
        record.extend(cells.iter().map(u64::to_string));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Exports the month, weekday and matrix views into `dir`, returning the files written.
pub fn export_views(dir: &Path, views: &AggregateViews) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let month_path = dir.join("month_totals.csv");
    let weekday_path = dir.join("weekday_totals.csv");
    let matrix_path = dir.join("weekday_month_matrix.csv");

    write_records(&month_path, &views.month_totals)?;
    write_records(&weekday_path, &views.weekday_totals)?;
    write_matrix(&matrix_path, &views.weekday_month_matrix)?;

    info!(dir = %dir.display(), "Views exported");
    Ok(vec![month_path, weekday_path, matrix_path])
}

/// Formats `n` with comma thousands separators.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Renders a snapshot as a plain-text report.
pub fn format_report(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, snapshot);
    out
}

/// Writes the plain-text report for `snapshot` into `out`.
pub fn write_report(out: &mut impl fmt::Write, snapshot: &DashboardSnapshot) -> fmt::Result {
    let summary = &snapshot.summary;
    let views = &snapshot.views;

    if snapshot.fell_back {
        writeln!(out, "warning: no rows match the filters, showing the full dataset\n")?;
    }

    writeln!(out, "Total trips        {}", group_thousands(summary.total_trips))?;
    writeln!(
        out,
        "Active vehicles    {}",
        group_thousands(summary.total_active_vehicles)
    )?;
    writeln!(out, "Unique bases       {}", summary.unique_bases)?;
    writeln!(out, "Avg trips / row    {:.1}", summary.avg_trips_per_row)?;

    writeln!(out, "\nTrips by month")?;
    for total in &views.month_totals {
        writeln!(
            out,
            "  {:>2} {:<4} {:>12}",
            total.month,
            total.label,
            group_thousands(total.trips)
        )?;
    }

    writeln!(out, "\nTrips by weekday")?;
    for total in &views.weekday_totals {
        writeln!(out, "  {:<10} {:>12}", total.weekday, group_thousands(total.trips))?;
    }
    if views.unmatched_weekday_trips > 0 {
        writeln!(
            out,
            "  {:<10} {:>12}",
            "(other)",
            group_thousands(views.unmatched_weekday_trips)
        )?;
    }

    writeln!(out, "\nWeekday x month")?;
    if views.matrix_is_empty {
        writeln!(out, "  not enough data for a weekday/month breakdown")?;
    } else {
        let matrix = &views.weekday_month_matrix;
        write!(out, "  {:<10}", "")?;
        for month in matrix.months {
            write!(out, " {month:>8}")?;
        }
        writeln!(out)?;
        for (weekday, cells) in matrix.weekdays.iter().zip(&matrix.cells) {
            write!(out, "  {weekday:<10}")?;
            for cell in cells {
                write!(out, " {cell:>8}")?;
            }
            writeln!(out)?;
        }
    }

    writeln!(out, "\nTrip distribution")?;
    for bin in &views.histogram {
        writeln!(out, "  {:>10.1} - {:<10.1} {:>6}", bin.lower, bin.upper, bin.count)?;
    }

    writeln!(out, "\nVehicles vs trips")?;
    let points = views.vehicle_trip_pairs.len();
    match &views.trendline {
        _ if views.pairs_is_empty => writeln!(out, "  no points to correlate"),
        Some(fit) => writeln!(
            out,
            "  trips = {:.3} * vehicles + {:.3} (r² = {:.3}, n = {points})",
            fit.slope, fit.intercept, fit.r_squared
        ),
        None => writeln!(out, "  {points} points, no trend line"),
    }
}
