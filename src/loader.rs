//! Loading and validating the trip CSV.
//!
//! [`load`] reads the whole file into an immutable [`Dataset`]; per-row date
//! failures degrade to `None`, every other defect aborts the load.
//! [`DatasetHandle`] wraps it in a load-at-most-once cache that can be shared
//! between threads.

use crate::error::LoadError;
use crate::record::{Dataset, TripRecord};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::OnceCell;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Header of the dispatch base column in the source data.
pub const BASE_COLUMN: &str = "dispatching_base_number";
const BASE_COLUMN_ALIAS: &str = "dispatch_base";

/// Columns every dataset must carry, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    BASE_COLUMN,
    "date",
    "active_vehicles",
    "trips",
    "day",
    "month",
    "weekday",
];

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m-%d-%Y"];

/// Reads and validates the dataset at `path`.
///
/// # Errors
///
/// - [`LoadError::NotFound`] if the path is not a regular file or cannot be opened.
/// - [`LoadError::Parse`] for malformed CSV or a file without data rows.
/// - [`LoadError::MissingColumns`] / [`LoadError::InvalidValue`] for schema problems.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    let not_found = |source| LoadError::NotFound {
        path: path.to_path_buf(),
        source,
    };

    if !path.metadata().map_err(not_found)?.is_file() {
        return Err(not_found(std::io::Error::other("not a regular file")));
    }
    let file = File::open(path).map_err(not_found)?;

    let dataset = read_dataset(file)?;

    info!(
        rows = dataset.len(),
        null_dates = dataset.null_dates(),
        "Dataset loaded"
    );
    Ok(dataset)
}

/// Parses a dataset from any CSV byte stream with a header row.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;
    debug!(columns = headers.len(), "Header validated");

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    while rdr.read_record(&mut row)? {
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        records.push(columns.parse_row(&row, line)?);
    }

    if records.is_empty() {
        return Err(LoadError::Parse {
            line: 1,
            message: "dataset contains no rows".to_string(),
        });
    }

    Ok(Dataset::from_records(records))
}

/// Reads a date in one of the accepted layouts, or `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Positions of the required columns within a header row.
struct ColumnIndex {
    base: usize,
    date: usize,
    active_vehicles: usize,
    trips: usize,
    day: usize,
    month: usize,
    weekday: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let lookups = [
            find(BASE_COLUMN).or_else(|| find(BASE_COLUMN_ALIAS)),
            find("date"),
            find("active_vehicles"),
            find("trips"),
            find("day"),
            find("month"),
            find("weekday"),
        ];

        match lookups {
            [
                Some(base),
                Some(date),
                Some(active_vehicles),
                Some(trips),
                Some(day),
                Some(month),
                Some(weekday),
            ] => Ok(Self {
                base,
                date,
                active_vehicles,
                trips,
                day,
                month,
                weekday,
            }),
            _ => Err(LoadError::MissingColumns {
                missing: REQUIRED_COLUMNS
                    .iter()
                    .zip(lookups)
                    .filter(|(_, idx)| idx.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect(),
            }),
        }
    }

    fn parse_row(&self, row: &StringRecord, line: u64) -> Result<TripRecord, LoadError> {
        let field = |idx: usize| row.get(idx).unwrap_or("");

        let month = parse_ranged(field(self.month), "month", line, 1, 12)?;
        let day = parse_ranged(field(self.day), "day", line, 1, 31)?;

        Ok(TripRecord {
            dispatch_base: field(self.base).to_string(),
            date: parse_date(field(self.date)),
            active_vehicles: parse_count(field(self.active_vehicles), "active_vehicles", line)?,
            trips: parse_count(field(self.trips), "trips", line)?,
            day,
            month,
            weekday: field(self.weekday).to_string(),
        })
    }
}

/// Parses a non-negative integer; integral floats such as `"3.0"` are accepted.
fn parse_count(value: &str, column: &str, line: u64) -> Result<u64, LoadError> {
    if let Ok(n) = value.parse::<u64>() {
        return Ok(n);
    }

    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Ok(f as u64)
        }
        _ => Err(invalid_value(column, line, value)),
    }
}

fn parse_ranged(value: &str, column: &str, line: u64, min: u32, max: u32) -> Result<u32, LoadError> {
    let n = parse_count(value, column, line)?;
    match u32::try_from(n) {
        Ok(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(invalid_value(column, line, value)),
    }
}

fn invalid_value(column: &str, line: u64, value: &str) -> LoadError {
    LoadError::InvalidValue {
        column: column.to_string(),
        line,
        value: value.to_string(),
    }
}

/// Lazily loaded, process-wide dataset for one path.
///
/// Concurrent first calls to [`DatasetHandle::get`] block on a single load.
/// A failed load is not cached.
#[derive(Debug)]
pub struct DatasetHandle {
    path: PathBuf,
    cell: OnceCell<Arc<Dataset>>,
}

impl DatasetHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<Arc<Dataset>, LoadError> {
        self.cell
            .get_or_try_init(|| load(&self.path).map(Arc::new))
            .map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadErrorKind;
    use std::env;
    use std::fs;

    const HEADER: &str = "dispatching_base_number,date,active_vehicles,trips,day,month,weekday";

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn read(text: &str) -> Result<Dataset, LoadError> {
        read_dataset(text.as_bytes())
    }

    #[test]
    fn test_read_valid_rows() {
        let text = format!(
            "{HEADER}\nB02512,2015-01-01,190,1132,1,1,Thursday\nB02765, 1/2/2015 ,225,1765,2,1,Friday\n"
        );
        let dataset = read(&text).unwrap();

        assert_eq!(dataset.len(), 2);
        let first = &dataset.records()[0];
        assert_eq!(first.dispatch_base, "B02512");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2015, 1, 1));
        assert_eq!(first.active_vehicles, 190);
        assert_eq!(first.trips, 1132);
        assert_eq!(first.weekday, "Thursday");
        assert_eq!(
            dataset.records()[1].date,
            NaiveDate::from_ymd_opt(2015, 1, 2)
        );
    }

    #[test]
    fn test_unparsable_date_becomes_none() {
        let text = format!("{HEADER}\nB02512,not-a-date,190,1132,1,1,Thursday\nB02512,,1,2,3,1,Saturday\n");
        let dataset = read(&text).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.null_dates(), 2);
    }

    #[test]
    fn test_column_order_and_extra_columns_are_free() {
        let text = "weekday,month,day,trips,active_vehicles,date,dispatch_base,extra\nMonday,3,9,10,4,2015-03-09,B1,x\n";
        let dataset = read(text).unwrap();

        let row = &dataset.records()[0];
        assert_eq!(row.dispatch_base, "B1");
        assert_eq!(row.month, 3);
        assert_eq!(row.day, 9);
        assert_eq!(row.trips, 10);
    }

    #[test]
    fn test_missing_columns_are_enumerated() {
        let err = read("dispatching_base_number,date,trips,day\nB1,2015-01-01,3,4\n").unwrap_err();

        assert_eq!(err.kind(), LoadErrorKind::Schema);
        match err {
            LoadError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["active_vehicles", "month", "weekday"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_month_is_schema_error() {
        let text = format!("{HEADER}\nB1,2015-01-01,1,2,3,January,Monday\n");
        let err = read(&text).unwrap_err();

        assert_eq!(err.kind(), LoadErrorKind::Schema);
        match err {
            LoadError::InvalidValue { column, line, value } => {
                assert_eq!(column, "month");
                assert_eq!(line, 2);
                assert_eq!(value, "January");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_out_of_range_day_is_schema_error() {
        let text = format!("{HEADER}\nB1,2015-01-01,1,2,32,1,Monday\n");
        assert_eq!(read(&text).unwrap_err().kind(), LoadErrorKind::Schema);
    }

    #[test]
    fn test_integral_floats_are_accepted() {
        let text = format!("{HEADER}\nB1,2015-01-01,4.0,10.0,5.0,1.0,Monday\n");
        let dataset = read(&text).unwrap();

        let row = &dataset.records()[0];
        assert_eq!(row.active_vehicles, 4);
        assert_eq!(row.trips, 10);
        assert_eq!(row.day, 5);
        assert_eq!(row.month, 1);
    }

    #[test]
    fn test_negative_or_fractional_counts_rejected() {
        let negative = format!("{HEADER}\nB1,2015-01-01,-4,10,5,1,Monday\n");
        let fractional = format!("{HEADER}\nB1,2015-01-01,4,10.5,5,1,Monday\n");

        assert_eq!(read(&negative).unwrap_err().kind(), LoadErrorKind::Schema);
        assert_eq!(read(&fractional).unwrap_err().kind(), LoadErrorKind::Schema);
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let text = format!("{HEADER}\nB1,2015-01-01,4,10\n");
        assert_eq!(read(&text).unwrap_err().kind(), LoadErrorKind::Parse);
    }

    #[test]
    fn test_header_only_is_parse_error() {
        let text = format!("{HEADER}\n");
        assert_eq!(read(&text).unwrap_err().kind(), LoadErrorKind::Parse);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2015, 2, 14);
        assert_eq!(parse_date("2015-02-14"), expected);
        assert_eq!(parse_date("02/14/2015"), expected);
        assert_eq!(parse_date("2/14/2015"), expected);
        assert_eq!(parse_date("2015/02/14"), expected);
        assert_eq!(parse_date("2015-02-14 00:00:00"), expected);
        assert_eq!(parse_date("14th Feb"), None);
        assert_eq!(parse_date("  "), None);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let err = load(&temp_path("trip_insights_does_not_exist.csv")).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::NotFound);
    }

    #[test]
    fn test_load_directory_is_not_found() {
        let dir = temp_path("trip_insights_test_dir_source");
        fs::create_dir_all(&dir).unwrap();

        let err = load(&dir).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::NotFound);
        assert!(matches!(err, LoadError::NotFound { .. }));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_handle_loads_once() {
        let path = temp_path("trip_insights_test_handle.csv");
        fs::write(&path, format!("{HEADER}\nB1,2015-01-01,4,10,5,1,Thursday\n")).unwrap();

        let handle = DatasetHandle::new(&path);
        assert!(!handle.is_loaded());

        let first = handle.get().unwrap();
        // Deleting the file must not matter once cached.
        fs::remove_file(&path).unwrap();
        let second = handle.get().unwrap();

        assert!(handle.is_loaded());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_handle_failed_load_is_not_cached() {
        let path = temp_path("trip_insights_test_retry.csv");
        let _ = fs::remove_file(&path);

        let handle = DatasetHandle::new(&path);
        assert!(handle.get().is_err());
        assert!(!handle.is_loaded());

        fs::write(&path, format!("{HEADER}\nB1,2015-01-01,4,10,5,1,Thursday\n")).unwrap();
        assert_eq!(handle.get().unwrap().len(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_handle_shared_between_threads() {
        let path = temp_path("trip_insights_test_threads.csv");
        fs::write(&path, format!("{HEADER}\nB1,2015-01-01,4,10,5,1,Thursday\n")).unwrap();

        let handle = Arc::new(DatasetHandle::new(&path));
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let handle = Arc::clone(&handle);
                std::thread::spawn(move || handle.get().unwrap())
            })
            .collect();

        let loaded: Vec<Arc<Dataset>> = workers.into_iter().map(|w| w.join().unwrap()).collect();
        for dataset in &loaded[1..] {
            assert!(Arc::ptr_eq(&loaded[0], dataset));
        }

        fs::remove_file(&path).unwrap();
    }
}
