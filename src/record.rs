use chrono::NaiveDate;
use serde::Serialize;

/// One row of the trip dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TripRecord {
    pub dispatch_base: String,
    /// `None` when the source value could not be read as a date.
    pub date: Option<NaiveDate>,
    pub active_vehicles: u64,
    pub trips: u64,
    pub day: u32,
    pub month: u32,
    pub weekday: String,
}

/// The full trip table, loaded once and read-only afterwards.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<TripRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<TripRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows whose date failed to parse.
    pub fn null_dates(&self) -> usize {
        self.records.iter().filter(|r| r.date.is_none()).count()
    }
}
