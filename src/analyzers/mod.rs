//! Derived views over a resolved subset.
//!
//! [`aggregate`] produces the chart-ready tables (month, weekday and
//! weekday×month totals, trip distribution, vehicle/trip correlation) and
//! [`summary`] the scalar KPIs. Both read the same subset and keep no state.

pub mod aggregate;
pub mod summary;
pub mod types;
pub mod utility;
