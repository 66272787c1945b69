pub mod analyzers;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod record;
pub mod suggest;
