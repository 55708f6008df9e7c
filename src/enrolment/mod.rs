//! Enrolment records and the CSV loader/cleaner

mod data;
pub mod loader;

pub use data::{EnrolmentRow, month_start, parse_count, parse_date};
pub use loader::{LoadSummary, LoadedDataset, load_rows, load_rows_from_reader};
