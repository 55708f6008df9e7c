//! Enrolment analytics pipeline
//!
//! Loads a monthly enrolment dataset, filters it to one state, aggregates it at
//! state, district and pincode level, and derives trend, seasonality, disparity,
//! volatility and saturation indicators plus narrative insights.
//!
//! Presentation (charts, HTML, PDF) is left to callers: every output here is a
//! plain serializable structure.

pub mod aggregate;
pub mod config;
pub mod enrolment;
pub mod error;
pub mod indicators;
pub mod insights;
pub mod pipeline;

pub use aggregate::{Aggregates, EntityMonth, StateMonth};
pub use config::PipelineConfig;
pub use enrolment::{EnrolmentRow, LoadSummary, LoadedDataset};
pub use error::{PipelineError, Result};
pub use indicators::{DistrictRiskSnapshot, IndicatorReport};
pub use insights::{Insight, Recommendation, Topic};
pub use pipeline::{AnalyticsReport, DatasetProfile};
