//! Competitor scan orchestration.
//!
//! Ties the store, the fan-out collector, and the analysis adapter together:
//! authorize → collect → analyze → persist. Also records brand-sentiment
//! scans so the HTTP surface and the CLI share one code path.

pub mod error;
pub mod persist;
pub mod scan;
pub mod sentiment;

pub use error::ScanError;
pub use persist::persist_insights;
pub use scan::{run_scan, ScanDeps, ScanSummary};
pub use sentiment::{record_user_sentiment, RecordedSentiment};
