//! `tally-engine` — keyed two-dataset reconciliation engine.
//!
//! Pure engine crate: receives pre-parsed datasets, returns classified
//! results. No CLI or IO dependencies.

pub mod dataset;
pub mod diff;
pub mod engine;
pub mod error;
pub mod index;
pub mod model;
pub mod normalize;
pub mod options;

pub use dataset::{Dataset, Row, Value};
pub use engine::reconcile;
pub use error::OptionsError;
pub use model::ReconciliationResult;
pub use options::{ReconcileOptions, ResolvedOptions};
