//! Keyed recurring fetches with optional change detection.
//!
//! A [`PollTask`] describes one fetch loop; [`PollingRegistry`] runs each
//! key on its own tokio task. Ticks for a key never overlap: the fetch is
//! awaited inside the loop and ticks missed while it runs are skipped.

pub mod errors;
pub mod registry;
pub mod task;

pub use errors::PollingError;
pub use registry::{PollStart, PollingRegistry};
pub use task::{FetchError, PollTask};
