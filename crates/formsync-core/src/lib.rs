//! Core library for formsync.
//!
//! Keeps a local picture of form-container state in step with the approval
//! service by polling: a keyed [`polling::PollingRegistry`] runs recurring
//! fetches, and a [`view::ViewCoordinator`] decides what polls while a list
//! or a single container is on screen.

pub mod api;
pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod polling;
pub mod snapshots;
pub mod view;

// Re-export commonly used types at crate root for convenience
pub use api::{
    ApiError, ContainerPage, CreatedContainer, FormApi, HttpFormApi, ListFilter, Mutation,
    NewContainer, SortOrder,
};
pub use config::FormsyncConfig;
pub use errors::{ConfigError, FormsyncError, FormsyncResult};
pub use polling::{PollStart, PollTask, PollingError, PollingRegistry};
pub use snapshots::{ContainerDetail, ContainerSummary, FormStatus, ListDiff, TimelineEntry};
pub use view::{Route, UpdateNotice, ViewCoordinator, ViewError, ViewState};

pub use logging::init_logging;
