//! Typed snapshots of server-side form-container state, and the pure
//! comparisons the polling layer uses to decide what changed.

pub mod diff;
pub mod types;

pub use diff::{ListDiff, detail_changed};
pub use types::{
    ContainerDetail, ContainerSummary, FormDetail, FormStatus, FormSummary, Question,
    TimelineEntry,
};
