//! The form-container API as seen by the polling layer.
//!
//! [`FormApi`] is the seam between the synchronization core and the HTTP
//! service. [`HttpFormApi`] is the production implementation; tests provide
//! scripted ones.

pub mod errors;
pub mod http;
pub mod types;

use std::future::Future;

pub use errors::ApiError;
pub use http::HttpFormApi;
pub use types::{
    Answer, ContainerPage, CreatedContainer, DateRange, ListFilter, Mutation, NewContainer,
    NewQuestion, SortOrder,
};

use crate::snapshots::{ContainerDetail, TimelineEntry};

/// Asynchronous access to form-container state.
///
/// All futures are `Send` so they can be driven from spawned polling tasks.
pub trait FormApi: Send + Sync + 'static {
    /// One page of containers matching `filter`.
    fn fetch_list(
        &self,
        filter: &ListFilter,
    ) -> impl Future<Output = Result<ContainerPage, ApiError>> + Send;

    /// Full container addressed by its access token.
    fn fetch_detail(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<ContainerDetail, ApiError>> + Send;

    /// History of the container with database id `container_id`, oldest
    /// first. A container without events yields an empty list.
    fn fetch_timeline(
        &self,
        container_id: u64,
    ) -> impl Future<Output = Result<Vec<TimelineEntry>, ApiError>> + Send;

    /// Create a container with its first form.
    fn create_container(
        &self,
        container: &NewContainer,
    ) -> impl Future<Output = Result<CreatedContainer, ApiError>> + Send;

    /// Apply a server-side change. The response body is not inspected.
    fn mutate(&self, mutation: Mutation) -> impl Future<Output = Result<(), ApiError>> + Send;
}
