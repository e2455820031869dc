//! View-state coordination on top of the polling registry.
//!
//! A [`ViewCoordinator`] owns the data a screen renders and decides which
//! polling key runs for the current [`ViewState`].

pub mod coordinator;
pub mod errors;
pub mod types;

pub use coordinator::ViewCoordinator;
pub use errors::ViewError;
pub use types::{
    Route, TABLE_POLLING_KEY, UPDATE_NOTICE_MESSAGE, UpdateNotice, ViewSettings, ViewState,
};
