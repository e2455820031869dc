//! Change detection between snapshots.
//!
//! Everything here is a pure comparison of two immutable values.

use std::str::FromStr;

use super::types::ContainerDetail;

/// How the table decides that a freshly fetched list differs from the one
/// on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListDiff {
    /// Element-wise deep comparison. Catches status changes that keep the
    /// row count constant.
    #[default]
    Structural,
    /// Row count only. Misses in-place status changes; opt-in only.
    LengthOnly,
}

impl FromStr for ListDiff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structural" => Ok(ListDiff::Structural),
            "length" => Ok(ListDiff::LengthOnly),
            other => Err(format!("unknown list diff policy '{}'", other)),
        }
    }
}

impl ListDiff {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListDiff::Structural => "structural",
            ListDiff::LengthOnly => "length",
        }
    }

    /// True when `next` should replace `current`.
    pub fn differs<T: PartialEq>(&self, current: &[T], next: &[T]) -> bool {
        match self {
            ListDiff::Structural => current != next,
            ListDiff::LengthOnly => current.len() != next.len(),
        }
    }
}

/// Detail-view change detector.
///
/// Looks only at the container's `validated` flag and each form's status,
/// matching forms by id. A missing previous snapshot is never a change: the
/// first observation only establishes the baseline.
pub fn detail_changed(next: &ContainerDetail, previous: Option<&ContainerDetail>) -> bool {
    let Some(previous) = previous else {
        return false;
    };

    if next.validated != previous.validated {
        return true;
    }

    if next.forms.len() != previous.forms.len() {
        return true;
    }

    next.forms.iter().any(|form| {
        previous
            .forms
            .iter()
            .find(|p| p.form_id == form.form_id)
            .is_none_or(|p| p.status != form.status)
    })
}
