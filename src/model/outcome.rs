//! Edit Outcomes
//!
//! Edits address sections and points by id or index. A UI may hold a stale
//! reference, so edits report a skipped target explicitly instead of quietly
//! handing back the input.

use std::fmt;

use crate::model::values::MAX_TIME_SEC;

/// Why an edit left its input untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// No section carries the requested id.
    UnknownSection { id: String },

    /// No curve point carries the requested id.
    UnknownPoint { id: String },

    /// Insertion boundary outside `[0, len)`.
    BoundaryOutOfRange { index: usize, len: usize },

    /// Segment index outside `[0, len)`.
    SegmentOutOfRange { index: usize, len: usize },

    /// A time argument was NaN or infinite.
    NonFiniteTime { value: f64 },

    /// A time argument, or a time the edit would produce, beyond
    /// `±MAX_TIME_SEC`.
    TimeOutOfRange { value: f64, max: f64 },

    /// A value range with `max <= min` or non-finite bounds.
    InvalidRange { min: f64, max: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownSection { id } => write!(f, "no section with id \"{id}\""),
            SkipReason::UnknownPoint { id } => write!(f, "no curve point with id \"{id}\""),
            SkipReason::BoundaryOutOfRange { index, len } => {
                write!(f, "boundary {index} is outside 0..{len}")
            }
            SkipReason::SegmentOutOfRange { index, len } => {
                write!(f, "segment {index} is outside 0..{len}")
            }
            SkipReason::NonFiniteTime { value } => write!(f, "time {value} is not finite"),
            SkipReason::TimeOutOfRange { value, max } => {
                write!(f, "time {value} is beyond the {max} s limit")
            }
            SkipReason::InvalidRange { min, max } => {
                write!(f, "range {min}..{max} is empty or not finite")
            }
        }
    }
}

impl SkipReason {
    /// Why `value` cannot be used as a time, if it cannot.
    pub(crate) fn check_time(value: f64) -> Option<SkipReason> {
        if !value.is_finite() {
            Some(SkipReason::NonFiniteTime { value })
        } else if value.abs() > MAX_TIME_SEC {
            Some(SkipReason::TimeOutOfRange {
                value,
                max: MAX_TIME_SEC,
            })
        } else {
            None
        }
    }
}

/// Result of an edit: either the new value or the reason nothing changed.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum EditOutcome<T> {
    Applied(T),
    Skipped(SkipReason),
}

impl<T> EditOutcome<T> {
    pub(crate) fn skip(reason: SkipReason) -> Self {
        tracing::debug!(%reason, "edit skipped");
        EditOutcome::Skipped(reason)
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied(_))
    }

    /// The new value, if the edit was applied.
    pub fn applied(self) -> Option<T> {
        match self {
            EditOutcome::Applied(value) => Some(value),
            EditOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            EditOutcome::Applied(_) => None,
            EditOutcome::Skipped(reason) => Some(reason),
        }
    }

    /// The new value, or `fallback` (usually the unchanged input) when skipped.
    pub fn unwrap_or(self, fallback: T) -> T {
        self.applied().unwrap_or(fallback)
    }

    pub fn unwrap_or_else(self, fallback: impl FnOnce(&SkipReason) -> T) -> T {
        match self {
            EditOutcome::Applied(value) => value,
            EditOutcome::Skipped(reason) => fallback(&reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> EditOutcome<U> {
        match self {
            EditOutcome::Applied(value) => EditOutcome::Applied(f(value)),
            EditOutcome::Skipped(reason) => EditOutcome::Skipped(reason),
        }
    }

    /// Convert into a `Result`, treating a skip as the error.
    pub fn into_result(self) -> Result<T, SkipReason> {
        match self {
            EditOutcome::Applied(value) => Ok(value),
            EditOutcome::Skipped(reason) => Err(reason),
        }
    }
}
