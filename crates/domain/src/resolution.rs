//! Value types shared by the availability resolution flow.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Work item fields the resolution flow reports errors against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    /// The assignee field.
    Assignee,
    /// The due date field.
    DueDate,
    /// The start date field.
    StartDate,
}

impl ItemField {
    /// Returns a stable field key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assignee => "assigned_to",
            Self::DueDate => "due_date",
            Self::StartDate => "start_date",
        }
    }
}

/// Picks the date an assignee's availability is checked against.
///
/// The due date wins over the start date. Missing or past dates fall back
/// to `today`.
#[must_use]
pub fn resolve_check_date(
    due_date: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
    today: NaiveDate,
) -> NaiveDate {
    due_date
        .or(start_date)
        .filter(|candidate| *candidate >= today)
        .unwrap_or(today)
}

/// Why an unavailable assignee could not be substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionDetails {
    /// Display name of the unavailable assignee.
    pub user_name: String,
    /// Date the availability was checked for.
    pub date: NaiveDate,
    /// First day of the blocking window.
    pub unavailable_from: NaiveDate,
    /// Last day of the blocking window.
    pub unavailable_to: NaiveDate,
    /// Rendered field error message.
    pub message: String,
}
