//! Unavailability windows and point-in-time availability.

use autodeputy_core::{AppError, AppResult};
use chrono::NaiveDate;
use serde::Serialize;

/// Inclusive date range during which a person cannot be assigned work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UnavailabilityWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl UnavailabilityWindow {
    /// Creates a window, rejecting ranges that end before they start.
    pub fn new(from: NaiveDate, to: NaiveDate) -> AppResult<Self> {
        if to < from {
            return Err(AppError::Validation(format!(
                "unavailability window must not end ({to}) before it starts ({from})"
            )));
        }

        Ok(Self { from, to })
    }

    /// Returns the first unavailable day.
    #[must_use]
    pub fn from(&self) -> NaiveDate {
        self.from
    }

    /// Returns the last unavailable day.
    #[must_use]
    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Returns whether the date falls inside the window, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Returns whether two windows share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.from <= other.to && other.from <= self.to
    }
}

/// All unavailability windows of one person.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityCalendar {
    windows: Vec<UnavailabilityWindow>,
}

impl AvailabilityCalendar {
    /// Creates a calendar. Windows are kept sorted by start date.
    #[must_use]
    pub fn new(mut windows: Vec<UnavailabilityWindow>) -> Self {
        windows.sort_by_key(|window| (window.from, window.to));
        Self { windows }
    }

    /// Returns the windows sorted by start date.
    #[must_use]
    pub fn windows(&self) -> &[UnavailabilityWindow] {
        self.windows.as_slice()
    }

    /// Returns whether the person is available on the date.
    #[must_use]
    pub fn is_available(&self, date: NaiveDate) -> bool {
        self.blocking_window(date).is_none()
    }

    /// Returns the window that makes the person unavailable on the date.
    #[must_use]
    pub fn blocking_window(&self, date: NaiveDate) -> Option<&UnavailabilityWindow> {
        self.windows.iter().find(|window| window.contains(date))
    }
}

/// Rejects window sets in which two windows share a day.
pub fn ensure_non_overlapping(windows: &[UnavailabilityWindow]) -> AppResult<()> {
    let mut sorted = windows.to_vec();
    sorted.sort_by_key(|window| (window.from, window.to));

    for pair in sorted.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            return Err(AppError::Validation(format!(
                "unavailability windows {}..={} and {}..={} overlap",
                pair[0].from, pair[0].to, pair[1].from, pair[1].to
            )));
        }
    }

    Ok(())
}
