//! Ports implemented by the host application around one work item save.

use autodeputy_domain::{Assignee, ItemField, Person, ProjectId};
use chrono::NaiveDate;

/// Per-save audit container of a work item.
pub trait ChangeRecord: Send {
    /// Appends a human-readable note.
    fn append_note(&mut self, note: &str);
}

/// Work item being saved, as seen by the resolution engine.
///
/// The host hands a mutable borrow of the in-flight item to the engine; all
/// methods are in-memory operations on that item.
pub trait AssignableItem: Send {
    /// Returns a stable identifier for diagnostics.
    fn item_id(&self) -> String;

    /// Returns the current assignee.
    fn current_assignee(&self) -> Option<&Assignee>;

    /// Replaces the assignee.
    fn set_assignee(&mut self, assignee: Assignee);

    /// Registers a watcher. Adding an existing watcher is a no-op.
    fn add_watcher(&mut self, person: &Person);

    /// Returns the due date.
    fn due_date(&self) -> Option<NaiveDate>;

    /// Returns the start date.
    fn start_date(&self) -> Option<NaiveDate>;

    /// Returns the project the item belongs to.
    fn current_project(&self) -> ProjectId;

    /// Returns the change record opened for the current save, if any.
    fn current_change_record(&mut self) -> Option<&mut dyn ChangeRecord>;

    /// Opens a change record for the current save and returns it.
    fn open_change_record(&mut self) -> &mut dyn ChangeRecord;

    /// Reports a user-visible validation failure on a field.
    fn report_field_error(&mut self, field: ItemField, message: &str);
}

/// One error record for the process-wide diagnostic sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    /// Error message including context.
    pub message: String,
    /// Rendered backtrace captured with the error.
    pub backtrace: String,
}

/// Process-wide sink for internal faults.
///
/// Each call must be emitted as one atomic record.
pub trait DiagnosticSink: Send + Sync {
    /// Records an internal error.
    fn log_error(&self, entry: &DiagnosticEntry);
}
