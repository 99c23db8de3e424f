//! Availability check and deputy substitution for one work item save.

use std::backtrace::Backtrace;
use std::sync::Arc;

use autodeputy_core::AppError;
use autodeputy_domain::{
    Assignee, ItemField, Person, PersonId, RejectionDetails, resolve_check_date,
};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    AssignableItem, AvailabilityService, DeputyPermissionRepository, DeputyResolver,
    DiagnosticEntry, DiagnosticSink, ProjectRepository, ProjectScopeResolver, ResolutionSettings,
};

/// Caller-supplied context of one triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionContext {
    /// Person performing the save.
    pub acting_user_id: PersonId,
    /// Current calendar date.
    pub today: NaiveDate,
}

/// Internal failure that escaped resolution.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ResolutionFault {
    source: AppError,
    backtrace: String,
}

impl ResolutionFault {
    fn capture(source: AppError) -> Self {
        Self {
            source,
            backtrace: Backtrace::force_capture().to_string(),
        }
    }

    /// Returns the underlying error.
    #[must_use]
    pub fn error(&self) -> &AppError {
        &self.source
    }

    /// Returns the rendered backtrace captured at the engine boundary.
    #[must_use]
    pub fn backtrace(&self) -> &str {
        self.backtrace.as_str()
    }
}

/// Result of one availability check.
#[derive(Debug)]
pub enum ResolutionOutcome {
    /// Assignee left as is.
    Unchanged,
    /// Assignee replaced by a deputy.
    Substituted {
        /// New assignee.
        deputy: Person,
        /// Unavailable assignee, now a watcher.
        original: Person,
    },
    /// No deputy could take over; a field error was reported.
    Rejected(RejectionDetails),
    /// Resolution failed internally; treated like [`ResolutionOutcome::Unchanged`].
    Faulted(ResolutionFault),
}

impl ResolutionOutcome {
    /// Returns whether the engine reassigned the item.
    #[must_use]
    pub fn assignee_changed(&self) -> bool {
        matches!(self, Self::Substituted { .. })
    }

    /// Returns whether the host save must fail.
    #[must_use]
    pub fn blocks_save(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Orchestrates availability lookup, scope resolution and deputy search.
#[derive(Clone)]
pub struct AvailabilityResolutionEngine {
    availability: AvailabilityService,
    scope_resolver: ProjectScopeResolver,
    deputy_resolver: DeputyResolver,
    diagnostic_sink: Arc<dyn DiagnosticSink>,
    settings: ResolutionSettings,
}

impl AvailabilityResolutionEngine {
    /// Creates an engine from its collaborators.
    ///
    /// The project scope resolver is built here so that ancestor inheritance
    /// always follows `settings`.
    #[must_use]
    pub fn new(
        availability: AvailabilityService,
        project_repository: Arc<dyn ProjectRepository>,
        permission_repository: Arc<dyn DeputyPermissionRepository>,
        deputy_resolver: DeputyResolver,
        diagnostic_sink: Arc<dyn DiagnosticSink>,
        settings: ResolutionSettings,
    ) -> Self {
        Self {
            availability,
            scope_resolver: ProjectScopeResolver::new(
                project_repository,
                permission_repository,
                &settings,
            ),
            deputy_resolver,
            diagnostic_sink,
            settings,
        }
    }

    /// Checks the item's assignee and substitutes a deputy when needed.
    ///
    /// Never fails: internal errors are logged to the diagnostic sink once and
    /// reported as [`ResolutionOutcome::Faulted`] with the item untouched.
    pub async fn check_assignee_availability(
        &self,
        item: &mut dyn AssignableItem,
        context: &ResolutionContext,
    ) -> ResolutionOutcome {
        let principal = match item.current_assignee() {
            Some(Assignee::Individual(person)) if person.id() != context.acting_user_id => {
                person.clone()
            }
            _ => return ResolutionOutcome::Unchanged,
        };

        match self.resolve(item, principal, context).await {
            Ok(outcome) => outcome,
            Err(error) => {
                let fault = ResolutionFault::capture(error);
                self.diagnostic_sink.log_error(&DiagnosticEntry {
                    message: format!(
                        "failed to check assignee availability for item '{}': {fault}",
                        item.item_id()
                    ),
                    backtrace: fault.backtrace().to_owned(),
                });
                ResolutionOutcome::Faulted(fault)
            }
        }
    }

    // Every fallible call happens before the item is touched.
    async fn resolve(
        &self,
        item: &mut dyn AssignableItem,
        principal: Person,
        context: &ResolutionContext,
    ) -> Result<ResolutionOutcome, AppError> {
        let check_date = resolve_check_date(item.due_date(), item.start_date(), context.today);
        let calendar = self.availability.calendar_for(principal.id()).await?;
        let Some(window) = calendar.blocking_window(check_date).copied() else {
            debug!(
                principal_id = %principal.id(),
                check_date = %check_date,
                "assignee available"
            );
            return Ok(ResolutionOutcome::Unchanged);
        };

        let scope = self
            .scope_resolver
            .scope_for(principal.id(), item.current_project())
            .await?;
        let deputy = self
            .deputy_resolver
            .find_deputy(principal.id(), &scope, check_date)
            .await?;

        let Some(deputy) = deputy else {
            let message = self.settings.render_unavailability_error(
                principal.name(),
                check_date,
                window.from(),
                window.to(),
            );
            item.report_field_error(ItemField::Assignee, message.as_str());
            info!(
                item_id = %item.item_id(),
                principal_id = %principal.id(),
                check_date = %check_date,
                "no available deputy, assignment rejected"
            );

            return Ok(ResolutionOutcome::Rejected(RejectionDetails {
                user_name: principal.name().to_owned(),
                date: check_date,
                unavailable_from: window.from(),
                unavailable_to: window.to(),
                message,
            }));
        };

        let note = self
            .settings
            .render_reassignment_note(deputy.name(), principal.name());
        item.set_assignee(Assignee::Individual(deputy.clone()));
        item.add_watcher(&principal);
        if let Some(record) = item.current_change_record() {
            record.append_note(note.as_str());
        } else {
            item.open_change_record().append_note(note.as_str());
        }
        info!(
            item_id = %item.item_id(),
            principal_id = %principal.id(),
            deputy_id = %deputy.id(),
            check_date = %check_date,
            "assignee substituted by deputy"
        );

        Ok(ResolutionOutcome::Substituted {
            deputy,
            original: principal,
        })
    }
}
