use autodeputy_core::{AppError, AppResult};
use chrono::NaiveDate;

/// Default audit note written after a substitution.
pub const DEFAULT_REASSIGNMENT_NOTE: &str =
    "Assignee changed to {new_name} because {original_name} is unavailable.";

/// Default field error raised when no deputy can take over.
pub const DEFAULT_UNAVAILABILITY_ERROR: &str =
    "{user_name} can't be assigned on {date}: unavailable from {from} to {to}.";

const REASSIGNMENT_PLACEHOLDERS: &[&str] = &["{new_name}", "{original_name}"];
const UNAVAILABILITY_PLACEHOLDERS: &[&str] = &["{user_name}", "{date}", "{from}", "{to}"];

/// Tunables of the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionSettings {
    /// Whether permitted ancestor projects widen the deputy scope.
    pub inherit_ancestor_scopes: bool,
    /// Audit note template with `{new_name}` and `{original_name}`.
    pub reassignment_note_template: String,
    /// Field error template with `{user_name}`, `{date}`, `{from}` and `{to}`.
    pub unavailability_error_template: String,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            inherit_ancestor_scopes: true,
            reassignment_note_template: DEFAULT_REASSIGNMENT_NOTE.to_owned(),
            unavailability_error_template: DEFAULT_UNAVAILABILITY_ERROR.to_owned(),
        }
    }
}

impl ResolutionSettings {
    /// Ensures both templates reference every placeholder they are rendered with.
    pub fn validate(&self) -> AppResult<()> {
        require_placeholders(
            "reassignment note template",
            self.reassignment_note_template.as_str(),
            REASSIGNMENT_PLACEHOLDERS,
        )?;
        require_placeholders(
            "unavailability error template",
            self.unavailability_error_template.as_str(),
            UNAVAILABILITY_PLACEHOLDERS,
        )
    }

    /// Renders the audit note for a substitution.
    #[must_use]
    pub fn render_reassignment_note(&self, new_name: &str, original_name: &str) -> String {
        self.reassignment_note_template
            .replace("{new_name}", new_name)
            .replace("{original_name}", original_name)
    }

    /// Renders the field error for an unavailable assignee without deputy.
    #[must_use]
    pub fn render_unavailability_error(
        &self,
        user_name: &str,
        date: NaiveDate,
        from: NaiveDate,
        to: NaiveDate,
    ) -> String {
        self.unavailability_error_template
            .replace("{user_name}", user_name)
            .replace("{date}", date.to_string().as_str())
            .replace("{from}", from.to_string().as_str())
            .replace("{to}", to.to_string().as_str())
    }
}

fn require_placeholders(label: &str, template: &str, placeholders: &[&str]) -> AppResult<()> {
    let missing: Vec<&str> = placeholders
        .iter()
        .copied()
        .filter(|placeholder| !template.contains(placeholder))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(AppError::Validation(format!(
        "{label} is missing placeholders: {}",
        missing.join(", ")
    )))
}
