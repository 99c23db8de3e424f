//! Environment-driven resolution settings.

use std::env;

use autodeputy_application::ResolutionSettings;
use autodeputy_core::{AppError, AppResult};

const INHERIT_ANCESTOR_SCOPES: &str = "AUTODEPUTY_INHERIT_ANCESTOR_SCOPES";
const REASSIGNMENT_NOTE: &str = "AUTODEPUTY_REASSIGNMENT_NOTE";
const UNAVAILABILITY_ERROR: &str = "AUTODEPUTY_UNAVAILABILITY_ERROR";

/// Loads `.env` if present, then reads settings from the process environment.
pub fn load_settings() -> AppResult<ResolutionSettings> {
    dotenvy::dotenv().ok();
    settings_from_lookup(|name| env::var(name).ok())
}

/// Builds settings from a variable lookup; unset or blank variables keep their defaults.
pub fn settings_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> AppResult<ResolutionSettings> {
    let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
    let defaults = ResolutionSettings::default();

    let settings = ResolutionSettings {
        inherit_ancestor_scopes: read(INHERIT_ANCESTOR_SCOPES)
            .map(|value| parse_bool(INHERIT_ANCESTOR_SCOPES, value.as_str()))
            .transpose()?
            .unwrap_or(defaults.inherit_ancestor_scopes),
        reassignment_note_template: read(REASSIGNMENT_NOTE)
            .unwrap_or(defaults.reassignment_note_template),
        unavailability_error_template: read(UNAVAILABILITY_ERROR)
            .unwrap_or(defaults.unavailability_error_template),
    };
    settings.validate()?;

    Ok(settings)
}

fn parse_bool(name: &str, value: &str) -> AppResult<bool> {
    value
        .trim()
        .to_ascii_lowercase()
        .parse::<bool>()
        .map_err(|error| AppError::Validation(format!("invalid {name} value '{value}': {error}")))
}
