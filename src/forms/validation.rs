use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Minimum trimmed length for the dataset title and description.
pub const MIN_TEXT_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must be of minimum length 3")]
    TitleTooShort,

    #[error("Description must be of minimum length 3")]
    DescriptionTooShort,

    #[error("ORCID {0} is not valid")]
    InvalidOrcid(String),
}

static ORCID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{3}[0-9X]$").unwrap());

/// `0000-0002-1825-0097` style identifiers. The last character may be the
/// `X` check digit.
pub fn is_valid_orcid(orcid: &str) -> bool {
    ORCID_REGEX.is_match(orcid)
}

fn long_enough(text: &str) -> bool {
    text.trim().chars().count() >= MIN_TEXT_LENGTH
}

/// Check title and description. Both problems are reported together.
pub fn validate_basic_info(title: &str, description: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !long_enough(title) {
        errors.push(ValidationError::TitleTooShort);
    }
    if !long_enough(description) {
        errors.push(ValidationError::DescriptionTooShort);
    }
    errors
}

/// Only filled-in ORCID fields are checked; the field is optional.
pub fn validate_orcids<'a>(orcids: impl IntoIterator<Item = &'a str>) -> Vec<ValidationError> {
    orcids
        .into_iter()
        .map(str::trim)
        .filter(|o| !o.is_empty() && !is_valid_orcid(o))
        .map(|o| ValidationError::InvalidOrcid(o.to_string()))
        .collect()
}
