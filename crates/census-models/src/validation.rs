//! Structural and format checks for incoming participant records.
//!
//! Checks run in a fixed order and the first failure is reported.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::participant::{is_truthy, Participant};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email pattern"));

static DOB_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}/[0-9]{2}/[0-9]{2}$").expect("valid dob pattern"));

/// Reason a participant record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All main sections (email, personalInfo, work, home) must be provided")]
    MissingSections,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Missing fields in personalInfo")]
    MissingPersonalInfo,

    #[error("DOB must be in YYYY/MM/DD format")]
    InvalidDob,

    #[error("Missing fields in work")]
    MissingWork,

    #[error("Salary must be a number")]
    SalaryNotNumeric,

    #[error("Missing fields in home")]
    MissingHome,
}

/// Validate a participant before it is inserted.
pub fn validate_participant(participant: &Participant) -> Result<(), ValidationError> {
    let (Some(email), Some(info), Some(work), Some(home)) = (
        participant.email.as_ref().filter(|e| is_truthy(Some(*e))),
        participant.personal_info.as_ref(),
        participant.work.as_ref(),
        participant.home.as_ref(),
    ) else {
        return Err(ValidationError::MissingSections);
    };

    if !email.as_str().is_some_and(is_valid_email) {
        return Err(ValidationError::InvalidEmail);
    }

    if !(is_truthy(info.firstname.as_ref())
        && is_truthy(info.lastname.as_ref())
        && is_truthy(info.dob.as_ref()))
    {
        return Err(ValidationError::MissingPersonalInfo);
    }

    if !info.dob.as_ref().and_then(Value::as_str).is_some_and(is_valid_dob) {
        return Err(ValidationError::InvalidDob);
    }

    // A present salary counts, even `null`; its type is checked next.
    let has_company = is_truthy(work.companyname.as_ref());
    let has_currency = is_truthy(work.currency.as_ref());
    let salary = match &work.salary {
        Some(salary) if has_company && has_currency => salary,
        _ => return Err(ValidationError::MissingWork),
    };

    if !salary.is_number() {
        return Err(ValidationError::SalaryNotNumeric);
    }

    if !(is_truthy(home.country.as_ref()) && is_truthy(home.city.as_ref())) {
        return Err(ValidationError::MissingHome);
    }

    Ok(())
}

/// Loose `local@domain.tld` shape check. Unanchored.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Fixed-width `YYYY/MM/DD` check. No calendar validation.
pub fn is_valid_dob(dob: &str) -> bool {
    DOB_PATTERN.is_match(dob)
}
