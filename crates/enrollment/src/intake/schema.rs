use std::collections::BTreeMap;

use super::domain::{CandidateProfile, Sex};

/// Violations raised while normalizing the raw text fields. Validation stops
/// at the first failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field '{0}' is required")]
    MissingField(&'static str),
    #[error("tax id must contain exactly 11 digits")]
    MalformedTaxId,
    #[error("email address is malformed")]
    MalformedEmail,
    #[error("phone must contain at least 8 digits")]
    MalformedPhone,
    #[error("sex must be 'Masculino' or 'Feminino', got '{0}'")]
    UnknownSex(String),
}

pub const FIELD_FULL_NAME: &str = "full_name";
pub const FIELD_TAX_ID: &str = "tax_id";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PHONE: &str = "phone";
pub const FIELD_EDUCATION_UNIT: &str = "education_unit";
pub const FIELD_CURRENT_ROLE: &str = "current_role";
pub const FIELD_ACADEMIC_BACKGROUND: &str = "academic_background";
pub const FIELD_MANAGEMENT_EXPERIENCE: &str = "management_experience_years";
pub const FIELD_SEX: &str = "sex";
pub const FIELD_TEACHING_SERVICE: &str = "teaching_service_years";

/// Validate and normalize the submitted text fields into a typed profile.
///
/// `management_experience_years` deliberately coerces absent or non-numeric
/// input to zero instead of failing; every other constraint is strict.
pub fn validate(fields: &BTreeMap<String, String>) -> Result<CandidateProfile, ValidationError> {
    let full_name = required(fields, FIELD_FULL_NAME)?;
    let tax_id = normalize_tax_id(&required(fields, FIELD_TAX_ID)?)?;
    let email = normalize_email(&required(fields, FIELD_EMAIL)?)?;
    let phone = required(fields, FIELD_PHONE)?;
    if phone.chars().filter(char::is_ascii_digit).count() < 8 {
        return Err(ValidationError::MalformedPhone);
    }
    let education_unit = required(fields, FIELD_EDUCATION_UNIT)?;
    let current_role = required(fields, FIELD_CURRENT_ROLE)?;
    let academic_background = required(fields, FIELD_ACADEMIC_BACKGROUND)?;

    let management_experience_years = fields
        .get(FIELD_MANAGEMENT_EXPERIENCE)
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(0);

    let sex_raw = required(fields, FIELD_SEX)?;
    let sex = Sex::from_label(&sex_raw).ok_or(ValidationError::UnknownSex(sex_raw))?;

    let teaching_service_years = fields
        .get(FIELD_TEACHING_SERVICE)
        .and_then(|raw| raw.trim().parse::<f64>().ok());

    Ok(CandidateProfile {
        full_name,
        tax_id,
        email,
        phone,
        education_unit,
        current_role,
        academic_background,
        management_experience_years,
        sex,
        teaching_service_years,
    })
}

fn required(
    fields: &BTreeMap<String, String>,
    name: &'static str,
) -> Result<String, ValidationError> {
    match fields.get(name).map(|value| value.trim()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ValidationError::MissingField(name)),
    }
}

/// Strip the conventional `.`/`-` separators and require a bare 11-digit id.
fn normalize_tax_id(raw: &str) -> Result<String, ValidationError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let separators_only = raw
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-');

    if digits.len() == 11 && separators_only {
        Ok(digits)
    } else {
        Err(ValidationError::MalformedTaxId)
    }
}

fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.to_ascii_lowercase();
    let (local, domain) = email.split_once('@').ok_or(ValidationError::MalformedEmail)?;
    let well_formed = !local.is_empty()
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
        && !email.contains(char::is_whitespace);

    if well_formed {
        Ok(email)
    } else {
        Err(ValidationError::MalformedEmail)
    }
}
