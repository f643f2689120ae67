use crate::error::RedListError;
use crate::species::CATEGORY_LABELS;

pub const MAX_SPECIES_NAME_LENGTH: usize = 100;

/// Status labels offered by the search form.
pub const STATUS_CHOICES: &[&str] = &[
    "Vulnerable",
    "Endangered",
    "Critically Endangered",
    "Least Concern",
    "Not Available",
];

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, RedListError> {
    if input.len() > max_len {
        return Err(RedListError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(RedListError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a species name for lookup.
pub fn validate_species_name(input: &str) -> Result<String, RedListError> {
    sanitize_text(input, MAX_SPECIES_NAME_LENGTH)
}

/// Validate a status filter. Accepts the form's choices and every Red List
/// category label, matched exactly after trimming.
pub fn validate_status(input: &str) -> Result<String, RedListError> {
    let trimmed = input.trim();
    let known = STATUS_CHOICES.contains(&trimmed)
        || CATEGORY_LABELS.iter().any(|(_, label)| *label == trimmed);
    if known {
        Ok(trimmed.to_string())
    } else {
        Err(RedListError::InvalidInput(format!(
            "unknown conservation status '{}'. Valid values: {}",
            input,
            STATUS_CHOICES.join(", ")
        )))
    }
}

/// Validate a 1-indexed page number.
pub fn validate_page(page: usize) -> Result<usize, RedListError> {
    if page == 0 {
        return Err(RedListError::InvalidInput(
            "page must be at least 1".to_string(),
        ));
    }
    Ok(page)
}
