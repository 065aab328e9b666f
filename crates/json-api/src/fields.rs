//! Request field helpers.

/// Read a required, non-blank string field, trimmed.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, String> {
    value.map_or_else(|| Err(format!("{field} is required")), |value| non_blank(value, field))
}

/// Trim a string field, rejecting it when nothing is left.
pub(crate) fn non_blank(value: String, field: &str) -> Result<String, String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }

    Ok(trimmed.to_owned())
}
