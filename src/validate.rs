//! Argument validators used as clap value parsers.

/// Accept names made of alphanumerics, `-` and `_`.
///
/// Length and case are not checked; the service enforces its own rules.
pub fn valid_name(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err(format!("'{value}' is not a valid name"));
    }

    let stripped: String = value.chars().filter(|c| *c != '-' && *c != '_').collect();
    if stripped.is_empty() || !stripped.chars().all(char::is_alphanumeric) {
        return Err(format!(
            "'{value}' contains invalid characters (allowed: letters, digits, '-', '_')"
        ));
    }

    Ok(value.to_string())
}

/// Accept absolute URLs with a scheme and a host.
pub fn absolute_url(value: &str) -> Result<String, String> {
    match url::Url::parse(value) {
        Ok(parsed) if !parsed.scheme().is_empty() && parsed.has_host() => Ok(value.to_string()),
        _ => Err(format!("'{value}' is not a valid absolute URL")),
    }
}

/// Storage account names: lowercase letters and digits only.
pub fn storage_account_name(value: &str) -> Result<String, String> {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        Ok(value.to_string())
    } else {
        Err(format!(
            "'{value}' is not a valid storage account name (lowercase letters and digits only)"
        ))
    }
}
