use crate::utils::error::{PortalError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> PortalError {
    PortalError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// An http(s) URL with a host, as the content service endpoint must be.
pub fn service_url(field: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("Invalid URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(field, value, "Endpoint must use http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid(field, value, "Endpoint has no host"));
    }
    Ok(url)
}

pub fn non_zero(field: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(invalid(field, value, "Value must be greater than zero"));
    }
    Ok(())
}

pub fn directory(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() || value.contains('\0') {
        return Err(invalid(field, value, "Directory must be a non-empty path"));
    }
    Ok(())
}

/// A bare file name inside the session directory.
pub fn file_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "File name cannot be blank"));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(invalid(field, value, "File name cannot contain path separators"));
    }
    Ok(())
}

pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(field, value, format!("Expected one of: {}", allowed.join(", "))));
    }
    Ok(())
}
