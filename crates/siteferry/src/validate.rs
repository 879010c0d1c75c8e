use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AppError;

static PROJECT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("project name pattern"));

static DOMAIN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9.-]+$").expect("domain name pattern"));

/// Project names are platform subdomain labels: lowercase
/// alphanumerics and hyphens only.
pub fn is_valid_project_name(name: &str) -> bool {
    PROJECT_NAME.is_match(name)
}

/// Domain names allow dots, but never consecutive ones.
pub fn is_valid_domain_name(name: &str) -> bool {
    DOMAIN_NAME.is_match(name) && !name.contains("..")
}

pub fn require_project_name(name: &str) -> Result<(), AppError> {
    if is_valid_project_name(name) {
        Ok(())
    } else {
        Err(AppError::Validation("invalid project name".into()))
    }
}

pub fn require_domain_name(name: &str) -> Result<(), AppError> {
    if is_valid_domain_name(name) {
        Ok(())
    } else {
        Err(AppError::Validation("invalid domain name".into()))
    }
}
