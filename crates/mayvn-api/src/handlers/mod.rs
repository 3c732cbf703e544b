pub mod accounts;
pub mod ideas;
pub mod insights;
pub mod tokens;

use mayvn_core::AppError;

/// A present, non-blank string value
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Required parameter, or a 400 carrying `message`
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    non_empty(value).ok_or_else(|| AppError::InvalidInput(message.to_string()))
}
