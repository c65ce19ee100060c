use crate::errors::AppError;
use crate::generation::models::AdaptRequest;

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in both fields: the vacancy and the resume";

/// Both texts must hold something other than whitespace.
pub fn validate_submission(request: &AdaptRequest) -> Result<(), AppError> {
    if request.vacancy.trim().is_empty() || request.resume.trim().is_empty() {
        return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }
    Ok(())
}
