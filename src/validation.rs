//! Field rules shared by create, replace and patch.

use crate::error::{AppError, AppResult};

/// A required text field: not blank and at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    max_length(field, value, max)
}

pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(value) => max_length(field, value, max),
        None => Ok(()),
    }
}

pub fn non_negative(field: &str, value: i32) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::BadRequest(format!("{field} must not be negative")));
    }
    Ok(())
}

pub fn within(field: &str, value: i32, min: i32, max: i32) -> AppResult<()> {
    if value < min || value > max {
        return Err(AppError::BadRequest(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

fn max_length(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
