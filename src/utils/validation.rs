//! Input validation for uploaded lab files.

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Extensions lab reports are commonly exported or archived with
const KNOWN_EXTENSIONS: [&str; 5] = [".txt", ".tsv", ".csv", ".gz", ".gsgt"];

/// Security validation error types
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
}

impl ValidationError {
    /// Machine-readable error type used in API responses
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            ValidationError::FilenameTooLong => "filename_too_long",
            ValidationError::InvalidFilename => "invalid_filename",
            ValidationError::EmptyFilename => "empty_filename",
        }
    }
}

/// Secure filename validation to prevent directory traversal and other attacks
///
/// Validates and sanitizes filenames by:
/// - Checking length limits
/// - Preventing directory traversal (../, ..\\)
/// - Removing potentially dangerous characters
/// - Ensuring filename is not empty after sanitization
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if filename.chars().any(|c| c.is_ascii_control()) {
        return Err(ValidationError::InvalidFilename);
    }

    let sanitized = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
        .collect::<String>();

    if sanitized.trim().is_empty() {
        return Err(ValidationError::InvalidFilename);
    }

    // Hidden files are only accepted with a lab report extension
    if sanitized.starts_with('.') && !has_known_extension(&sanitized) {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}

/// Check if filename has a lab report extension
#[must_use]
pub fn has_known_extension(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    KNOWN_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Validate an optional upload filename, passing through `None`
///
/// # Errors
///
/// Returns the `ValidationError` from [`validate_filename`] if a filename was
/// supplied and rejected.
pub fn validate_upload_filename(filename: Option<&str>) -> Result<Option<String>, ValidationError> {
    filename.map(validate_filename).transpose()
}
