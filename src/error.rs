/// Error types that can occur during model operations
///
/// # Variants
///
/// - `NotFitted` - Indicates that the model has not been fitted yet
/// - `InputValidationError` - indicates the input data or tuning parameters do not meet the expected format, length, or validation rules
///
/// Broken internal invariants (for example subtracting a value from an empty accumulator, or
/// reading a split result before every row has been swept) are programming errors and panic
/// instead of being reported through this type.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    NotFitted,
    InputValidationError(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::NotFitted => {
                write!(
                    f,
                    "Model has not been fitted. Certain methods require the model to be fitted before use."
                )
            }
            ModelError::InputValidationError(msg) => write!(f, "Input validation error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}
