//! Errors raised while validating generation parameters.

use thiserror::Error;

/// Errors that can occur before any noise field is generated.
///
/// All generators validate their configuration up front, so an error means
/// nothing was produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Fractal amplitude sum is zero; cannot normalize")]
    DegenerateNormalization,
}

impl GenerationError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        GenerationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Rejects zero grid dimensions.
pub(crate) fn require_nonzero(name: &'static str, value: u32) -> Result<(), GenerationError> {
    if value == 0 {
        return Err(GenerationError::invalid(name, "must be at least 1"));
    }
    Ok(())
}

/// Rejects zero, negative and non-finite scales.
pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<(), GenerationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GenerationError::invalid(
            name,
            format!("must be a positive finite number, got {value}"),
        ));
    }
    Ok(())
}

/// Rejects NaN and infinite values.
pub(crate) fn require_finite(name: &'static str, value: f32) -> Result<(), GenerationError> {
    if !value.is_finite() {
        return Err(GenerationError::invalid(
            name,
            format!("must be finite, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_nonzero() {
        assert!(require_nonzero("width", 1).is_ok());
        assert!(matches!(
            require_nonzero("width", 0),
            Err(GenerationError::InvalidParameter { name: "width", .. })
        ));
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("scale", 0.001).is_ok());
        assert!(require_positive("scale", 0.0).is_err());
        assert!(require_positive("scale", -3.0).is_err());
        assert!(require_positive("scale", f32::NAN).is_err());
        assert!(require_positive("scale", f32::INFINITY).is_err());
    }

    #[test]
    fn test_error_message_names_parameter() {
        let err = require_positive("scale", 0.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("scale"), "message should name the parameter: {msg}");
    }
}
