/// Errors raised by the transform math, scene composition and model loading
use std::fmt;

/// Error type shared by every fallible core operation.
///
/// Operations that return this error leave their receiver untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed input data, e.g. geometry arrays of the wrong shape.
    InvalidArgument(String),
    /// A vector was divided by exactly zero.
    DivideByZero,
    /// Inversion of a matrix whose determinant is exactly zero.
    SingularMatrix,
    /// Text handed to the loader is not valid JSON.
    Parse(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::DivideByZero => write!(f, "cannot divide by zero"),
            Error::SingularMatrix => write!(f, "matrix is not invertible (determinant is zero)"),
            Error::Parse(msg) => write!(f, "failed to parse model JSON: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_syntax() || e.is_eof() {
            Error::Parse(e.to_string())
        } else {
            Error::InvalidArgument(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Error::DivideByZero.to_string(), "cannot divide by zero");
        assert!(Error::invalid("vertices").to_string().contains("vertices"));
    }

    #[test]
    fn test_json_error_classification() {
        let syntax = serde_json::from_str::<Vec<f32>>("[1, 2").unwrap_err();
        assert!(matches!(Error::from(syntax), Error::Parse(_)));

        let shape = serde_json::from_str::<Vec<f32>>("{\"a\": 1}").unwrap_err();
        assert!(matches!(Error::from(shape), Error::InvalidArgument(_)));
    }
}
