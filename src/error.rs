use std::path::PathBuf;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    InvalidArgument(String),
    NotAController { file: PathBuf },
    EndpointNotFound(String),
    EnhancementError(String),
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::NotAController { file } => {
                write!(f, "No @RestController found in {}", file.display())
            }
            Error::EndpointNotFound(name) => write!(f, "No endpoint named '{}'", name),
            Error::EnhancementError(msg) => write!(f, "Text enhancement failed: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::NotAController {
            file: PathBuf::from("src/Foo.java"),
        };
        assert_eq!(err.to_string(), "No @RestController found in src/Foo.java");
        assert_eq!(
            Error::EndpointNotFound("find".to_string()).to_string(),
            "No endpoint named 'find'"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::SerializationError(_)));
    }
}
