//! Settings error types.

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file contains invalid JSON.
    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let e = SettingsError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert!(e.to_string().contains("read settings file"));
    }

    #[test]
    fn parse_error_display() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = SettingsError::from(inner);
        assert!(e.to_string().contains("parse settings JSON"));
    }
}
